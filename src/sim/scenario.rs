//! Catalogue of animated pages
//!
//! `Scenario` lets one driver and one renderer serve every page type.

use glam::DVec2;
use serde::Serialize;

use super::model::{
    DualDrop, DualDropState, FallState, FreeFall, Projectile, ProjectileState, ThrowState,
    VerticalThrow,
};
use super::orbit::{CircularOrbit, KeplerPair, KeplerState, OrbitState};
use super::stepper::Stepper;
use super::thermo::AdiabaticProcess;

/// Any time-driven page model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scenario {
    Throw(VerticalThrow),
    Fall(FreeFall),
    DualDrop(DualDrop),
    Projectile(Projectile),
    Orbit(CircularOrbit),
    Kepler(KeplerPair),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioState {
    Throw(ThrowState),
    Fall(FallState),
    DualDrop(DualDropState),
    Projectile(ProjectileState),
    Orbit(OrbitState),
    Kepler(KeplerState),
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Throw(_) => "vertical throw",
            Scenario::Fall(_) => "free fall",
            Scenario::DualDrop(_) => "dual drop",
            Scenario::Projectile(_) => "projectile",
            Scenario::Orbit(_) => "satellite orbit",
            Scenario::Kepler(_) => "kepler's third law",
        }
    }

    /// Simulation time after which the page stops on its own, if any
    pub fn duration(&self) -> Option<f64> {
        match self {
            Scenario::Throw(m) => Some(m.flight_time()),
            Scenario::Fall(m) => Some(m.landing_time()),
            Scenario::DualDrop(m) => Some(m.total_time()),
            Scenario::Projectile(m) => Some(m.flight_time()),
            Scenario::Orbit(_) | Scenario::Kepler(_) => None,
        }
    }
}

impl Stepper for Scenario {
    type State = ScenarioState;

    fn state_at(&self, t: f64) -> ScenarioState {
        match self {
            Scenario::Throw(m) => ScenarioState::Throw(m.state_at(t)),
            Scenario::Fall(m) => ScenarioState::Fall(m.state_at(t)),
            Scenario::DualDrop(m) => ScenarioState::DualDrop(m.state_at(t)),
            Scenario::Projectile(m) => ScenarioState::Projectile(m.state_at(t)),
            Scenario::Orbit(m) => ScenarioState::Orbit(m.state_at(t)),
            Scenario::Kepler(m) => ScenarioState::Kepler(m.state_at(t)),
        }
    }

    fn elapsed(&self, state: &ScenarioState) -> f64 {
        match state {
            ScenarioState::Throw(s) => s.t,
            ScenarioState::Fall(s) => s.t,
            ScenarioState::DualDrop(s) => s.t,
            ScenarioState::Projectile(s) => s.t,
            ScenarioState::Orbit(s) => s.t,
            ScenarioState::Kepler(s) => s.t,
        }
    }

    fn is_finished(&self, state: &ScenarioState) -> bool {
        match (self, state) {
            (Scenario::Throw(m), ScenarioState::Throw(s)) => m.is_finished(s),
            (Scenario::Fall(m), ScenarioState::Fall(s)) => m.is_finished(s),
            (Scenario::DualDrop(m), ScenarioState::DualDrop(s)) => m.is_finished(s),
            (Scenario::Projectile(m), ScenarioState::Projectile(s)) => m.is_finished(s),
            (Scenario::Orbit(m), ScenarioState::Orbit(s)) => m.is_finished(s),
            (Scenario::Kepler(m), ScenarioState::Kepler(s)) => m.is_finished(s),
            // A state from another page; stop rather than animate garbage
            _ => true,
        }
    }

    fn trail_point(&self, state: &ScenarioState) -> Option<DVec2> {
        match (self, state) {
            (Scenario::Throw(m), ScenarioState::Throw(s)) => m.trail_point(s),
            (Scenario::Projectile(m), ScenarioState::Projectile(s)) => m.trail_point(s),
            (Scenario::Orbit(m), ScenarioState::Orbit(s)) => m.trail_point(s),
            _ => None,
        }
    }
}

/// Everything a page can host: an animation or a slider-only model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageModel {
    Animated(Scenario),
    Adiabatic(AdiabaticProcess),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::orbit::Body;

    #[test]
    fn test_scenario_delegates() {
        let throw = VerticalThrow::new(19.6, 9.8).unwrap();
        let scenario = Scenario::Throw(throw);
        let mut state = scenario.initial_state();
        assert_eq!(state, ScenarioState::Throw(throw.initial_state()));

        scenario.step(&mut state, 1.0);
        let ScenarioState::Throw(inner) = state else {
            panic!("wrong state variant");
        };
        assert!((inner.height - throw.height_at(1.0)).abs() < 1e-12);
        assert_eq!(scenario.duration(), Some(4.0));
    }

    #[test]
    fn test_mismatched_state_is_terminal() {
        let scenario = Scenario::Throw(VerticalThrow::new(10.0, 9.8).unwrap());
        let fall = FreeFall::new(10.0, 9.8).unwrap();
        let mut foreign = ScenarioState::Fall(fall.initial_state());
        let before = foreign;
        assert!(scenario.step(&mut foreign, 0.1));
        assert_eq!(foreign, before);
    }

    #[test]
    fn test_orbit_has_no_duration() {
        let orbit = CircularOrbit::from_escape_fraction(Body::earth(), 0.5, 8.0).unwrap();
        assert_eq!(Scenario::Orbit(orbit).duration(), None);
        assert_eq!(Scenario::Orbit(orbit).name(), "satellite orbit");
    }

    #[test]
    fn test_state_serializes_with_kind_tag() {
        let scenario = Scenario::Fall(FreeFall::new(10.0, 9.8).unwrap());
        let json = serde_json::to_value(scenario.initial_state()).unwrap();
        assert_eq!(json["kind"], "fall");
        assert_eq!(json["height"], 10.0);
    }
}
