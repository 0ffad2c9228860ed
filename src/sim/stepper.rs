//! Per-frame kinematic update
//!
//! A stepper never integrates: advancing by `dt` re-evaluates the closed
//! form at the new absolute time, so the result after any sequence of
//! deltas depends only on their sum and there is no drift to accumulate.

use glam::DVec2;

use super::model::{
    DualDrop, DualDropState, FallPhase, FallState, FlightPhase, FreeFall, Projectile,
    ProjectileState, ThrowPhase, ThrowState, VerticalThrow,
};
use super::orbit::{CircularOrbit, KeplerPair, KeplerState, OrbitState};

/// Advances a model's state through time
pub trait Stepper {
    type State: Clone + PartialEq + std::fmt::Debug;

    /// Closed-form state at absolute time `t`
    fn state_at(&self, t: f64) -> Self::State;

    /// Simulation time recorded in `state`
    fn elapsed(&self, state: &Self::State) -> f64;

    /// Terminal condition (landed, time exhausted)
    fn is_finished(&self, state: &Self::State) -> bool;

    /// Position to append to the cosmetic trail, if the model draws one
    fn trail_point(&self, _state: &Self::State) -> Option<DVec2> {
        None
    }

    fn initial_state(&self) -> Self::State {
        self.state_at(0.0)
    }

    /// Jump straight to absolute time `t` without any terminal guard
    fn seek(&self, state: &mut Self::State, t: f64) {
        *state = self.state_at(t);
    }

    /// Advance by `dt` seconds of simulation time. Returns `true` once the
    /// terminal condition holds; after that further calls leave `state`
    /// untouched.
    fn step(&self, state: &mut Self::State, dt: f64) -> bool {
        if self.is_finished(state) {
            return true;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let t = self.elapsed(state) + dt;
        self.seek(state, t);
        self.is_finished(state)
    }
}

impl Stepper for VerticalThrow {
    type State = ThrowState;

    fn state_at(&self, t: f64) -> ThrowState {
        self.sample(t)
    }

    fn elapsed(&self, state: &ThrowState) -> f64 {
        state.t
    }

    fn is_finished(&self, state: &ThrowState) -> bool {
        state.phase == ThrowPhase::Landed
    }

    fn trail_point(&self, state: &ThrowState) -> Option<DVec2> {
        Some(DVec2::new(0.0, state.height))
    }
}

impl Stepper for FreeFall {
    type State = FallState;

    fn state_at(&self, t: f64) -> FallState {
        self.sample(t)
    }

    fn elapsed(&self, state: &FallState) -> f64 {
        state.t
    }

    fn is_finished(&self, state: &FallState) -> bool {
        state.phase == FallPhase::Splashed
    }
}

impl Stepper for DualDrop {
    type State = DualDropState;

    fn state_at(&self, t: f64) -> DualDropState {
        self.sample(t)
    }

    fn elapsed(&self, state: &DualDropState) -> f64 {
        state.t
    }

    fn is_finished(&self, state: &DualDropState) -> bool {
        state.first.phase == FallPhase::Splashed && state.second.phase == FallPhase::Splashed
    }
}

impl Stepper for Projectile {
    type State = ProjectileState;

    fn state_at(&self, t: f64) -> ProjectileState {
        self.sample(t)
    }

    fn elapsed(&self, state: &ProjectileState) -> f64 {
        state.t
    }

    fn is_finished(&self, state: &ProjectileState) -> bool {
        state.phase == FlightPhase::Landed
    }

    fn trail_point(&self, state: &ProjectileState) -> Option<DVec2> {
        Some(state.position)
    }
}

impl Stepper for CircularOrbit {
    type State = OrbitState;

    fn state_at(&self, t: f64) -> OrbitState {
        self.sample(t)
    }

    fn elapsed(&self, state: &OrbitState) -> f64 {
        state.t
    }

    /// Orbits run until paused
    fn is_finished(&self, _state: &OrbitState) -> bool {
        false
    }

    fn trail_point(&self, state: &OrbitState) -> Option<DVec2> {
        Some(state.position)
    }
}

impl Stepper for KeplerPair {
    type State = KeplerState;

    fn state_at(&self, t: f64) -> KeplerState {
        self.sample(t)
    }

    fn elapsed(&self, state: &KeplerState) -> f64 {
        state.t
    }

    fn is_finished(&self, _state: &KeplerState) -> bool {
        false
    }
}
