//! Readout text shown next to the canvas
//!
//! The page looks up elements by `data-readout` key and writes `value`;
//! nothing here touches the DOM.

use crate::sim::{
    FallPhase, FallState, FlightPhase, GasSample, Scenario, ScenarioState, ThrowPhase,
};

/// One label/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct ReadoutLine {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

impl ReadoutLine {
    fn new(key: &'static str, label: &'static str, value: String) -> Self {
        Self { key, label, value }
    }
}

pub fn throw_phase_label(phase: ThrowPhase) -> &'static str {
    match phase {
        ThrowPhase::Ascending => "Ascending",
        ThrowPhase::Apex { .. } => "At the top",
        ThrowPhase::Descending => "Descending",
        ThrowPhase::Landed => "Landed",
    }
}

pub fn fall_phase_label(phase: FallPhase) -> &'static str {
    match phase {
        FallPhase::Waiting { .. } => "Waiting",
        FallPhase::Falling => "Falling",
        FallPhase::Splashed => "Splashed",
    }
}

/// Signed value with anything that would print as "-0.0" folded to zero
fn one_decimal(value: f64) -> f64 {
    if value.abs() < 0.05 { 0.0 } else { value }
}

fn fall_lines(keys: [&'static str; 3], state: &FallState) -> [ReadoutLine; 3] {
    [
        ReadoutLine::new(keys[0], "Height", format!("{:.1} m", state.height)),
        ReadoutLine::new(
            keys[1],
            "Speed",
            format!("{:.1} m/s", state.velocity.abs()),
        ),
        ReadoutLine::new(keys[2], "Status", fall_phase_label(state.phase).to_owned()),
    ]
}

/// Lines for the current frame of an animated page
pub fn readout(scenario: &Scenario, state: &ScenarioState) -> Vec<ReadoutLine> {
    let mut lines = Vec::new();
    match (scenario, state) {
        (Scenario::Throw(m), ScenarioState::Throw(s)) => {
            lines.push(ReadoutLine::new("time", "Time", format!("{:.2} s", s.t)));
            lines.push(ReadoutLine::new("height", "Height", format!("{:.1} m", s.height)));
            lines.push(ReadoutLine::new(
                "velocity",
                "Velocity",
                format!("{:.1} m/s", one_decimal(s.velocity)),
            ));
            lines.push(ReadoutLine::new(
                "phase",
                "Status",
                throw_phase_label(s.phase).to_owned(),
            ));
            if let ThrowPhase::Apex { remaining } = s.phase {
                lines.push(ReadoutLine::new(
                    "hold",
                    "Resumes in",
                    format!("{remaining:.1} s"),
                ));
            }
            lines.push(ReadoutLine::new(
                "max-height",
                "Max height",
                format!("{:.1} m", m.max_height()),
            ));
            lines.push(ReadoutLine::new(
                "flight-time",
                "Flight time",
                format!("{:.2} s", m.flight_time()),
            ));
            lines.push(ReadoutLine::new(
                "last-second",
                "Last 1 s of ascent",
                format!("{:.1} m", m.last_seconds_distance(1.0)),
            ));
        }
        (Scenario::Fall(m), ScenarioState::Fall(s)) => {
            lines.push(ReadoutLine::new("time", "Time", format!("{:.2} s", s.t)));
            lines.extend(fall_lines(["height", "velocity", "phase"], s));
            lines.push(ReadoutLine::new(
                "impact-speed",
                "Impact speed",
                format!("{:.1} m/s", m.impact_speed()),
            ));
        }
        (Scenario::DualDrop(_), ScenarioState::DualDrop(s)) => {
            lines.push(ReadoutLine::new("time", "Time", format!("{:.2} s", s.t)));
            lines.extend(fall_lines(["height-1", "velocity-1", "phase-1"], &s.first));
            lines.extend(fall_lines(["height-2", "velocity-2", "phase-2"], &s.second));
            lines.push(ReadoutLine::new(
                "separation",
                "Δh",
                format!("{:.1} m", s.separation()),
            ));
        }
        (Scenario::Projectile(m), ScenarioState::Projectile(s)) => {
            lines.push(ReadoutLine::new("time", "Time", format!("{:.2} s", s.t)));
            lines.push(ReadoutLine::new("x", "Distance", format!("{:.1} m", s.position.x)));
            lines.push(ReadoutLine::new("height", "Height", format!("{:.1} m", s.position.y)));
            lines.push(ReadoutLine::new(
                "speed",
                "Speed",
                format!("{:.1} m/s", s.velocity.length()),
            ));
            lines.push(ReadoutLine::new(
                "phase",
                "Status",
                match s.phase {
                    FlightPhase::Flying => "Flying",
                    FlightPhase::Landed => "Landed",
                }
                .to_owned(),
            ));
            lines.push(ReadoutLine::new(
                "angle",
                "Angle",
                format!("{:.0}°", m.angle().to_degrees()),
            ));
            lines.push(ReadoutLine::new("range", "Range", format!("{:.1} m", m.range())));
        }
        (Scenario::Orbit(m), ScenarioState::Orbit(s)) => {
            lines.push(ReadoutLine::new(
                "revolutions",
                "Revolutions",
                format!("{:.2}", s.revolutions),
            ));
            lines.push(ReadoutLine::new(
                "altitude",
                "Height above surface",
                format!("{:.0} km", m.altitude() / 1000.0),
            ));
            lines.push(ReadoutLine::new(
                "altitude-radii",
                "Height (body radii)",
                format!("{:.2} R", m.altitude() / m.body().radius()),
            ));
            lines.push(ReadoutLine::new(
                "orbital-speed",
                "Orbital speed",
                format!("{:.2} km/s", m.orbital_speed() / 1000.0),
            ));
            lines.push(ReadoutLine::new(
                "escape-speed",
                "Escape speed",
                format!("{:.2} km/s", m.body().escape_speed() / 1000.0),
            ));
            lines.push(ReadoutLine::new(
                "period",
                "Period",
                format!("{:.1} min", m.period() / 60.0),
            ));
        }
        (Scenario::Kepler(m), ScenarioState::Kepler(s)) => {
            const YEAR: f64 = 365.25 * 86_400.0;
            lines.push(ReadoutLine::new(
                "elapsed",
                "Elapsed",
                format!("{:.2} years", s.t * m.time_scale() / YEAR),
            ));
            lines.push(ReadoutLine::new(
                "period-1",
                "Period 1",
                format!("{:.2} years", m.first_period() / YEAR),
            ));
            lines.push(ReadoutLine::new(
                "period-2",
                "Period 2",
                format!("{:.4} years", m.second_period() / YEAR),
            ));
            lines.push(ReadoutLine::new(
                "ratio",
                "T1/T2",
                format!("{:.1}", m.period_ratio()),
            ));
        }
        _ => {}
    }
    lines
}

/// Lines for the adiabatic page
pub fn gas_readout(sample: &GasSample) -> Vec<ReadoutLine> {
    vec![
        ReadoutLine::new("volume", "Volume", format!("{:.1} L", sample.volume)),
        ReadoutLine::new("pressure", "Pressure", format!("{:.2} atm", sample.pressure)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Body, CircularOrbit, DualDrop, KeplerPair, Stepper, VerticalThrow};

    fn value<'a>(lines: &'a [ReadoutLine], key: &str) -> &'a str {
        lines
            .iter()
            .find(|l| l.key == key)
            .map(|l| l.value.as_str())
            .unwrap_or_else(|| panic!("missing readout {key}"))
    }

    #[test]
    fn test_dual_drop_readout() {
        let scenario = Scenario::DualDrop(DualDrop::landing_together(9.8, 5.0, 2.0).unwrap());
        let lines = readout(&scenario, &scenario.initial_state());
        assert_eq!(value(&lines, "height-1"), "122.5 m");
        assert_eq!(value(&lines, "height-2"), "44.1 m");
        assert_eq!(value(&lines, "separation"), "78.4 m");
        assert_eq!(value(&lines, "phase-2"), "Waiting");
    }

    #[test]
    fn test_throw_readout_after_landing() {
        let scenario = Scenario::Throw(VerticalThrow::new(19.6, 9.8).unwrap());
        let lines = readout(&scenario, &scenario.state_at(10.0));
        assert_eq!(value(&lines, "height"), "0.0 m");
        assert_eq!(value(&lines, "velocity"), "0.0 m/s");
        assert_eq!(value(&lines, "phase"), "Landed");
        assert_eq!(value(&lines, "time"), "4.00 s");
    }

    #[test]
    fn test_velocity_at_top_of_throw_is_unsigned_zero() {
        let scenario = Scenario::Throw(VerticalThrow::new(19.6, 9.8).unwrap());
        let lines = readout(&scenario, &scenario.state_at(2.0));
        assert_eq!(value(&lines, "phase"), "Descending");
        assert_eq!(value(&lines, "velocity"), "0.0 m/s");

        let lines = readout(&scenario, &scenario.state_at(2.5));
        assert_eq!(value(&lines, "velocity"), "-4.9 m/s");
    }

    #[test]
    fn test_apex_hold_readout() {
        let scenario = Scenario::Throw(VerticalThrow::with_apex_hold(19.6, 9.8, 1.0).unwrap());
        let lines = readout(&scenario, &scenario.state_at(2.5));
        assert_eq!(value(&lines, "phase"), "At the top");
        assert_eq!(value(&lines, "hold"), "0.5 s");
    }

    #[test]
    fn test_half_escape_readout() {
        let orbit = CircularOrbit::from_escape_fraction(Body::earth(), 0.5, 8.0).unwrap();
        let scenario = Scenario::Orbit(orbit);
        let lines = readout(&scenario, &scenario.initial_state());
        assert_eq!(value(&lines, "altitude-radii"), "1.00 R");
        assert_eq!(value(&lines, "altitude"), "6371 km");
    }

    #[test]
    fn test_kepler_readout_ratio() {
        let scenario = Scenario::Kepler(KeplerPair::new(Body::sun(), 1e12, 1e10, 8.0).unwrap());
        let lines = readout(&scenario, &scenario.initial_state());
        assert_eq!(value(&lines, "ratio"), "1000.0");
    }
}
