//! Kinetoscope - closed-form physics animations
//!
//! Core modules:
//! - `sim`: Closed-form models, the per-frame stepper and the animation driver
//! - `renderer`: Surface abstraction and scenario drawing
//! - `hud`: Readout text derived from simulation state
//! - `quiz`: Multiple-choice quiz handling
//! - `settings`: Page configuration

pub mod error;
pub mod hud;
pub mod quiz;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::{PageConfig, ScenarioConfig, Settings, SpeedPreset};

use glam::DVec2;

/// Physical and animation constants
pub mod consts {
    /// Gravitational acceleration used throughout the pages (m/s²)
    pub const STANDARD_GRAVITY: f64 = 9.8;
    /// Newtonian constant of gravitation (m³ kg⁻¹ s⁻²)
    pub const GRAVITATIONAL_CONSTANT: f64 = 6.674e-11;

    pub const EARTH_MASS: f64 = 5.972e24;
    pub const EARTH_RADIUS: f64 = 6.371e6;
    pub const SOLAR_MASS: f64 = 1.989e30;

    /// Largest wall-clock delta a single frame may advance (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;
    /// Speed multipliers offered by the speed buttons
    pub const SPEED_STEPS: [f64; 3] = [0.5, 1.0, 2.0];

    /// Trail buffer bounds
    pub const MIN_TRAIL_LENGTH: usize = 50;
    pub const MAX_TRAIL_LENGTH: usize = 150;
    pub const DEFAULT_TRAIL_LENGTH: usize = 100;

    /// Seconds per on-screen revolution for orbit pages
    pub const DEFAULT_DISPLAY_PERIOD: f64 = 8.0;
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Reject NaN/infinite inputs and values that are not strictly positive
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::NonFinite { name });
    }
    if value <= 0.0 {
        return Err(Error::NonPositive { name, value });
    }
    Ok(value)
}

/// Like [`require_positive`] but zero is allowed
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::NonFinite { name });
    }
    if value < 0.0 {
        return Err(Error::Negative { name, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-12);
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert_eq!(wrap_angle(0.0), 0.0);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, PI / 2.0);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("g", 9.8).ok(), Some(9.8));
        assert!(matches!(
            require_positive("g", 0.0),
            Err(Error::NonPositive { name: "g", .. })
        ));
        assert!(matches!(
            require_positive("g", f64::NAN),
            Err(Error::NonFinite { name: "g" })
        ));
        assert!(require_non_negative("delay", 0.0).is_ok());
        assert!(require_non_negative("delay", -1.0).is_err());
    }
}
