//! Page configuration
//!
//! A page is described by a small JSON document (the canvas' `data-config`
//! attribute in the browser, built-in presets natively). Nothing is saved;
//! every page load starts from its config.

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_DISPLAY_PERIOD, DEFAULT_TRAIL_LENGTH, SPEED_STEPS, STANDARD_GRAVITY,
};
use crate::error::Result;
use crate::sim::{
    AdiabaticProcess, Body, CircularOrbit, DualDrop, FreeFall, KeplerPair, PageModel,
    Projectile, Scenario, VerticalThrow,
};

/// Speed buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPreset {
    Half,
    #[default]
    Normal,
    Double,
}

impl SpeedPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPreset::Half => "0.5x",
            SpeedPreset::Normal => "1x",
            SpeedPreset::Double => "2x",
        }
    }

    /// Parse a button's `data-speed` value ("0.5", "1x", "double", ...)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().trim_end_matches(['x', 'X']).to_lowercase().as_str() {
            "0.5" | ".5" | "half" => Some(SpeedPreset::Half),
            "1" | "1.0" | "normal" => Some(SpeedPreset::Normal),
            "2" | "2.0" | "double" => Some(SpeedPreset::Double),
            _ => None,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            SpeedPreset::Half => SPEED_STEPS[0],
            SpeedPreset::Normal => SPEED_STEPS[1],
            SpeedPreset::Double => SPEED_STEPS[2],
        }
    }
}

/// Playback preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial speed multiplier
    pub speed: SpeedPreset,
    /// Draw the fading path behind moving objects
    pub trails: bool,
    /// Trail capacity (clamped to 50-150)
    pub trail_length: usize,
    /// Skip trails and keep motion minimal
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: SpeedPreset::Normal,
            trails: true,
            trail_length: DEFAULT_TRAIL_LENGTH,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Trails respect reduced motion
    pub fn effective_trails(&self) -> bool {
        self.trails && !self.reduced_motion
    }
}

fn standard_gravity() -> f64 {
    STANDARD_GRAVITY
}

fn display_period() -> f64 {
    DEFAULT_DISPLAY_PERIOD
}

/// Central body of an orbit page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum BodyConfig {
    #[default]
    Earth,
    Sun,
    Custom {
        mass: f64,
        radius: f64,
    },
}

impl BodyConfig {
    pub fn build(&self) -> Result<Body> {
        match *self {
            BodyConfig::Earth => Ok(Body::earth()),
            BodyConfig::Sun => Ok(Body::sun()),
            BodyConfig::Custom { mass, radius } => Body::new(mass, radius),
        }
    }
}

/// Model parameters for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioConfig {
    VerticalThrow {
        speed: f64,
        #[serde(default = "standard_gravity")]
        gravity: f64,
        #[serde(default)]
        apex_hold: f64,
    },
    FreeFall {
        height: f64,
        #[serde(default = "standard_gravity")]
        gravity: f64,
        #[serde(default)]
        release_delay: f64,
    },
    DualDrop {
        #[serde(default = "standard_gravity")]
        gravity: f64,
        land_time: f64,
        release_gap: f64,
    },
    Projectile {
        speed: f64,
        angle_degrees: f64,
        #[serde(default = "standard_gravity")]
        gravity: f64,
    },
    SatelliteOrbit {
        escape_fraction: f64,
        #[serde(default)]
        body: BodyConfig,
        #[serde(default = "display_period")]
        display_period: f64,
    },
    Kepler {
        #[serde(default = "default_sun")]
        central: BodyConfig,
        first_radius: f64,
        second_radius: f64,
        #[serde(default = "display_period")]
        display_period: f64,
    },
    Adiabatic {
        p0: f64,
        v0: f64,
        gamma: f64,
    },
}

fn default_sun() -> BodyConfig {
    BodyConfig::Sun
}

impl ScenarioConfig {
    /// Validate the parameters and derive the model
    pub fn build(&self) -> Result<PageModel> {
        let scenario = match *self {
            ScenarioConfig::VerticalThrow {
                speed,
                gravity,
                apex_hold,
            } => Scenario::Throw(VerticalThrow::with_apex_hold(speed, gravity, apex_hold)?),
            ScenarioConfig::FreeFall {
                height,
                gravity,
                release_delay,
            } => Scenario::Fall(FreeFall::with_delay(height, gravity, release_delay)?),
            ScenarioConfig::DualDrop {
                gravity,
                land_time,
                release_gap,
            } => Scenario::DualDrop(DualDrop::landing_together(gravity, land_time, release_gap)?),
            ScenarioConfig::Projectile {
                speed,
                angle_degrees,
                gravity,
            } => Scenario::Projectile(Projectile::from_degrees(speed, angle_degrees, gravity)?),
            ScenarioConfig::SatelliteOrbit {
                escape_fraction,
                body,
                display_period,
            } => Scenario::Orbit(CircularOrbit::from_escape_fraction(
                body.build()?,
                escape_fraction,
                display_period,
            )?),
            ScenarioConfig::Kepler {
                central,
                first_radius,
                second_radius,
                display_period,
            } => Scenario::Kepler(KeplerPair::new(
                central.build()?,
                first_radius,
                second_radius,
                display_period,
            )?),
            ScenarioConfig::Adiabatic { p0, v0, gamma } => {
                return Ok(PageModel::Adiabatic(AdiabaticProcess::new(p0, v0, gamma)?));
            }
        };
        Ok(PageModel::Animated(scenario))
    }

    /// The pages shipped with the crate
    pub fn presets() -> Vec<(&'static str, ScenarioConfig)> {
        vec![
            (
                "throw",
                ScenarioConfig::VerticalThrow {
                    speed: 19.6,
                    gravity: STANDARD_GRAVITY,
                    apex_hold: 0.0,
                },
            ),
            (
                "brick-throw",
                ScenarioConfig::VerticalThrow {
                    speed: 14.7,
                    gravity: STANDARD_GRAVITY,
                    apex_hold: 0.5,
                },
            ),
            (
                "splash",
                ScenarioConfig::FreeFall {
                    height: 20.0,
                    gravity: STANDARD_GRAVITY,
                    release_delay: 1.0,
                },
            ),
            (
                "dual-drop",
                ScenarioConfig::DualDrop {
                    gravity: STANDARD_GRAVITY,
                    land_time: 5.0,
                    release_gap: 2.0,
                },
            ),
            (
                "projectile",
                ScenarioConfig::Projectile {
                    speed: 20.0,
                    angle_degrees: 45.0,
                    gravity: STANDARD_GRAVITY,
                },
            ),
            (
                "half-escape",
                ScenarioConfig::SatelliteOrbit {
                    escape_fraction: 0.5,
                    body: BodyConfig::Earth,
                    display_period: DEFAULT_DISPLAY_PERIOD,
                },
            ),
            (
                "kepler",
                ScenarioConfig::Kepler {
                    central: BodyConfig::Sun,
                    first_radius: 1e12,
                    second_radius: 1e10,
                    display_period: DEFAULT_DISPLAY_PERIOD,
                },
            ),
            (
                "adiabatic",
                ScenarioConfig::Adiabatic {
                    p0: 2.0,
                    v0: 5.0,
                    gamma: 1.4,
                },
            ),
        ]
    }
}

/// Everything a page needs at load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub settings: Settings,
    /// Seed for quiz option order; options keep markup order when absent
    #[serde(default)]
    pub quiz_seed: Option<u64>,
}

impl PageConfig {
    pub fn new(scenario: ScenarioConfig) -> Self {
        Self {
            scenario,
            settings: Settings::default(),
            quiz_seed: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
