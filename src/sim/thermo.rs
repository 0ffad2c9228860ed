//! Adiabatic compression (P·V^γ = K)
//!
//! Unlike the kinematic pages this model has no time axis: the volume
//! slider picks a point on the curve and the page re-renders immediately.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::require_positive;

/// Slider bounds for volume (litres)
pub const MIN_VOLUME: f64 = 1.0;
pub const MAX_VOLUME: f64 = 10.0;
/// Spacing of sampled curve points (litres)
pub const CURVE_STEP: f64 = 0.5;
/// A gamma guess within this distance of the true value is accepted
pub const GAMMA_TOLERANCE: f64 = 0.1;

/// One point on the P-V diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GasSample {
    pub volume: f64,
    pub pressure: f64,
    /// Red intensity used for the chamber tint (0-255)
    pub tint: f64,
}

/// Result of checking a gamma guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GammaVerdict {
    Correct,
    Incorrect,
    NotANumber,
}

impl GammaVerdict {
    pub fn feedback(&self) -> &'static str {
        match self {
            GammaVerdict::Correct => "Correct! You found the adiabatic constant!",
            GammaVerdict::Incorrect => {
                "Not quite. Compare the dashed guess with the true curve and try again!"
            }
            GammaVerdict::NotANumber => "Please enter a number.",
        }
    }
}

/// Ideal gas compressed without heat exchange from (V0, P0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdiabaticProcess {
    p0: f64,
    v0: f64,
    gamma: f64,
    constant: f64,
}

impl AdiabaticProcess {
    pub fn new(p0: f64, v0: f64, gamma: f64) -> Result<Self> {
        let p0 = require_positive("initial pressure", p0)?;
        let v0 = require_positive("initial volume", v0)?;
        let gamma = require_positive("gamma", gamma)?;
        if gamma <= 1.0 {
            return Err(Error::OutOfRange {
                name: "gamma",
                value: gamma,
                min: 1.0,
                max: f64::INFINITY,
            });
        }
        Ok(Self {
            p0,
            v0,
            gamma,
            constant: p0 * v0.powf(gamma),
        })
    }

    /// Diatomic gas starting at 2 atm and 5 L
    pub fn diatomic() -> Self {
        Self {
            p0: 2.0,
            v0: 5.0,
            gamma: 1.4,
            constant: 2.0 * 5.0_f64.powf(1.4),
        }
    }

    pub fn initial_pressure(&self) -> f64 {
        self.p0
    }

    pub fn initial_volume(&self) -> f64 {
        self.v0
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// K = P0·V0^γ
    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn pressure_at(&self, volume: f64) -> f64 {
        self.constant / volume.powf(self.gamma)
    }

    /// State for a slider position; volume is clamped to the slider range
    pub fn sample(&self, volume: f64) -> GasSample {
        let volume = if volume.is_nan() {
            self.v0
        } else {
            volume.clamp(MIN_VOLUME, MAX_VOLUME)
        };
        let pressure = self.pressure_at(volume);
        GasSample {
            volume,
            pressure,
            tint: heat_tint(pressure),
        }
    }

    /// Points of the curve through (V0, P0) for an arbitrary gamma
    pub fn curve(&self, gamma: f64) -> Vec<(f64, f64)> {
        let k = self.p0 * self.v0.powf(gamma);
        let steps = ((MAX_VOLUME - MIN_VOLUME) / CURVE_STEP).round() as usize;
        (0..=steps)
            .map(|i| {
                let v = MIN_VOLUME + i as f64 * CURVE_STEP;
                (v, k / v.powf(gamma))
            })
            .collect()
    }

    pub fn true_curve(&self) -> Vec<(f64, f64)> {
        self.curve(self.gamma)
    }

    pub fn check_guess(&self, guess: f64) -> GammaVerdict {
        if !guess.is_finite() {
            GammaVerdict::NotANumber
        } else if (guess - self.gamma).abs() < GAMMA_TOLERANCE {
            GammaVerdict::Correct
        } else {
            GammaVerdict::Incorrect
        }
    }
}

/// Stage of the adiabatic page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    /// Slider only; the guess box is hidden
    #[default]
    Explore,
    /// Guess box shown, submitted guesses draw a dashed curve
    Guess,
}

impl Level {
    pub fn title(&self) -> &'static str {
        match self {
            Level::Explore => "Level 1: The Concept",
            Level::Guess => "Level 2: Calculate Gamma",
        }
    }
}

/// Interactive state of the adiabatic page: slider volume, current level
/// and the last accepted gamma guess
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasExplorer {
    model: AdiabaticProcess,
    volume: f64,
    level: Level,
    guess: Option<f64>,
}

impl GasExplorer {
    pub fn new(model: AdiabaticProcess) -> Self {
        Self {
            volume: model.initial_volume(),
            model,
            level: Level::Explore,
            guess: None,
        }
    }

    pub fn model(&self) -> &AdiabaticProcess {
        &self.model
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Gamma of the dashed curve, if one has been drawn
    pub fn guess(&self) -> Option<f64> {
        self.guess
    }

    /// Move the slider; the stored volume is always on the slider range
    pub fn set_volume(&mut self, volume: f64) -> GasSample {
        let sample = self.model.sample(volume);
        self.volume = sample.volume;
        sample
    }

    pub fn sample(&self) -> GasSample {
        self.model.sample(self.volume)
    }

    /// Unlock the guess stage. Returns `false` if already there.
    pub fn next_level(&mut self) -> bool {
        if self.level == Level::Guess {
            return false;
        }
        self.level = Level::Guess;
        true
    }

    /// Check a guess and redraw its curve. Ignored before the guess stage;
    /// a non-number keeps whatever curve was drawn last.
    pub fn submit_guess(&mut self, guess: f64) -> Option<GammaVerdict> {
        if self.level != Level::Guess {
            return None;
        }
        let verdict = self.model.check_guess(guess);
        if verdict != GammaVerdict::NotANumber {
            self.guess = Some(guess);
        }
        Some(verdict)
    }
}

/// Higher pressure tints the chamber redder
pub fn heat_tint(pressure: f64) -> f64 {
    (pressure * 40.0).clamp(0.0, 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_point_on_curve() {
        let gas = AdiabaticProcess::diatomic();
        assert!((gas.pressure_at(5.0) - 2.0).abs() < 1e-12);
        assert_eq!(gas, AdiabaticProcess::new(2.0, 5.0, 1.4).unwrap());
    }

    #[test]
    fn test_compression_raises_pressure() {
        let gas = AdiabaticProcess::diatomic();
        let compressed = gas.sample(2.5);
        // Halving the volume multiplies pressure by 2^γ
        assert!((compressed.pressure - 2.0 * 2f64.powf(1.4)).abs() < 1e-9);
        assert!(compressed.tint > gas.sample(5.0).tint);
    }

    #[test]
    fn test_sample_clamps_volume() {
        let gas = AdiabaticProcess::diatomic();
        assert_eq!(gas.sample(0.1).volume, MIN_VOLUME);
        assert_eq!(gas.sample(50.0).volume, MAX_VOLUME);
        assert_eq!(gas.sample(f64::NAN).volume, 5.0);
    }

    #[test]
    fn test_curve_sampling() {
        let gas = AdiabaticProcess::diatomic();
        let curve = gas.true_curve();
        assert_eq!(curve.len(), 19);
        assert_eq!(curve[0].0, 1.0);
        assert_eq!(curve[18].0, 10.0);
        assert!(curve.windows(2).all(|w| w[1].1 < w[0].1));

        // Any gamma's curve passes through the start point
        let guess = gas.curve(1.67);
        assert!((guess[8].0 - 5.0).abs() < 1e-12);
        assert!((guess[8].1 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_check_guess() {
        let gas = AdiabaticProcess::diatomic();
        assert_eq!(gas.check_guess(1.45), GammaVerdict::Correct);
        assert_eq!(gas.check_guess(1.67), GammaVerdict::Incorrect);
        assert_eq!(gas.check_guess(f64::NAN), GammaVerdict::NotANumber);
    }

    #[test]
    fn test_heat_tint_bounds() {
        assert_eq!(heat_tint(-1.0), 0.0);
        assert_eq!(heat_tint(100.0), 255.0);
        assert_eq!(heat_tint(2.0), 80.0);
    }

    #[test]
    fn test_guess_box_locked_until_next_level() {
        let mut page = GasExplorer::new(AdiabaticProcess::diatomic());
        assert_eq!(page.level(), Level::Explore);
        assert_eq!(page.level().title(), "Level 1: The Concept");
        assert_eq!(page.submit_guess(1.4), None);
        assert_eq!(page.guess(), None);

        assert!(page.next_level());
        assert!(!page.next_level());
        assert_eq!(page.level().title(), "Level 2: Calculate Gamma");
        assert_eq!(page.submit_guess(1.4), Some(GammaVerdict::Correct));
        assert_eq!(page.guess(), Some(1.4));
    }

    #[test]
    fn test_non_number_keeps_previous_guess_curve() {
        let mut page = GasExplorer::new(AdiabaticProcess::diatomic());
        page.next_level();
        assert_eq!(page.submit_guess(1.67), Some(GammaVerdict::Incorrect));
        assert_eq!(page.submit_guess(f64::NAN), Some(GammaVerdict::NotANumber));
        assert_eq!(page.guess(), Some(1.67));
    }

    #[test]
    fn test_explorer_volume_stays_on_slider() {
        let mut page = GasExplorer::new(AdiabaticProcess::diatomic());
        assert_eq!(page.volume(), 5.0);
        assert_eq!(page.set_volume(0.2).volume, MIN_VOLUME);
        assert_eq!(page.volume(), MIN_VOLUME);
        assert_eq!(page.sample(), page.model().sample(MIN_VOLUME));
        page.set_volume(f64::NAN);
        assert_eq!(page.volume(), 5.0);
    }

    #[test]
    fn test_rejects_gamma_below_one() {
        assert!(AdiabaticProcess::new(2.0, 5.0, 0.9).is_err());
    }
}
