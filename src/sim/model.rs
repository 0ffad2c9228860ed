//! Closed-form kinematic models
//!
//! Every model validates its inputs once and precomputes the derived
//! quantities (max height, flight time, ...). Evaluating a model at an
//! absolute time is pure arithmetic, so the same time always yields the
//! same sample.

use glam::DVec2;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::{require_non_negative, require_positive};

// ---------------------------------------------------------------------------
// Vertical throw
// ---------------------------------------------------------------------------

/// Phase of a vertical throw
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ThrowPhase {
    Ascending,
    /// Held at the top for the remaining number of seconds
    Apex { remaining: f64 },
    Descending,
    Landed,
}

/// Sample of a vertical throw at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThrowState {
    pub t: f64,
    /// Height above the launch point, clamped to `[0, max_height]`
    pub height: f64,
    /// Signed vertical velocity (up is positive)
    pub velocity: f64,
    pub phase: ThrowPhase,
}

/// Object thrown straight up with speed `u`, optionally resting at the apex
/// before falling back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalThrow {
    speed: f64,
    gravity: f64,
    apex_hold: f64,
    max_height: f64,
    rise_time: f64,
    flight_time: f64,
}

impl VerticalThrow {
    pub fn new(speed: f64, gravity: f64) -> Result<Self> {
        Self::with_apex_hold(speed, gravity, 0.0)
    }

    pub fn with_apex_hold(speed: f64, gravity: f64, apex_hold: f64) -> Result<Self> {
        let speed = require_positive("launch speed", speed)?;
        let gravity = require_positive("gravity", gravity)?;
        let apex_hold = require_non_negative("apex hold", apex_hold)?;

        let rise_time = speed / gravity;
        Ok(Self {
            speed,
            gravity,
            apex_hold,
            max_height: speed * speed / (2.0 * gravity),
            rise_time,
            flight_time: 2.0 * rise_time + apex_hold,
        })
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn apex_hold(&self) -> f64 {
        self.apex_hold
    }

    /// u²/2g
    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    /// u/g
    pub fn rise_time(&self) -> f64 {
        self.rise_time
    }

    /// 2u/g plus any apex hold
    pub fn flight_time(&self) -> f64 {
        self.flight_time
    }

    /// Distance covered during the last `seconds` of the ascent.
    ///
    /// By symmetry this is ½·g·s² and does not depend on the launch speed.
    pub fn last_seconds_distance(&self, seconds: f64) -> f64 {
        let s = seconds.clamp(0.0, self.rise_time);
        0.5 * self.gravity * s * s
    }

    fn descent_start(&self) -> f64 {
        self.rise_time + self.apex_hold
    }

    pub fn phase_at(&self, t: f64) -> ThrowPhase {
        if t >= self.flight_time {
            ThrowPhase::Landed
        } else if t < self.rise_time {
            ThrowPhase::Ascending
        } else if t < self.descent_start() {
            ThrowPhase::Apex {
                remaining: self.descent_start() - t,
            }
        } else {
            ThrowPhase::Descending
        }
    }

    pub fn height_at(&self, t: f64) -> f64 {
        let h = match self.phase_at(t) {
            ThrowPhase::Ascending => {
                let t = t.max(0.0);
                self.speed * t - 0.5 * self.gravity * t * t
            }
            ThrowPhase::Apex { .. } => self.max_height,
            ThrowPhase::Descending => {
                let td = t - self.descent_start();
                self.max_height - 0.5 * self.gravity * td * td
            }
            ThrowPhase::Landed => 0.0,
        };
        h.clamp(0.0, self.max_height)
    }

    pub fn velocity_at(&self, t: f64) -> f64 {
        match self.phase_at(t) {
            ThrowPhase::Ascending => self.speed - self.gravity * t.max(0.0),
            ThrowPhase::Apex { .. } | ThrowPhase::Landed => 0.0,
            ThrowPhase::Descending => -self.gravity * (t - self.descent_start()),
        }
    }

    /// Closed-form sample at absolute time `t` (clamped into the flight)
    pub fn sample(&self, t: f64) -> ThrowState {
        let t = t.clamp(0.0, self.flight_time);
        ThrowState {
            t,
            height: self.height_at(t),
            velocity: self.velocity_at(t),
            phase: self.phase_at(t),
        }
    }
}

// ---------------------------------------------------------------------------
// Free fall
// ---------------------------------------------------------------------------

/// Phase of a dropped object
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FallPhase {
    /// Not yet released
    Waiting { remaining: f64 },
    Falling,
    Splashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FallState {
    pub t: f64,
    pub height: f64,
    /// Signed vertical velocity (falling is negative)
    pub velocity: f64,
    pub phase: FallPhase,
}

/// Object released from rest at `height` after `release_delay` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeFall {
    height: f64,
    gravity: f64,
    release_delay: f64,
    fall_time: f64,
    impact_speed: f64,
}

impl FreeFall {
    pub fn new(height: f64, gravity: f64) -> Result<Self> {
        Self::with_delay(height, gravity, 0.0)
    }

    pub fn with_delay(height: f64, gravity: f64, release_delay: f64) -> Result<Self> {
        let height = require_positive("drop height", height)?;
        let gravity = require_positive("gravity", gravity)?;
        let release_delay = require_non_negative("release delay", release_delay)?;

        Ok(Self {
            height,
            gravity,
            release_delay,
            fall_time: (2.0 * height / gravity).sqrt(),
            impact_speed: (2.0 * gravity * height).sqrt(),
        })
    }

    /// Release height
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn release_delay(&self) -> f64 {
        self.release_delay
    }

    /// √(2H/g)
    pub fn fall_time(&self) -> f64 {
        self.fall_time
    }

    /// √(2gH)
    pub fn impact_speed(&self) -> f64 {
        self.impact_speed
    }

    /// Absolute time at which the object reaches the ground
    pub fn landing_time(&self) -> f64 {
        self.release_delay + self.fall_time
    }

    pub fn phase_at(&self, t: f64) -> FallPhase {
        if t < self.release_delay {
            FallPhase::Waiting {
                remaining: self.release_delay - t,
            }
        } else if t < self.landing_time() {
            FallPhase::Falling
        } else {
            FallPhase::Splashed
        }
    }

    pub fn height_at(&self, t: f64) -> f64 {
        let h = match self.phase_at(t) {
            FallPhase::Waiting { .. } => self.height,
            FallPhase::Falling => {
                let tf = t - self.release_delay;
                self.height - 0.5 * self.gravity * tf * tf
            }
            FallPhase::Splashed => 0.0,
        };
        h.clamp(0.0, self.height)
    }

    pub fn velocity_at(&self, t: f64) -> f64 {
        match self.phase_at(t) {
            FallPhase::Falling => -self.gravity * (t - self.release_delay),
            FallPhase::Waiting { .. } | FallPhase::Splashed => 0.0,
        }
    }

    pub fn sample(&self, t: f64) -> FallState {
        let t = t.clamp(0.0, self.landing_time());
        FallState {
            t,
            height: self.height_at(t),
            velocity: self.velocity_at(t),
            phase: self.phase_at(t),
        }
    }
}

// ---------------------------------------------------------------------------
// Dual drop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DualDropState {
    pub t: f64,
    pub first: FallState,
    pub second: FallState,
}

impl DualDropState {
    pub fn separation(&self) -> f64 {
        self.first.height - self.second.height
    }
}

/// Two balls dropped from different heights, the second released later,
/// both reaching the ground together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualDrop {
    first: FreeFall,
    second: FreeFall,
}

impl DualDrop {
    /// Heights chosen so that both balls land at `land_time` when the second
    /// is released `release_gap` seconds after the first.
    pub fn landing_together(gravity: f64, land_time: f64, release_gap: f64) -> Result<Self> {
        let gravity = require_positive("gravity", gravity)?;
        let land_time = require_positive("landing time", land_time)?;
        let release_gap = require_non_negative("release gap", release_gap)?;
        if release_gap >= land_time {
            return Err(Error::ReleaseAfterLanding {
                gap: release_gap,
                land_time,
            });
        }

        let second_fall = land_time - release_gap;
        Ok(Self {
            first: FreeFall::new(0.5 * gravity * land_time * land_time, gravity)?,
            second: FreeFall::with_delay(
                0.5 * gravity * second_fall * second_fall,
                gravity,
                release_gap,
            )?,
        })
    }

    pub fn first(&self) -> &FreeFall {
        &self.first
    }

    pub fn second(&self) -> &FreeFall {
        &self.second
    }

    /// Difference of the two release heights
    pub fn height_difference(&self) -> f64 {
        self.first.height() - self.second.height()
    }

    pub fn total_time(&self) -> f64 {
        self.first.landing_time().max(self.second.landing_time())
    }

    pub fn sample(&self, t: f64) -> DualDropState {
        let t = t.clamp(0.0, self.total_time());
        DualDropState {
            t,
            first: self.first.sample(t),
            second: self.second.sample(t),
        }
    }
}

// ---------------------------------------------------------------------------
// Angled projectile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlightPhase {
    Flying,
    Landed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileState {
    pub t: f64,
    /// Horizontal distance and height from the launch point
    pub position: DVec2,
    pub velocity: DVec2,
    pub phase: FlightPhase,
}

/// Projectile launched from ground level at `angle` radians above horizontal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    speed: f64,
    angle: f64,
    gravity: f64,
    flight_time: f64,
    range: f64,
    max_height: f64,
}

impl Projectile {
    pub fn new(speed: f64, angle: f64, gravity: f64) -> Result<Self> {
        let speed = require_positive("launch speed", speed)?;
        let gravity = require_positive("gravity", gravity)?;
        let angle = require_positive("launch angle", angle)?;
        if angle > std::f64::consts::FRAC_PI_2 {
            return Err(Error::OutOfRange {
                name: "launch angle",
                value: angle,
                min: 0.0,
                max: std::f64::consts::FRAC_PI_2,
            });
        }

        let (sin, cos) = angle.sin_cos();
        Ok(Self {
            speed,
            angle,
            gravity,
            flight_time: 2.0 * speed * sin / gravity,
            range: speed * speed * 2.0 * sin * cos / gravity,
            max_height: (speed * sin).powi(2) / (2.0 * gravity),
        })
    }

    pub fn from_degrees(speed: f64, degrees: f64, gravity: f64) -> Result<Self> {
        Self::new(speed, degrees.to_radians(), gravity)
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// 2u·sinθ/g
    pub fn flight_time(&self) -> f64 {
        self.flight_time
    }

    /// u²·sin2θ/g
    pub fn range(&self) -> f64 {
        self.range
    }

    /// u²·sin²θ/2g
    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    pub fn position_at(&self, t: f64) -> DVec2 {
        let t = t.clamp(0.0, self.flight_time);
        let (sin, cos) = self.angle.sin_cos();
        let y = self.speed * sin * t - 0.5 * self.gravity * t * t;
        DVec2::new(self.speed * cos * t, y.clamp(0.0, self.max_height))
    }

    pub fn velocity_at(&self, t: f64) -> DVec2 {
        if t >= self.flight_time {
            return DVec2::ZERO;
        }
        let t = t.max(0.0);
        let (sin, cos) = self.angle.sin_cos();
        DVec2::new(self.speed * cos, self.speed * sin - self.gravity * t)
    }

    pub fn sample(&self, t: f64) -> ProjectileState {
        let t = t.clamp(0.0, self.flight_time);
        ProjectileState {
            t,
            position: self.position_at(t),
            velocity: self.velocity_at(t),
            phase: if t >= self.flight_time {
                FlightPhase::Landed
            } else {
                FlightPhase::Flying
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_vertical_throw_derived_values() {
        let throw = VerticalThrow::new(19.6, 9.8).unwrap();
        assert!((throw.max_height() - 19.6).abs() < EPS);
        assert!((throw.rise_time() - 2.0).abs() < EPS);
        assert!((throw.flight_time() - 4.0).abs() < EPS);
    }

    #[test]
    fn test_vertical_throw_phases() {
        let throw = VerticalThrow::new(19.6, 9.8).unwrap();
        assert_eq!(throw.phase_at(0.0), ThrowPhase::Ascending);
        assert_eq!(throw.phase_at(1.0), ThrowPhase::Ascending);
        assert_eq!(throw.phase_at(2.5), ThrowPhase::Descending);
        assert_eq!(throw.phase_at(4.0), ThrowPhase::Landed);
        assert_eq!(throw.phase_at(100.0), ThrowPhase::Landed);
    }

    #[test]
    fn test_vertical_throw_apex_hold() {
        let throw = VerticalThrow::with_apex_hold(19.6, 9.8, 1.0).unwrap();
        assert!((throw.flight_time() - 5.0).abs() < EPS);

        match throw.phase_at(2.25) {
            ThrowPhase::Apex { remaining } => assert!((remaining - 0.75).abs() < EPS),
            other => panic!("expected apex, got {other:?}"),
        }
        assert!((throw.height_at(2.5) - throw.max_height()).abs() < EPS);
        assert_eq!(throw.velocity_at(2.5), 0.0);

        // Descent mirrors the ascent shifted by the hold
        assert!((throw.height_at(4.0) - throw.height_at(1.0)).abs() < EPS);
    }

    #[test]
    fn test_vertical_throw_matches_textbook() {
        let throw = VerticalThrow::new(30.0, 9.8).unwrap();
        for i in 0..30 {
            let t = i as f64 * 0.2;
            let expected = (30.0 * t - 0.5 * 9.8 * t * t).max(0.0);
            assert!((throw.height_at(t) - expected).abs() < 1e-9, "t={t}");
        }
    }

    #[test]
    fn test_last_seconds_distance() {
        let throw = VerticalThrow::new(50.0, 9.8).unwrap();
        assert!((throw.last_seconds_distance(1.0) - 4.9).abs() < EPS);
        // Same as max height minus height one second before the apex
        let direct = throw.max_height() - throw.height_at(throw.rise_time() - 1.0);
        assert!((throw.last_seconds_distance(1.0) - direct).abs() < 1e-9);
        // Clamped to the whole ascent
        assert!((throw.last_seconds_distance(100.0) - throw.max_height()).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_throw_rejects_bad_input() {
        assert!(VerticalThrow::new(0.0, 9.8).is_err());
        assert!(VerticalThrow::new(10.0, -9.8).is_err());
        assert!(VerticalThrow::with_apex_hold(10.0, 9.8, -1.0).is_err());
        assert!(VerticalThrow::new(f64::INFINITY, 9.8).is_err());
    }

    #[test]
    fn test_free_fall() {
        let fall = FreeFall::new(44.1, 9.8).unwrap();
        assert!((fall.fall_time() - 3.0).abs() < 1e-9);
        assert!((fall.impact_speed() - 29.4).abs() < 1e-9);
        assert_eq!(fall.height_at(0.0), 44.1);
        assert_eq!(fall.height_at(10.0), 0.0);
        assert_eq!(fall.phase_at(3.1), FallPhase::Splashed);
        assert!((fall.velocity_at(1.0) + 9.8).abs() < 1e-9);
    }

    #[test]
    fn test_free_fall_waiting_phase() {
        let fall = FreeFall::with_delay(10.0, 9.8, 2.0).unwrap();
        assert_eq!(fall.phase_at(0.5), FallPhase::Waiting { remaining: 1.5 });
        assert_eq!(fall.height_at(1.9), 10.0);
        assert_eq!(fall.velocity_at(1.9), 0.0);
        assert_eq!(fall.phase_at(2.0), FallPhase::Falling);
    }

    #[test]
    fn test_dual_drop_heights() {
        let drop = DualDrop::landing_together(9.8, 5.0, 2.0).unwrap();
        assert!((drop.first().height() - 122.5).abs() < 0.05);
        assert!((drop.second().height() - 44.1).abs() < 0.05);
        assert!((drop.height_difference() - 78.4).abs() < 0.05);
        assert!((drop.total_time() - 5.0).abs() < 1e-9);

        let end = drop.sample(drop.total_time());
        assert_eq!(end.first.phase, FallPhase::Splashed);
        assert_eq!(end.second.phase, FallPhase::Splashed);
    }

    #[test]
    fn test_dual_drop_rejects_late_release() {
        assert!(matches!(
            DualDrop::landing_together(9.8, 5.0, 5.0),
            Err(Error::ReleaseAfterLanding { .. })
        ));
    }

    #[test]
    fn test_projectile_derived_values() {
        let p = Projectile::from_degrees(20.0, 45.0, 9.8).unwrap();
        assert!((p.range() - 400.0 / 9.8).abs() < 1e-9);
        assert!((p.max_height() - 400.0 * 0.5 / 19.6).abs() < 1e-9);

        let apex = p.position_at(p.flight_time() / 2.0);
        assert!((apex.y - p.max_height()).abs() < 1e-9);
        let end = p.sample(p.flight_time());
        assert_eq!(end.phase, FlightPhase::Landed);
        assert!((end.position.x - p.range()).abs() < 1e-9);
        assert_eq!(end.velocity, DVec2::ZERO);
    }

    #[test]
    fn test_projectile_rejects_steep_angle() {
        assert!(matches!(
            Projectile::from_degrees(10.0, 120.0, 9.8),
            Err(Error::OutOfRange { .. })
        ));
        assert!(Projectile::from_degrees(10.0, 0.0, 9.8).is_err());
    }
}
