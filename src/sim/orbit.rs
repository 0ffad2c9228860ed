//! Circular orbits and Kepler's third law
//!
//! Real periods are far too long to animate, so every orbit also carries a
//! display period: the number of on-screen seconds one revolution of the
//! fastest body takes.

use std::f64::consts::TAU;

use glam::DVec2;
use serde::Serialize;

use crate::consts::{EARTH_MASS, EARTH_RADIUS, GRAVITATIONAL_CONSTANT, SOLAR_MASS};
use crate::error::{Error, Result};
use crate::{polar_to_cartesian, require_positive, wrap_angle};

/// Solar radius (m), only used for drawing the central body
const SOLAR_RADIUS: f64 = 6.957e8;

/// A spherical central body
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Body {
    mass: f64,
    radius: f64,
}

impl Body {
    pub fn new(mass: f64, radius: f64) -> Result<Self> {
        Ok(Self {
            mass: require_positive("body mass", mass)?,
            radius: require_positive("body radius", radius)?,
        })
    }

    pub const fn earth() -> Self {
        Self {
            mass: EARTH_MASS,
            radius: EARTH_RADIUS,
        }
    }

    pub const fn sun() -> Self {
        Self {
            mass: SOLAR_MASS,
            radius: SOLAR_RADIUS,
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Standard gravitational parameter GM
    pub fn mu(&self) -> f64 {
        GRAVITATIONAL_CONSTANT * self.mass
    }

    /// √(2GM/R)
    pub fn escape_speed(&self) -> f64 {
        (2.0 * self.mu() / self.radius).sqrt()
    }

    /// GM/R²
    pub fn surface_gravity(&self) -> f64 {
        self.mu() / (self.radius * self.radius)
    }
}

/// Sample of a body on a circular orbit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitState {
    pub t: f64,
    /// Angle in [0, 2π)
    pub angle: f64,
    /// Position relative to the body's centre (m)
    pub position: DVec2,
    /// Completed fraction of revolutions since t = 0
    pub revolutions: f64,
}

/// Satellite on a circular orbit of radius `r` around `body`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    body: Body,
    radius: f64,
    display_period: f64,
    orbital_speed: f64,
    period: f64,
}

impl CircularOrbit {
    pub fn new(body: Body, radius: f64, display_period: f64) -> Result<Self> {
        let radius = require_positive("orbit radius", radius)?;
        let display_period = require_positive("display period", display_period)?;
        if radius < body.radius() {
            return Err(Error::OutOfRange {
                name: "orbit radius",
                value: radius,
                min: body.radius(),
                max: f64::INFINITY,
            });
        }

        let mu = body.mu();
        Ok(Self {
            body,
            radius,
            display_period,
            orbital_speed: (mu / radius).sqrt(),
            period: TAU * (radius.powi(3) / mu).sqrt(),
        })
    }

    /// Orbit whose speed is `fraction` of the body's escape speed.
    ///
    /// `√(GM/r) = f·√(2GM/R)` gives `r = R / (2f²)`; anything above
    /// `1/√2` would put the orbit below the surface.
    pub fn from_escape_fraction(body: Body, fraction: f64, display_period: f64) -> Result<Self> {
        let fraction = require_positive("escape fraction", fraction)?;
        let radius = body.radius() / (2.0 * fraction * fraction);
        if radius < body.radius() {
            return Err(Error::OrbitBelowSurface { fraction });
        }
        Self::new(body, radius, display_period)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Distance from the body's centre
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Height above the surface
    pub fn altitude(&self) -> f64 {
        self.radius - self.body.radius()
    }

    /// √(GM/r)
    pub fn orbital_speed(&self) -> f64 {
        self.orbital_speed
    }

    pub fn escape_fraction(&self) -> f64 {
        self.orbital_speed / self.body.escape_speed()
    }

    /// 2π√(r³/GM) in seconds
    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn display_period(&self) -> f64 {
        self.display_period
    }

    /// Kinetic energy over the magnitude of potential energy (½ on any
    /// circular orbit)
    pub fn energy_ratio(&self) -> f64 {
        let kinetic = 0.5 * self.orbital_speed * self.orbital_speed;
        let potential = self.body.mu() / self.radius;
        kinetic / potential
    }

    pub fn sample(&self, t: f64) -> OrbitState {
        let t = t.max(0.0);
        let revolutions = t / self.display_period;
        let angle = wrap_angle(TAU * revolutions);
        OrbitState {
            t,
            angle,
            position: polar_to_cartesian(self.radius, angle),
            revolutions,
        }
    }
}

/// Two bodies on circular orbits around the same central mass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeplerState {
    pub t: f64,
    pub first_angle: f64,
    pub second_angle: f64,
}

/// Period comparison between two orbits (T² ∝ R³)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerPair {
    central: Body,
    first: f64,
    second: f64,
    display_period: f64,
    first_period: f64,
    second_period: f64,
}

impl KeplerPair {
    pub fn new(central: Body, first: f64, second: f64, display_period: f64) -> Result<Self> {
        let first = require_positive("first orbit radius", first)?;
        let second = require_positive("second orbit radius", second)?;
        let display_period = require_positive("display period", display_period)?;

        let mu = central.mu();
        let period = |r: f64| TAU * (r.powi(3) / mu).sqrt();
        Ok(Self {
            central,
            first,
            second,
            display_period,
            first_period: period(first),
            second_period: period(second),
        })
    }

    pub fn central(&self) -> &Body {
        &self.central
    }

    pub fn first_radius(&self) -> f64 {
        self.first
    }

    pub fn second_radius(&self) -> f64 {
        self.second
    }

    pub fn first_period(&self) -> f64 {
        self.first_period
    }

    pub fn second_period(&self) -> f64 {
        self.second_period
    }

    /// T1/T2 = (R1/R2)^(3/2)
    pub fn period_ratio(&self) -> f64 {
        self.first_period / self.second_period
    }

    /// v1/v2 = √(R2/R1)
    pub fn speed_ratio(&self) -> f64 {
        (self.second / self.first).sqrt()
    }

    pub fn display_period(&self) -> f64 {
        self.display_period
    }

    /// Seconds of real time represented by one second on screen
    pub fn time_scale(&self) -> f64 {
        self.first_period.min(self.second_period) / self.display_period
    }

    pub fn sample(&self, t: f64) -> KeplerState {
        let t = t.max(0.0);
        let real = t * self.time_scale();
        KeplerState {
            t,
            first_angle: wrap_angle(TAU * real / self.first_period),
            second_angle: wrap_angle(TAU * real / self.second_period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_escape_speed_orbit() {
        let orbit = CircularOrbit::from_escape_fraction(Body::earth(), 0.5, 8.0).unwrap();
        assert!((orbit.radius() - 2.0 * EARTH_RADIUS).abs() < 1e-3);
        assert!((orbit.altitude() - EARTH_RADIUS).abs() < 1e-3);
        assert!((orbit.escape_fraction() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_orbit_below_surface_rejected() {
        assert!(matches!(
            CircularOrbit::from_escape_fraction(Body::earth(), 0.8, 8.0),
            Err(Error::OrbitBelowSurface { .. })
        ));
        assert!(CircularOrbit::new(Body::earth(), 1000.0, 8.0).is_err());
    }

    #[test]
    fn test_low_earth_orbit_period() {
        let orbit = CircularOrbit::new(Body::earth(), EARTH_RADIUS + 400e3, 8.0).unwrap();
        // ISS: about 92 minutes at ~7.67 km/s
        assert!((orbit.period() / 60.0 - 92.4).abs() < 1.0);
        assert!((orbit.orbital_speed() - 7670.0).abs() < 50.0);
        assert!((orbit.energy_ratio() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_orbit_sample_wraps() {
        let orbit = CircularOrbit::new(Body::earth(), 2.0 * EARTH_RADIUS, 4.0).unwrap();
        let quarter = orbit.sample(1.0);
        assert!((quarter.angle - TAU / 4.0).abs() < 1e-12);
        let later = orbit.sample(5.0);
        assert!((later.angle - TAU / 4.0).abs() < 1e-9);
        assert!((later.revolutions - 1.25).abs() < 1e-12);
        assert!((later.position.length() - orbit.radius()).abs() < 1e-3);
    }

    #[test]
    fn test_kepler_ratio() {
        let pair = KeplerPair::new(Body::sun(), 1e12, 1e10, 8.0).unwrap();
        let ratio = pair.period_ratio();
        assert!((ratio - 1000.0).abs() / 1000.0 < 0.01, "ratio={ratio}");
        assert!((pair.speed_ratio() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_kepler_display_speed() {
        let pair = KeplerPair::new(Body::sun(), 1e12, 1e10, 8.0).unwrap();
        // Inner body completes one revolution per display period
        let s = pair.sample(2.0);
        assert!((s.second_angle - TAU / 4.0).abs() < 1e-9);
        assert!(s.first_angle < s.second_angle);
    }

    #[test]
    fn test_surface_gravity() {
        assert!((Body::earth().surface_gravity() - 9.82).abs() < 0.05);
        assert!((Body::earth().escape_speed() - 11186.0).abs() < 20.0);
    }
}
