//! Error type shared by model construction and page configuration
//!
//! Formulas never fail once a model exists; every check happens in the
//! constructors.

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A parameter was NaN or infinite
    #[error("{name} must be a finite number")]
    NonFinite { name: &'static str },

    /// A parameter that must be strictly positive was not
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// A parameter that must be zero or more was negative
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// A parameter fell outside its allowed interval
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A circular orbit at the requested speed would sit inside the body
    #[error("orbit at {fraction} of escape speed lies below the surface")]
    OrbitBelowSurface { fraction: f64 },

    /// Second ball of a dual drop would be released after both should land
    #[error("release gap {gap}s is not shorter than the landing time {land_time}s")]
    ReleaseAfterLanding { gap: f64, land_time: f64 },

    /// Speed multiplier must be finite and positive
    #[error("invalid speed multiplier {0}")]
    InvalidSpeed(f64),

    /// Page configuration JSON could not be parsed
    #[error("invalid page config: {0}")]
    Config(#[from] serde_json::Error),
}
