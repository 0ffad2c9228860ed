//! Simulation module
//!
//! Pure and deterministic:
//! - Closed-form evaluation only, no numerical integration
//! - Same inputs and time deltas give bit-identical states
//! - No rendering or platform dependencies

pub mod driver;
pub mod model;
pub mod orbit;
pub mod scenario;
pub mod stepper;
pub mod thermo;
pub mod trail;

pub use driver::{
    AnimationControl, Driver, DriverState, FrameHandle, FrameOutcome, FrameScheduler,
    ManualScheduler, run_fixed_cadence,
};
pub use model::{
    DualDrop, DualDropState, FallPhase, FallState, FlightPhase, FreeFall, Projectile,
    ProjectileState, ThrowPhase, ThrowState, VerticalThrow,
};
pub use orbit::{Body, CircularOrbit, KeplerPair, KeplerState, OrbitState};
pub use scenario::{PageModel, Scenario, ScenarioState};
pub use stepper::Stepper;
pub use thermo::{AdiabaticProcess, GammaVerdict, GasExplorer, GasSample, Level};
pub use trail::Trail;
