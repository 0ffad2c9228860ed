//! Animation driver
//!
//! Owns the simulation state and decides when frames run. The host's frame
//! source (requestAnimationFrame in the browser, a fixed ticker natively) is
//! reached only through [`FrameScheduler`], so the play/pause/reset state
//! machine runs the same everywhere and is testable without a clock.

use log::{debug, info};

use super::stepper::Stepper;
use super::trail::Trail;
use crate::consts::MAX_FRAME_DT;
use crate::error::{Error, Result};

/// Handle to one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Host frame source
pub trait FrameScheduler {
    /// Ask for one frame callback
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraw a previously requested callback. After this returns the
    /// callback must not fire.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Initial, after reset, or after the terminal condition
    Stopped,
    /// A frame is outstanding
    Playing,
    /// Frame cancelled, simulation state retained
    Paused,
}

/// Playback bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationControl {
    pub state: DriverState,
    pub speed: f64,
    /// Timestamp (ms) of the last processed frame or of `play()`
    pub last_timestamp: Option<f64>,
    pub frame: Option<FrameHandle>,
}

impl Default for AnimationControl {
    fn default() -> Self {
        Self {
            state: DriverState::Stopped,
            speed: 1.0,
            last_timestamp: None,
            frame: None,
        }
    }
}

/// What a frame callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Driver was not playing; nothing changed
    Ignored,
    /// State advanced and the next frame is scheduled
    Advanced,
    /// State reached the terminal condition; the loop stopped
    Finished,
}

pub struct Driver<S: Stepper, F: FrameScheduler> {
    stepper: S,
    state: S::State,
    control: AnimationControl,
    trail: Trail,
    scheduler: F,
}

impl<S: Stepper, F: FrameScheduler> Driver<S, F> {
    pub fn new(stepper: S, scheduler: F) -> Self {
        Self::with_trail(stepper, scheduler, Trail::default())
    }

    pub fn with_trail(stepper: S, scheduler: F, trail: Trail) -> Self {
        let state = stepper.initial_state();
        Self {
            stepper,
            state,
            control: AnimationControl::default(),
            trail,
            scheduler,
        }
    }

    pub fn stepper(&self) -> &S {
        &self.stepper
    }

    pub fn state(&self) -> &S::State {
        &self.state
    }

    pub fn control(&self) -> &AnimationControl {
        &self.control
    }

    pub fn driver_state(&self) -> DriverState {
        self.control.state
    }

    pub fn is_playing(&self) -> bool {
        self.control.state == DriverState::Playing
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn elapsed(&self) -> f64 {
        self.stepper.elapsed(&self.state)
    }

    pub fn is_finished(&self) -> bool {
        self.stepper.is_finished(&self.state)
    }

    /// Start or resume. Returns `false` if already playing.
    ///
    /// Playing a finished animation starts it over from t = 0.
    pub fn play(&mut self, now: f64) -> bool {
        if self.control.state == DriverState::Playing {
            return false;
        }
        if self.control.state == DriverState::Stopped && self.is_finished() {
            self.restart();
        }
        if let Some(stale) = self.control.frame.take() {
            self.scheduler.cancel_frame(stale);
        }

        self.control.last_timestamp = Some(now);
        self.control.frame = Some(self.scheduler.request_frame());
        self.control.state = DriverState::Playing;
        debug!("play at t={:.3}s", self.elapsed());
        true
    }

    /// Cancel the outstanding frame and keep the state. Returns `false` if
    /// not playing.
    pub fn pause(&mut self) -> bool {
        if self.control.state != DriverState::Playing {
            return false;
        }
        if let Some(handle) = self.control.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.control.state = DriverState::Paused;
        self.control.last_timestamp = None;
        debug!("pause at t={:.3}s", self.elapsed());
        true
    }

    /// Play/pause button
    pub fn toggle(&mut self, now: f64) -> DriverState {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(now);
        }
        self.control.state
    }

    /// Back to t = 0 from any state
    pub fn reset(&mut self) {
        if let Some(handle) = self.control.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.restart();
        self.control.state = DriverState::Stopped;
        self.control.last_timestamp = None;
        debug!("reset");
    }

    fn restart(&mut self) {
        self.state = self.stepper.initial_state();
        self.trail.clear();
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(Error::InvalidSpeed(speed));
        }
        self.control.speed = speed;
        Ok(())
    }

    /// Swap in a model re-derived from new slider values. Time does not
    /// advance; the state is re-evaluated at the current time.
    ///
    /// If the new model would already have finished by now, the state is
    /// parked at its terminal sample and the driver stops, so a playing
    /// animation never runs with time rewound.
    pub fn rederive(&mut self, stepper: S) {
        let t = self.elapsed();
        self.stepper = stepper;
        self.stepper.seek(&mut self.state, t);
        self.trail.clear();
        if let Some(point) = self.stepper.trail_point(&self.state) {
            self.trail.record(point);
        }

        if self.is_finished() && self.control.state != DriverState::Stopped {
            if let Some(handle) = self.control.frame.take() {
                self.scheduler.cancel_frame(handle);
            }
            self.control.state = DriverState::Stopped;
            self.control.last_timestamp = None;
            info!(
                "re-derived model finished at t={:.3}s (was at t={:.3}s)",
                self.elapsed(),
                t
            );
        }
    }

    /// Frame callback. `timestamp` is the host clock in milliseconds.
    pub fn on_frame(&mut self, timestamp: f64) -> FrameOutcome {
        if self.control.state != DriverState::Playing {
            return FrameOutcome::Ignored;
        }
        // This callback consumed the outstanding handle
        self.control.frame = None;

        let last = self.control.last_timestamp.unwrap_or(timestamp);
        let dt = ((timestamp - last) / 1000.0).clamp(0.0, MAX_FRAME_DT);
        self.control.last_timestamp = Some(timestamp);

        let finished = self.stepper.step(&mut self.state, dt * self.control.speed);
        if let Some(point) = self.stepper.trail_point(&self.state) {
            self.trail.record(point);
        }

        if finished {
            self.control.state = DriverState::Stopped;
            self.control.last_timestamp = None;
            info!("animation finished at t={:.3}s", self.elapsed());
            return FrameOutcome::Finished;
        }

        self.control.frame = Some(self.scheduler.request_frame());
        FrameOutcome::Advanced
    }
}

/// Scheduler whose frames fire only when the caller says so. Used by the
/// headless runner and by tests.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    next_id: i32,
    pending: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
    requested: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles requested but neither fired nor cancelled
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Remove the oldest pending frame, as if the host fired it
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(idx) = self.pending.iter().position(|h| *h == handle) {
            self.pending.remove(idx);
            self.cancelled.push(handle);
        }
    }
}

/// Run frames at a fixed cadence until the driver stops or `max_frames`
/// have fired. Returns the number of frames processed.
pub fn run_fixed_cadence<S: Stepper>(
    driver: &mut Driver<S, ManualScheduler>,
    start_ms: f64,
    frame_ms: f64,
    max_frames: usize,
) -> usize {
    let mut now = start_ms;
    let mut frames = 0;
    while frames < max_frames && driver.scheduler_mut().fire().is_some() {
        now += frame_ms;
        frames += 1;
        if driver.on_frame(now) != FrameOutcome::Advanced {
            break;
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::model::{FreeFall, Projectile, VerticalThrow};

    fn throw_driver() -> Driver<VerticalThrow, ManualScheduler> {
        Driver::new(
            VerticalThrow::new(19.6, 9.8).unwrap(),
            ManualScheduler::new(),
        )
    }

    #[test]
    fn test_play_schedules_one_frame() {
        let mut driver = throw_driver();
        assert_eq!(driver.driver_state(), DriverState::Stopped);
        assert!(driver.play(0.0));
        assert_eq!(driver.driver_state(), DriverState::Playing);
        assert_eq!(driver.scheduler().pending().len(), 1);

        // Second play is a no-op
        assert!(!driver.play(5.0));
        assert_eq!(driver.scheduler().pending().len(), 1);
        assert_eq!(driver.scheduler().requested(), 1);
    }

    #[test]
    fn test_pause_then_play_has_single_handle() {
        let mut driver = throw_driver();
        driver.play(0.0);
        assert!(driver.pause());
        assert!(driver.scheduler().pending().is_empty());
        assert_eq!(driver.scheduler().cancelled().len(), 1);

        driver.play(10.0);
        assert_eq!(driver.scheduler().pending().len(), 1);
        assert_eq!(driver.control().frame, driver.scheduler().pending().first().copied());
    }

    #[test]
    fn test_frame_dt_clamped() {
        let mut driver = throw_driver();
        driver.play(0.0);
        driver.scheduler_mut().fire();
        // A 5 second gap (backgrounded tab) only advances 0.1s
        assert_eq!(driver.on_frame(5000.0), FrameOutcome::Advanced);
        assert!((driver.elapsed() - MAX_FRAME_DT).abs() < 1e-12);
    }

    #[test]
    fn test_speed_multiplier_scales_time() {
        let mut driver = throw_driver();
        driver.set_speed(2.0).unwrap();
        driver.play(0.0);
        driver.scheduler_mut().fire();
        driver.on_frame(50.0);
        assert!((driver.elapsed() - 0.1).abs() < 1e-12);

        assert!(driver.set_speed(0.0).is_err());
        assert!(driver.set_speed(f64::NAN).is_err());
        assert_eq!(driver.control().speed, 2.0);
    }

    #[test]
    fn test_pause_does_not_advance_time() {
        let mut driver = throw_driver();
        driver.play(0.0);
        driver.scheduler_mut().fire();
        driver.on_frame(50.0);
        driver.pause();
        let t = driver.elapsed();

        // A stray callback while paused is ignored
        assert_eq!(driver.on_frame(10_000.0), FrameOutcome::Ignored);
        assert_eq!(driver.elapsed(), t);

        // Resuming measures from the resume timestamp, not the pause
        driver.play(20_000.0);
        driver.scheduler_mut().fire();
        driver.on_frame(20_016.0);
        assert!((driver.elapsed() - (t + 0.016)).abs() < 1e-9);
    }

    #[test]
    fn test_runs_to_landing_and_stops() {
        let mut driver = throw_driver();
        driver.play(0.0);
        let frames = run_fixed_cadence(&mut driver, 0.0, 1000.0 / 60.0, 10_000);
        assert_eq!(driver.driver_state(), DriverState::Stopped);
        assert!(driver.is_finished());
        assert!(driver.scheduler().pending().is_empty());
        // 4 seconds at 60 fps
        assert!((239..=241).contains(&frames), "frames={frames}");
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut driver = throw_driver();
        driver.reset();
        assert_eq!(driver.elapsed(), 0.0);

        driver.play(0.0);
        driver.scheduler_mut().fire();
        driver.on_frame(100.0);
        driver.reset();
        assert_eq!(driver.elapsed(), 0.0);
        assert_eq!(driver.driver_state(), DriverState::Stopped);
        assert!(driver.trail().is_empty());

        driver.play(0.0);
        driver.pause();
        driver.reset();
        assert_eq!(driver.driver_state(), DriverState::Stopped);
        assert!(driver.scheduler().pending().is_empty());
    }

    #[test]
    fn test_play_after_landing_restarts() {
        let mut driver = Driver::new(FreeFall::new(4.9, 9.8).unwrap(), ManualScheduler::new());
        driver.play(0.0);
        run_fixed_cadence(&mut driver, 0.0, 50.0, 1000);
        assert!(driver.is_finished());

        driver.play(0.0);
        assert_eq!(driver.elapsed(), 0.0);
        assert!(driver.is_playing());
    }

    #[test]
    fn test_rederive_keeps_time() {
        let mut driver = throw_driver();
        driver.play(0.0);
        driver.scheduler_mut().fire();
        driver.on_frame(100.0);
        let t = driver.elapsed();

        driver.rederive(VerticalThrow::new(30.0, 9.8).unwrap());
        assert_eq!(driver.elapsed(), t);
        assert!((driver.state().height - (30.0 * t - 4.9 * t * t)).abs() < 1e-9);
        assert_eq!(driver.trail().len(), 1);
        assert!(driver.is_playing());
    }

    #[test]
    fn test_rederive_to_shorter_flight_never_rewinds() {
        let mut driver = Driver::new(
            Projectile::from_degrees(20.0, 60.0, 9.8).unwrap(),
            ManualScheduler::new(),
        );
        driver.play(0.0);
        run_fixed_cadence(&mut driver, 0.0, 100.0, 20);
        let before = driver.elapsed();
        assert!((before - 2.0).abs() < 1e-9);
        assert!(driver.is_playing());

        // A 5° launch lands after ~0.36 s, well before the current time
        driver.rederive(Projectile::from_degrees(20.0, 5.0, 9.8).unwrap());
        assert!(!driver.is_playing());
        assert_eq!(driver.driver_state(), DriverState::Stopped);
        assert!(driver.is_finished());
        assert!(driver.scheduler().pending().is_empty());
        assert_eq!(driver.control().frame, None);

        // A stray frame after the swap changes nothing
        let parked = *driver.state();
        assert_eq!(driver.on_frame(2100.0), FrameOutcome::Ignored);
        assert_eq!(*driver.state(), parked);

        // Play starts the new flight over
        assert!(driver.play(3000.0));
        assert_eq!(driver.elapsed(), 0.0);
    }

    #[test]
    fn test_rederive_while_paused_to_finished_model_stops() {
        let mut driver = throw_driver();
        driver.play(0.0);
        run_fixed_cadence(&mut driver, 0.0, 100.0, 10);
        driver.pause();

        driver.rederive(VerticalThrow::new(2.45, 9.8).unwrap());
        assert_eq!(driver.driver_state(), DriverState::Stopped);
        assert!(driver.is_finished());
    }

    #[test]
    fn test_trail_grows_with_frames() {
        let mut driver = throw_driver();
        driver.play(0.0);
        run_fixed_cadence(&mut driver, 0.0, 16.0, 10);
        assert_eq!(driver.trail().len(), 10);
    }
}
