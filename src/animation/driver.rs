//! The progress driver contract.
//!
//! A driver produces a normalized 0..1 value over a configured duration and
//! reports when a leg reaches one of its bounds. The cycle controller only
//! issues commands through this trait; [`Tween`](super::Tween) is the
//! ticker-driven implementation shipped with the crate.

use std::time::Duration;

use serde::Serialize;

use super::curve::Curve;

/// Direction of the most recent run command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Driver status as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    /// Running (or frozen mid-leg) towards the end bound
    Forward,
    /// Running (or frozen mid-leg) towards the start bound
    Reverse,
    /// Resting at the end bound; emitted when a forward leg completes
    AtEnd,
    /// Resting at the start bound; emitted when a backward leg is dismissed
    AtStart,
}

impl DriverStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
            Self::AtEnd => "at-end",
            Self::AtStart => "at-start",
        }
    }

    /// True for the two resting statuses that signal leg completion
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::AtEnd | Self::AtStart)
    }
}

/// Commands and queries the cycle controller needs from a progress driver.
///
/// `tick` is the event source: it advances the driver by `dt` and returns the
/// new status only when a leg just reached a bound. Commands never emit.
pub trait ProgressDriver {
    /// Set leg durations and the easing curve. Takes effect for the
    /// remainder of the current leg.
    fn configure(&mut self, duration: Duration, reverse_duration: Duration, curve: Curve);

    /// Run forward from the current position
    fn start(&mut self);

    /// Jump to `progress` and run forward
    fn start_from(&mut self, progress: f32);

    /// Run backward from the current position
    fn reverse(&mut self);

    /// Jump to `progress` and run backward
    fn reverse_from(&mut self, progress: f32);

    /// Freeze at the current position
    fn stop(&mut self);

    /// Stop and jump back to the start bound
    fn reset(&mut self);

    fn status(&self) -> DriverStatus;

    /// Direction of the last run command
    fn direction(&self) -> Direction;

    fn is_running(&self) -> bool;

    /// Linear progress in [0, 1]
    fn value(&self) -> f32;

    /// Progress after the configured curve
    fn eased_value(&self) -> f32;

    /// Advance by `dt`; returns `Some(AtEnd | AtStart)` when a leg completes
    fn tick(&mut self, dt: Duration) -> Option<DriverStatus>;

    /// Part of the last `tick` left over after a leg reached its bound.
    /// Drivers that cannot tell report zero.
    fn leftover(&self) -> Duration {
        Duration::ZERO
    }
}
