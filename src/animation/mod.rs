//! Animation loop core: the cycle controller and its collaborators.

pub mod controller;
pub mod curve;
pub mod driver;
pub mod loop_config;
pub mod observer;
pub mod timers;
pub mod tween;

pub use controller::{CycleController, CycleState, Trigger};
pub use curve::Curve;
pub use driver::{Direction, DriverStatus, ProgressDriver};
pub use loop_config::{LoopConfig, Repeat};
pub use observer::{EventRecorder, LifecycleEvent, LoopObserver};
pub use timers::{TimerId, Timers};
pub use tween::Tween;

/// Linear interpolation
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
