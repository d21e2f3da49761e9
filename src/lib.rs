//! anim-loop: cycle controller for looping animations
//!
//! Given a single 0..1 progress driver, the [`CycleController`] decides after
//! every leg whether to repeat, play the mirrored leg, wait, or finish, and
//! tells its observers about each lifecycle edge exactly once.

pub mod animation;
pub mod config;
pub mod error;

pub use animation::{
    Curve, CycleController, CycleState, Direction, DriverStatus, EventRecorder, LifecycleEvent,
    LoopConfig, LoopObserver, ProgressDriver, Repeat, Tween,
};
pub use error::{LoopError, LoopResult};
