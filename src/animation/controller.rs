//! The cycle controller.
//!
//! Owns a [`ProgressDriver`] and decides, every time a leg reaches a bound,
//! whether to repeat, play the mirrored leg, wait, or finish. Lifecycle
//! observers are told about each transition exactly once.
//!
//! The host drives everything from a single thread:
//!
//! ```ignore
//! let mut ctrl = CycleController::new(Tween::default(), config)?;
//! ctrl.subscribe(my_observer);
//! ctrl.activate();
//! loop {
//!     ctrl.tick(frame_time);
//!     draw(ctrl.progress());
//! }
//! ```

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::driver::{Direction, DriverStatus, ProgressDriver};
use super::loop_config::LoopConfig;
use super::observer::{dispatch, LifecycleEvent, LoopObserver};
use super::timers::{TimerId, Timers};
use crate::error::LoopResult;

/// Controller lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleState {
    /// Never started since creation or the last reset
    Idle,
    Active,
    Paused,
    /// Repeat budget exhausted; terminal until a reset
    Completed,
}

/// Inputs of the state transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Pause,
    Resume,
    Finish,
    Reset,
}

impl CycleState {
    /// Transition table. `None` means the trigger has no effect in this state.
    pub fn next(self, trigger: Trigger) -> Option<CycleState> {
        use CycleState::*;
        match (self, trigger) {
            (Idle, Trigger::Resume) | (Paused, Trigger::Resume) => Some(Active),
            (Active, Trigger::Pause) => Some(Paused),
            (Active, Trigger::Finish) | (Paused, Trigger::Finish) => Some(Completed),
            (Idle, Trigger::Reset) => None,
            (_, Trigger::Reset) => Some(Idle),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    pub fn is_initialized(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Lifecycle event reported for a state edge, if any
fn edge_event(from: CycleState, to: CycleState) -> Option<LifecycleEvent> {
    match (from, to) {
        (CycleState::Idle, CycleState::Active) => Some(LifecycleEvent::Start),
        (CycleState::Paused, CycleState::Active) => Some(LifecycleEvent::Continue),
        (CycleState::Active, CycleState::Paused) => Some(LifecycleEvent::Pause),
        (_, CycleState::Completed) => Some(LifecycleEvent::Complete),
        _ => None,
    }
}

/// Upper bound on legs finished within one tick, for very short legs
const MAX_LEGS_PER_TICK: usize = 64;

/// Leg to run when an inter-cycle delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LegCommand {
    Forward,
    Backward,
}

/// Drives repeated playback cycles of a progress driver
pub struct CycleController<D: ProgressDriver> {
    driver: D,
    config: LoopConfig,
    state: CycleState,
    cycle: u32,
    timers: Timers<LegCommand>,
    /// The only timer allowed to fire; anything else is stale
    pending: Option<TimerId>,
    /// Transition superseded by a pause, re-scheduled on resume
    deferred: Option<LegCommand>,
    observers: Vec<Box<dyn LoopObserver>>,
    last_rendered: Option<f32>,
}

impl<D: ProgressDriver> CycleController<D> {
    /// Validate `config`, configure the driver and park it at its start
    /// bound. Nothing plays until [`activate`](Self::activate) is called.
    pub fn new(mut driver: D, config: LoopConfig) -> LoopResult<Self> {
        config.validate().map_err(|e| {
            warn!("rejected loop configuration: {e}");
            e
        })?;

        driver.reset();
        driver.configure(
            config.duration,
            config.effective_backward_duration(),
            config.curve.clone(),
        );

        Ok(Self {
            driver,
            config,
            state: CycleState::Idle,
            cycle: 0,
            timers: Timers::new(),
            pending: None,
            deferred: None,
            observers: Vec::new(),
            last_rendered: None,
        })
    }

    /// Register a lifecycle observer
    pub fn subscribe(&mut self, observer: impl LoopObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ── Introspection ─────────────────────────────────────────────────

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Number of fully completed cycles
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn is_completed(&self) -> bool {
        self.state == CycleState::Completed
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Whether an inter-cycle transition is waiting on its delay
    pub fn has_pending_transition(&self) -> bool {
        self.pending.is_some()
    }

    /// Eased progress as the rendering layer should present it
    pub fn progress(&self) -> f32 {
        let eased = self.driver.eased_value();
        if self.config.reverse {
            1.0 - eased
        } else {
            eased
        }
    }

    // ── Activation ────────────────────────────────────────────────────

    /// Re-evaluate the pause flag: freeze, start, or resume the driver.
    ///
    /// Safe to call redundantly; notifications fire only on real edges.
    pub fn activate(&mut self) {
        if self.config.paused {
            self.driver.stop();
            self.supersede_pending();
            self.transition(Trigger::Pause);
            self.render();
            return;
        }

        let resuming = match self.state {
            CycleState::Completed | CycleState::Active => return,
            CycleState::Paused => true,
            CycleState::Idle => false,
        };
        self.transition(Trigger::Resume);

        if resuming {
            if let Some(command) = self.deferred.take() {
                self.schedule(command);
            } else if !self.config.continuity {
                self.restart_leg();
            } else {
                self.continue_leg();
            }
        } else {
            self.continue_leg();
        }
        self.render();
    }

    /// Replace the pause flag and re-evaluate
    pub fn set_paused(&mut self, paused: bool) {
        self.config.paused = paused;
        self.activate();
    }

    // ── Driver events ─────────────────────────────────────────────────

    /// React to a driver completion (`AtEnd`) or dismissal (`AtStart`)
    pub fn handle_status(&mut self, status: DriverStatus) {
        if self.state != CycleState::Active {
            trace!(status = status.name(), state = self.state.name(), "ignoring driver status");
            return;
        }

        match status {
            DriverStatus::AtEnd => self.forward_leg_completed(),
            DriverStatus::AtStart => self.backward_leg_completed(),
            DriverStatus::Forward | DriverStatus::Reverse => {}
        }
        self.render();
    }

    fn forward_leg_completed(&mut self) {
        self.cycle = self.cycle.saturating_add(1);

        if self.config.mirror {
            // The cycle only counts once the backward leg is back at start.
            self.schedule(LegCommand::Backward);
            return;
        }

        self.finish_cycle();
    }

    fn backward_leg_completed(&mut self) {
        if !self.config.mirror {
            trace!("dismissal with mirror off, nothing to do");
            return;
        }
        self.finish_cycle();
    }

    /// Report the finished cycle, then either complete or queue the next one
    fn finish_cycle(&mut self) {
        self.emit(LifecycleEvent::Cycle { cycle: self.cycle });

        if self.config.repeat.exceeded_by(self.cycle) {
            self.cancel_pending();
            self.driver.stop();
            self.transition(Trigger::Finish);
        } else {
            self.schedule(LegCommand::Forward);
        }
    }

    // ── Tick ──────────────────────────────────────────────────────────

    /// Advance the host clock by `dt`: fire due transitions, advance the
    /// driver, and route any leg completion through the state machine.
    ///
    /// Time is carried across leg boundaries. A leg started by a timer only
    /// gets the part of `dt` past the timer's deadline, and time left over
    /// after a leg hits its bound counts towards the next delay.
    pub fn tick(&mut self, dt: Duration) {
        let mut budget = dt;
        for _ in 0..MAX_LEGS_PER_TICK {
            let mut driver_budget = budget;
            for (id, command, overshoot) in self.timers.advance(budget) {
                if self.pending != Some(id) || self.state != CycleState::Active {
                    trace!(?id, ?command, "suppressed stale transition");
                    continue;
                }
                self.pending = None;
                self.run_leg(command);
                driver_budget = overshoot;
            }

            budget = Duration::ZERO;
            if let Some(status) = self.driver.tick(driver_budget) {
                self.handle_status(status);
                if self.state == CycleState::Active {
                    budget = self.driver.leftover();
                }
            }
            if budget.is_zero() {
                break;
            }
        }

        let progress = self.progress();
        if self.last_rendered != Some(progress) {
            self.render();
        }
    }

    // ── Reconfiguration ───────────────────────────────────────────────

    /// Apply a new configuration against the current one.
    ///
    /// Changing repeat, continuity, mirror or reverse resets the controller
    /// (cycle 0, idle, driver at start) and re-activates it. Timing, curve
    /// and pause changes apply in place.
    pub fn reconfigure(&mut self, next: LoopConfig) -> LoopResult<()> {
        next.validate().map_err(|e| {
            warn!("rejected loop reconfiguration: {e}");
            e
        })?;

        let previous = std::mem::replace(&mut self.config, next);

        if previous.requires_reset(&self.config) {
            debug!("reconfiguration forces a reset");
            self.reset();
            self.configure_driver();
            self.activate();
            return Ok(());
        }

        if previous.timing_changed(&self.config) {
            self.configure_driver();
        }
        if previous.paused != self.config.paused {
            self.activate();
        }
        self.render();
        Ok(())
    }

    /// Full reset with the current configuration, then re-activate
    pub fn restart(&mut self) {
        self.reset();
        self.activate();
    }

    /// Tear down: cancel every pending transition, stop the driver and hand
    /// it back. No notification can fire afterwards.
    pub fn dispose(self) -> D {
        let Self {
            mut driver,
            mut timers,
            ..
        } = self;
        timers.clear();
        driver.stop();
        debug!("cycle controller disposed");
        driver
    }

    // ── Internals ─────────────────────────────────────────────────────

    fn reset(&mut self) {
        self.cancel_pending();
        self.timers.clear();
        self.driver.reset();
        self.cycle = 0;
        if let Some(next) = self.state.next(Trigger::Reset) {
            debug!(from = self.state.name(), "controller reset");
            self.state = next;
        }
    }

    fn configure_driver(&mut self) {
        self.driver.configure(
            self.config.duration,
            self.config.effective_backward_duration(),
            self.config.curve.clone(),
        );
    }

    /// Apply `trigger` and notify the matching edge. Returns whether the
    /// state changed.
    fn transition(&mut self, trigger: Trigger) -> bool {
        let Some(next) = self.state.next(trigger) else {
            return false;
        };
        let from = std::mem::replace(&mut self.state, next);
        debug!(from = from.name(), to = next.name(), cycle = self.cycle, "state transition");
        if let Some(event) = edge_event(from, next) {
            self.emit(event);
        }
        true
    }

    fn emit(&mut self, event: LifecycleEvent) {
        debug!(event = %event.label(), "lifecycle");
        for observer in &mut self.observers {
            dispatch(observer.as_mut(), event);
        }
    }

    fn render(&mut self) {
        let progress = self.progress();
        self.last_rendered = Some(progress);
        for observer in &mut self.observers {
            observer.on_render(progress);
        }
    }

    /// Queue `command` behind its delay, replacing any pending transition
    fn schedule(&mut self, command: LegCommand) {
        self.cancel_pending();
        let delay = match command {
            LegCommand::Forward => self.config.delay,
            LegCommand::Backward => self.config.effective_backward_delay(),
        };
        trace!(?command, ?delay, "scheduling transition");
        self.pending = Some(self.timers.schedule(delay, command));
    }

    fn cancel_pending(&mut self) {
        self.deferred = None;
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
    }

    /// Cancel the pending transition but remember it for the next resume
    fn supersede_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            if let Some(command) = self.timers.cancel(id) {
                trace!(?command, "transition deferred by pause");
                self.deferred = Some(command);
            }
        }
    }

    fn run_leg(&mut self, command: LegCommand) {
        trace!(?command, "running leg");
        match command {
            LegCommand::Forward => self.driver.start_from(0.0),
            LegCommand::Backward => self.driver.reverse_from(1.0),
        }
    }

    /// Keep going in the driver's last direction
    fn continue_leg(&mut self) {
        match self.driver.direction() {
            Direction::Backward => self.driver.reverse(),
            Direction::Forward => self.driver.start(),
        }
    }

    /// Start the current leg over from its own beginning
    fn restart_leg(&mut self) {
        match self.driver.direction() {
            Direction::Backward => self.driver.reverse_from(1.0),
            Direction::Forward => self.driver.start_from(0.0),
        }
    }
}

impl<D: ProgressDriver + std::fmt::Debug> std::fmt::Debug for CycleController<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleController")
            .field("driver", &self.driver)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("cycle", &self.cycle)
            .field("pending", &self.pending)
            .field("deferred", &self.deferred)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        use CycleState::*;
        assert_eq!(Idle.next(Trigger::Resume), Some(Active));
        assert_eq!(Idle.next(Trigger::Pause), None);
        assert_eq!(Active.next(Trigger::Pause), Some(Paused));
        assert_eq!(Active.next(Trigger::Resume), None);
        assert_eq!(Paused.next(Trigger::Pause), None);
        assert_eq!(Paused.next(Trigger::Resume), Some(Active));
        assert_eq!(Active.next(Trigger::Finish), Some(Completed));
        assert_eq!(Completed.next(Trigger::Resume), None);
        assert_eq!(Completed.next(Trigger::Pause), None);
        assert_eq!(Completed.next(Trigger::Reset), Some(Idle));
        assert_eq!(Idle.next(Trigger::Reset), None);
    }

    #[test]
    fn edges_map_to_events() {
        use CycleState::*;
        assert_eq!(edge_event(Idle, Active), Some(LifecycleEvent::Start));
        assert_eq!(edge_event(Paused, Active), Some(LifecycleEvent::Continue));
        assert_eq!(edge_event(Active, Paused), Some(LifecycleEvent::Pause));
        assert_eq!(edge_event(Active, Completed), Some(LifecycleEvent::Complete));
        assert_eq!(edge_event(Completed, Idle), None);
    }
}
