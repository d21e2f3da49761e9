//! Controller semantics against a scripted driver. Leg completions are fed
//! in by hand through `handle_status`, so every step is deterministic.

use std::time::Duration;

use anim_loop::{
    Curve, CycleController, CycleState, Direction, DriverStatus, EventRecorder, LifecycleEvent,
    LoopConfig, LoopError, ProgressDriver, Repeat,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Call {
    Configure,
    Start,
    StartFrom(f32),
    Reverse,
    ReverseFrom(f32),
    Stop,
    Reset,
}

/// Driver that only records what it was told to do
#[derive(Debug, Default)]
struct ScriptedDriver {
    calls: Vec<Call>,
    value: f32,
    direction: Direction,
    running: bool,
}

impl ScriptedDriver {
    fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl ProgressDriver for ScriptedDriver {
    fn configure(&mut self, _duration: Duration, _reverse_duration: Duration, _curve: Curve) {
        self.calls.push(Call::Configure);
    }

    fn start(&mut self) {
        self.calls.push(Call::Start);
        self.direction = Direction::Forward;
        self.running = true;
    }

    fn start_from(&mut self, progress: f32) {
        self.calls.push(Call::StartFrom(progress));
        self.value = progress;
        self.direction = Direction::Forward;
        self.running = true;
    }

    fn reverse(&mut self) {
        self.calls.push(Call::Reverse);
        self.direction = Direction::Backward;
        self.running = true;
    }

    fn reverse_from(&mut self, progress: f32) {
        self.calls.push(Call::ReverseFrom(progress));
        self.value = progress;
        self.direction = Direction::Backward;
        self.running = true;
    }

    fn stop(&mut self) {
        self.calls.push(Call::Stop);
        self.running = false;
    }

    fn reset(&mut self) {
        self.calls.push(Call::Reset);
        self.value = 0.0;
        self.direction = Direction::Forward;
        self.running = false;
    }

    fn status(&self) -> DriverStatus {
        match self.direction {
            Direction::Forward => DriverStatus::Forward,
            Direction::Backward => DriverStatus::Reverse,
        }
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn value(&self) -> f32 {
        self.value
    }

    fn eased_value(&self) -> f32 {
        self.value
    }

    fn tick(&mut self, _dt: Duration) -> Option<DriverStatus> {
        None
    }
}

fn controller(config: LoopConfig) -> (CycleController<ScriptedDriver>, EventRecorder) {
    let recorder = EventRecorder::new();
    let mut ctrl = CycleController::new(ScriptedDriver::default(), config).unwrap();
    ctrl.subscribe(recorder.clone());
    (ctrl, recorder)
}

/// Finish a forward leg and let a zero delay elapse
fn forward_leg(ctrl: &mut CycleController<ScriptedDriver>) {
    ctrl.handle_status(DriverStatus::AtEnd);
    ctrl.tick(Duration::ZERO);
}

const MS_500: Duration = Duration::from_millis(500);

// ── Repeat budget ────────────────────────────────────────────────────────

#[test]
fn repeat_two_without_mirror_plays_three_cycles() {
    let (mut ctrl, recorder) = controller(LoopConfig::default().repeat(Repeat::Times(2)));
    ctrl.activate();

    for _ in 0..3 {
        forward_leg(&mut ctrl);
    }

    assert_eq!(
        recorder.events(),
        vec![
            LifecycleEvent::Start,
            LifecycleEvent::Cycle { cycle: 1 },
            LifecycleEvent::Cycle { cycle: 2 },
            LifecycleEvent::Cycle { cycle: 3 },
            LifecycleEvent::Complete,
        ]
    );
    assert!(ctrl.is_completed());
    assert_eq!(ctrl.cycle(), 3);
    assert!(!ctrl.driver().is_running());
}

#[test]
fn repeat_zero_still_plays_one_cycle() {
    let (mut ctrl, recorder) = controller(LoopConfig::default().repeat(Repeat::Times(0)));
    ctrl.activate();
    ctrl.handle_status(DriverStatus::AtEnd);

    assert_eq!(recorder.cycles(), vec![1]);
    assert_eq!(recorder.count(LifecycleEvent::Complete), 1);
    assert!(!ctrl.has_pending_transition());
}

#[test]
fn repeat_zero_with_mirror_completes_after_backward_leg() {
    let (mut ctrl, recorder) = controller(
        LoopConfig::default()
            .repeat(Repeat::Times(0))
            .mirror(true),
    );
    ctrl.activate();

    ctrl.handle_status(DriverStatus::AtEnd);
    assert!(recorder.cycles().is_empty());
    assert!(ctrl.has_pending_transition());

    ctrl.tick(Duration::ZERO);
    assert_eq!(ctrl.driver().calls.last(), Some(&Call::ReverseFrom(1.0)));

    ctrl.handle_status(DriverStatus::AtStart);
    assert_eq!(
        recorder.events(),
        vec![
            LifecycleEvent::Start,
            LifecycleEvent::Cycle { cycle: 1 },
            LifecycleEvent::Complete,
        ]
    );
}

#[test]
fn mirrored_cycles_count_on_return_to_start() {
    let (mut ctrl, recorder) = controller(
        LoopConfig::default()
            .repeat(Repeat::Times(1))
            .mirror(true),
    );
    ctrl.activate();

    for expected in 1..=2u32 {
        forward_leg(&mut ctrl);
        assert_eq!(recorder.cycles().len() as u32, expected - 1);
        ctrl.handle_status(DriverStatus::AtStart);
        assert_eq!(recorder.cycles().last(), Some(&expected));
        ctrl.tick(Duration::ZERO);
    }

    assert!(ctrl.is_completed());
    assert_eq!(recorder.count(LifecycleEvent::Complete), 1);
}

#[test]
fn infinite_repeat_never_completes() {
    let (mut ctrl, recorder) = controller(LoopConfig::default());
    ctrl.activate();

    for _ in 0..50 {
        forward_leg(&mut ctrl);
    }

    assert_eq!(recorder.cycles(), (1..=50).collect::<Vec<_>>());
    assert_eq!(recorder.count(LifecycleEvent::Complete), 0);
    assert_eq!(ctrl.state(), CycleState::Active);
}

#[test]
fn completed_controller_ignores_further_input() {
    let (mut ctrl, recorder) = controller(LoopConfig::default().repeat(Repeat::Times(0)));
    ctrl.activate();
    ctrl.handle_status(DriverStatus::AtEnd);
    let before = recorder.events();

    ctrl.handle_status(DriverStatus::AtEnd);
    ctrl.activate();
    ctrl.set_paused(true);
    ctrl.tick(Duration::from_secs(5));

    assert_eq!(recorder.events(), before);
    assert!(ctrl.is_completed());
}

// ── Lifecycle edges ──────────────────────────────────────────────────────

#[test]
fn start_fires_once_and_pause_edges_fire_once_each() {
    let (mut ctrl, recorder) = controller(LoopConfig::default());
    ctrl.activate();
    ctrl.activate();

    ctrl.set_paused(true);
    ctrl.set_paused(true);
    ctrl.set_paused(false);
    ctrl.set_paused(false);

    assert_eq!(
        recorder.events(),
        vec![
            LifecycleEvent::Start,
            LifecycleEvent::Pause,
            LifecycleEvent::Continue,
        ]
    );
}

#[test]
fn created_paused_starts_on_first_resume() {
    let (mut ctrl, recorder) = controller(LoopConfig::default().paused(true));
    ctrl.activate();
    assert_eq!(ctrl.state(), CycleState::Idle);
    assert!(recorder.events().is_empty());

    ctrl.set_paused(false);
    assert_eq!(recorder.events(), vec![LifecycleEvent::Start]);
    assert!(ctrl.is_initialized());
}

#[test]
fn driver_events_are_ignored_unless_active() {
    let (mut ctrl, recorder) = controller(LoopConfig::default());
    ctrl.handle_status(DriverStatus::AtEnd);
    assert_eq!(ctrl.cycle(), 0);

    ctrl.activate();
    ctrl.set_paused(true);
    ctrl.handle_status(DriverStatus::AtEnd);

    assert_eq!(ctrl.cycle(), 0);
    assert!(recorder.cycles().is_empty());
}

#[test]
fn dismissal_without_mirror_is_a_no_op() {
    let (mut ctrl, recorder) = controller(LoopConfig::default());
    ctrl.activate();
    ctrl.handle_status(DriverStatus::AtStart);

    assert_eq!(recorder.events(), vec![LifecycleEvent::Start]);
    assert!(!ctrl.has_pending_transition());
}

#[test]
fn activation_requests_a_render() {
    let (mut ctrl, recorder) = controller(LoopConfig::default());
    ctrl.activate();
    assert!(recorder.render_count() >= 1);
}

// ── Delays and stale timers ──────────────────────────────────────────────

#[test]
fn zero_delay_waits_for_the_next_tick() {
    let (mut ctrl, _recorder) = controller(LoopConfig::default());
    ctrl.activate();
    ctrl.handle_status(DriverStatus::AtEnd);

    assert!(ctrl.has_pending_transition());
    assert_eq!(ctrl.driver().count(Call::StartFrom(0.0)), 0);

    ctrl.tick(Duration::ZERO);
    assert!(!ctrl.has_pending_transition());
    assert_eq!(ctrl.driver().count(Call::StartFrom(0.0)), 1);
}

#[test]
fn pause_defers_pending_transition_until_resume() {
    let (mut ctrl, recorder) = controller(LoopConfig::default().delay(MS_500));
    ctrl.activate();
    ctrl.handle_status(DriverStatus::AtEnd);
    ctrl.tick(Duration::from_millis(200));

    ctrl.set_paused(true);
    assert!(!ctrl.has_pending_transition());

    // The superseded timer must never fire while paused.
    ctrl.tick(Duration::from_secs(2));
    assert_eq!(ctrl.driver().count(Call::StartFrom(0.0)), 0);

    ctrl.set_paused(false);
    assert!(ctrl.has_pending_transition());

    // Resuming re-schedules with the full delay.
    ctrl.tick(Duration::from_millis(400));
    assert_eq!(ctrl.driver().count(Call::StartFrom(0.0)), 0);
    ctrl.tick(Duration::from_millis(100));
    assert_eq!(ctrl.driver().count(Call::StartFrom(0.0)), 1);

    assert_eq!(
        recorder.events(),
        vec![
            LifecycleEvent::Start,
            LifecycleEvent::Cycle { cycle: 1 },
            LifecycleEvent::Pause,
            LifecycleEvent::Continue,
        ]
    );
}

#[test]
fn backward_leg_waits_its_own_delay() {
    let (mut ctrl, _recorder) = controller(
        LoopConfig::default()
            .mirror(true)
            .delay(MS_500)
            .backward_delay(Duration::from_millis(100)),
    );
    ctrl.activate();
    ctrl.handle_status(DriverStatus::AtEnd);

    ctrl.tick(Duration::from_millis(99));
    assert_eq!(ctrl.driver().count(Call::ReverseFrom(1.0)), 0);
    ctrl.tick(Duration::from_millis(1));
    assert_eq!(ctrl.driver().count(Call::ReverseFrom(1.0)), 1);

    // The next forward leg waits the full forward delay.
    ctrl.handle_status(DriverStatus::AtStart);
    ctrl.tick(Duration::from_millis(100));
    ctrl.tick(Duration::from_millis(399));
    assert_eq!(ctrl.driver().count(Call::StartFrom(0.0)), 0);
    ctrl.tick(Duration::from_millis(1));
    assert_eq!(ctrl.driver().count(Call::StartFrom(0.0)), 1);
}

#[test]
fn reconfigure_reset_cancels_pending_transition() {
    let (mut ctrl, recorder) = controller(LoopConfig::default().delay(MS_500));
    ctrl.activate();
    ctrl.handle_status(DriverStatus::AtEnd);
    assert!(ctrl.has_pending_transition());

    let next = ctrl.config().clone().mirror(true);
    ctrl.reconfigure(next).unwrap();

    assert_eq!(ctrl.cycle(), 0);
    assert!(!ctrl.has_pending_transition());

    ctrl.tick(Duration::from_secs(1));
    assert_eq!(ctrl.driver().count(Call::StartFrom(0.0)), 0);
    assert_eq!(recorder.cycles(), vec![1]);
    assert_eq!(recorder.count(LifecycleEvent::Start), 2);
}

#[test]
fn dispose_stops_driver_and_drops_timers() {
    let (mut ctrl, recorder) = controller(LoopConfig::default().delay(MS_500));
    ctrl.activate();
    ctrl.handle_status(DriverStatus::AtEnd);
    let events = recorder.events();

    let driver = ctrl.dispose();

    assert!(!driver.is_running());
    assert_eq!(driver.calls.last(), Some(&Call::Stop));
    assert_eq!(recorder.events(), events);
}

// ── Continuity ───────────────────────────────────────────────────────────

#[test]
fn without_continuity_resume_restarts_forward_leg() {
    let (mut ctrl, _recorder) = controller(LoopConfig::default().continuity(false));
    ctrl.activate();
    ctrl.set_paused(true);
    ctrl.set_paused(false);

    assert_eq!(ctrl.driver().calls.last(), Some(&Call::StartFrom(0.0)));
}

#[test]
fn without_continuity_resume_restarts_backward_leg() {
    let (mut ctrl, _recorder) = controller(
        LoopConfig::default()
            .continuity(false)
            .mirror(true),
    );
    ctrl.activate();
    forward_leg(&mut ctrl);
    assert_eq!(ctrl.driver().direction(), Direction::Backward);

    ctrl.set_paused(true);
    ctrl.set_paused(false);

    assert_eq!(ctrl.driver().count(Call::ReverseFrom(1.0)), 2);
}

#[test]
fn with_continuity_resume_keeps_direction() {
    let (mut ctrl, _recorder) = controller(LoopConfig::default().mirror(true));
    ctrl.activate();
    forward_leg(&mut ctrl);

    ctrl.set_paused(true);
    ctrl.set_paused(false);

    assert_eq!(ctrl.driver().calls.last(), Some(&Call::Reverse));
}

// ── Reconfiguration ──────────────────────────────────────────────────────

#[test]
fn timing_change_applies_in_place() {
    let (mut ctrl, recorder) = controller(LoopConfig::default());
    ctrl.activate();
    forward_leg(&mut ctrl);
    let configures = ctrl.driver().count(Call::Configure);

    let next = ctrl.config().clone().duration(Duration::from_secs(3));
    ctrl.reconfigure(next).unwrap();

    assert_eq!(ctrl.cycle(), 1);
    assert_eq!(ctrl.state(), CycleState::Active);
    assert_eq!(ctrl.driver().count(Call::Configure), configures + 1);
    assert_eq!(ctrl.driver().count(Call::Reset), 1);
    assert_eq!(recorder.count(LifecycleEvent::Start), 1);
}

#[test]
fn delay_only_change_leaves_driver_alone() {
    let (mut ctrl, _recorder) = controller(LoopConfig::default());
    ctrl.activate();
    let configures = ctrl.driver().count(Call::Configure);

    let next = ctrl.config().clone().delay(MS_500);
    ctrl.reconfigure(next).unwrap();

    assert_eq!(ctrl.driver().count(Call::Configure), configures);
}

#[test]
fn pause_through_reconfigure() {
    let (mut ctrl, recorder) = controller(LoopConfig::default());
    ctrl.activate();

    let next = ctrl.config().clone().paused(true);
    ctrl.reconfigure(next).unwrap();
    assert_eq!(ctrl.state(), CycleState::Paused);

    let next = ctrl.config().clone().paused(false);
    ctrl.reconfigure(next).unwrap();
    assert_eq!(ctrl.state(), CycleState::Active);

    assert_eq!(recorder.count(LifecycleEvent::Pause), 1);
    assert_eq!(recorder.count(LifecycleEvent::Continue), 1);
}

#[test]
fn reset_fields_restart_from_cycle_zero() {
    let edits: [fn(LoopConfig) -> LoopConfig; 4] = [
        |c| c.repeat(Repeat::Times(9)),
        |c| c.continuity(false),
        |c| c.mirror(true),
        |c| c.reverse(true),
    ];
    for edit in edits {
        let (mut ctrl, recorder) = controller(LoopConfig::default());
        ctrl.activate();
        forward_leg(&mut ctrl);
        forward_leg(&mut ctrl);
        assert_eq!(ctrl.cycle(), 2);

        let next = edit(ctrl.config().clone());
        ctrl.reconfigure(next).unwrap();

        assert_eq!(ctrl.cycle(), 0);
        assert_eq!(ctrl.state(), CycleState::Active);
        assert_eq!(recorder.count(LifecycleEvent::Start), 2);
    }
}

#[test]
fn completed_loop_restarts_after_reset_reconfigure() {
    let (mut ctrl, recorder) = controller(LoopConfig::default().repeat(Repeat::Times(0)));
    ctrl.activate();
    ctrl.handle_status(DriverStatus::AtEnd);
    assert!(ctrl.is_completed());

    let next = ctrl.config().clone().repeat(Repeat::Times(1));
    ctrl.reconfigure(next).unwrap();

    assert_eq!(ctrl.state(), CycleState::Active);
    forward_leg(&mut ctrl);
    ctrl.handle_status(DriverStatus::AtEnd);
    assert_eq!(recorder.cycles(), vec![1, 1, 2]);
    assert_eq!(recorder.count(LifecycleEvent::Complete), 2);
}

// ── Validation ───────────────────────────────────────────────────────────

#[test]
fn invalid_configuration_is_rejected() {
    assert!(matches!(
        LoopConfig::default().with_repeat_count(-2),
        Err(LoopError::InvalidConfiguration(_))
    ));

    let overflow = LoopConfig::default().repeat(Repeat::Times(u32::MAX));
    assert!(matches!(
        CycleController::new(ScriptedDriver::default(), overflow.clone()),
        Err(LoopError::InvalidConfiguration(_))
    ));

    let (mut ctrl, _recorder) = controller(LoopConfig::default());
    assert!(ctrl.reconfigure(overflow).is_err());
    assert_eq!(ctrl.config(), &LoopConfig::default());
}
