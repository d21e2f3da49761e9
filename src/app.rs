use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{info, warn};

use anim_loop::config::{Config, Effect};
use anim_loop::{Curve, CycleController, LifecycleEvent, LoopConfig, LoopResult, Repeat, Tween};

use crate::event::{Event, LifecycleForwarder};

/// How many lifecycle entries the log panel keeps
const LOG_CAPACITY: usize = 64;

const DELAY_STEPS_MS: &[u64] = &[0, 150, 300, 600, 1200];
const MIN_DURATION_MS: u64 = 100;
const DURATION_STEP_MS: u64 = 100;

/// A timestamped lifecycle notification for the log panel
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub event: LifecycleEvent,
}

// ── Application State ─────────────────────────────────────────────────

pub struct App {
    pub should_quit: bool,
    pub controller: CycleController<Tween>,

    // Presentation
    pub effect: Effect,
    pub show_log: bool,
    pub log: VecDeque<LogEntry>,

    // Toast notification
    pub toast_message: Option<String>,
    pub toast_is_error: bool,
    pub toast_ticks: u16,

    pub tick_count: u64,
    last_tick: Instant,
    toast_span: u16,
}

impl App {
    pub fn new(config: &Config, event_tx: mpsc::UnboundedSender<Event>) -> LoopResult<Self> {
        let loop_config = config.animation.to_loop_config()?;
        let mut controller = CycleController::new(Tween::new(loop_config.duration), loop_config)?;
        controller.subscribe(LifecycleForwarder::new(event_tx));
        controller.activate();

        // Keep toasts on screen for ~1.5s regardless of frame rate
        let toast_span = u16::try_from(u32::from(config.general.fps.max(1)) * 3 / 2)
            .unwrap_or(u16::MAX);

        Ok(Self {
            should_quit: false,
            controller,
            effect: config.appearance.effect,
            show_log: config.appearance.show_log,
            log: VecDeque::with_capacity(LOG_CAPACITY),
            toast_message: None,
            toast_is_error: false,
            toast_ticks: 0,
            tick_count: 0,
            last_tick: Instant::now(),
            toast_span,
        })
    }

    /// Dispatch an application event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick => self.on_tick(),
            Event::Resize => {}
            Event::Lifecycle(event) => self.record(event),
        }
    }

    /// Tear down the controller: pending transitions are dropped and the
    /// driver is stopped, so no lifecycle event can follow.
    pub fn shutdown(self) -> Tween {
        info!(cycles = self.controller.cycle(), "shutting down controller");
        self.controller.dispose()
    }

    fn on_tick(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.tick_count = self.tick_count.wrapping_add(1);
        self.controller.tick(dt);
        self.tick_toast();
    }

    fn record(&mut self, event: LifecycleEvent) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry {
            at: Local::now(),
            event,
        });
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.toggle_pause(),
            KeyCode::Char('m') => {
                self.apply(|c| c.mirror = !c.mirror);
                self.show_flag("Mirror", self.controller.config().mirror);
            }
            KeyCode::Char('r') => {
                self.apply(|c| c.reverse = !c.reverse);
                self.show_flag("Reverse", self.controller.config().reverse);
            }
            KeyCode::Char('c') => {
                self.apply(|c| c.continuity = !c.continuity);
                self.show_flag("Continuity", self.controller.config().continuity);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.apply(|c| {
                    c.repeat = match c.repeat {
                        Repeat::Infinite => Repeat::Infinite,
                        Repeat::Times(n) => Repeat::Times(n.saturating_add(1)),
                    }
                });
                self.show_repeat();
            }
            KeyCode::Char('-') => {
                self.apply(|c| {
                    c.repeat = match c.repeat {
                        Repeat::Infinite => Repeat::Times(3),
                        Repeat::Times(n) => Repeat::Times(n.saturating_sub(1)),
                    }
                });
                self.show_repeat();
            }
            KeyCode::Char('i') => {
                self.apply(|c| c.repeat = Repeat::Infinite);
                self.show_repeat();
            }
            KeyCode::Char('[') => {
                self.apply(|c| {
                    let ms = (c.duration.as_millis() as u64).saturating_sub(DURATION_STEP_MS);
                    c.duration = Duration::from_millis(ms.max(MIN_DURATION_MS));
                });
                self.show_duration();
            }
            KeyCode::Char(']') => {
                self.apply(|c| c.duration += Duration::from_millis(DURATION_STEP_MS));
                self.show_duration();
            }
            KeyCode::Char('d') => {
                self.apply(|c| c.delay = next_delay(c.delay));
                let delay = self.controller.config().delay;
                self.show_toast(&format!("Delay {} ms", delay.as_millis()), false);
            }
            KeyCode::Char('k') => {
                self.apply(|c| c.curve = next_curve(&c.curve));
                let name = self.controller.config().curve.name();
                self.show_toast(&format!("Curve {name}"), false);
            }
            KeyCode::Char('e') => {
                self.effect = self.effect.next();
                self.show_toast(&format!("Effect {}", self.effect.name()), false);
            }
            KeyCode::Char('l') => {
                self.show_log = !self.show_log;
            }
            KeyCode::Char('R') => {
                self.controller.restart();
                self.show_toast("Restarted", false);
            }
            _ => {}
        }
    }

    fn toggle_pause(&mut self) {
        let paused = !self.controller.config().paused;
        self.controller.set_paused(paused);
        info!(paused, "pause toggled");
        self.show_toast(if paused { "Paused" } else { "Resumed" }, false);
    }

    /// Reconfigure the controller with an edited copy of its configuration
    fn apply(&mut self, edit: impl FnOnce(&mut LoopConfig)) {
        let mut next = self.controller.config().clone();
        edit(&mut next);
        if let Err(e) = self.controller.reconfigure(next) {
            warn!("reconfiguration rejected: {e}");
            self.show_toast(&e.to_string(), true);
        }
    }

    // ── Toast Management ──────────────────────────────────────────────

    pub fn show_toast(&mut self, message: &str, is_error: bool) {
        self.toast_message = Some(message.to_string());
        self.toast_is_error = is_error;
        self.toast_ticks = self.toast_span;
    }

    pub fn tick_toast(&mut self) {
        if self.toast_ticks > 0 {
            self.toast_ticks -= 1;
            if self.toast_ticks == 0 {
                self.toast_message = None;
            }
        }
    }

    fn show_flag(&mut self, name: &str, on: bool) {
        let state = if on { "on" } else { "off" };
        self.show_toast(&format!("{name} {state} (loop reset)"), false);
    }

    fn show_repeat(&mut self) {
        let repeat = self.controller.config().repeat;
        self.show_toast(&format!("Repeat {repeat} (loop reset)"), false);
    }

    fn show_duration(&mut self) {
        let duration = self.controller.config().duration;
        self.show_toast(&format!("Duration {} ms", duration.as_millis()), false);
    }
}

fn next_delay(current: Duration) -> Duration {
    let ms = current.as_millis() as u64;
    let next = DELAY_STEPS_MS
        .iter()
        .copied()
        .find(|step| *step > ms)
        .unwrap_or(DELAY_STEPS_MS[0]);
    Duration::from_millis(next)
}

fn next_curve(current: &Curve) -> Curve {
    match current {
        Curve::Linear => Curve::EaseIn,
        Curve::EaseIn => Curve::EaseOut,
        Curve::EaseOut => Curve::EaseInOut,
        _ => Curve::Linear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anim_loop::ProgressDriver;

    #[test]
    fn shutdown_stops_the_driver() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::default(), tx).unwrap();
        assert!(matches!(
            rx.try_recv(),
            Ok(Event::Lifecycle(LifecycleEvent::Start))
        ));

        app.handle_event(Event::Tick);
        let driver = app.shutdown();

        assert!(!driver.is_running());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn delay_steps_wrap_around() {
        assert_eq!(next_delay(Duration::ZERO), Duration::from_millis(150));
        assert_eq!(next_delay(Duration::from_millis(200)), Duration::from_millis(300));
        assert_eq!(next_delay(Duration::from_millis(1200)), Duration::ZERO);
    }

    #[test]
    fn curves_cycle_through_presets() {
        assert_eq!(next_curve(&Curve::Linear), Curve::EaseIn);
        assert_eq!(next_curve(&Curve::EaseInOut), Curve::Linear);
        assert_eq!(
            next_curve(&Curve::CubicBezier(0.1, 0.2, 0.3, 0.4)),
            Curve::Linear
        );
    }
}
