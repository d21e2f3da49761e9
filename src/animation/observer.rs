use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// A lifecycle notification emitted by the cycle controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    Start,
    Pause,
    Continue,
    Cycle { cycle: u32 },
    Complete,
}

impl LifecycleEvent {
    pub fn label(&self) -> String {
        match self {
            Self::Start => "start".into(),
            Self::Pause => "pause".into(),
            Self::Continue => "continue".into(),
            Self::Cycle { cycle } => format!("cycle {cycle}"),
            Self::Complete => "complete".into(),
        }
    }
}

/// Listener for controller notifications. Every hook is optional.
///
/// Hooks run synchronously from inside the state machine, after the state
/// change they report.
pub trait LoopObserver {
    fn on_start(&mut self) {}

    fn on_pause(&mut self) {}

    fn on_continue(&mut self) {}

    /// `cycle` is the number of fully completed cycles, starting at 1
    fn on_cycle(&mut self, _cycle: u32) {}

    fn on_complete(&mut self) {}

    /// Re-render request carrying the presented progress. May repeat with
    /// an unchanged value.
    fn on_render(&mut self, _progress: f32) {}
}

/// Route a [`LifecycleEvent`] to the matching hook
pub(crate) fn dispatch(observer: &mut dyn LoopObserver, event: LifecycleEvent) {
    match event {
        LifecycleEvent::Start => observer.on_start(),
        LifecycleEvent::Pause => observer.on_pause(),
        LifecycleEvent::Continue => observer.on_continue(),
        LifecycleEvent::Cycle { cycle } => observer.on_cycle(cycle),
        LifecycleEvent::Complete => observer.on_complete(),
    }
}

/// Observer that appends every lifecycle event to a shared log.
///
/// Clones share the same log, so keep one clone and subscribe the other.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<LifecycleEvent>>>,
    renders: Rc<RefCell<usize>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded events equal to `event`
    pub fn count(&self, event: LifecycleEvent) -> usize {
        self.events.borrow().iter().filter(|e| **e == event).count()
    }

    /// Cycle indices in the order `on_cycle` reported them
    pub fn cycles(&self) -> Vec<u32> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                LifecycleEvent::Cycle { cycle } => Some(*cycle),
                _ => None,
            })
            .collect()
    }

    pub fn render_count(&self) -> usize {
        *self.renders.borrow()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
        *self.renders.borrow_mut() = 0;
    }

    fn push(&self, event: LifecycleEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl LoopObserver for EventRecorder {
    fn on_start(&mut self) {
        self.push(LifecycleEvent::Start);
    }

    fn on_pause(&mut self) {
        self.push(LifecycleEvent::Pause);
    }

    fn on_continue(&mut self) {
        self.push(LifecycleEvent::Continue);
    }

    fn on_cycle(&mut self, cycle: u32) {
        self.push(LifecycleEvent::Cycle { cycle });
    }

    fn on_complete(&mut self) {
        self.push(LifecycleEvent::Complete);
    }

    fn on_render(&mut self, _progress: f32) {
        *self.renders.borrow_mut() += 1;
    }
}
