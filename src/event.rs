use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use anim_loop::{LifecycleEvent, LoopObserver};

/// Application-level events
#[derive(Debug, Clone)]
pub enum Event {
    /// User key press
    Key(KeyEvent),
    /// Animation / render tick
    Tick,
    /// Terminal resize; the next draw picks up the new size
    Resize,
    /// A lifecycle notification from the cycle controller
    Lifecycle(LifecycleEvent),
}

/// Handles event collection from multiple sources.
///
/// Uses crossterm's async `EventStream` (via `futures::StreamExt`) instead of
/// blocking `event::poll()` / `event::read()`, so no tokio worker thread is
/// ever blocked.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
    stop: Arc<AtomicBool>,
}

impl EventHandler {
    /// Create a new event handler. Spawns background tasks for async input and tick generation.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));

        // Async input task using crossterm's EventStream (non-blocking)
        let input_tx = tx.clone();
        let input_stop = stop.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            loop {
                if input_stop.load(Ordering::Relaxed) {
                    return;
                }
                let maybe_event = reader.next().await;
                if input_stop.load(Ordering::Relaxed) {
                    return;
                }
                match maybe_event {
                    Some(Ok(CrosstermEvent::Key(key))) => {
                        if key.kind == KeyEventKind::Press
                            && input_tx.send(Event::Key(key)).is_err()
                        {
                            return;
                        }
                    }
                    Some(Ok(CrosstermEvent::Resize(_, _))) => {
                        if input_tx.send(Event::Resize).is_err() {
                            return;
                        }
                    }
                    Some(Err(_)) | None => {
                        // Stream ended or errored, exit gracefully
                        return;
                    }
                    _ => {}
                }
            }
        });

        // Tick task
        let tick_tx = tx.clone();
        let tick_stop = stop.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_stop.load(Ordering::Relaxed) {
                    return;
                }
                if tick_tx.send(Event::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx, stop }
    }

    /// Get a clone of the sender for forwarding controller notifications
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Signal all background tasks to stop
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Forwards controller lifecycle hooks into the app's event channel
pub struct LifecycleForwarder {
    tx: mpsc::UnboundedSender<Event>,
}

impl LifecycleForwarder {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }

    fn forward(&self, event: LifecycleEvent) {
        // The receiver only goes away on shutdown
        let _ = self.tx.send(Event::Lifecycle(event));
    }
}

impl LoopObserver for LifecycleForwarder {
    fn on_start(&mut self) {
        self.forward(LifecycleEvent::Start);
    }

    fn on_pause(&mut self) {
        self.forward(LifecycleEvent::Pause);
    }

    fn on_continue(&mut self) {
        self.forward(LifecycleEvent::Continue);
    }

    fn on_cycle(&mut self, cycle: u32) {
        self.forward(LifecycleEvent::Cycle { cycle });
    }

    fn on_complete(&mut self) {
        self.forward(LifecycleEvent::Complete);
    }
}
