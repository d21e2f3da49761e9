//! One-shot, cancellable timers advanced by the host tick.
//!
//! Everything runs on the host's single logical thread: timers only move
//! when [`Timers::advance`] is called, and a cancelled timer can never fire.

use std::time::Duration;

/// Handle to a scheduled timer. Ids are never reused within one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    remaining: Duration,
    payload: T,
}

/// Queue of pending one-shot timers carrying a payload each
#[derive(Debug)]
pub struct Timers<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire once `delay` has elapsed. A zero delay
    /// fires on the next call to [`advance`](Self::advance).
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            remaining: delay,
            payload,
        });
        id
    }

    /// Cancel a pending timer, returning its payload if it had not fired
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx).payload)
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Advance time by `dt` and return the timers that came due, earliest
    /// deadline first (ties in scheduling order). Each carries how far past
    /// its deadline `dt` reached.
    pub fn advance(&mut self, dt: Duration) -> Vec<(TimerId, T, Duration)> {
        let mut due = Vec::new();
        let mut idx = 0;
        while idx < self.entries.len() {
            let entry = &mut self.entries[idx];
            if entry.remaining <= dt {
                let overshoot = dt - entry.remaining;
                let entry = self.entries.remove(idx);
                due.push((overshoot, entry.id, entry.payload));
            } else {
                entry.remaining -= dt;
                idx += 1;
            }
        }
        // Largest overshoot means the earliest deadline.
        due.sort_by(|a, b| b.0.cmp(&a.0).then(a.1 .0.cmp(&b.1 .0)));
        due.into_iter()
            .map(|(overshoot, id, payload)| (id, payload, overshoot))
            .collect()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
