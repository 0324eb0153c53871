//! Per-key trailing-edge debouncing.
//!
//! The event loop ticks at a fixed rate, so pending invocations are kept as
//! deadlines and collected by [`Debouncer::due`] on each tick rather than run
//! from timers. Time is always passed in, which keeps the behaviour
//! deterministic under test.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<K, V> {
    key: K,
    value: V,
    deadline: Instant,
}

/// Holds at most one pending invocation per key.
///
#[derive(Debug, Clone)]
pub struct Debouncer<K, V> {
    delay: Duration,
    pending: Vec<Pending<K, V>>,
}

impl<K: Copy + PartialEq, V> Debouncer<K, V> {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: Vec::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule an invocation for `key`, cancelling any pending one for the
    /// same key. The rescheduled entry moves to the back of the call order.
    ///
    pub fn schedule(&mut self, key: K, value: V, now: Instant) {
        self.pending.retain(|p| p.key != key);
        self.pending.push(Pending {
            key,
            value,
            deadline: now + self.delay,
        });
    }

    /// Remove and return the invocations whose deadline has passed, in call
    /// order.
    ///
    pub fn due(&mut self, now: Instant) -> Vec<(K, V)> {
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.deadline <= now);
        self.pending = waiting;
        ready.into_iter().map(|p| (p.key, p.value)).collect()
    }

    /// Remove and return every pending invocation immediately, in call order.
    ///
    pub fn flush(&mut self) -> Vec<(K, V)> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|p| (p.key, p.value))
            .collect()
    }

    /// Drop every pending invocation without running it.
    ///
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|p| p.key == key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
