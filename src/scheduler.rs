//! Virtual-time timer queue.
//!
//! The page runs on a single cooperative event loop. Deferred work (effect
//! reverts, notification expiry, dropdown fades) is scheduled here as plain
//! task values and executed by the page when the driver advances time.
//!
//! # Ordering
//!
//! Due timers fire in deadline order; timers sharing a deadline fire in the
//! order they were scheduled. Cancelled timers never fire.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle returned by [`Scheduler::schedule`], used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerId(u64);

/// One-shot timers over a virtual clock starting at zero (page load).
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), T>,
    deadlines: HashMap<u64, Duration>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Time elapsed since page load.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` once, `delay` from now.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        let deadline = self.now + delay;
        self.queue.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        TimerId(id)
    }

    /// Drop a pending timer. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, timer: TimerId) -> bool {
        match self.deadlines.remove(&timer.0) {
            Some(deadline) => self.queue.remove(&(deadline, timer.0)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, timer: TimerId) -> bool {
        self.deadlines.contains_key(&timer.0)
    }

    /// Number of timers still waiting.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        let (&(deadline, id), _) = self.queue.iter().next()?;
        if deadline > until {
            return None;
        }
        let task = self.queue.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        if deadline > self.now {
            self.now = deadline;
        }
        Some((TimerId(id), task))
    }

    /// Move the clock forward without running anything. The clock never
    /// goes backwards.
    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }
}
