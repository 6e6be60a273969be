//! Named one-shot and repeating timers with cancel-and-replace semantics.
//!
//! The scheduler is a plain deadline registry, not a runtime: the host
//! event loop asks for [`Scheduler::next_deadline`], sleeps until it, and
//! feeds due timers back through [`Scheduler::poll`]. Because arming a
//! timer replaces any pending deadline under the same name, a superseded
//! callback can never fire late.

use std::time::{Duration, Instant};

/// Timer names used by the animation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// One-shot: settle to the middle pose after typing stops.
    Settle,
    /// One-shot: hide the sprite after a longer idle gap.
    Hide,
    /// Repeating: burst effect animation tick.
    EffectTick,
}

const TIMER_COUNT: usize = 3;

impl Timer {
    fn index(self) -> usize {
        match self {
            Timer::Settle => 0,
            Timer::Hide => 1,
            Timer::EffectTick => 2,
        }
    }

    fn from_index(index: usize) -> Timer {
        match index {
            0 => Timer::Settle,
            1 => Timer::Hide,
            _ => Timer::EffectTick,
        }
    }

    /// Get a human-readable name for the timer.
    pub fn name(&self) -> &'static str {
        match self {
            Timer::Settle => "settle",
            Timer::Hide => "hide",
            Timer::EffectTick => "effect-tick",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    deadline: Instant,
    /// Re-arm interval for repeating timers.
    repeat: Option<Duration>,
}

/// Deadline registry for the animator's timers.
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: [Option<Entry>; TIMER_COUNT],
}

impl Scheduler {
    /// Create a scheduler with no armed timers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `timer` to fire once at `now + delay`, replacing any pending
    /// deadline under the same name.
    pub fn after(&mut self, timer: Timer, delay: Duration, now: Instant) {
        self.entries[timer.index()] = Some(Entry {
            deadline: now + delay,
            repeat: None,
        });
    }

    /// Arm `timer` to fire every `interval` starting at `now + interval`,
    /// replacing any pending deadline under the same name.
    pub fn every(&mut self, timer: Timer, interval: Duration, now: Instant) {
        self.entries[timer.index()] = Some(Entry {
            deadline: now + interval,
            repeat: Some(interval),
        });
    }

    /// Cancel `timer`. Cancelling an inactive timer is a no-op.
    pub fn cancel(&mut self, timer: Timer) {
        self.entries[timer.index()] = None;
    }

    /// Cancel every timer. Used on teardown.
    pub fn cancel_all(&mut self) {
        self.entries = [None; TIMER_COUNT];
    }

    /// Whether `timer` currently has a pending deadline.
    pub fn is_armed(&self, timer: Timer) -> bool {
        self.entries[timer.index()].is_some()
    }

    /// Earliest pending deadline across all timers, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries
            .iter()
            .flatten()
            .map(|entry| entry.deadline)
            .min()
    }

    /// Take the due timer with the earliest deadline at `now`.
    ///
    /// One-shot timers are disarmed before being returned; repeating
    /// timers are re-armed one interval past their old deadline. Call in
    /// a loop to drain everything that is due.
    pub fn poll(&mut self, now: Instant) -> Option<Timer> {
        let due = self
            .entries
            .iter()
            .copied()
            .enumerate()
            .filter_map(|(index, entry)| entry.map(|e| (index, e.deadline)))
            .filter(|(_, deadline)| *deadline <= now)
            .min_by_key(|(_, deadline)| *deadline)?;

        let timer = Timer::from_index(due.0);
        if let Some(entry) = self.entries[due.0] {
            self.entries[due.0] = entry.repeat.map(|interval| Entry {
                deadline: entry.deadline + interval,
                repeat: Some(interval),
            });
        }
        Some(timer)
    }
}
