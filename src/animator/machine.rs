//! Typing state machine: hand alternation, idle decay, burst detection.

use std::time::Instant;

use super::scheduler::{Scheduler, Timer};
use super::state::{AnimatorState, Pose, PositionEvent};
use super::timings::Timings;

/// The animation state machine for one host surface.
///
/// Owns the [`AnimatorState`] and the [`Scheduler`]; the host feeds it
/// keystrokes and due timers, and repaints whenever an operation returns
/// `true`. All operations take timestamps as parameters so behavior is
/// deterministic under scheduling jitter.
#[derive(Debug)]
pub struct Animator {
    state: AnimatorState,
    scheduler: Scheduler,
    timings: Timings,
}

impl Animator {
    /// Create an animator for a fresh surface. Nothing is drawn until the
    /// first keystroke arrives.
    pub fn new(timings: Timings) -> Self {
        Self {
            state: AnimatorState::default(),
            scheduler: Scheduler::new(),
            timings,
        }
    }

    /// Current animation state, for the overlay renderer.
    pub fn state(&self) -> &AnimatorState {
        &self.state
    }

    /// Timing constants this animator runs with.
    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Earliest pending timer deadline, for the host's sleep.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Take the next due timer at `now`, if any. Feed the result to
    /// [`Animator::on_timer`]; call in a loop to drain everything due.
    pub fn poll_timer(&mut self, now: Instant) -> Option<Timer> {
        self.scheduler.poll(now)
    }

    /// Handle one keystroke. Returns true when the overlay must repaint.
    ///
    /// While the burst effect is playing the event is queued: the anchor
    /// still moves (so a mid-effect redraw originates from the current
    /// cursor), but timers, counters, and the pose are untouched.
    pub fn on_keystroke(&mut self, event: PositionEvent) -> bool {
        self.state.anchor = event.position();

        if let Some(burst) = self.state.burst.as_mut() {
            burst.queued.push(event);
            log::debug!(
                "keystroke queued during burst ({} pending)",
                burst.queued.len()
            );
            return false;
        }

        // A new event supersedes any pending idle decision. Cancel before
        // recomputing so a stale transition can't fire over the new state.
        self.scheduler.cancel(Timer::Settle);
        self.scheduler.cancel(Timer::Hide);

        // Rapid-window check uses the event's own timestamp. A timestamp
        // that went backwards clamps to not-rapid rather than erroring: a
        // malformed event must not corrupt the ongoing animation.
        let is_rapid = match self.state.last_event_at {
            Some(prev) => event
                .at
                .checked_duration_since(prev)
                .map(|gap| gap < self.timings.rapid_window)
                .unwrap_or(false),
            None => false,
        };

        if is_rapid {
            self.state.consecutive_count += 1;
            self.state.pose = if self.state.last_hand_was_right {
                Pose::Left
            } else {
                Pose::Right
            };
            self.state.last_hand_was_right = !self.state.last_hand_was_right;
        } else {
            // First event, or typing resumed after a gap: always lead with
            // the right paw.
            self.state.consecutive_count = 1;
            self.state.pose = Pose::Right;
            self.state.last_hand_was_right = true;
        }
        self.state.last_event_at = Some(event.at);

        self.scheduler
            .after(Timer::Settle, self.timings.settle_delay, event.at);
        self.scheduler
            .after(Timer::Hide, self.timings.hide_delay, event.at);

        true
    }

    /// Handle a due timer. Returns true when the overlay must repaint.
    pub fn on_timer(&mut self, timer: Timer, now: Instant) -> bool {
        match timer {
            Timer::Settle => self.on_settle(now),
            Timer::Hide => self.on_hide(),
            Timer::EffectTick => self.on_effect_tick(now),
        }
    }

    /// Settle callback: no input arrived for `settle_delay`.
    ///
    /// Enters the burst effect when the rapid streak reached the
    /// threshold, otherwise drops to the middle pose. The streak counter
    /// resets in both branches so a burst can't immediately retrigger
    /// from residual count.
    fn on_settle(&mut self, now: Instant) -> bool {
        let streak = self.state.consecutive_count;
        self.state.consecutive_count = 0;

        if streak >= self.timings.burst_threshold {
            log::debug!("settle with streak {}: entering burst", streak);
            self.start_burst(now)
        } else {
            log::debug!("settle with streak {}: middle pose", streak);
            self.state.pose = Pose::Middle;
            true
        }
    }

    /// Hide callback: no input arrived for `hide_delay`.
    fn on_hide(&mut self) -> bool {
        log::debug!("idle hide");
        self.state.pose = Pose::Hidden;
        true
    }

    /// Tear down this animator: cancel every timer and hide the sprite.
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
        self.state.burst = None;
        self.state.pose = Pose::Hidden;
        log::info!("animator shut down");
    }

    pub(super) fn state_mut(&mut self) -> &mut AnimatorState {
        &mut self.state
    }

    pub(super) fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    #[cfg(test)]
    pub(super) fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}
