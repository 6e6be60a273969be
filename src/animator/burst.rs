//! Burst effect player: shake, grow-and-fade, and queued-input replay.
//!
//! Entered only from a settle decision when the rapid streak reached the
//! threshold. The timeline is fixed and non-interruptible; keystrokes that
//! arrive while it plays are queued by the state machine and replayed as a
//! fresh typing sequence the instant the effect concludes.

use std::time::{Duration, Instant};

use super::machine::Animator;
use super::scheduler::Timer;
use super::state::{BurstState, Pose};
use super::timings::Timings;

/// Phase of the burst effect at a given elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstPhase {
    /// Sprite shakes in place at full scale and opacity.
    Shake,
    /// Sprite grows toward `max_scale` while fading out.
    GrowFade,
    /// Timeline exhausted; the player resolves queued input and exits.
    Done,
}

/// Phase of the effect timeline at `elapsed`.
pub fn phase_at(timings: &Timings, elapsed: Duration) -> BurstPhase {
    if elapsed < timings.shake_duration {
        BurstPhase::Shake
    } else if elapsed < timings.burst_duration() {
        BurstPhase::GrowFade
    } else {
        BurstPhase::Done
    }
}

/// Grow-fade progress in [0, 1]; zero through the whole shake phase.
fn progress_at(timings: &Timings, elapsed: Duration) -> f32 {
    if elapsed <= timings.shake_duration {
        return 0.0;
    }
    let into_fade = elapsed - timings.shake_duration;
    (into_fade.as_secs_f32() / timings.grow_fade_duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// Sprite scale at `elapsed`: 1.0 through the shake phase, then linear up
/// to `max_scale` at the end of the grow-fade phase.
pub fn scale_at(timings: &Timings, elapsed: Duration) -> f32 {
    1.0 + (timings.max_scale - 1.0) * progress_at(timings, elapsed)
}

/// Sprite opacity at `elapsed`: 1.0 through the shake phase, then linear
/// down to 0.0 at the end of the grow-fade phase.
pub fn opacity_at(timings: &Timings, elapsed: Duration) -> f32 {
    1.0 - progress_at(timings, elapsed)
}

impl Animator {
    /// Phase of the playing burst effect at `now`, if one is playing.
    ///
    /// The overlay uses this to decide when to apply shake jitter; jitter
    /// itself is a rendering concern and never part of the state.
    pub fn burst_phase(&self, now: Instant) -> Option<BurstPhase> {
        self.state().burst.as_ref().map(|burst| {
            phase_at(
                self.timings(),
                now.saturating_duration_since(burst.started_at),
            )
        })
    }

    /// Enter the burst effect at `now`.
    ///
    /// Cancels the idle timers (the hide timer is still live at this
    /// point), swaps the pose to `Burst`, and starts the repeating effect
    /// ticker. Returns true: the entry frame must be painted.
    pub(super) fn start_burst(&mut self, now: Instant) -> bool {
        self.scheduler_mut().cancel(Timer::Settle);
        self.scheduler_mut().cancel(Timer::Hide);

        let tick = self.timings().effect_tick;
        self.scheduler_mut().every(Timer::EffectTick, tick, now);

        let state = self.state_mut();
        state.pose = Pose::Burst;
        state.burst = Some(BurstState::new(now));
        log::info!("burst effect started");
        true
    }

    /// One tick of the repeating effect timer.
    ///
    /// Updates scale/opacity for the current phase, or, once the
    /// timeline is exhausted, stops the ticker and resumes from queued
    /// input. Every tick repaints so the overlay tracks the current
    /// scale and opacity.
    pub(super) fn on_effect_tick(&mut self, now: Instant) -> bool {
        let elapsed = match self.state().burst.as_ref() {
            Some(burst) => now.saturating_duration_since(burst.started_at),
            None => {
                // Stale tick; the record is gone, so stop the ticker.
                self.scheduler_mut().cancel(Timer::EffectTick);
                return false;
            }
        };

        let timings = *self.timings();
        match phase_at(&timings, elapsed) {
            BurstPhase::Shake | BurstPhase::GrowFade => {
                if let Some(burst) = self.state_mut().burst.as_mut() {
                    burst.scale = scale_at(&timings, elapsed);
                    burst.opacity = opacity_at(&timings, elapsed);
                }
                true
            }
            BurstPhase::Done => self.finish_burst(now),
        }
    }

    /// Completion branch: stop the ticker, then either replay the queued
    /// keystrokes as a resumed typing sequence or hide.
    fn finish_burst(&mut self, now: Instant) -> bool {
        self.scheduler_mut().cancel(Timer::EffectTick);

        let queued = match self.state_mut().burst.take() {
            Some(burst) => burst.queued,
            None => Vec::new(),
        };

        if let Some(last) = queued.last().copied() {
            log::debug!("burst finished, resuming {} queued keystrokes", queued.len());
            let state = self.state_mut();
            state.consecutive_count = queued.len() as u32;
            state.last_event_at = Some(now);
            state.anchor = last.position();
            state.pose = Pose::Right;
            state.last_hand_was_right = true;

            let (settle, hide) = (self.timings().settle_delay, self.timings().hide_delay);
            self.scheduler_mut().after(Timer::Settle, settle, now);
            self.scheduler_mut().after(Timer::Hide, hide, now);
        } else {
            log::debug!("burst finished with no queued input");
            self.state_mut().pose = Pose::Hidden;
        }
        true
    }
}
