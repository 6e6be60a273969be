//! Timing constants for the typing animation and burst effect.

use std::time::Duration;

/// All delays, windows, and effect constants in one place.
///
/// Defaults match the stock animation; every field can be overridden from
/// the config file or CLI. `hide_delay` must exceed `settle_delay` so the
/// idle sequence is always striking -> middle -> hidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timings {
    /// Two keystrokes closer together than this count as rapid typing.
    pub rapid_window: Duration,
    /// Idle time before the cat settles to the middle pose.
    pub settle_delay: Duration,
    /// Idle time before the cat is hidden entirely.
    pub hide_delay: Duration,
    /// Rapid keystrokes needed (at a settle decision) to trigger a burst.
    pub burst_threshold: u32,
    /// Interval of the repeating burst effect ticker.
    pub effect_tick: Duration,
    /// Duration of the burst shake phase.
    pub shake_duration: Duration,
    /// Duration of the burst grow-and-fade phase.
    pub grow_fade_duration: Duration,
    /// Sprite scale reached at the end of the grow-and-fade phase.
    pub max_scale: f32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            rapid_window: Duration::from_millis(500),
            settle_delay: Duration::from_millis(500),
            hide_delay: Duration::from_millis(1000),
            burst_threshold: 20,
            effect_tick: Duration::from_millis(25),
            shake_duration: Duration::from_millis(300),
            grow_fade_duration: Duration::from_millis(1200),
            max_scale: 2.0,
        }
    }
}

impl Timings {
    /// Total length of the burst effect timeline.
    pub fn burst_duration(&self) -> Duration {
        self.shake_duration + self.grow_fade_duration
    }
}
