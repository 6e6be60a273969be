//! Mutable animation state shared by the state machine and the overlay.

use std::time::Instant;

/// Symbolic pose of the cat sprite.
///
/// The overlay resolves a pose to a drawable sprite; `Hidden` resolves to
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pose {
    /// Nothing is drawn.
    #[default]
    Hidden,
    /// Right paw striking.
    Right,
    /// Left paw striking.
    Left,
    /// Both paws resting (settled after typing stopped).
    Middle,
    /// Burst effect frame (sustained rapid typing payoff).
    Burst,
}

impl Pose {
    /// Get a human-readable name for the pose.
    pub fn name(&self) -> &'static str {
        match self {
            Pose::Hidden => "hidden",
            Pose::Right => "right",
            Pose::Left => "left",
            Pose::Middle => "middle",
            Pose::Burst => "burst",
        }
    }
}

/// A single keystroke, translated by the host into overlay cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionEvent {
    /// Cursor column (0-based terminal cell).
    pub x: u16,
    /// Cursor row (0-based terminal cell).
    pub y: u16,
    /// Monotonic timestamp supplied by the host.
    pub at: Instant,
}

impl PositionEvent {
    /// Create an event at the given cell and timestamp.
    pub fn new(x: u16, y: u16, at: Instant) -> Self {
        Self { x, y, at }
    }

    /// The (x, y) cell of this event.
    pub fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }
}

/// Live burst effect record. Present only while the effect is playing.
#[derive(Debug, Clone)]
pub struct BurstState {
    /// When the effect started.
    pub started_at: Instant,
    /// Current sprite scale (>= 1.0).
    pub scale: f32,
    /// Current sprite opacity (0.0-1.0).
    pub opacity: f32,
    /// Keystrokes that arrived while the effect was playing, in arrival
    /// order. Replayed as a fresh typing sequence when the effect ends.
    pub queued: Vec<PositionEvent>,
}

impl BurstState {
    /// Fresh burst record at full scale and opacity.
    pub fn new(started_at: Instant) -> Self {
        Self {
            started_at,
            scale: 1.0,
            opacity: 1.0,
            queued: Vec::new(),
        }
    }
}

/// The single mutable record owned by the `Animator` and read by the
/// overlay renderer.
///
/// Invariants maintained by the machine:
/// - `burst` is `Some` iff `pose == Pose::Burst`.
/// - While `burst` is `Some`, `last_event_at` and `consecutive_count` are
///   frozen; only `burst.queued` grows.
/// - `anchor` always reflects the most recent event's position, whether
///   the event was accepted or queued.
#[derive(Debug, Default)]
pub struct AnimatorState {
    /// Current pose selecting the sprite to draw.
    pub pose: Pose,
    /// Last known cursor cell, the point the sprite is anchored above.
    pub anchor: (u16, u16),
    /// Which hand struck last; persists across idle gaps so alternation
    /// resumes correctly.
    pub last_hand_was_right: bool,
    /// Timestamp of the most recently accepted (non-queued) event.
    pub last_event_at: Option<Instant>,
    /// Events accepted within the rapid window since the last settle.
    pub consecutive_count: u32,
    /// Burst effect record, present only while the effect is playing.
    pub burst: Option<BurstState>,
}

impl AnimatorState {
    /// Whether the burst effect is currently playing.
    pub fn burst_active(&self) -> bool {
        self.burst.is_some()
    }
}
