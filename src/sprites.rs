//! Cat sprite frames and the pose -> sprite catalog.
//!
//! Frames are hand-drawn ASCII art kept as static tables. They are parsed
//! and validated once at startup; a frame that fails validation is logged
//! and dropped, and the overlay falls back to a plain filled box for that
//! pose instead of crashing the paint path.

use crate::animator::Pose;

/// Right paw striking (left paw raised).
pub const CAT_RIGHT_ART: &str = "   /\\_/\\
 o( o.o )
   |   |
  (     )
  _|___w_";

/// Left paw striking (right paw raised).
pub const CAT_LEFT_ART: &str = "   /\\_/\\
  ( o.o )o
   |   |
  (     )
  _w___|_";

/// Both paws resting.
pub const CAT_MIDDLE_ART: &str = "   /\\_/\\
  ( -.- )
   |   |
  (     )
  _w___w_";

/// Burst frame: both paws up.
pub const CAT_BURST_ART: &str = " * /\\_/\\ *
 \\( O.O )/
   |   |
  (     )
  _|___|_";

/// Errors raised while parsing a sprite frame.
#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    /// The frame contains no visible cells.
    #[error("sprite '{0}' has no visible cells")]
    Empty(&'static str),
    /// The frame is taller or wider than a terminal cell grid can hold.
    #[error("sprite '{name}' is too large ({width}x{height})")]
    TooLarge {
        name: &'static str,
        width: usize,
        height: usize,
    },
}

/// One drawable frame: rectangular lines plus cell dimensions.
#[derive(Debug, Clone)]
pub struct Sprite {
    name: &'static str,
    lines: Vec<String>,
    width: u16,
    height: u16,
}

impl Sprite {
    /// Largest sprite edge we accept, in cells.
    const MAX_EDGE: usize = 64;

    /// Parse an art string into a rectangular sprite.
    ///
    /// Lines are right-padded to the width of the longest line so every
    /// row has the same cell count.
    pub fn from_art(name: &'static str, art: &str) -> Result<Self, SpriteError> {
        let raw: Vec<&str> = art.lines().collect();
        let width = raw.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        if width == 0 || raw.iter().all(|l| l.trim().is_empty()) {
            return Err(SpriteError::Empty(name));
        }
        if width > Self::MAX_EDGE || raw.len() > Self::MAX_EDGE {
            return Err(SpriteError::TooLarge {
                name,
                width,
                height: raw.len(),
            });
        }

        let lines = raw
            .iter()
            .map(|l| {
                let mut line = (*l).to_string();
                let pad = width - l.chars().count();
                line.extend(std::iter::repeat(' ').take(pad));
                line
            })
            .collect::<Vec<_>>();

        Ok(Self {
            name,
            width: width as u16,
            height: lines.len() as u16,
            lines,
        })
    }

    /// Sprite name, for logging.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Width in cells.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The padded frame lines, all `width()` cells wide.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// The pose -> sprite catalog consumed by the overlay renderer.
///
/// Missing frames resolve to `None`; the renderer draws its fallback box
/// for those poses rather than failing.
#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    right: Option<Sprite>,
    left: Option<Sprite>,
    middle: Option<Sprite>,
    burst: Option<Sprite>,
}

impl SpriteSet {
    /// Load the built-in cat frames.
    pub fn builtin() -> Self {
        Self {
            right: load("cat-right", CAT_RIGHT_ART),
            left: load("cat-left", CAT_LEFT_ART),
            middle: load("cat-middle", CAT_MIDDLE_ART),
            burst: load("cat-burst", CAT_BURST_ART),
        }
    }

    /// Resolve a pose to a sprite. `Hidden` draws nothing.
    pub fn get(&self, pose: Pose) -> Option<&Sprite> {
        match pose {
            Pose::Hidden => None,
            Pose::Right => self.right.as_ref(),
            Pose::Left => self.left.as_ref(),
            Pose::Middle => self.middle.as_ref(),
            Pose::Burst => self.burst.as_ref(),
        }
    }
}

fn load(name: &'static str, art: &str) -> Option<Sprite> {
    match Sprite::from_art(name, art) {
        Ok(sprite) => Some(sprite),
        Err(e) => {
            log::warn!("failed to load sprite: {}", e);
            None
        }
    }
}
