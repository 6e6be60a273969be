//! Cursor-anchored overlay rendering for the cat sprite.
//!
//! Draws on top of whatever the typing pad last painted, using ANSI
//! escape codes so the underlying screen content is not disturbed:
//! save cursor, hide cursor, position and paint each sprite row, restore.
//! The host repaints the pad beneath before every overlay draw, so stale
//! overlay cells are cleared by the full repaint.

use std::io::{self, Write};
use std::time::Instant;

use rand::Rng;
use ratatui::layout::Rect;

use crate::animator::{Animator, BurstPhase, Pose};
use crate::sprites::{Sprite, SpriteSet};

/// Rows between the sprite's bottom edge and the anchor cell, so the
/// sprite never occludes the insertion point.
pub const ANCHOR_GAP_ROWS: u16 = 1;

/// Fallback box dimensions when a sprite failed to load.
const FALLBACK_COLS: u16 = 9;
const FALLBACK_ROWS: u16 = 4;

/// Jitter amplitude (cells) during the burst shake phase.
const SHAKE_AMPLITUDE: i32 = 1;

/// Map opacity onto the xterm-256 grayscale ramp (232 darkest, 255
/// brightest). Returns `None` when the sprite is fully faded out.
pub fn fade_color(opacity: f32) -> Option<u8> {
    if opacity <= 0.0 {
        return None;
    }
    let step = (opacity.clamp(0.0, 1.0) * 23.0).round() as u8;
    Some(232 + step)
}

/// Compute the cell rect the sprite occupies.
///
/// The unscaled sprite sits horizontally centered on the anchor column
/// with its bottom edge `ANCHOR_GAP_ROWS` above the anchor row; scaling
/// grows the rect around that rect's center. The result is clamped to
/// the terminal bounds.
pub fn overlay_rect(
    anchor: (u16, u16),
    scale: f32,
    sprite_w: u16,
    sprite_h: u16,
    term: Rect,
) -> Rect {
    let scaled_w = ((sprite_w as f32 * scale).round() as i32).max(1);
    let scaled_h = ((sprite_h as f32 * scale).round() as i32).max(1);

    let center_x = anchor.0 as i32;
    // Center of the unscaled sprite box above the anchor
    let base_top = anchor.1 as i32 - (ANCHOR_GAP_ROWS + sprite_h) as i32;
    let center_y = base_top + sprite_h as i32 / 2;

    let width = scaled_w.min(term.width as i32).max(1) as u16;
    let height = scaled_h.min(term.height as i32).max(1) as u16;

    let max_x = term.width.saturating_sub(width) as i32;
    let max_y = term.height.saturating_sub(height) as i32;
    let x = (center_x - scaled_w / 2).clamp(0, max_x.max(0)) as u16;
    let y = (center_y - scaled_h / 2).clamp(0, max_y.max(0)) as u16;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Scale sprite lines to the target cell size by nearest-neighbor
/// sampling.
pub fn scale_lines(sprite: &Sprite, target_w: u16, target_h: u16) -> Vec<String> {
    if target_w == sprite.width() && target_h == sprite.height() {
        return sprite.lines().to_vec();
    }

    let source: Vec<Vec<char>> = sprite
        .lines()
        .iter()
        .map(|line| line.chars().collect())
        .collect();

    (0..target_h)
        .map(|row| {
            let src_row = (row as usize * sprite.height() as usize) / target_h as usize;
            (0..target_w)
                .map(|col| {
                    let src_col = (col as usize * sprite.width() as usize) / target_w as usize;
                    source[src_row][src_col]
                })
                .collect()
        })
        .collect()
}

/// Shift a rect by a jitter offset, keeping it inside the terminal.
fn jitter_rect(rect: Rect, term: Rect, dx: i32, dy: i32) -> Rect {
    let max_x = term.width.saturating_sub(rect.width) as i32;
    let max_y = term.height.saturating_sub(rect.height) as i32;
    Rect {
        x: (rect.x as i32 + dx).clamp(0, max_x.max(0)) as u16,
        y: (rect.y as i32 + dy).clamp(0, max_y.max(0)) as u16,
        ..rect
    }
}

/// Draw the overlay for the current animation state.
///
/// Resolves the pose through the sprite catalog; a missing sprite
/// degrades to a filled neutral box at the same rect and opacity rather
/// than failing the paint path. During the shake phase a bounded random
/// offset is applied per draw.
pub fn render_overlay(
    out: &mut impl Write,
    animator: &Animator,
    sprites: &SpriteSet,
    term_cols: u16,
    term_rows: u16,
    now: Instant,
) -> io::Result<()> {
    let state = animator.state();
    if state.pose == Pose::Hidden {
        return Ok(());
    }

    let (scale, opacity) = state
        .burst
        .as_ref()
        .map(|burst| (burst.scale, burst.opacity))
        .unwrap_or((1.0, 1.0));

    let Some(color) = fade_color(opacity) else {
        // Fully faded; nothing to draw
        return Ok(());
    };

    let term = Rect {
        x: 0,
        y: 0,
        width: term_cols,
        height: term_rows,
    };

    let (mut rect, lines) = match sprites.get(state.pose) {
        Some(sprite) => {
            let rect = overlay_rect(state.anchor, scale, sprite.width(), sprite.height(), term);
            let lines = scale_lines(sprite, rect.width, rect.height);
            (rect, lines)
        }
        None => {
            // Fallback box for a missing frame
            let rect = overlay_rect(state.anchor, scale, FALLBACK_COLS, FALLBACK_ROWS, term);
            let row = "█".repeat(rect.width as usize);
            (rect, vec![row; rect.height as usize])
        }
    };

    if matches!(animator.burst_phase(now), Some(BurstPhase::Shake)) {
        let mut rng = rand::rng();
        let dx = rng.random_range(-SHAKE_AMPLITUDE..=SHAKE_AMPLITUDE);
        let dy = rng.random_range(-SHAKE_AMPLITUDE..=SHAKE_AMPLITUDE);
        rect = jitter_rect(rect, term, dx, dy);
    }

    let mut output = String::new();
    output.push_str("\x1b7"); // Save cursor (DEC)
    output.push_str("\x1b[?25l"); // Hide cursor
    output.push_str(&format!("\x1b[38;5;{}m", color));

    for (row, line) in lines.iter().enumerate() {
        let y = rect.y as usize + row + 1; // 1-based
        let x = rect.x as usize + 1;
        output.push_str(&format!("\x1b[{};{}H", y, x));
        output.push_str(line);
    }

    output.push_str("\x1b[0m"); // Reset attributes
    output.push_str("\x1b[?25h"); // Show cursor
    output.push_str("\x1b8"); // Restore cursor (DEC)

    out.write_all(output.as_bytes())?;
    out.flush()?;

    Ok(())
}
