//! Async event loop wiring keystrokes, animator timers, and repaints.
//!
//! Single-threaded cooperative dispatch: one `tokio::select!` loop owns
//! both input events and timer deadlines, so every state transition runs
//! on the same logical queue and the animator needs no locking. The loop
//! coalesces repaint requests: however many mutations an iteration
//! performs, the screen is painted at most once before the next await.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use std::time::Instant;

use crate::animator::{Animator, PositionEvent};
use crate::overlay::render_overlay;
use crate::pad::TypingPad;
use crate::sprites::SpriteSet;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Leave the event loop.
    Quit,
    /// Toggle whether the cat reacts to keystrokes.
    ToggleCat,
    /// The key mutated the typing pad.
    Typed,
    /// No action needed.
    Ignored,
}

/// Handle a key event, checking hotkeys first.
///
/// Hotkeys intercepted (never reach the pad):
/// - Esc / Ctrl+C / Ctrl+D: quit
/// - Alt+C: toggle the cat
pub fn handle_key_event(event: KeyEvent, pad: &mut TypingPad) -> KeyAction {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    // Ignore key releases (some platforms report both edges)
    if kind == KeyEventKind::Release {
        return KeyAction::Ignored;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('d') => KeyAction::Quit,
            _ => KeyAction::Ignored,
        };
    }

    if modifiers.contains(KeyModifiers::ALT) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('C') => KeyAction::ToggleCat,
            _ => KeyAction::Ignored,
        };
    }

    match code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char(c) => {
            pad.insert_char(c);
            KeyAction::Typed
        }
        KeyCode::Enter => {
            pad.newline();
            KeyAction::Typed
        }
        KeyCode::Backspace => {
            pad.backspace();
            KeyAction::Typed
        }
        KeyCode::Tab => {
            for _ in 0..4 {
                pad.insert_char(' ');
            }
            KeyAction::Typed
        }
        _ => KeyAction::Ignored,
    }
}

/// Sleep until the animator's next timer deadline, or forever when no
/// timer is armed.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => futures::future::pending::<()>().await,
    }
}

/// Run the typing surface until the user quits.
///
/// The `enabled` flag gates dispatch to the animator only; the pad
/// always accepts the keystroke, and an effect already playing runs its
/// timers to completion after a toggle-off.
pub async fn run(
    animator: &mut Animator,
    sprites: &SpriteSet,
    pad: &mut TypingPad,
    start_enabled: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut stdout = std::io::stdout();
    let mut event_stream = EventStream::new();
    let mut enabled = start_enabled;
    let mut needs_repaint = true;

    let (mut term_cols, mut term_rows) = crossterm::terminal::size().unwrap_or((80, 24));

    loop {
        if needs_repaint {
            pad.render(&mut stdout, enabled)?;
            render_overlay(
                &mut stdout,
                animator,
                sprites,
                term_cols,
                term_rows,
                Instant::now(),
            )?;
            needs_repaint = false;
        }

        let deadline = animator.next_deadline();

        tokio::select! {
            // Terminal events: keystrokes and resizes
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(event)) => match event {
                        Event::Key(key_event) => match handle_key_event(key_event, pad) {
                            KeyAction::Quit => break,
                            KeyAction::ToggleCat => {
                                enabled = !enabled;
                                log::info!(
                                    "cat {}",
                                    if enabled { "enabled" } else { "disabled" }
                                );
                                needs_repaint = true;
                            }
                            KeyAction::Typed => {
                                needs_repaint = true;
                                if enabled {
                                    let (x, y) = pad.cursor_position();
                                    animator
                                        .on_keystroke(PositionEvent::new(x, y, Instant::now()));
                                }
                            }
                            KeyAction::Ignored => {}
                        },
                        Event::Resize(cols, rows) => {
                            term_cols = cols;
                            term_rows = rows;
                            pad.resize(cols, rows);
                            needs_repaint = true;
                        }
                        _ => {
                            // Ignore other events (mouse, focus, paste)
                        }
                    },
                    Some(Err(e)) => {
                        return Err(Box::new(e));
                    }
                    None => {
                        // Event stream ended - shouldn't happen normally
                        break;
                    }
                }
            }

            // Animator timers: settle, hide, effect ticks
            _ = sleep_until_deadline(deadline) => {
                let now = Instant::now();
                while let Some(timer) = animator.poll_timer(now) {
                    log::debug!("timer fired: {}", timer.name());
                    if animator.on_timer(timer, now) {
                        needs_repaint = true;
                    }
                }
            }
        }
    }

    animator.shutdown();
    Ok(())
}
