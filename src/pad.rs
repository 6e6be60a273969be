//! Scratch typing surface hosted in the terminal.
//!
//! A minimal append-style text buffer: characters go to the end of the
//! last line, long lines wrap, old lines scroll off the top. Its only
//! job is to give the user something to type into and to supply the
//! cursor cell the cat sprite is anchored above.

use std::io::{self, Write};

/// First text row; row 0 holds the status line.
const TEXT_TOP: u16 = 1;

/// The scratch buffer plus the terminal geometry it is rendered into.
#[derive(Debug)]
pub struct TypingPad {
    lines: Vec<String>,
    cols: u16,
    rows: u16,
}

impl TypingPad {
    /// Create an empty pad for a terminal of the given size.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            lines: vec![String::new()],
            cols: cols.max(1),
            rows: rows.max(2),
        }
    }

    /// Track a terminal resize.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(2);
    }

    fn text_width(&self) -> usize {
        self.cols as usize
    }

    fn visible_rows(&self) -> usize {
        (self.rows - TEXT_TOP) as usize
    }

    /// Append a printable character, wrapping at the right edge.
    pub fn insert_char(&mut self, c: char) {
        let width = self.text_width();
        match self.lines.last_mut() {
            Some(last) if last.chars().count() < width => last.push(c),
            _ => self.lines.push(c.to_string()),
        }
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        match self.lines.last_mut() {
            Some(last) if !last.is_empty() => {
                last.pop();
            }
            _ => {
                if self.lines.len() > 1 {
                    self.lines.pop();
                }
            }
        }
    }

    /// Start a new line.
    pub fn newline(&mut self) {
        self.lines.push(String::new());
    }

    /// Current cursor cell in screen coordinates (0-based).
    ///
    /// This is the anchor the animator receives with every keystroke.
    pub fn cursor_position(&self) -> (u16, u16) {
        let visible = self.visible_rows();
        let skipped = self.lines.len().saturating_sub(visible);
        let row = self.lines.len() - 1 - skipped;
        let col = self
            .lines
            .last()
            .map(|l| l.chars().count())
            .unwrap_or(0)
            .min(self.text_width().saturating_sub(1));
        (col as u16, TEXT_TOP + row as u16)
    }

    /// Repaint the whole pad: status line, visible text, cursor.
    pub fn render(&self, out: &mut impl Write, cat_enabled: bool) -> io::Result<()> {
        let mut output = String::new();
        output.push_str("\x1b[2J"); // Clear screen
        output.push_str("\x1b[H"); // Home

        // Dim status line
        output.push_str("\x1b[2m");
        output.push_str(&self.status_text(cat_enabled));
        output.push_str("\x1b[0m");

        let visible = self.visible_rows();
        let skipped = self.lines.len().saturating_sub(visible);
        for (row, line) in self.lines.iter().skip(skipped).enumerate() {
            output.push_str(&format!("\x1b[{};1H", TEXT_TOP as usize + row + 1));
            output.push_str(line);
        }

        let (cx, cy) = self.cursor_position();
        output.push_str(&format!("\x1b[{};{}H", cy + 1, cx + 1));

        out.write_all(output.as_bytes())?;
        out.flush()
    }

    /// Status line text: " typing-cat | cat:on | Alt+C toggle | Esc quit "
    fn status_text(&self, cat_enabled: bool) -> String {
        format!(
            " typing-cat | {} | Alt+C toggle | Esc quit ",
            if cat_enabled { "cat:on" } else { "cat:off" },
        )
    }
}
