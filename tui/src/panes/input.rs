//! Input Line Renderer
//!
//! The input line is a prompt followed by a one-row viewport onto the edit
//! buffer. When the buffer is wider than the viewport, the tail is shown
//! behind a leading ellipsis and the cursor index is remapped into the
//! visible text.

use unicode_width::UnicodeWidthChar;

use crate::compositor::Surface;
use crate::draw::{self, DrawResultExt};
use crate::theme::{ColorName, Palette};

/// Prompt drawn at the left edge
pub const PROMPT: &str = "> ";

/// Columns taken by the prompt
pub const PROMPT_WIDTH: usize = 2;

/// Marks a buffer whose start is scrolled off
const ELLIPSIS: char = '…';

/// The visible part of the input buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputView {
    /// Text drawn after the prompt
    pub text: String,
    /// Cursor position within `text`, in characters
    pub cursor: usize,
    /// Terminal column of the cursor (prompt included)
    pub column: u16,
}

/// Fit `buffer` into a line `width` columns wide and remap `cursor`
///
/// `cursor` is a character index; fitting and the cursor column are measured
/// in terminal cells, so double-width characters take two columns.
pub fn map_input_view(buffer: &str, cursor: usize, width: u16) -> InputView {
    let chars: Vec<char> = buffer.chars().collect();
    let cursor = cursor.min(chars.len());
    // One column stays free for the cursor past the last character
    let available = usize::from(width).saturating_sub(PROMPT_WIDTH + 1);

    let (text, mapped, cursor_cols) = if cells(&chars) <= available {
        (buffer.to_string(), cursor, cells(&chars[..cursor]))
    } else if available == 0 {
        (String::new(), 0, 0)
    } else {
        // Longest tail that fits beside the ellipsis
        let budget = available - ELLIPSIS.width().unwrap_or(1);
        let mut used = 0;
        let mut trimmed = chars.len();
        while trimmed > 0 {
            let w = char_cells(chars[trimmed - 1]);
            if used + w > budget {
                break;
            }
            used += w;
            trimmed -= 1;
        }

        let mut text = String::with_capacity(buffer.len() + ELLIPSIS.len_utf8());
        text.push(ELLIPSIS);
        text.extend(&chars[trimmed..]);
        if cursor < trimmed {
            (text, 0, 0)
        } else {
            let cols = ELLIPSIS.width().unwrap_or(1) + cells(&chars[trimmed..cursor]);
            (text, cursor - trimmed + 1, cols)
        }
    };

    let last_col = usize::from(width.saturating_sub(1));
    let column = (PROMPT_WIDTH + cursor_cols).min(last_col) as u16;
    InputView {
        text,
        cursor: mapped,
        column,
    }
}

fn char_cells(c: char) -> usize {
    c.width().unwrap_or(0)
}

fn cells(chars: &[char]) -> usize {
    chars.iter().copied().map(char_cells).sum()
}

/// Paint the input line and place the cursor
pub fn paint(surface: Option<&mut Surface>, palette: &Palette, buffer: &str, cursor: usize) {
    let Some(surface) = surface else {
        tracing::trace!("input line has no surface");
        return;
    };
    let width = match draw::live_bounds(surface) {
        Ok((_, width)) => width,
        Err(e) => {
            tracing::warn!(error = %e, "input line bounds unavailable");
            return;
        }
    };

    let view = map_input_view(buffer, cursor, width);
    draw::erase(Some(&mut *surface)).log_failure("erase input");
    draw::write_text(Some(&mut *surface), 0, 0, PROMPT, palette.get_color(ColorName::Prompt))
        .log_failure("write prompt");
    if !view.text.is_empty() {
        draw::write_text(
            Some(&mut *surface),
            0,
            PROMPT_WIDTH as u16,
            &view.text,
            palette.get_color(ColorName::Input),
        )
        .log_failure("write input");
    }
    draw::move_cursor(Some(surface), 0, view.column).log_failure("move cursor");
}
