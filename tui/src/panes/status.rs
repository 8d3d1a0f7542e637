//! Status Bar Renderer

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::compositor::Surface;
use crate::draw::{self, DrawResultExt};
use crate::layout::ActivePane;
use crate::theme::{ColorName, Palette};

/// Columns kept free around the status text
const MARGIN: usize = 2;

const ELLIPSIS: &str = "...";

/// Values shown in the status bar; absent or false fields are skipped
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusFields {
    /// Focused pane while split view is on
    pub split: Option<ActivePane>,
    /// Active context name
    pub context: Option<String>,
    pub connected: bool,
    pub server: Option<String>,
    pub nick: Option<String>,
}

/// Build the status line for a pane `width` columns wide
///
/// Tokens appear in a fixed order: split, context, connection, server,
/// nick. The result never exceeds `width` terminal columns.
pub fn compose_status_line(fields: &StatusFields, width: usize) -> String {
    let mut tokens: Vec<String> = Vec::new();
    if let Some(pane) = fields.split {
        tokens.push(format!("[Split: {pane}]"));
    }
    if let Some(context) = fields.context.as_deref().filter(|c| !c.is_empty()) {
        tokens.push(format!("[{context}]"));
    }
    if fields.connected {
        tokens.push("[Connected]".to_string());
    }
    if let Some(server) = fields.server.as_deref().filter(|s| !s.is_empty()) {
        tokens.push(format!("[{server}]"));
    }
    if let Some(nick) = fields.nick.as_deref().filter(|n| !n.is_empty()) {
        tokens.push(format!("[{nick}]"));
    }

    let line = tokens.join(" ");
    let limit = width.saturating_sub(MARGIN);
    if line.width() <= limit {
        return line;
    }

    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut truncated = take_columns(&line, keep);
    truncated.push_str(ELLIPSIS);
    take_columns(&truncated, width)
}

/// Longest prefix of `text` that fits in `columns` terminal cells
fn take_columns(text: &str, columns: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= columns
        })
        .collect()
}

/// Paint the status bar
pub fn paint(surface: Option<&mut Surface>, palette: &Palette, fields: &StatusFields) {
    let Some(surface) = surface else {
        tracing::trace!("status bar has no surface");
        return;
    };
    let width = match draw::live_bounds(surface) {
        Ok((_, width)) => width,
        Err(e) => {
            tracing::warn!(error = %e, "status bar bounds unavailable");
            return;
        }
    };

    let line = compose_status_line(fields, usize::from(width));
    draw::erase(Some(&mut *surface)).log_failure("erase status");
    draw::write_text(Some(surface), 0, 1, &line, palette.get_color(ColorName::StatusBar))
        .log_failure("write status");
}
