//! Safe Drawing Primitives
//!
//! Every screen-mutating call the renderers make goes through this module.
//! Each primitive takes an optional surface and, before touching a cell:
//!
//! 1. returns [`DrawError::NoSurface`] when there is no surface,
//! 2. re-reads the surface's live bounds (they may have changed since the
//!    surface was handed out),
//! 3. refuses coordinates outside `[0, height) x [0, width)` without
//!    drawing anything,
//! 4. clips text to the available width minus one, leaving the last
//!    column untouched.
//!
//! Failures come back as values. Callers log them with
//! [`DrawResultExt::log_failure`] and carry on with the frame; a drawing
//! call never panics and never writes outside its own surface.

use ratatui::style::Style;
use thiserror::Error;

use crate::compositor::Surface;

/// Why a draw call did nothing
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    /// The pane has no surface (degraded layout)
    #[error("no surface")]
    NoSurface,

    /// The surface's size could not be read (resize in flight)
    #[error("surface bounds unavailable")]
    BoundsUnavailable,

    /// Target coordinate outside the surface
    #[error("({row}, {col}) outside {height}x{width} surface")]
    OutOfBounds {
        row: u16,
        col: u16,
        height: u16,
        width: u16,
    },

    /// The cell buffer itself is inconsistent
    #[error("drawing backend: {0}")]
    Backend(String),
}

/// Result of a drawing primitive
pub type DrawResult = Result<(), DrawError>;

/// Logging for draw results, by error class
pub trait DrawResultExt {
    /// Log a failed draw at the level its class calls for
    fn log_failure(self, op: &'static str);
}

impl DrawResultExt for DrawResult {
    fn log_failure(self, op: &'static str) {
        match self {
            Ok(()) => {}
            // Geometry misses are expected during resize races
            Err(e @ (DrawError::NoSurface | DrawError::OutOfBounds { .. })) => {
                tracing::trace!(op, error = %e, "draw skipped");
            }
            Err(e @ (DrawError::BoundsUnavailable | DrawError::Backend(_))) => {
                tracing::warn!(op, error = %e, "draw abandoned");
            }
        }
    }
}

/// Live `(height, width)` of a surface
pub fn live_bounds(surface: &Surface) -> Result<(u16, u16), DrawError> {
    let area = surface.buffer.area;
    let cells = usize::from(area.width) * usize::from(area.height);
    if surface.buffer.content.len() != cells {
        return Err(DrawError::Backend(format!(
            "buffer holds {} cells for a {}x{} area",
            surface.buffer.content.len(),
            area.height,
            area.width
        )));
    }
    if area.width != surface.bounds.width || area.height != surface.bounds.height {
        return Err(DrawError::BoundsUnavailable);
    }
    Ok((area.height, area.width))
}

/// Resolve the surface and check `(row, col)` against its live bounds
fn checked(
    surface: Option<&mut Surface>,
    row: u16,
    col: u16,
) -> Result<(&mut Surface, u16, u16), DrawError> {
    let surface = surface.ok_or(DrawError::NoSurface)?;
    let (height, width) = live_bounds(surface)?;
    if row >= height || col >= width {
        return Err(DrawError::OutOfBounds {
            row,
            col,
            height,
            width,
        });
    }
    Ok((surface, height, width))
}

/// Write `text` at `(row, col)`, clipped to the available width minus one
pub fn write_text(
    surface: Option<&mut Surface>,
    row: u16,
    col: u16,
    text: &str,
    style: Style,
) -> DrawResult {
    let (surface, _, width) = checked(surface, row, col)?;
    let max_width = usize::from(width - col).saturating_sub(1);
    if max_width > 0 && !text.is_empty() {
        surface.buffer.set_stringn(col, row, text, max_width, style);
    }
    surface.dirty = true;
    Ok(())
}

/// Draw `len` copies of `symbol` from `(row, col)`, clipped like text
pub fn hline(
    surface: Option<&mut Surface>,
    row: u16,
    col: u16,
    symbol: char,
    len: usize,
    style: Style,
) -> DrawResult {
    let line: String = std::iter::repeat(symbol).take(len).collect();
    write_text(surface, row, col, &line, style)
}

/// Fill `row` from `col` up to the reserved last column with blanks
pub fn fill_row(surface: Option<&mut Surface>, row: u16, col: u16, style: Style) -> DrawResult {
    let (surface, _, width) = checked(surface, row, col)?;
    let end = width.saturating_sub(1);
    for x in col..end {
        if let Some(cell) = surface.buffer.cell_mut((x, row)) {
            cell.reset();
            cell.set_style(style);
        }
    }
    surface.dirty = true;
    Ok(())
}

/// Place the surface's cursor at `(row, col)`
pub fn move_cursor(surface: Option<&mut Surface>, row: u16, col: u16) -> DrawResult {
    let (surface, _, _) = checked(surface, row, col)?;
    surface.cursor = Some((col, row));
    surface.dirty = true;
    Ok(())
}

/// Clear every cell back to the surface background
pub fn erase(surface: Option<&mut Surface>) -> DrawResult {
    let surface = surface.ok_or(DrawError::NoSurface)?;
    live_bounds(surface)?;
    let area = surface.buffer.area;
    surface.buffer.reset();
    surface.buffer.set_style(area, surface.background);
    surface.dirty = true;
    Ok(())
}

/// Assign the surface background and repaint it
///
/// Only the layout manager calls this, once per surface at creation.
pub fn set_background(surface: Option<&mut Surface>, style: Style) -> DrawResult {
    let surface = surface.ok_or(DrawError::NoSurface)?;
    surface.background = style;
    erase(Some(surface))
}

/// Mark a surface for the next composite without changing its cells
pub fn mark_dirty(surface: Option<&mut Surface>) -> DrawResult {
    let surface = surface.ok_or(DrawError::NoSurface)?;
    live_bounds(surface)?;
    surface.dirty = true;
    Ok(())
}
