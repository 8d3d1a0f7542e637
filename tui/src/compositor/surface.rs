//! Surface - a single pane's off-screen drawing target

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use super::SurfaceId;

/// What a surface is used for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Message history; content scrolls as lines are added
    Scrolling,
    /// Fixed content (sidebar, status bar)
    Static,
    /// The input line; owns the terminal cursor
    Input,
}

/// A pane surface owned by the compositor
///
/// The buffer uses origin coordinates; `bounds` stores the screen position
/// used when compositing.
#[derive(Debug)]
pub struct Surface {
    /// Unique identifier
    pub id: SurfaceId,
    /// Screen position and size
    pub bounds: Rect,
    /// What the surface is for
    pub kind: SurfaceKind,
    /// Background assigned at creation
    pub background: Style,
    /// Off-screen cells
    pub buffer: Buffer,
    /// Cursor position in surface coordinates (input surfaces only)
    pub cursor: Option<(u16, u16)>,
    /// Painted since the last composite
    pub dirty: bool,
}

impl Surface {
    /// Create a surface filled with its background
    pub fn new(id: SurfaceId, bounds: Rect, kind: SurfaceKind, background: Style) -> Self {
        let mut buffer = Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height));
        buffer.set_style(buffer.area, background);
        Self {
            id,
            bounds,
            kind,
            background,
            buffer,
            cursor: None,
            dirty: true,
        }
    }

    /// Live size as `(height, width)`
    ///
    /// Returns `None` when the buffer no longer matches the bounds, which
    /// happens if a resize landed between creation and paint.
    pub fn size(&self) -> Option<(u16, u16)> {
        let area = self.buffer.area;
        let cells = usize::from(area.width) * usize::from(area.height);
        if area.width != self.bounds.width
            || area.height != self.bounds.height
            || self.buffer.content.len() != cells
        {
            return None;
        }
        Some((area.height, area.width))
    }

    /// Check if a screen point is within this surface
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.bounds.x
            && x < self.bounds.x + self.bounds.width
            && y >= self.bounds.y
            && y < self.bounds.y + self.bounds.height
    }
}
