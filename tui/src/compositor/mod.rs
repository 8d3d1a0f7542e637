//! Frame Compositor
//!
//! Owns every pane surface and composites them into one output buffer.
//! Painting a surface only touches its own buffer and marks it dirty;
//! nothing becomes visible until [`Compositor::composite`] runs and the
//! screen flushes the output. One composite per frame keeps multi-pane
//! updates (resize, split toggles) free of tearing.
//!
//! Panes never overlap, so surfaces are blitted opaquely in creation order.

mod surface;

use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

pub use surface::{Surface, SurfaceKind};

/// Unique identifier for a surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub(crate) u32);

/// The compositor owns all surfaces and composites them together
pub struct Compositor {
    /// All surfaces by ID
    surfaces: HashMap<SurfaceId, Surface>,
    /// Next surface ID to assign
    next_id: u32,
    /// Output buffer (composited result, persists across frames)
    output: Buffer,
    /// Total area
    area: Rect,
}

impl Compositor {
    /// Create a new compositor for the given area
    pub fn new(area: Rect) -> Self {
        Self {
            surfaces: HashMap::new(),
            next_id: 0,
            output: Buffer::empty(area),
            area,
        }
    }

    /// Create a new surface and return its ID
    pub fn create_surface(&mut self, bounds: Rect, kind: SurfaceKind, background: Style) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;

        self.surfaces
            .insert(id, Surface::new(id, bounds, kind, background));
        tracing::trace!(?id, ?bounds, ?kind, "surface created");
        id
    }

    /// Release a surface, blanking the screen region it covered
    pub fn destroy_surface(&mut self, id: SurfaceId) {
        if let Some(surface) = self.surfaces.remove(&id) {
            let region = surface.bounds.intersection(self.area);
            for y in region.top()..region.bottom() {
                for x in region.left()..region.right() {
                    if let Some(cell) = self.output.cell_mut((x, y)) {
                        cell.reset();
                    }
                }
            }
            tracing::trace!(?id, "surface released");
        }
    }

    /// Get mutable access to a surface for painting
    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(&id)
    }

    /// Get a surface for inspection
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    /// Mutable access to two distinct surfaces at once (split view)
    pub fn pair_mut(
        &mut self,
        first: SurfaceId,
        second: SurfaceId,
    ) -> (Option<&mut Surface>, Option<&mut Surface>) {
        let mut a = None;
        let mut b = None;
        for (id, surface) in self.surfaces.iter_mut() {
            if *id == first {
                a = Some(surface);
            } else if *id == second {
                b = Some(surface);
            }
        }
        (a, b)
    }

    /// Number of live surfaces
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Resize the entire compositor
    ///
    /// The old output is discarded and every surface is marked dirty so the
    /// next composite repaints the whole screen.
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.output = Buffer::empty(area);
        for surface in self.surfaces.values_mut() {
            surface.dirty = true;
        }
    }

    /// Current total area
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Composite dirty surfaces into the output buffer
    pub fn composite(&mut self) -> &Buffer {
        let mut order: Vec<SurfaceId> = self
            .surfaces
            .iter()
            .filter(|(_, s)| s.dirty)
            .map(|(id, _)| *id)
            .collect();
        order.sort();

        for id in order {
            if let Some(surface) = self.surfaces.get_mut(&id) {
                Self::blit_surface(&mut self.output, self.area, surface);
                surface.dirty = false;
            }
        }

        &self.output
    }

    /// Screen position of the terminal cursor, taken from the input surface
    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        self.surfaces
            .values()
            .filter(|s| s.kind == SurfaceKind::Input)
            .find_map(|s| {
                s.cursor
                    .map(|(col, row)| (s.bounds.x + col, s.bounds.y + row))
            })
            .filter(|&(x, y)| x < self.area.width && y < self.area.height)
    }

    /// The composited output
    pub fn output(&self) -> &Buffer {
        &self.output
    }

    /// Blit a surface onto the output buffer (opaque)
    fn blit_surface(output: &mut Buffer, area: Rect, surface: &Surface) {
        let sb = surface.bounds;
        let Some((height, width)) = surface.size() else {
            tracing::warn!(id = ?surface.id, "surface size out of sync, skipping blit");
            return;
        };

        for sy in 0..height {
            for sx in 0..width {
                let dst_x = sb.x.saturating_add(sx);
                let dst_y = sb.y.saturating_add(sy);

                // Bounds check
                if dst_x >= area.right() || dst_y >= area.bottom() {
                    continue;
                }

                let (Some(src), Some(dst)) =
                    (surface.buffer.cell((sx, sy)), output.cell_mut((dst_x, dst_y)))
                else {
                    continue;
                };
                *dst = src.clone();
            }
        }
    }
}
