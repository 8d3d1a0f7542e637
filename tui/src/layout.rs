//! Layout Manager
//!
//! Turns the terminal size and view mode into pane rectangles and owns the
//! lifecycle of every pane surface.
//!
//! ```text
//! +-----------------------------+----------+
//! | messages (top)              | sidebar  |
//! |-----------------------------|          |
//! | messages (bottom, if split) |          |
//! +-----------------------------+----------+
//! | status bar                             |
//! | input line                             |
//! +----------------------------------------+
//! ```
//!
//! A layout that would produce a non-positive dimension is reported as
//! [`LayoutError::Degraded`] and no surfaces exist until the next successful
//! recompute. Callers render nothing in that state.

use std::fmt;

use ratatui::layout::Rect;
use thiserror::Error;

use crate::compositor::{Compositor, SurfaceId, SurfaceKind};
use crate::draw::{self, DrawResultExt};
use crate::theme::{ColorName, Palette};

/// Narrowest sidebar
pub const SIDEBAR_MIN_WIDTH: u16 = 15;

/// Widest sidebar
pub const SIDEBAR_MAX_WIDTH: u16 = 30;

/// Rows below the message pane (status bar + input line)
pub const RESERVED_ROWS: u16 = 2;

/// The layout cannot be built at this terminal size
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// Some pane would have zero or negative size
    #[error("terminal {height}x{width} is too small for the layout")]
    Degraded { height: u16, width: u16 },
}

/// Which half of a split message view has focus
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActivePane {
    #[default]
    Top,
    Bottom,
}

impl ActivePane {
    /// The other pane
    pub fn toggle(self) -> Self {
        match self {
            ActivePane::Top => ActivePane::Bottom,
            ActivePane::Bottom => ActivePane::Top,
        }
    }
}

impl fmt::Display for ActivePane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivePane::Top => f.write_str("Top"),
            ActivePane::Bottom => f.write_str("Bottom"),
        }
    }
}

/// Pane dimensions derived from the terminal size
///
/// The all-zero value is the degraded geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Geometry {
    pub term_height: u16,
    pub term_width: u16,
    pub sidebar_width: u16,
    pub message_height: u16,
    pub message_width: u16,
    /// Top message pane height (equals `message_height` when not split)
    pub top_height: u16,
    /// Bottom message pane height (zero when not split)
    pub bottom_height: u16,
    pub split: bool,
}

impl Geometry {
    /// False for the degraded geometry
    pub fn is_valid(&self) -> bool {
        self.message_height > 0 && self.message_width > 0 && self.sidebar_width > 0
    }

    /// Row of the status bar
    pub fn status_row(&self) -> u16 {
        self.term_height.saturating_sub(2)
    }

    /// Row of the input line
    pub fn input_row(&self) -> u16 {
        self.term_height.saturating_sub(1)
    }
}

/// Compute pane dimensions for a terminal of `height` x `width`
pub fn compute_geometry(height: u16, width: u16, split: bool) -> Result<Geometry, LayoutError> {
    let degraded = LayoutError::Degraded { height, width };

    let sidebar_width = (width / 4).clamp(SIDEBAR_MIN_WIDTH, SIDEBAR_MAX_WIDTH);
    let message_height = i32::from(height) - i32::from(RESERVED_ROWS);
    let message_width = i32::from(width) - i32::from(sidebar_width);
    if message_height <= 0 || message_width <= 0 {
        return Err(degraded);
    }
    let message_height = message_height as u16;

    let (top_height, bottom_height) = if split {
        let top = message_height / 2;
        (top, message_height - top)
    } else {
        (message_height, 0)
    };
    if top_height == 0 || (split && bottom_height == 0) {
        return Err(degraded);
    }

    Ok(Geometry {
        term_height: height,
        term_width: width,
        sidebar_width,
        message_height,
        message_width: message_width as u16,
        top_height,
        bottom_height,
        split,
    })
}

/// Surfaces of a successful layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaneSurfaces {
    /// Message pane (top half when split)
    pub messages: SurfaceId,
    /// Bottom message pane, split view only
    pub messages_bottom: Option<SurfaceId>,
    pub sidebar: SurfaceId,
    pub status: SurfaceId,
    pub input: SurfaceId,
}

impl PaneSurfaces {
    /// The message surface that has focus
    pub fn active_messages(&self, active: ActivePane) -> SurfaceId {
        match (active, self.messages_bottom) {
            (ActivePane::Bottom, Some(bottom)) => bottom,
            _ => self.messages,
        }
    }

    fn ids(&self) -> impl Iterator<Item = SurfaceId> {
        [
            Some(self.messages),
            self.messages_bottom,
            Some(self.sidebar),
            Some(self.status),
            Some(self.input),
        ]
        .into_iter()
        .flatten()
    }
}

/// Owns pane geometry and the surfaces built from it
#[derive(Debug, Default)]
pub struct LayoutManager {
    geometry: Geometry,
    panes: Option<PaneSurfaces>,
    active: ActivePane,
}

impl LayoutManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild geometry and surfaces for a new terminal size or view mode
    ///
    /// Surfaces from the previous layout are always released first.
    pub fn recompute(
        &mut self,
        compositor: &mut Compositor,
        palette: &Palette,
        height: u16,
        width: u16,
        split: bool,
        active: ActivePane,
    ) -> Result<Geometry, LayoutError> {
        self.teardown(compositor);
        compositor.resize(Rect::new(0, 0, width, height));
        self.active = if split { active } else { ActivePane::Top };

        let geometry = match compute_geometry(height, width, split) {
            Ok(geometry) => geometry,
            Err(e) => {
                tracing::debug!(error = %e, "layout degraded");
                self.geometry = Geometry::default();
                return Err(e);
            }
        };

        let mut create = |bounds: Rect, kind: SurfaceKind, color: ColorName| {
            let id = compositor.create_surface(bounds, kind, Default::default());
            draw::set_background(compositor.surface_mut(id), palette.get_color(color))
                .log_failure("set_background");
            id
        };

        let messages = create(
            Rect::new(0, 0, geometry.message_width, geometry.top_height),
            SurfaceKind::Scrolling,
            ColorName::Message,
        );
        let messages_bottom = split.then(|| {
            create(
                Rect::new(
                    0,
                    geometry.top_height,
                    geometry.message_width,
                    geometry.bottom_height,
                ),
                SurfaceKind::Scrolling,
                ColorName::Message,
            )
        });
        let sidebar = create(
            Rect::new(
                geometry.message_width,
                0,
                geometry.sidebar_width,
                geometry.message_height,
            ),
            SurfaceKind::Static,
            ColorName::Sidebar,
        );
        let status = create(
            Rect::new(0, geometry.status_row(), width, 1),
            SurfaceKind::Static,
            ColorName::StatusBar,
        );
        let input = create(
            Rect::new(0, geometry.input_row(), width, 1),
            SurfaceKind::Input,
            ColorName::Input,
        );

        self.panes = Some(PaneSurfaces {
            messages,
            messages_bottom,
            sidebar,
            status,
            input,
        });
        self.geometry = geometry;
        tracing::debug!(?geometry, "layout recomputed");
        Ok(geometry)
    }

    /// Erase, composite and release every owned surface
    ///
    /// Safe to call repeatedly and before any layout exists.
    pub fn teardown(&mut self, compositor: &mut Compositor) {
        let Some(panes) = self.panes.take() else {
            return;
        };
        for id in panes.ids() {
            draw::erase(compositor.surface_mut(id)).log_failure("erase");
        }
        compositor.composite();
        for id in panes.ids() {
            compositor.destroy_surface(id);
        }
        self.geometry = Geometry::default();
    }

    /// Current geometry (all zeros when degraded)
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Current surfaces, if the layout is usable
    pub fn surfaces(&self) -> Option<PaneSurfaces> {
        self.panes
    }

    /// Focused message pane
    pub fn active(&self) -> ActivePane {
        self.active
    }

    /// Move focus between split panes; ignored outside split view
    pub fn set_active(&mut self, active: ActivePane) {
        if self.geometry.split {
            self.active = active;
        }
    }

    /// The message surface keystrokes should redraw
    pub fn active_message_surface(&self) -> Option<SurfaceId> {
        self.panes.map(|p| p.active_messages(self.active))
    }
}
