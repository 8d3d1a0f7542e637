//! Frame Renderer
//!
//! Ties the layout manager, the compositor and the pane renderers into one
//! per-frame pass:
//!
//! 1. [`FrameRenderer::resize`] after a resize or view-mode change
//! 2. [`FrameRenderer::paint`] every tick, painting all panes off-screen
//! 3. [`Screen::flush`](crate::screen::Screen::flush) with
//!    [`FrameRenderer::compositor_mut`] to make the frame visible
//!
//! While the layout is degraded there are no surfaces and painting is a
//! no-op, which leaves a blank frame.

use ratatui::layout::Rect;

use crate::compositor::Compositor;
use crate::display::{ContextDirectory, ContextView, TransferRegistry};
use crate::layout::{ActivePane, Geometry, LayoutError, LayoutManager};
use crate::panes::{self, SidebarContent, StatusFields};
use crate::theme::Palette;

/// Everything one frame shows
#[derive(Clone, Debug)]
pub struct FrameContent<'a> {
    /// Message pane, or the top half in split view
    pub messages: ContextView<'a>,
    /// Bottom half in split view
    pub messages_bottom: Option<ContextView<'a>>,
    pub sidebar: SidebarContent<'a>,
    pub status: StatusFields,
    /// Input buffer and cursor (character index)
    pub input: &'a str,
    pub cursor: usize,
}

/// Layout, surfaces and pane painting for one screen
pub struct FrameRenderer {
    compositor: Compositor,
    layout: LayoutManager,
    user_list_min_width: u16,
}

impl FrameRenderer {
    pub fn new(user_list_min_width: u16) -> Self {
        Self {
            compositor: Compositor::new(Rect::default()),
            layout: LayoutManager::new(),
            user_list_min_width,
        }
    }

    /// Rebuild the layout for a terminal of `height` x `width`
    pub fn resize(
        &mut self,
        palette: &Palette,
        height: u16,
        width: u16,
        split: bool,
        active: ActivePane,
    ) -> Result<Geometry, LayoutError> {
        self.layout
            .recompute(&mut self.compositor, palette, height, width, split, active)
    }

    /// Paint every pane into its surface; nothing is visible until flushed
    ///
    /// `source` answers the sidebar's per-context lookups and supplies the
    /// transfer list.
    pub fn paint<S>(&mut self, palette: &Palette, content: &FrameContent<'_>, source: &S)
    where
        S: ContextDirectory + TransferRegistry,
    {
        let Some(surfaces) = self.layout.surfaces() else {
            tracing::trace!("layout degraded, skipping paint");
            return;
        };

        match (surfaces.messages_bottom, &content.messages_bottom) {
            (Some(bottom_id), Some(bottom_view)) => {
                let (top, bottom) = self.compositor.pair_mut(surfaces.messages, bottom_id);
                panes::messages::paint_split(
                    top,
                    &content.messages,
                    bottom,
                    bottom_view,
                    palette,
                    source,
                );
            }
            (Some(bottom_id), None) => {
                tracing::error!(
                    ?bottom_id,
                    "split layout without bottom pane content, painting top only"
                );
                panes::messages::paint(
                    self.compositor.surface_mut(surfaces.messages),
                    palette,
                    &content.messages,
                    source,
                );
            }
            (None, _) => {
                panes::messages::paint(
                    self.compositor.surface_mut(surfaces.messages),
                    palette,
                    &content.messages,
                    source,
                );
            }
        }

        panes::sidebar::paint(
            self.compositor.surface_mut(surfaces.sidebar),
            palette,
            &content.sidebar,
            source,
            self.user_list_min_width,
        );
        panes::status::paint(
            self.compositor.surface_mut(surfaces.status),
            palette,
            &content.status,
        );
        panes::input::paint(
            self.compositor.surface_mut(surfaces.input),
            palette,
            content.input,
            content.cursor,
        );
    }

    /// Release every surface
    pub fn teardown(&mut self) {
        self.layout.teardown(&mut self.compositor);
    }

    pub fn layout(&self) -> &LayoutManager {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutManager {
        &mut self.layout
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }
}
