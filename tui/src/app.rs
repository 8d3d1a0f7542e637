//! Main Application
//!
//! The App drives the rendering engine from terminal events:
//! - Event loop (keyboard, mouse, resize) against a frame tick
//! - Input line editing and context switching
//! - One paint and one flush per frame through [`FrameRenderer`] and [`Screen`]
//!
//! History comes from a [`MemoryStore`]; a networked client would swap in
//! its own [`ContextDirectory`](crate::display::ContextDirectory).

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;

use crate::config::RenderConfig;
use crate::display::{ContextDirectory, JoinState, MessageLine, STATUS_CONTEXT};
use crate::frame::{FrameContent, FrameRenderer};
use crate::layout::ActivePane;
use crate::panes::{order_contexts, user_list_rows, SidebarContent, StatusFields};
use crate::screen::Screen;
use crate::store::MemoryStore;
use crate::theme::ColorName;

/// Lines per mouse wheel notch
const WHEEL_STEP: isize = 3;

/// Main application state
pub struct App<B: Backend> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    config: RenderConfig,

    // === Rendering ===
    screen: Screen<B>,
    renderer: FrameRenderer,

    // === Content ===
    store: MemoryStore,
    nick: String,
    server: String,
    connected: bool,

    // === View State ===
    split: bool,
    focus: ActivePane,
    /// Context shown in the top (or only) message pane
    top_context: String,
    /// Context shown in the bottom pane while split
    bottom_context: String,

    // === Input State ===
    input_buffer: String,
    /// Cursor as a character index into `input_buffer`
    cursor: usize,
}

impl<B: Backend> App<B> {
    /// Create a new App and lay out the screen
    pub fn new(
        screen: Screen<B>,
        config: RenderConfig,
        store: MemoryStore,
        nick: impl Into<String>,
        server: impl Into<String>,
    ) -> Self {
        let ordered = order_contexts(store.names());
        let first_channel = ordered
            .iter()
            .find(|n| store.join_state(n) == Some(JoinState::Joined))
            .or_else(|| ordered.iter().find(|n| **n != STATUS_CONTEXT))
            .copied()
            .unwrap_or(STATUS_CONTEXT)
            .to_string();

        let mut app = Self {
            running: true,
            renderer: FrameRenderer::new(config.user_list_min_width),
            split: config.split_view,
            config,
            screen,
            store,
            nick: nick.into(),
            server: server.into(),
            connected: true,
            focus: ActivePane::Top,
            top_context: first_channel,
            bottom_context: STATUS_CONTEXT.to_string(),
            input_buffer: String::new(),
            cursor: 0,
        };
        app.store.mark_read(&app.top_context);
        app.relayout();
        app
    }

    /// Main event loop
    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();
        let mut ticker = tokio::time::interval(self.config.frame_interval());

        // Render initial frame immediately so user sees UI
        self.render();

        while self.running {
            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => tracing::warn!(error = %e, "terminal event error"),
                    None => {
                        tracing::debug!("event stream closed");
                        self.running = false;
                    }
                },

                _ = ticker.tick() => {}
            }

            self.render();
        }

        Ok(())
    }

    /// Apply one terminal event to the app state
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                self.relayout();
            }
            _ => {}
        }
    }

    /// Paint every pane and push the frame to the terminal
    pub fn render(&mut self) {
        let focused = self.focused_context().to_string();
        let content = FrameContent {
            messages: self.store.view(&self.top_context),
            messages_bottom: self.split.then(|| self.store.view(&self.bottom_context)),
            sidebar: SidebarContent {
                active: &focused,
                contexts: self.store.names(),
                details: self.store.details(&focused),
            },
            status: StatusFields {
                split: self.split.then_some(self.focus),
                context: Some(focused.clone()),
                connected: self.connected,
                server: Some(self.server.clone()),
                nick: Some(self.nick.clone()),
            },
            input: &self.input_buffer,
            cursor: self.cursor,
        };

        self.renderer
            .paint(self.screen.palette(), &content, &self.store);
        if let Err(e) = self.screen.flush(self.renderer.compositor_mut()) {
            tracing::warn!(error = %e, "frame flush failed");
        }
    }

    /// Release surfaces and restore the terminal
    pub fn shutdown(&mut self) {
        self.renderer.teardown();
        self.screen.teardown();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn input(&self) -> (&str, usize) {
        (&self.input_buffer, self.cursor)
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn screen(&self) -> &Screen<B> {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen<B> {
        &mut self.screen
    }

    /// Name of the context keystrokes apply to
    pub fn focused_context(&self) -> &str {
        match (self.split, self.focus) {
            (true, ActivePane::Bottom) => &self.bottom_context,
            _ => &self.top_context,
        }
    }

    fn relayout(&mut self) {
        let (height, width) = self.screen.get_dimensions();
        if let Err(e) = self.renderer.resize(
            self.screen.palette(),
            height,
            width,
            self.split,
            self.focus,
        ) {
            tracing::info!(error = %e, "terminal too small, showing blank frame");
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Submit message
            KeyCode::Enter => self.submit(),

            // Typing
            KeyCode::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.input_buffer.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.input_buffer.remove(at);
            }
            KeyCode::Delete if self.cursor < self.input_len() => {
                let at = self.byte_index(self.cursor);
                self.input_buffer.remove(at);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input_len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input_len(),

            // Scrolling
            KeyCode::PageUp => self.scroll_focused(self.page_size()),
            KeyCode::PageDown => self.scroll_focused(-self.page_size()),
            KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => {
                let (name, lines) = (self.focused_context().to_string(), self.user_rows());
                self.store.scroll_users(&name, -1, lines);
            }
            KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => {
                let (name, lines) = (self.focused_context().to_string(), self.user_rows());
                self.store.scroll_users(&name, 1, lines);
            }

            // Contexts and view mode
            KeyCode::Tab => self.cycle_context(1),
            KeyCode::BackTab => self.cycle_context(-1),
            KeyCode::F(2) => {
                self.split = !self.split;
                if !self.split {
                    self.focus = ActivePane::Top;
                }
                self.relayout();
            }
            KeyCode::F(3) if self.split => {
                self.focus = self.focus.toggle();
                self.renderer.layout_mut().set_active(self.focus);
                let name = self.focused_context().to_string();
                self.store.mark_read(&name);
            }

            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let delta = match mouse.kind {
            MouseEventKind::ScrollUp => WHEEL_STEP,
            MouseEventKind::ScrollDown => -WHEEL_STEP,
            _ => return,
        };
        let Some(surfaces) = self.renderer.layout().surfaces() else {
            return;
        };
        let (top_rows, bottom_rows) = (
            self.pane_rows(ActivePane::Top),
            self.pane_rows(ActivePane::Bottom),
        );
        let user_rows = self.user_rows();
        let compositor = self.renderer.compositor();
        let hit = |id| {
            compositor
                .surface(id)
                .is_some_and(|s| s.contains(mouse.column, mouse.row))
        };

        if hit(surfaces.messages) {
            let name = self.top_context.clone();
            self.store.scroll_messages(&name, delta, top_rows);
        } else if surfaces.messages_bottom.is_some_and(hit) {
            let name = self.bottom_context.clone();
            self.store.scroll_messages(&name, delta, bottom_rows);
        } else if hit(surfaces.sidebar) {
            // Wheel up moves toward the top of the list
            let name = self.focused_context().to_string();
            self.store.scroll_users(&name, -delta, user_rows);
        }
    }

    fn submit(&mut self) {
        if self.input_buffer.trim().is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.input_buffer);
        self.cursor = 0;

        let name = self.focused_context().to_string();
        self.store.push_message(
            &name,
            MessageLine::new(format!("<{}> {}", self.nick, text), ColorName::OwnMessage),
        );
        self.store.mark_read(&name);
        if let Some(entry) = self.store.context_mut(&name) {
            entry.scroll_offset = 0;
        }
    }

    fn cycle_context(&mut self, step: isize) {
        let ordered: Vec<String> = order_contexts(self.store.names())
            .into_iter()
            .map(str::to_string)
            .collect();
        if ordered.is_empty() {
            return;
        }
        let current = ordered
            .iter()
            .position(|n| n == self.focused_context())
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(ordered.len() as isize) as usize;
        let name = ordered[next].clone();

        self.store.mark_read(&name);
        match (self.split, self.focus) {
            (true, ActivePane::Bottom) => self.bottom_context = name,
            _ => self.top_context = name,
        }
    }

    fn scroll_focused(&mut self, delta: isize) {
        let name = self.focused_context().to_string();
        let rows = self.pane_rows(self.focus);
        self.store.scroll_messages(&name, delta, rows);
    }

    /// Rows of the message pane for `pane` (0 while degraded)
    fn pane_rows(&self, pane: ActivePane) -> usize {
        let geometry = self.renderer.layout().geometry();
        match (self.split, pane) {
            (true, ActivePane::Bottom) => usize::from(geometry.bottom_height),
            _ => usize::from(geometry.top_height),
        }
    }

    /// Member rows of the sidebar user list
    fn user_rows(&self) -> usize {
        let height = self.renderer.layout().geometry().message_height;
        user_list_rows(height, self.store.names().len())
    }

    /// Half the focused message pane, at least one line
    fn page_size(&self) -> isize {
        isize::try_from(self.pane_rows(self.focus) / 2)
            .unwrap_or(isize::MAX)
            .max(1)
    }

    fn input_len(&self) -> usize {
        self.input_buffer.chars().count()
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.input_buffer
            .char_indices()
            .nth(chars)
            .map_or(self.input_buffer.len(), |(i, _)| i)
    }
}
