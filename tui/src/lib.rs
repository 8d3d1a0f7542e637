//! ircterm TUI - text-mode renderer for a terminal chat client
//!
//! Paints a chat client's state onto the terminal: message history, a
//! sidebar of contexts and channel members, a status line and an input
//! line, with an optional split message view.
//!
//! # Architecture
//!
//! - **Screen**: Terminal lifecycle, palette and the single flush per frame
//! - **Compositor**: Off-screen surfaces composited into one output buffer
//! - **Draw**: Bounds-checked primitives every pane paints through
//! - **Layout**: Pane geometry and surface lifecycle, split view
//! - **Panes**: Message, sidebar, status and input renderers
//! - **Frame**: One paint pass over all panes

pub mod app;
pub mod compositor;
pub mod config;
pub mod display;
pub mod draw;
pub mod frame;
pub mod layout;
pub mod panes;
pub mod screen;
pub mod store;
pub mod theme;

pub use app::App;
pub use config::RenderConfig;
pub use frame::{FrameContent, FrameRenderer};
pub use screen::{Screen, ScreenError};
pub use store::MemoryStore;
pub use theme::{ColorName, Palette};
