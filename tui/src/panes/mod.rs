//! Pane Renderers
//!
//! One renderer per pane. Each paints current state into its own surface
//! through the safe drawing primitives and marks it dirty; none of them
//! flushes, and none reads another pane's surface.

pub mod highlight;
pub mod input;
pub mod messages;
pub mod sidebar;
pub mod status;

pub use highlight::{highlight_line, Segment};
pub use input::{map_input_view, InputView};
pub use messages::visible_window;
pub use sidebar::{order_contexts, user_list_rows, user_page, SidebarContent, UserPage};
pub use status::{compose_status_line, StatusFields};
