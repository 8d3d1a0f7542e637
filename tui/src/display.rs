//! Display State Types
//!
//! The read-only view of application state that the renderers paint from.
//! The chat engine owns the real data; it hands the renderers snapshots in
//! these shapes once per frame.
//!
//! - [`ContextView`]: what the message pane shows for one context
//! - [`ContextDetails`]: what the sidebar needs about the active context
//! - [`ContextDirectory`] / [`TransferRegistry`]: lookups the renderers call

use std::collections::HashMap;
use std::fmt;

use crate::theme::ColorName;

/// Name of the pinned home context (always listed first)
pub const STATUS_CONTEXT: &str = "Status";

/// Name of the pinned transfer list context (always listed last)
pub const TRANSFER_CONTEXT: &str = "DCC";

/// One line of message history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageLine {
    /// The line as received (already formatted, may contain a timestamp)
    pub text: String,
    /// Base color for tokens without a recognized shape
    pub color: ColorName,
}

impl MessageLine {
    pub fn new(text: impl Into<String>, color: ColorName) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Message history with its scrollback position
#[derive(Clone, Copy, Debug)]
pub struct MessageView<'a> {
    /// Oldest first, newest last
    pub messages: &'a [MessageLine],
    /// Lines scrolled back from the newest
    pub scroll_offset: usize,
}

/// What the message pane paints for a context
#[derive(Clone, Copy, Debug)]
pub enum ContextView<'a> {
    /// A channel or private query
    Plain(MessageView<'a>),
    /// The server status context
    Status(MessageView<'a>),
    /// The transfer list; lines come from the [`TransferRegistry`]
    TransferList { scroll_offset: usize },
}

/// Membership state of a channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinState {
    Joined,
    /// Join sent, not yet confirmed
    Pending,
    /// Join rejected by the server
    Failed,
    /// Left the channel; history kept
    Parted,
}

impl JoinState {
    /// Sidebar suffix and its color; `None` for joined channels
    pub fn suffix(&self) -> Option<(&'static str, ColorName)> {
        match self {
            JoinState::Joined => None,
            JoinState::Pending => Some(("[joining]", ColorName::Dim)),
            JoinState::Failed => Some(("[failed]", ColorName::Error)),
            JoinState::Parted => Some(("[parted]", ColorName::Dim)),
        }
    }
}

/// Channel members and the user list scroll position
#[derive(Clone, Debug, Default)]
pub struct Membership {
    /// Member name → role marker (`"@"`, `"+"`, `""`)
    pub users: HashMap<String, String>,
    /// Index of the first visible member
    pub scroll_offset: usize,
}

/// Sidebar-relevant facts about the active context
#[derive(Clone, Copy, Debug)]
pub enum ContextDetails<'a> {
    /// A channel; the user list is shown only while joined
    Channel {
        state: JoinState,
        membership: &'a Membership,
    },
    /// Query, status or transfer list: no user list
    Other,
}

/// Per-context lookups for the sidebar
pub trait ContextDirectory {
    /// Unread message count for `name` (0 for unknown contexts)
    fn unread_count(&self, name: &str) -> usize;

    /// Join state for `name` when it is a channel
    fn join_state(&self, name: &str) -> Option<JoinState>;
}

/// Direction of a file transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferDirection {
    Send,
    Receive,
}

/// Lifecycle of a file transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferState {
    Waiting,
    Active,
    Done,
    Failed,
}

/// One row of the transfer list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferStatus {
    pub id: u32,
    pub peer: String,
    pub file_name: String,
    pub direction: TransferDirection,
    pub bytes_done: u64,
    pub bytes_total: u64,
    pub state: TransferState,
}

impl TransferStatus {
    /// Percent complete, 0-100
    pub fn percent(&self) -> u64 {
        if self.bytes_total == 0 {
            return if self.state == TransferState::Done { 100 } else { 0 };
        }
        (self.bytes_done.min(self.bytes_total) * 100) / self.bytes_total
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.direction {
            TransferDirection::Send => "->",
            TransferDirection::Receive => "<-",
        };
        let state = match self.state {
            TransferState::Waiting => "waiting",
            TransferState::Active => "active",
            TransferState::Done => "done",
            TransferState::Failed => "failed",
        };
        write!(
            f,
            "#{:<3} {} {:<12} {} {:>3}% {}/{} {}",
            self.id,
            arrow,
            self.peer,
            self.file_name,
            self.percent(),
            self.bytes_done,
            self.bytes_total,
            state
        )
    }
}

/// Source of transfer list rows
pub trait TransferRegistry {
    /// Current transfers, oldest first
    fn transfers(&self) -> Vec<TransferStatus>;
}
