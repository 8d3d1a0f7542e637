//! In-Memory Context Store
//!
//! Holds contexts, their history and the transfer list for the demo
//! client. A real chat engine implements [`ContextDirectory`] and
//! [`TransferRegistry`] over its own state; this store does the same over
//! plain collections so the renderers can run without a network.

use std::collections::HashMap;

use crate::display::{
    ContextDetails, ContextDirectory, ContextView, JoinState, Membership, MessageLine,
    MessageView, TransferDirection, TransferRegistry, TransferState, TransferStatus,
    STATUS_CONTEXT, TRANSFER_CONTEXT,
};
use crate::panes::user_page;
use crate::theme::ColorName;

/// History and sidebar state of one context
#[derive(Clone, Debug, Default)]
pub struct ContextEntry {
    pub messages: Vec<MessageLine>,
    /// Lines scrolled back from the newest
    pub scroll_offset: usize,
    pub unread: usize,
    /// `Some` for channels
    pub join_state: Option<JoinState>,
    pub membership: Membership,
}

/// Contexts and transfers kept in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    /// Names in insertion order (the sidebar does its own ordering)
    names: Vec<String>,
    contexts: HashMap<String, ContextEntry>,
    transfers: Vec<TransferStatus>,
}

impl MemoryStore {
    /// A store holding only the status context
    pub fn new() -> Self {
        let mut store = Self::default();
        store.add_context(STATUS_CONTEXT, None);
        store
    }

    /// A populated store for the demo client
    pub fn sample(nick: &str, server: &str) -> Self {
        let mut store = Self::new();
        store.push_message(
            STATUS_CONTEXT,
            MessageLine::new(format!("Connected to {server}"), ColorName::System),
        );
        store.push_message(
            STATUS_CONTEXT,
            MessageLine::new(format!("You are now known as @{nick}"), ColorName::System),
        );

        store.add_context("#rust", Some(JoinState::Joined));
        for (name, marker) in [
            (nick, "@"),
            ("ferris", "@"),
            ("bob", "+"),
            ("carol", ""),
            ("dave", ""),
            ("erin", ""),
            ("mallory", "+"),
            ("trent", ""),
        ] {
            store.add_member("#rust", name, marker);
        }
        for line in [
            "[12:00:01] <ferris> welcome to #rust",
            "[12:00:09] <bob> anyone tried the new borrow checker errors?",
            "[12:01:30] <carol> see #rust-beginners or irc.libera.chat for help",
            "[12:02:11] * dave waves at +mallory",
        ] {
            store.push_message("#rust", MessageLine::new(line, ColorName::Message));
        }

        store.add_context("#ratatui", Some(JoinState::Pending));
        store.add_context("#old-project", Some(JoinState::Parted));
        store.add_context("bob", None);
        store.push_message(
            "bob",
            MessageLine::new("[12:03:00] <bob> got a minute?", ColorName::Message),
        );

        store.add_context(TRANSFER_CONTEXT, None);
        store.push_transfer(TransferStatus {
            id: 1,
            peer: "bob".to_string(),
            file_name: "patch.diff".to_string(),
            direction: TransferDirection::Receive,
            bytes_done: 4096,
            bytes_total: 16384,
            state: TransferState::Active,
        });
        store.push_transfer(TransferStatus {
            id: 2,
            peer: "carol".to_string(),
            file_name: "notes.txt".to_string(),
            direction: TransferDirection::Send,
            bytes_done: 0,
            bytes_total: 2048,
            state: TransferState::Waiting,
        });
        store
    }

    /// Register a context; an existing one is left as is
    pub fn add_context(&mut self, name: &str, join_state: Option<JoinState>) {
        if self.contexts.contains_key(name) {
            return;
        }
        self.names.push(name.to_string());
        self.contexts.insert(
            name.to_string(),
            ContextEntry {
                join_state,
                ..ContextEntry::default()
            },
        );
    }

    /// Every context name
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn context(&self, name: &str) -> Option<&ContextEntry> {
        self.contexts.get(name)
    }

    pub fn context_mut(&mut self, name: &str) -> Option<&mut ContextEntry> {
        self.contexts.get_mut(name)
    }

    /// Append a line and count it as unread
    pub fn push_message(&mut self, name: &str, line: MessageLine) {
        match self.contexts.get_mut(name) {
            Some(entry) => {
                entry.messages.push(line);
                entry.unread += 1;
                // Keep a scrolled-back view on the same lines
                if entry.scroll_offset > 0 {
                    entry.scroll_offset += 1;
                }
            }
            None => tracing::debug!(context = name, "message for unknown context dropped"),
        }
    }

    pub fn add_member(&mut self, name: &str, member: &str, marker: &str) {
        if let Some(entry) = self.contexts.get_mut(name) {
            entry
                .membership
                .users
                .insert(member.to_string(), marker.to_string());
        }
    }

    pub fn set_join_state(&mut self, name: &str, state: JoinState) {
        if let Some(entry) = self.contexts.get_mut(name) {
            entry.join_state = Some(state);
        }
    }

    pub fn mark_read(&mut self, name: &str) {
        if let Some(entry) = self.contexts.get_mut(name) {
            entry.unread = 0;
        }
    }

    /// Scroll a context's history; positive `delta` goes back in time
    ///
    /// The offset stops where the oldest line reaches the top of a pane
    /// `visible` rows tall.
    pub fn scroll_messages(&mut self, name: &str, delta: isize, visible: usize) {
        let transfer_count = self.transfers.len();
        if let Some(entry) = self.contexts.get_mut(name) {
            let total = if name == TRANSFER_CONTEXT {
                transfer_count
            } else {
                entry.messages.len()
            };
            let max_offset = total.saturating_sub(visible);
            entry.scroll_offset = entry
                .scroll_offset
                .saturating_add_signed(delta)
                .min(max_offset);
        }
    }

    /// Scroll a channel's user list; positive `delta` moves down the list
    ///
    /// `lines` is the room below the list header; the offset stops at the
    /// page that ends with the last member.
    pub fn scroll_users(&mut self, name: &str, delta: isize, lines: usize) {
        if lines == 0 {
            return;
        }
        if let Some(entry) = self.contexts.get_mut(name) {
            let membership = &mut entry.membership;
            let wanted = membership.scroll_offset.saturating_add_signed(delta);
            membership.scroll_offset = user_page(membership.users.len(), lines, wanted).start;
        }
    }

    /// What the message pane shows for `name`
    pub fn view(&self, name: &str) -> ContextView<'_> {
        let (messages, scroll_offset) = match self.contexts.get(name) {
            Some(entry) => (entry.messages.as_slice(), entry.scroll_offset),
            None => (&[][..], 0),
        };
        if name == TRANSFER_CONTEXT {
            return ContextView::TransferList { scroll_offset };
        }
        let history = MessageView {
            messages,
            scroll_offset,
        };
        if name == STATUS_CONTEXT {
            ContextView::Status(history)
        } else {
            ContextView::Plain(history)
        }
    }

    /// What the sidebar needs about `name`
    pub fn details(&self, name: &str) -> ContextDetails<'_> {
        match self.contexts.get(name) {
            Some(ContextEntry {
                join_state: Some(state),
                membership,
                ..
            }) => ContextDetails::Channel {
                state: *state,
                membership,
            },
            _ => ContextDetails::Other,
        }
    }

    pub fn push_transfer(&mut self, transfer: TransferStatus) {
        self.transfers.push(transfer);
    }
}

impl ContextDirectory for MemoryStore {
    fn unread_count(&self, name: &str) -> usize {
        self.contexts.get(name).map_or(0, |e| e.unread)
    }

    fn join_state(&self, name: &str) -> Option<JoinState> {
        self.contexts.get(name).and_then(|e| e.join_state)
    }
}

impl TransferRegistry for MemoryStore {
    fn transfers(&self) -> Vec<TransferStatus> {
        self.transfers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_has_status_context() {
        let store = MemoryStore::new();
        assert_eq!(store.names(), [STATUS_CONTEXT.to_string()]);
        assert!(matches!(store.view(STATUS_CONTEXT), ContextView::Status(_)));
    }

    #[test]
    fn test_duplicate_context_is_ignored() {
        let mut store = MemoryStore::new();
        store.add_context("#a", Some(JoinState::Joined));
        store.add_context("#a", None);
        assert_eq!(store.names().len(), 2);
        assert_eq!(store.join_state("#a"), Some(JoinState::Joined));
    }

    #[test]
    fn test_push_counts_unread_until_marked_read() {
        let mut store = MemoryStore::new();
        store.add_context("#a", Some(JoinState::Joined));
        store.push_message("#a", MessageLine::new("one", ColorName::Message));
        store.push_message("#a", MessageLine::new("two", ColorName::Message));
        assert_eq!(store.unread_count("#a"), 2);

        store.mark_read("#a");
        assert_eq!(store.unread_count("#a"), 0);
        assert_eq!(store.unread_count("#missing"), 0);
    }

    fn offset(store: &MemoryStore, name: &str) -> Option<usize> {
        store.context(name).map(|e| e.scroll_offset)
    }

    #[test]
    fn test_scroll_stops_when_oldest_line_is_on_screen() {
        let mut store = MemoryStore::new();
        for i in 0..10 {
            store.push_message(STATUS_CONTEXT, MessageLine::new(format!("{i}"), ColorName::System));
        }
        store.scroll_messages(STATUS_CONTEXT, 100, 4);
        assert_eq!(offset(&store, STATUS_CONTEXT), Some(6));

        // One step down moves the window at once
        store.scroll_messages(STATUS_CONTEXT, -1, 4);
        assert_eq!(offset(&store, STATUS_CONTEXT), Some(5));

        store.scroll_messages(STATUS_CONTEXT, -100, 4);
        assert_eq!(offset(&store, STATUS_CONTEXT), Some(0));
    }

    #[test]
    fn test_short_history_does_not_scroll() {
        let mut store = MemoryStore::new();
        for i in 0..3 {
            store.push_message(STATUS_CONTEXT, MessageLine::new(format!("{i}"), ColorName::System));
        }
        store.scroll_messages(STATUS_CONTEXT, 10, 8);
        assert_eq!(offset(&store, STATUS_CONTEXT), Some(0));
    }

    #[test]
    fn test_transfer_list_scrolls_over_transfers() {
        let mut store = MemoryStore::new();
        store.add_context(TRANSFER_CONTEXT, None);
        for id in 0..5 {
            store.push_transfer(TransferStatus {
                id,
                peer: "bob".to_string(),
                file_name: format!("part{id}.bin"),
                direction: TransferDirection::Receive,
                bytes_done: 0,
                bytes_total: 10,
                state: TransferState::Waiting,
            });
        }
        assert_eq!(store.transfers().len(), 5);
        store.scroll_messages(TRANSFER_CONTEXT, 10, 2);
        assert_eq!(offset(&store, TRANSFER_CONTEXT), Some(3));
        assert!(matches!(
            store.view(TRANSFER_CONTEXT),
            ContextView::TransferList { scroll_offset: 3 }
        ));
    }

    #[test]
    fn test_user_scroll_stops_at_last_page() {
        let mut store = MemoryStore::new();
        store.add_context("#a", Some(JoinState::Joined));
        for i in 0..10 {
            store.add_member("#a", &format!("user{i}"), "");
        }
        store.scroll_users("#a", 100, 4);
        // Last page: "^ 7 more" then three members
        let users_offset = |s: &MemoryStore| s.context("#a").map(|e| e.membership.scroll_offset);
        assert_eq!(users_offset(&store), Some(7));
        assert_eq!(user_page(10, 4, 7).end, 10);

        store.scroll_users("#a", -100, 4);
        assert_eq!(users_offset(&store), Some(0));
    }

    #[test]
    fn test_scrolled_back_view_stays_put_on_new_message() {
        let mut store = MemoryStore::new();
        for i in 0..5 {
            store.push_message(STATUS_CONTEXT, MessageLine::new(format!("{i}"), ColorName::System));
        }
        store.scroll_messages(STATUS_CONTEXT, 2, 2);
        store.push_message(STATUS_CONTEXT, MessageLine::new("new", ColorName::System));
        assert_eq!(offset(&store, STATUS_CONTEXT), Some(3));
    }

    #[test]
    fn test_views_and_details_by_context_kind() {
        let store = MemoryStore::sample("alice", "irc.example.net");
        assert!(matches!(
            store.view(TRANSFER_CONTEXT),
            ContextView::TransferList { scroll_offset: 0 }
        ));
        assert!(matches!(store.view("bob"), ContextView::Plain(_)));
        assert!(matches!(store.details("bob"), ContextDetails::Other));
        match store.details("#rust") {
            ContextDetails::Channel { state, membership } => {
                assert_eq!(state, JoinState::Joined);
                assert_eq!(membership.users.get("alice").map(String::as_str), Some("@"));
            }
            ContextDetails::Other => panic!("#rust should be a channel"),
        }
        assert_eq!(store.transfers().len(), 2);
    }
}
