//! Sidebar Panel Renderer
//!
//! Two stacked sections share the sidebar:
//!
//! - the context list, always shown: the status context pinned first, the
//!   transfer list pinned last, everything else sorted case-insensitively
//! - the user list, only while the active context is a joined channel,
//!   paginated with "more above" / "more below" lines
//!
//! Each section's background is laid down before its text so rows from a
//! previous, taller render never show through.

use unicode_width::UnicodeWidthStr;

use crate::compositor::Surface;
use crate::display::{
    ContextDetails, ContextDirectory, JoinState, Membership, STATUS_CONTEXT, TRANSFER_CONTEXT,
};
use crate::draw::{self, DrawResultExt};
use crate::theme::{ColorName, Palette};

/// Placeholder when the sidebar is too narrow for member rows
pub const USERS_HIDDEN: &str = "[Users Hidden]";

/// Header of the context list
const CONTEXTS_HEADER: &str = "Contexts";

/// What the sidebar paints this frame
#[derive(Clone, Copy, Debug)]
pub struct SidebarContent<'a> {
    /// Name of the active context
    pub active: &'a str,
    /// Every context name, in any order
    pub contexts: &'a [String],
    /// Facts about the active context
    pub details: ContextDetails<'a>,
}

/// Display order: status first, transfer list last, the rest alphabetical
pub fn order_contexts(names: &[String]) -> Vec<&str> {
    let mut middle: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|n| *n != STATUS_CONTEXT && *n != TRANSFER_CONTEXT)
        .collect();
    middle.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });

    let has = |wanted: &str| names.iter().any(|n| n == wanted);
    let mut ordered = Vec::with_capacity(names.len());
    if has(STATUS_CONTEXT) {
        ordered.push(STATUS_CONTEXT);
    }
    ordered.extend(middle);
    if has(TRANSFER_CONTEXT) {
        ordered.push(TRANSFER_CONTEXT);
    }
    ordered
}

/// One page of the user list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserPage {
    /// First member shown
    pub start: usize,
    /// One past the last member shown
    pub end: usize,
    /// Members hidden above (0 = no indicator line)
    pub more_above: usize,
    /// Members hidden below (0 = no indicator line)
    pub more_below: usize,
}

/// Paginate `total` members into `lines` rows starting at `offset`
///
/// Indicator lines take rows away from members. The offset is clamped so
/// the last page ends exactly at the last member.
pub fn user_page(total: usize, lines: usize, offset: usize) -> UserPage {
    let max_offset = if total > lines { total - lines + 1 } else { 0 };
    let start = offset.min(max_offset);

    let mut capacity = lines;
    if start > 0 {
        capacity = capacity.saturating_sub(1);
    }
    if start + capacity < total {
        capacity = capacity.saturating_sub(1);
    }
    let end = (start + capacity).min(total);

    UserPage {
        start,
        end,
        more_above: start,
        more_below: total - end,
    }
}

/// Rows below the "Users" header for members and indicator lines
pub fn user_list_rows(height: u16, context_count: usize) -> usize {
    usize::from(height).saturating_sub(usize::from(context_section_rows(height, context_count)) + 1)
}

/// Context section height while the user list shares the sidebar
fn context_section_rows(height: u16, context_count: usize) -> u16 {
    let rows = (context_count + 1).min(usize::from(height / 2).max(1));
    u16::try_from(rows).unwrap_or(height)
}

/// Paint the sidebar
pub fn paint(
    surface: Option<&mut Surface>,
    palette: &Palette,
    content: &SidebarContent<'_>,
    directory: &dyn ContextDirectory,
    min_user_width: u16,
) {
    let Some(surface) = surface else {
        tracing::trace!("sidebar has no surface");
        return;
    };
    let (height, width) = match draw::live_bounds(surface) {
        Ok(size) => size,
        Err(e) => {
            tracing::warn!(error = %e, "sidebar bounds unavailable");
            return;
        }
    };

    let membership = match content.details {
        ContextDetails::Channel {
            state: JoinState::Joined,
            membership,
        } => Some(membership),
        _ => None,
    };
    let ordered = order_contexts(content.contexts);
    let context_rows = match membership {
        Some(_) => context_section_rows(height, ordered.len()),
        None => height,
    };

    draw::erase(Some(&mut *surface)).log_failure("erase sidebar");
    paint_contexts(
        surface,
        palette,
        &ordered,
        content.active,
        directory,
        context_rows,
        width,
    );

    if let Some(membership) = membership {
        let user_bg = palette.background(ColorName::UserList);
        for row in context_rows..height {
            draw::fill_row(Some(&mut *surface), row, 0, user_bg).log_failure("fill user list");
        }
        paint_users(surface, palette, membership, context_rows, height, width, min_user_width);
    }
}

fn paint_contexts(
    surface: &mut Surface,
    palette: &Palette,
    ordered: &[&str],
    active: &str,
    directory: &dyn ContextDirectory,
    rows: u16,
    width: u16,
) {
    if rows == 0 {
        return;
    }
    draw::write_text(
        Some(&mut *surface),
        0,
        0,
        CONTEXTS_HEADER,
        palette.get_color(ColorName::SidebarHeader),
    )
    .log_failure("write contexts header");

    // Keep the active entry on screen when the list is longer than the section
    let capacity = usize::from(rows - 1);
    let active_index = ordered.iter().position(|n| *n == active).unwrap_or(0);
    let start = (active_index + 1).saturating_sub(capacity);
    let window = start..(start + capacity).min(ordered.len());

    let pad = palette.background(ColorName::Sidebar);
    for (i, name) in ordered[window].iter().enumerate() {
        let row = 1 + i as u16;
        let unread = directory.unread_count(name);
        let is_active = *name == active;

        let prefix = if is_active {
            '>'
        } else if unread > 0 {
            '*'
        } else {
            ' '
        };
        let mut text = format!("{prefix}{name}");
        if unread > 0 && !is_active {
            text.push_str(&format!(" ({unread})"));
        }
        let style = if is_active {
            palette.get_color(ColorName::ActiveContext)
        } else if unread > 0 {
            palette.get_color(ColorName::Unread)
        } else {
            palette.get_color(ColorName::Sidebar)
        };

        draw::write_text(Some(&mut *surface), row, 0, &text, style).log_failure("write context");
        let mut col = clamp_col(text.width(), width);

        if let Some((suffix, color)) = directory.join_state(name).and_then(|s| s.suffix()) {
            draw::write_text(
                Some(&mut *surface),
                row,
                col,
                &format!(" {suffix}"),
                palette.get_color(color),
            )
            .log_failure("write context suffix");
            col = clamp_col(usize::from(col) + suffix.width() + 1, width);
        }

        if col + 1 < width {
            draw::fill_row(Some(&mut *surface), row, col, pad).log_failure("pad context");
        }
    }
}

fn paint_users(
    surface: &mut Surface,
    palette: &Palette,
    membership: &Membership,
    top: u16,
    height: u16,
    width: u16,
    min_user_width: u16,
) {
    if top >= height {
        return;
    }
    if width < min_user_width {
        draw::write_text(
            Some(surface),
            top,
            0,
            USERS_HIDDEN,
            palette.get_color(ColorName::Dim),
        )
        .log_failure("write users hidden");
        return;
    }

    let mut members: Vec<(&str, &str)> = membership
        .users
        .iter()
        .map(|(name, marker)| (name.as_str(), marker.as_str()))
        .collect();
    members.sort_by(|a, b| {
        a.0.to_lowercase()
            .cmp(&b.0.to_lowercase())
            .then_with(|| a.0.cmp(b.0))
    });

    draw::write_text(
        Some(&mut *surface),
        top,
        0,
        &format!("Users ({})", members.len()),
        palette.get_color(ColorName::SidebarHeader),
    )
    .log_failure("write users header");

    let lines = usize::from(height - top - 1);
    let page = user_page(members.len(), lines, membership.scroll_offset);
    let dim = palette.get_color(ColorName::Dim);
    let mut row = top + 1;

    if page.more_above > 0 {
        draw::write_text(
            Some(&mut *surface),
            row,
            0,
            &format!("^ {} more", page.more_above),
            dim,
        )
        .log_failure("write more above");
        row += 1;
    }

    for (name, marker) in &members[page.start..page.end] {
        let color = match marker.chars().next() {
            Some('@' | '~' | '&' | '%') => ColorName::UserOp,
            Some('+') => ColorName::UserVoice,
            _ => ColorName::UserList,
        };
        draw::write_text(
            Some(&mut *surface),
            row,
            0,
            &format!("{marker}{name}"),
            palette.get_color(color),
        )
        .log_failure("write user");
        row += 1;
    }

    if page.more_below > 0 {
        draw::write_text(
            Some(surface),
            row,
            0,
            &format!("v {} more", page.more_below),
            dim,
        )
        .log_failure("write more below");
    }
}

fn clamp_col(col: usize, width: u16) -> u16 {
    u16::try_from(col).unwrap_or(u16::MAX).min(width)
}
