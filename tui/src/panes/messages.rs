//! Message Panel Renderer
//!
//! Paints the newest slice of a context's history that fits the pane,
//! sliding back as the scroll offset grows. Lines are highlighted word by
//! word and clipped to the pane; whatever a line leaves empty is filled
//! with its base background so a shorter line never shows leftovers.

use std::ops::Range;

use unicode_width::UnicodeWidthStr;

use crate::compositor::Surface;
use crate::display::{ContextView, MessageLine, MessageView, TransferRegistry};
use crate::draw::{self, DrawResultExt};
use crate::panes::highlight::highlight_line;
use crate::theme::{ColorName, Palette};

/// Shown when the transfer list is empty
const NO_TRANSFERS: &str = "No active transfers";

/// Indices of the items visible in a pane of `visible` rows
///
/// `offset` counts items hidden below the window (newer than it) and is
/// clamped so the window never runs past either end. With `offset == 0`
/// the window ends at the newest item.
pub fn visible_window(total: usize, visible: usize, offset: usize) -> Range<usize> {
    let offset = offset.min(total.saturating_sub(visible));
    let end = total - offset;
    let start = end.saturating_sub(visible);
    start..end
}

/// Paint one message pane
pub fn paint(
    surface: Option<&mut Surface>,
    palette: &Palette,
    view: &ContextView<'_>,
    transfers: &dyn TransferRegistry,
) {
    let Some(surface) = surface else {
        tracing::trace!("message pane has no surface");
        return;
    };
    let (height, width) = match draw::live_bounds(surface) {
        Ok(size) => size,
        Err(e) => {
            tracing::warn!(error = %e, "message pane bounds unavailable");
            return;
        }
    };

    draw::erase(Some(&mut *surface)).log_failure("erase messages");
    match view {
        ContextView::Plain(history) | ContextView::Status(history) => {
            paint_history(surface, palette, history, height, width)
        }
        ContextView::TransferList { scroll_offset } => {
            paint_transfers(surface, palette, transfers, *scroll_offset, height)
        }
    }
}

/// Paint both halves of a split view in one pass
pub fn paint_split(
    top: Option<&mut Surface>,
    top_view: &ContextView<'_>,
    bottom: Option<&mut Surface>,
    bottom_view: &ContextView<'_>,
    palette: &Palette,
    transfers: &dyn TransferRegistry,
) {
    paint(top, palette, top_view, transfers);
    paint(bottom, palette, bottom_view, transfers);
}

fn paint_history(
    surface: &mut Surface,
    palette: &Palette,
    history: &MessageView<'_>,
    height: u16,
    width: u16,
) {
    let window = visible_window(
        history.messages.len(),
        usize::from(height),
        history.scroll_offset,
    );
    let lines = &history.messages[window];

    for (row, line) in lines.iter().enumerate() {
        paint_line(surface, palette, row as u16, line, width);
    }
}

fn paint_line(surface: &mut Surface, palette: &Palette, row: u16, line: &MessageLine, width: u16) {
    // Last column stays reserved
    let usable = width.saturating_sub(1);
    let mut col: u16 = 0;

    for segment in highlight_line(&line.text, line.color) {
        if col >= usable {
            break;
        }
        draw::write_text(
            Some(&mut *surface),
            row,
            col,
            &segment.text,
            palette.get_color(segment.color),
        )
        .log_failure("write segment");
        let seg_width = u16::try_from(segment.text.width()).unwrap_or(u16::MAX);
        col = col.saturating_add(seg_width).min(usable);
    }

    if col < usable {
        draw::fill_row(Some(surface), row, col, palette.background(line.color))
            .log_failure("fill line");
    }
}

fn paint_transfers(
    surface: &mut Surface,
    palette: &Palette,
    registry: &dyn TransferRegistry,
    scroll_offset: usize,
    height: u16,
) {
    let lines: Vec<String> = registry.transfers().iter().map(ToString::to_string).collect();
    if lines.is_empty() {
        draw::write_text(Some(surface), 0, 0, NO_TRANSFERS, palette.get_color(ColorName::System))
            .log_failure("write transfer placeholder");
        return;
    }

    let window = visible_window(lines.len(), usize::from(height), scroll_offset);
    let style = palette.get_color(ColorName::Transfer);
    for (row, line) in lines[window].iter().enumerate() {
        draw::write_text(Some(&mut *surface), row as u16, 0, line, style)
            .log_failure("write transfer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{SurfaceId, SurfaceKind};
    use crate::display::{TransferDirection, TransferState, TransferStatus};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    struct NoTransfers;

    impl TransferRegistry for NoTransfers {
        fn transfers(&self) -> Vec<TransferStatus> {
            Vec::new()
        }
    }

    struct Transfers(Vec<TransferStatus>);

    impl TransferRegistry for Transfers {
        fn transfers(&self) -> Vec<TransferStatus> {
            self.0.clone()
        }
    }

    fn surface(height: u16, width: u16) -> Surface {
        Surface::new(
            SurfaceId(0),
            Rect::new(0, 0, width, height),
            SurfaceKind::Scrolling,
            Style::default(),
        )
    }

    fn rows(s: &Surface) -> Vec<String> {
        (0..s.buffer.area.height)
            .map(|y| {
                (0..s.buffer.area.width)
                    .map(|x| s.buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(""))
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    fn history(n: usize) -> Vec<MessageLine> {
        (0..n)
            .map(|i| MessageLine::new(format!("line {i}"), ColorName::Message))
            .collect()
    }

    #[test]
    fn test_window_anchors_to_newest() {
        assert_eq!(visible_window(10, 3, 0), 7..10);
        assert_eq!(visible_window(10, 3, 2), 5..8);
        assert_eq!(visible_window(10, 3, 100), 0..3);
        assert_eq!(visible_window(2, 5, 4), 0..2);
        assert_eq!(visible_window(0, 5, 0), 0..0);
    }

    #[test]
    fn test_paint_newest_lines() {
        let messages = history(5);
        let mut s = surface(3, 20);
        let view = ContextView::Plain(MessageView {
            messages: &messages,
            scroll_offset: 0,
        });
        paint(Some(&mut s), &Palette::standard(), &view, &NoTransfers);
        assert_eq!(rows(&s), vec!["line 2", "line 3", "line 4"]);
        assert!(s.dirty);
    }

    #[test]
    fn test_paint_scrolled_back() {
        let messages = history(5);
        let mut s = surface(2, 20);
        let view = ContextView::Status(MessageView {
            messages: &messages,
            scroll_offset: 2,
        });
        paint(Some(&mut s), &Palette::standard(), &view, &NoTransfers);
        assert_eq!(rows(&s), vec!["line 1", "line 2"]);
    }

    #[test]
    fn test_shorter_line_clears_previous_content() {
        let long = vec![MessageLine::new("a much longer line here", ColorName::Message)];
        let short = vec![MessageLine::new("short", ColorName::Message)];
        let mut s = surface(1, 30);
        let palette = Palette::standard();

        let view = ContextView::Plain(MessageView {
            messages: &long,
            scroll_offset: 0,
        });
        paint(Some(&mut s), &palette, &view, &NoTransfers);
        let view = ContextView::Plain(MessageView {
            messages: &short,
            scroll_offset: 0,
        });
        paint(Some(&mut s), &palette, &view, &NoTransfers);
        assert_eq!(rows(&s), vec!["short"]);
    }

    #[test]
    fn test_long_line_is_clipped() {
        let messages = vec![MessageLine::new("#channel @nick and more words", ColorName::Message)];
        let mut s = surface(1, 12);
        let view = ContextView::Plain(MessageView {
            messages: &messages,
            scroll_offset: 0,
        });
        let palette = Palette::standard();
        paint(Some(&mut s), &palette, &view, &NoTransfers);
        assert_eq!(rows(&s), vec!["#channel @n"]);
        assert_eq!(
            s.buffer.cell((0, 0)).map(|c| c.fg),
            palette.get_color(ColorName::Channel).fg
        );
    }

    #[test]
    fn test_missing_surface_is_ignored() {
        let messages = history(3);
        let view = ContextView::Plain(MessageView {
            messages: &messages,
            scroll_offset: 0,
        });
        paint(None, &Palette::standard(), &view, &NoTransfers);
    }

    #[test]
    fn test_transfer_list_mode() {
        let registry = Transfers(
            (1..=3)
                .map(|id| TransferStatus {
                    id,
                    peer: "carol".to_string(),
                    file_name: format!("f{id}.bin"),
                    direction: TransferDirection::Send,
                    bytes_done: 0,
                    bytes_total: 10,
                    state: TransferState::Waiting,
                })
                .collect(),
        );
        let mut s = surface(2, 60);
        let view = ContextView::TransferList { scroll_offset: 0 };
        paint(Some(&mut s), &Palette::standard(), &view, &registry);

        let painted = rows(&s);
        assert!(painted[0].starts_with("#2"));
        assert!(painted[1].starts_with("#3"));
    }

    #[test]
    fn test_empty_transfer_list_placeholder() {
        let mut s = surface(2, 30);
        let view = ContextView::TransferList { scroll_offset: 0 };
        paint(Some(&mut s), &Palette::standard(), &view, &NoTransfers);
        assert_eq!(rows(&s), vec![NO_TRANSFERS, ""]);
    }

    #[test]
    fn test_split_paints_both_surfaces() {
        let upper = history(2);
        let lower = vec![MessageLine::new("other", ColorName::Message)];
        let mut top = surface(2, 20);
        let mut bottom = surface(2, 20);
        paint_split(
            Some(&mut top),
            &ContextView::Plain(MessageView {
                messages: &upper,
                scroll_offset: 0,
            }),
            Some(&mut bottom),
            &ContextView::Plain(MessageView {
                messages: &lower,
                scroll_offset: 0,
            }),
            &Palette::standard(),
            &NoTransfers,
        );
        assert_eq!(rows(&top), vec!["line 0", "line 1"]);
        assert_eq!(rows(&bottom), vec!["other", ""]);
    }

    proptest! {
        #[test]
        fn prop_window_stays_in_range(total in 0usize..500, visible in 1usize..100, offset in 0usize..1000) {
            let window = visible_window(total, visible, offset);
            prop_assert!(window.start <= window.end);
            prop_assert!(window.end <= total);
            prop_assert!(window.end - window.start <= visible);
            if offset == 0 {
                prop_assert_eq!(window.end, total);
            }
        }
    }
}
