//! Inline highlighting for message lines
//!
//! A line is scanned into whitespace runs and words. Words with a
//! recognized shape get their own color; everything else, including the
//! whitespace, keeps the line's base color. Segments are never rewritten,
//! so joining their text gives back the original line.

use crate::theme::ColorName;

/// A run of text painted in one color
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub color: ColorName,
}

/// Split `line` into colored segments
pub fn highlight_line(line: &str, base: ColorName) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut push = |text: &str, color: ColorName| match segments.last_mut() {
        Some(last) if last.color == color => last.text.push_str(text),
        _ => segments.push(Segment {
            text: text.to_string(),
            color,
        }),
    };

    let mut start = 0;
    let mut in_space = None;
    for (i, ch) in line.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                let run = &line[start..i];
                push(run, if prev { base } else { classify(run, base) });
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if let Some(space) = in_space {
        let run = &line[start..];
        push(run, if space { base } else { classify(run, base) });
    }

    segments
}

/// Color for one word
fn classify(word: &str, base: ColorName) -> ColorName {
    if is_timestamp(word) {
        return ColorName::Timestamp;
    }
    let mut chars = word.chars();
    let has_body = word.chars().count() > 1;
    match chars.next() {
        Some('#') if has_body => ColorName::Channel,
        Some('@') if has_body => ColorName::Nick,
        Some('+') if has_body => ColorName::Mode,
        _ if is_server_name(word) => ColorName::Server,
        _ => base,
    }
}

/// `[HH:MM:SS]`
fn is_timestamp(word: &str) -> bool {
    let bytes = word.as_bytes();
    if bytes.len() != 10 || bytes[0] != b'[' || bytes[9] != b']' {
        return false;
    }
    bytes[1..9].iter().enumerate().all(|(i, b)| match i {
        2 | 5 => *b == b':',
        _ => b.is_ascii_digit(),
    })
}

/// Dotted host names such as `irc.libera.chat`
fn is_server_name(word: &str) -> bool {
    let labels: Vec<&str> = word.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    labels_ok && tld_ok
}
