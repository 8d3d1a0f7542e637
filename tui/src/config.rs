//! Render Configuration
//!
//! Knobs for the rendering engine, read from the environment by the client
//! binary. Every field has a working default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::theme::Palette;

/// Default sidebar width below which the user list is replaced by a placeholder
pub const DEFAULT_USER_LIST_MIN_WIDTH: u16 = 10;

/// Rendering configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Start with the message pane split in two
    pub split_view: bool,
    /// Target time between frames in milliseconds
    pub frame_interval_ms: u64,
    /// Sidebar width needed to list members
    pub user_list_min_width: u16,
    /// Palette overrides, `name=fg[:bg]` separated by commas
    pub theme: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            split_view: false,
            frame_interval_ms: 50,
            user_list_min_width: DEFAULT_USER_LIST_MIN_WIDTH,
            theme: None,
        }
    }
}

impl RenderConfig {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            split_view: lookup("IRCTERM_SPLIT")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.split_view),
            frame_interval_ms: lookup("IRCTERM_FRAME_MS")
                .and_then(|v| v.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.frame_interval_ms),
            user_list_min_width: lookup("IRCTERM_USER_LIST_MIN_WIDTH")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.user_list_min_width),
            theme: lookup("IRCTERM_THEME").filter(|v| !v.trim().is_empty()),
        }
    }

    /// Frame interval as a duration
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// The palette with any configured overrides applied
    pub fn palette(&self) -> Palette {
        match &self.theme {
            Some(theme) => Palette::with_overrides(theme),
            None => Palette::standard(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ColorName;
    use ratatui::style::Color;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(RenderConfig::from_lookup(lookup(&[])), RenderConfig::default());
    }

    #[test]
    fn test_values_from_lookup() {
        let config = RenderConfig::from_lookup(lookup(&[
            ("IRCTERM_SPLIT", "true"),
            ("IRCTERM_FRAME_MS", "16"),
            ("IRCTERM_USER_LIST_MIN_WIDTH", "12"),
            ("IRCTERM_THEME", "error=magenta"),
        ]));
        assert!(config.split_view);
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
        assert_eq!(config.user_list_min_width, 12);
        assert_eq!(
            config.palette().get_color(ColorName::Error).fg,
            Some(Color::Magenta)
        );
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = RenderConfig::from_lookup(lookup(&[
            ("IRCTERM_FRAME_MS", "0"),
            ("IRCTERM_USER_LIST_MIN_WIDTH", "wide"),
        ]));
        assert_eq!(config.frame_interval_ms, 50);
        assert_eq!(config.user_list_min_width, DEFAULT_USER_LIST_MIN_WIDTH);
    }
}
