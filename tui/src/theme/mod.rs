//! Theme and Colors
//!
//! The ircterm palette: a closed set of semantic color names, each mapped to
//! a ratatui [`Style`]. Renderers never name raw colors; they ask the palette
//! for a [`ColorName`] and get back a style that is always defined.
//!
//! The palette is declared once when the screen is initialized and is
//! immutable afterwards. User overrides come in through
//! [`Palette::with_overrides`]; an override that fails to parse is logged and
//! its entry falls back to the terminal default style.

use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

// ============================================================================
// Semantic Color Names
// ============================================================================

/// Every color role the renderers know about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorName {
    /// Neutral style used for anything unregistered
    Default,
    /// Message pane background and plain text
    Message,
    /// Lines the local user sent
    OwnMessage,
    /// Server notices and client-generated info lines
    System,
    /// Error lines and failed states
    Error,
    /// Lines or tokens that mention the local user
    Highlight,
    /// `#channel` tokens
    Channel,
    /// `@nick` tokens
    Nick,
    /// `+mode` tokens
    Mode,
    /// `[HH:MM:SS]` timestamps
    Timestamp,
    /// Server host names
    Server,
    /// Transfer list lines
    Transfer,
    /// Sidebar background
    Sidebar,
    /// Section headers in the sidebar
    SidebarHeader,
    /// The active context entry
    ActiveContext,
    /// Contexts with unread messages
    Unread,
    /// Dimmed suffixes and indicators
    Dim,
    /// User list background
    UserList,
    /// Members with elevated privileges (`@`, `~`, `&`, `%`)
    UserOp,
    /// Voiced members (`+`)
    UserVoice,
    /// Status bar
    StatusBar,
    /// Input line
    Input,
    /// Input prompt
    Prompt,
}

impl ColorName {
    /// All names, in declaration order
    pub const ALL: [ColorName; 23] = [
        ColorName::Default,
        ColorName::Message,
        ColorName::OwnMessage,
        ColorName::System,
        ColorName::Error,
        ColorName::Highlight,
        ColorName::Channel,
        ColorName::Nick,
        ColorName::Mode,
        ColorName::Timestamp,
        ColorName::Server,
        ColorName::Transfer,
        ColorName::Sidebar,
        ColorName::SidebarHeader,
        ColorName::ActiveContext,
        ColorName::Unread,
        ColorName::Dim,
        ColorName::UserList,
        ColorName::UserOp,
        ColorName::UserVoice,
        ColorName::StatusBar,
        ColorName::Input,
        ColorName::Prompt,
    ];

    /// The name used in configuration strings
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorName::Default => "default",
            ColorName::Message => "message",
            ColorName::OwnMessage => "own_message",
            ColorName::System => "system",
            ColorName::Error => "error",
            ColorName::Highlight => "highlight",
            ColorName::Channel => "channel",
            ColorName::Nick => "nick",
            ColorName::Mode => "mode",
            ColorName::Timestamp => "timestamp",
            ColorName::Server => "server",
            ColorName::Transfer => "transfer",
            ColorName::Sidebar => "sidebar",
            ColorName::SidebarHeader => "sidebar_header",
            ColorName::ActiveContext => "active_context",
            ColorName::Unread => "unread",
            ColorName::Dim => "dim",
            ColorName::UserList => "user_list",
            ColorName::UserOp => "user_op",
            ColorName::UserVoice => "user_voice",
            ColorName::StatusBar => "status_bar",
            ColorName::Input => "input",
            ColorName::Prompt => "prompt",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorName {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ColorName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ThemeError::UnknownColorName(wanted.to_string()))
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failures while registering palette entries
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    /// The override names a color role that does not exist
    #[error("unknown color name `{0}`")]
    UnknownColorName(String),

    /// The override value is not a color ratatui understands
    #[error("invalid color `{value}` for `{name}`")]
    InvalidColor {
        /// Role being registered
        name: String,
        /// The rejected value
        value: String,
    },

    /// The override entry is not `name=fg[:bg]`
    #[error("malformed theme entry `{0}`")]
    Malformed(String),
}

// ============================================================================
// Palette
// ============================================================================

/// Built-in declarations: (name, foreground, background, bold)
const STANDARD: [(ColorName, Color, Color, bool); 23] = [
    (ColorName::Default, Color::Reset, Color::Reset, false),
    (ColorName::Message, Color::Gray, Color::Reset, false),
    (ColorName::OwnMessage, Color::Green, Color::Reset, false),
    (ColorName::System, Color::DarkGray, Color::Reset, false),
    (ColorName::Error, Color::LightRed, Color::Reset, true),
    (ColorName::Highlight, Color::Yellow, Color::Reset, true),
    (ColorName::Channel, Color::Cyan, Color::Reset, false),
    (ColorName::Nick, Color::Magenta, Color::Reset, false),
    (ColorName::Mode, Color::LightGreen, Color::Reset, false),
    (ColorName::Timestamp, Color::Blue, Color::Reset, false),
    (ColorName::Server, Color::LightBlue, Color::Reset, false),
    (ColorName::Transfer, Color::LightCyan, Color::Reset, false),
    (ColorName::Sidebar, Color::White, Color::Black, false),
    (ColorName::SidebarHeader, Color::Yellow, Color::Black, true),
    (ColorName::ActiveContext, Color::Black, Color::Cyan, true),
    (ColorName::Unread, Color::LightMagenta, Color::Black, true),
    (ColorName::Dim, Color::DarkGray, Color::Black, false),
    (ColorName::UserList, Color::Gray, Color::Black, false),
    (ColorName::UserOp, Color::LightRed, Color::Black, true),
    (ColorName::UserVoice, Color::LightGreen, Color::Black, false),
    (ColorName::StatusBar, Color::Black, Color::Blue, false),
    (ColorName::Input, Color::White, Color::Reset, false),
    (ColorName::Prompt, Color::Cyan, Color::Reset, true),
];

/// Semantic name → style mapping
///
/// The mapping is total: every [`ColorName`] resolves to a style.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    styles: [Style; ColorName::ALL.len()],
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

impl Palette {
    /// The built-in palette
    pub fn standard() -> Self {
        let mut styles = [Style::default(); ColorName::ALL.len()];
        for (name, fg, bg, bold) in STANDARD {
            let mut style = Style::default().fg(fg).bg(bg);
            if bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            styles[name.index()] = style;
        }
        Self { styles }
    }

    /// The built-in palette with `name=fg[:bg]` entries applied on top
    ///
    /// Entries are comma separated. A rejected entry is logged and the role
    /// it names (when known) falls back to the default style.
    pub fn with_overrides(overrides: &str) -> Self {
        let mut palette = Self::standard();
        for entry in overrides.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            if let Err(e) = palette.register(entry) {
                tracing::warn!(entry, error = %e, "color registration failed, using default style");
                if let Some(name) = entry
                    .split_once('=')
                    .and_then(|(name, _)| name.parse::<ColorName>().ok())
                {
                    palette.styles[name.index()] = Style::default();
                }
            }
        }
        palette
    }

    /// Register one `name=fg[:bg]` override
    fn register(&mut self, entry: &str) -> Result<(), ThemeError> {
        let (name, value) = entry
            .split_once('=')
            .ok_or_else(|| ThemeError::Malformed(entry.to_string()))?;
        let name: ColorName = name.parse()?;

        let (fg, bg) = match value.split_once(':') {
            Some((fg, bg)) => (fg, Some(bg)),
            None => (value, None),
        };

        let mut style = self.styles[name.index()].fg(parse_color(name, fg)?);
        if let Some(bg) = bg {
            style = style.bg(parse_color(name, bg)?);
        }
        self.styles[name.index()] = style;
        Ok(())
    }

    /// Style for a semantic name
    pub fn get_color(&self, name: ColorName) -> Style {
        self.styles[name.index()]
    }

    /// Style for a configuration-string name; unknown names get the neutral style
    pub fn get_color_by_name(&self, name: &str) -> Style {
        name.parse::<ColorName>()
            .map(|n| self.get_color(n))
            .unwrap_or_else(|_| self.get_color(ColorName::Default))
    }

    /// Background-only style for a name, used to fill empty cells
    pub fn background(&self, name: ColorName) -> Style {
        let style = self.get_color(name);
        Style::default().bg(style.bg.unwrap_or(Color::Reset))
    }
}

/// Parse a color value (`red`, `#ff8800`, `208`)
pub fn parse_color(name: ColorName, value: &str) -> Result<Color, ThemeError> {
    Color::from_str(value.trim()).map_err(|_| ThemeError::InvalidColor {
        name: name.to_string(),
        value: value.trim().to_string(),
    })
}
