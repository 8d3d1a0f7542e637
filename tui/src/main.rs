//! ircterm TUI Entry Point
//!
//! Runs the renderer against an in-memory session so layouts, themes and
//! key handling can be tried without a server.
//!
//! Environment:
//!   IRCTERM_SPLIT                 Start in split view (1/true)
//!   IRCTERM_FRAME_MS              Frame interval in milliseconds (default: 50)
//!   IRCTERM_USER_LIST_MIN_WIDTH   Sidebar width needed for the user list (default: 10)
//!   IRCTERM_THEME                 Palette overrides, e.g. "nick=cyan,error=white:red"
//!   IRCTERM_NICK / IRCTERM_SERVER Names shown on the status line
//!   RUST_LOG                      Log filter; logs go to stderr

use std::io::{self, IsTerminal};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ircterm_tui::screen::install_panic_hook;
use ircterm_tui::{App, MemoryStore, RenderConfig, Screen};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up logging; stdout belongs to the terminal UI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: ircterm-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("Run it interactively, or over SSH with -t.");
        std::process::exit(1);
    }

    // Restore the terminal before a panic message is printed
    install_panic_hook();

    let config = RenderConfig::from_env();
    tracing::debug!(?config, "starting");

    let nick = std::env::var("IRCTERM_NICK").unwrap_or_else(|_| "guest".to_string());
    let server = std::env::var("IRCTERM_SERVER").unwrap_or_else(|_| "irc.example.net".to_string());

    let screen = Screen::initialize(config.palette())?;
    let store = MemoryStore::sample(&nick, &server);
    let mut app = App::new(screen, config, store, nick, server);

    let result = app.run().await;
    app.shutdown();

    // Propagate any errors
    result
}
