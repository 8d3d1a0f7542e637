//! Screen Manager
//!
//! Owns the physical terminal and the palette. There is exactly one
//! [`Screen`]; it is passed by reference to whatever needs the palette or
//! the terminal size and is the only thing that writes to the terminal.
//!
//! [`Screen::flush`] is the single physical update per frame: it
//! composites the dirty surfaces and hands the result to ratatui, which
//! diffs against the previous frame and writes only changed cells.

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::style::Style;
use ratatui::Terminal;
use thiserror::Error;

use crate::compositor::Compositor;
use crate::theme::{ColorName, Palette};

/// Terminal-level failures
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("terminal I/O: {0}")]
    Io(#[from] io::Error),
}

/// The physical screen and its palette
pub struct Screen<B: Backend> {
    terminal: Terminal<B>,
    palette: Palette,
    /// Raw mode and the alternate screen were entered by us
    owns_tty: bool,
    torn_down: bool,
}

impl Screen<CrosstermBackend<Stdout>> {
    /// Take over the terminal: raw mode, alternate screen, mouse reporting
    ///
    /// Raw mode gives unechoed, unbuffered key input.
    pub fn initialize(palette: Palette) -> Result<Self, ScreenError> {
        enable_raw_mode()?;
        let setup = (|| {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
            terminal.clear()?;
            Ok::<_, io::Error>(terminal)
        })();

        match setup {
            Ok(terminal) => {
                tracing::debug!("terminal initialized");
                Ok(Self {
                    terminal,
                    palette,
                    owns_tty: true,
                    torn_down: false,
                })
            }
            Err(e) => {
                if let Err(restore) = restore_terminal() {
                    tracing::warn!(error = %restore, "terminal restore failed");
                }
                Err(e.into())
            }
        }
    }
}

impl<B: Backend> Screen<B> {
    /// Wrap an already-prepared backend (tests use ratatui's `TestBackend`)
    pub fn with_backend(backend: B, palette: Palette) -> Result<Self, ScreenError> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            palette,
            owns_tty: false,
            torn_down: false,
        })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Style for a semantic color name
    pub fn get_color(&self, name: ColorName) -> Style {
        self.palette.get_color(name)
    }

    /// Terminal size as `(height, width)`; `(0, 0)` when it cannot be read
    pub fn get_dimensions(&self) -> (u16, u16) {
        match self.terminal.size() {
            Ok(size) => (size.height, size.width),
            Err(e) => {
                tracing::warn!(error = %e, "terminal size query failed");
                (0, 0)
            }
        }
    }

    /// Composite dirty surfaces and push the frame to the terminal
    pub fn flush(&mut self, compositor: &mut Compositor) -> Result<(), ScreenError> {
        let cursor = compositor.cursor_position();
        let output = compositor.composite();

        self.terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    if let Some(cell) = output.cell((x, y)) {
                        buf[(x, y)] = cell.clone();
                    }
                }
            }

            if let Some(position) = cursor {
                frame.set_cursor_position(position);
            }
        })?;

        Ok(())
    }

    /// Restore the terminal; later calls do nothing
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if let Err(e) = self.terminal.show_cursor() {
            tracing::warn!(error = %e, "could not show cursor");
        }
        if self.owns_tty {
            if let Err(e) = restore_terminal() {
                tracing::warn!(error = %e, "terminal restore failed");
            }
        }
        tracing::debug!("terminal restored");
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.terminal.backend_mut()
    }
}

impl<B: Backend> Drop for Screen<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Leave raw mode and the alternate screen
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen, Show)
}

/// Restore the terminal before the default panic output is printed
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}
