//! Terminal setup and teardown.
//!
//! The interface is drawn on stderr so stdout stays clean for the submitted
//! BibTeX. Raw mode, the alternate screen and bracketed paste are entered
//! together and undone in reverse order, also when the guard is dropped
//! while unwinding.

use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::{debug, warn};

/// Terminal setup/teardown handle.
pub struct TerminalGuard {
    out: io::Stderr,
    is_raw: bool,
    is_fullscreen: bool,
    bracketed_paste: bool,
}

impl TerminalGuard {
    /// Enter fullscreen mode on stderr.
    pub fn enter() -> io::Result<Self> {
        let mut guard = Self {
            out: io::stderr(),
            is_raw: false,
            is_fullscreen: false,
            bracketed_paste: false,
        };

        terminal::enable_raw_mode()?;
        guard.is_raw = true;

        execute!(guard.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        guard.is_fullscreen = true;

        // Paste arrives as one event
        execute!(guard.out, EnableBracketedPaste)?;
        guard.bracketed_paste = true;

        debug!("terminal entered fullscreen");
        Ok(guard)
    }

    /// Current terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// The stream the interface is drawn on.
    pub fn out(&mut self) -> &mut io::Stderr {
        &mut self.out
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn exit(&mut self) -> io::Result<()> {
        if self.bracketed_paste {
            queue!(self.out, DisableBracketedPaste)?;
            self.bracketed_paste = false;
        }
        if self.is_fullscreen {
            queue!(self.out, Show, LeaveAlternateScreen)?;
            self.is_fullscreen = false;
        }
        self.out.flush()?;
        if self.is_raw {
            terminal::disable_raw_mode()?;
            self.is_raw = false;
        }
        debug!("terminal restored");
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}
