//! Terminal frontend.
//!
//! - [`terminal`] - raw mode and alternate screen on stderr
//! - [`view`] - session state laid out as screen lines
//! - [`renderer`] - writes only the rows that changed
//!
//! [`run`] drives a [`Session`] until the user submits or quits. The loop
//! blocks on terminal events, waking early only when a debounced pattern
//! update is due.

pub mod renderer;
pub mod terminal;
pub mod view;

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::Instant;

use crossterm::event::{self, Event};
use tracing::{debug, trace};

use crate::input::{action_for, convert_key_event, Action, Edit};
use crate::session::{Exit, Session};

pub use renderer::LineRenderer;
pub use terminal::TerminalGuard;
pub use view::{compose, content_rows, Frame};

/// Run the interactive session until it ends.
pub fn run(session: &mut Session) -> io::Result<Exit> {
    let mut terminal = TerminalGuard::enter()?;
    let mut renderer = LineRenderer::new();
    let (mut width, mut height) = terminal.size()?;

    // Any payload or error change means the screen is stale
    let dirty = Rc::new(Cell::new(true));
    let _observer = {
        let dirty = dirty.clone();
        Unsubscribe::new(session.pipeline().observe(move |rendered, error| {
            trace!(shown = rendered.shown, has_error = error.is_some(), "pipeline changed");
            dirty.set(true);
        }))
    };

    let exit = loop {
        session.tick(Instant::now());
        session.set_page_height(content_rows(height));
        if dirty.replace(false) {
            let frame = compose(session, width, height);
            renderer.render(terminal.out(), &frame, width)?;
        }

        if let Some(wait) = session.next_deadline(Instant::now()) {
            if !event::poll(wait)? {
                continue;
            }
        }

        match event::read()? {
            Event::Key(key) => {
                let action = action_for(&convert_key_event(key));
                if let Some(exit) = session.handle(action, Instant::now()) {
                    break exit;
                }
                if action != Action::Ignore {
                    dirty.set(true);
                }
            }
            Event::Paste(text) => {
                let now = Instant::now();
                for ch in text.chars().filter(|ch| !ch.is_control()) {
                    session.edit(Edit::Insert(ch), now);
                }
                dirty.set(true);
            }
            Event::Resize(w, h) => {
                debug!(width = w, height = h, "terminal resized");
                width = w;
                height = h;
                renderer.invalidate();
                dirty.set(true);
            }
            _ => {}
        }
    };

    terminal.exit()?;
    Ok(exit)
}

/// Calls the wrapped unsubscribe function when dropped, on every exit path.
struct Unsubscribe<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> Unsubscribe<F> {
    fn new(stop: F) -> Self {
        Self(Some(stop))
    }
}

impl<F: FnOnce()> Drop for Unsubscribe<F> {
    fn drop(&mut self) {
        if let Some(stop) = self.0.take() {
            stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::bibtex::parse;
    use crate::config::FilterConfig;

    fn observed_then_fail(session: &Session, calls: Rc<Cell<usize>>) -> io::Result<()> {
        let _observer = Unsubscribe::new(session.pipeline().observe(move |_, _| {
            calls.set(calls.get() + 1);
        }));
        Err(io::Error::other("terminal went away"))
    }

    #[test]
    fn test_observer_released_on_error_path() {
        let records = parse("@misc{a, title = {Alpha}}\n@misc{b, title = {Beta}}").unwrap();
        let mut session = Session::new(records, FilterConfig::default().with_quiet_interval(Duration::ZERO));
        let calls = Rc::new(Cell::new(0));

        assert!(observed_then_fail(&session, calls.clone()).is_err());
        let after_error = calls.get();
        assert_eq!(after_error, 1);

        session.edit(Edit::Insert('b'), Instant::now());
        assert_eq!(session.pipeline().result().len(), 1);
        assert_eq!(calls.get(), after_error);
    }
}
