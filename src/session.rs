//! Session - one interactive filtering run.
//!
//! Owns the record store (through the pipeline), the query line, the
//! debounce slot and the scroll position. The frontend feeds it [`Action`]s
//! and timer ticks and reads back what to draw; nothing here touches the
//! terminal.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::bibtex::BibWriter;
use crate::config::FilterConfig;
use crate::error::RenderError;
use crate::input::{Action, Debouncer, Edit, PendingToken, QueryLine, Scroll};
use crate::pipeline::FilterPipeline;
use crate::record::RecordSet;

/// How a session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exit {
    /// The user confirmed; carries the serialized current result.
    Submitted(String),
    /// The user left without output.
    Quit,
}

pub struct Session {
    pipeline: FilterPipeline,
    writer: BibWriter,
    query: QueryLine,
    debounce: Debouncer<String>,
    scroll: usize,
    page_height: usize,
}

impl Session {
    pub fn new(records: RecordSet, config: FilterConfig) -> Self {
        let FilterConfig {
            quiet_interval,
            case_insensitive,
            initial_pattern,
            writer,
        } = config;

        let pipeline = FilterPipeline::new(records, writer.clone(), case_insensitive);
        if !initial_pattern.is_empty() {
            pipeline.set_pattern(&initial_pattern);
        }

        Self {
            pipeline,
            writer,
            query: QueryLine::with_text(&initial_pattern),
            debounce: Debouncer::new(quiet_interval),
            scroll: 0,
            page_height: 1,
        }
    }

    pub fn pipeline(&self) -> &FilterPipeline {
        &self.pipeline
    }

    pub fn query(&self) -> &QueryLine {
        &self.query
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Handle one user action. Returns `Some` when the session is over.
    pub fn handle(&mut self, action: Action, now: Instant) -> Option<Exit> {
        match action {
            Action::Edit(edit) => {
                self.edit(edit, now);
                None
            }
            Action::ToggleCase => {
                self.toggle_case();
                None
            }
            Action::Scroll(scroll) => {
                self.scroll(scroll);
                None
            }
            Action::Submit => match self.submit() {
                Ok(text) => Some(Exit::Submitted(text)),
                Err(err) => {
                    warn!(error = %err, "submit failed, staying in session");
                    None
                }
            },
            Action::Quit => {
                info!("quit without output");
                Some(Exit::Quit)
            }
            Action::Ignore => None,
        }
    }

    /// Apply a query-line edit and feed the new text to the debouncer.
    pub fn edit(&mut self, edit: Edit, now: Instant) {
        if self.query.apply(edit) {
            let text = self.query.text();
            self.on_raw_input(text, now);
        }
    }

    /// A raw text-changed event. Applied after the quiet interval unless
    /// superseded, or right away when debouncing is off.
    pub fn on_raw_input(&mut self, text: String, now: Instant) -> Option<PendingToken> {
        if self.debounce.is_immediate() {
            self.apply(&text);
            return None;
        }
        let token = self.debounce.schedule(text, now);
        debug!(token = ?token, "pattern update scheduled");
        Some(token)
    }

    /// Cancel a scheduled update. Idempotent.
    pub fn cancel(&mut self, token: PendingToken) -> bool {
        self.debounce.cancel(token)
    }

    /// Case toggles are discrete actions and are never debounced.
    pub fn toggle_case(&mut self) -> bool {
        let ci = self.pipeline.toggle_case();
        debug!(case_insensitive = ci, "case mode toggled");
        self.scroll = 0;
        ci
    }

    /// Fire the pending update if its quiet interval has elapsed.
    /// Returns true if the pipeline was updated.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debounce.fire_due(now) {
            Some(text) => {
                self.apply(&text);
                true
            }
            None => false,
        }
    }

    /// How long the event loop may wait before calling [`Session::tick`].
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.debounce.next_deadline(now)
    }

    pub fn has_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Apply any pending input, then serialize the current result.
    pub fn submit(&mut self) -> Result<String, RenderError> {
        if let Some(text) = self.debounce.flush() {
            self.apply(&text);
        }
        let result = self.pipeline.result();
        info!(entries = result.len(), "submitting result");
        self.writer.write(&result)
    }

    fn apply(&mut self, text: &str) {
        self.pipeline.set_pattern(text);
        self.scroll = 0;
    }

    // =========================================================================
    // SCROLLING
    // =========================================================================

    /// Rows available to the content area; used for page scrolling.
    pub fn set_page_height(&mut self, rows: usize) {
        self.page_height = rows.max(1);
    }

    /// First visible content line, clamped to the current payload.
    pub fn scroll_offset(&self) -> usize {
        let lines = self.pipeline.rendered().line_count();
        self.scroll.min(lines.saturating_sub(self.page_height))
    }

    fn scroll(&mut self, scroll: Scroll) {
        let current = self.scroll_offset();
        self.scroll = match scroll {
            Scroll::LineUp => current.saturating_sub(1),
            Scroll::LineDown => current + 1,
            Scroll::PageUp => current.saturating_sub(self.page_height),
            Scroll::PageDown => current + self.page_height,
        };
        self.scroll = self.scroll_offset();
    }
}

// =============================================================================
// TESTS
// =============================================================================
