//! Session configuration.

use std::time::Duration;

use crate::bibtex::BibWriter;

/// Quiet interval used when none is given.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(250);

/// Everything a [`crate::session::Session`] needs besides the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Typing pause before the pattern is applied. Zero applies every keystroke.
    pub quiet_interval: Duration,
    /// Initial case mode.
    pub case_insensitive: bool,
    /// Pattern applied when the session starts.
    pub initial_pattern: String,
    /// Serializer used for display and for the submitted output.
    pub writer: BibWriter,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            quiet_interval: DEFAULT_QUIET_INTERVAL,
            case_insensitive: true,
            initial_pattern: String::new(),
            writer: BibWriter::default(),
        }
    }
}

impl FilterConfig {
    #[must_use]
    pub fn with_quiet_interval(mut self, quiet_interval: Duration) -> Self {
        self.quiet_interval = quiet_interval;
        self
    }

    #[must_use]
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    #[must_use]
    pub fn with_initial_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.initial_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn with_writer(mut self, writer: BibWriter) -> Self {
        self.writer = writer;
        self
    }
}
