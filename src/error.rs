//! Error types for the three failure classes of a filter session.
//!
//! - [`LoadError`] - the source file could not be read or parsed (fatal)
//! - [`CompileError`] - the typed pattern is not a valid regex (recoverable)
//! - [`RenderError`] - the rendered payload could not be produced (recoverable)

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// LOAD
// =============================================================================

/// Failure at the load boundary. Aborts the session before it starts.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
}

impl LoadError {
    pub(crate) fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}

// =============================================================================
// COMPILE
// =============================================================================

/// Invalid pattern text.
///
/// Carries the pattern engine's own message and, when the engine reports
/// one, the byte offset of the failure inside `pattern`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{summary}")]
pub struct CompileError {
    pub pattern: String,
    pub message: String,
    pub position: Option<usize>,
    summary: String,
}

impl CompileError {
    pub fn new(pattern: impl Into<String>, message: impl Into<String>, position: Option<usize>) -> Self {
        let message = message.into();
        let summary = summarize(&message);
        Self {
            pattern: pattern.into(),
            message,
            position,
            summary,
        }
    }

    /// One-line form of the engine message, suitable for a status line.
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

/// The regex crate renders multi-line diagnostics with the pattern and a
/// caret; the last `error:` line is the useful part.
fn summarize(message: &str) -> String {
    message
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.strip_prefix("error: ").unwrap_or(line).to_string())
        .unwrap_or_default()
}

// =============================================================================
// RENDER
// =============================================================================

/// Failure while serializing the current result for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("entry {key}: field {field} has unbalanced braces")]
    UnbalancedBraces { key: String, field: String },
}

// =============================================================================
// TESTS
// =============================================================================
