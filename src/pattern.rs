//! Pattern Compiler - raw query text to a reusable [`Matcher`].
//!
//! Compilation validates syntax only; nothing is matched until the
//! [`crate::search`] stage runs the matcher over records.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::CompileError;

/// Compiled search pattern.
///
/// Two matchers are equal when they were compiled from the same text with
/// the same case flag, which lets the reactive graph stop propagation when
/// a recompilation produced an equivalent matcher.
#[derive(Clone)]
pub struct Matcher {
    source: String,
    case_insensitive: bool,
    // None: empty pattern, matches every record
    regex: Option<Regex>,
}

impl Matcher {
    /// Matcher for the empty pattern.
    pub fn match_all(case_insensitive: bool) -> Self {
        Self {
            source: String::new(),
            case_insensitive,
            regex: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn is_match_all(&self) -> bool {
        self.regex.is_none()
    }

    /// Unanchored search: true if the pattern occurs anywhere in `haystack`.
    #[inline]
    pub fn is_match(&self, haystack: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(haystack),
            None => true,
        }
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.case_insensitive == other.case_insensitive
    }
}

impl Eq for Matcher {}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("source", &self.source)
            .field("case_insensitive", &self.case_insensitive)
            .finish()
    }
}

/// Compile `text` into a [`Matcher`].
///
/// The empty string is valid and matches everything. Syntax errors come back
/// as a [`CompileError`] carrying the engine message and error offset.
pub fn compile(text: &str, case_insensitive: bool) -> Result<Matcher, CompileError> {
    if text.is_empty() {
        return Ok(Matcher::match_all(case_insensitive));
    }

    RegexBuilder::new(text)
        .case_insensitive(case_insensitive)
        .build()
        .map(|regex| Matcher {
            source: text.to_string(),
            case_insensitive,
            regex: Some(regex),
        })
        .map_err(|err| CompileError::new(text, err.to_string(), error_offset(text, case_insensitive)))
}

/// Byte offset of the syntax error, re-derived from the parser the regex
/// crate is built on. `None` for failures without a location (size limits).
fn error_offset(text: &str, case_insensitive: bool) -> Option<usize> {
    let result = regex_syntax::ParserBuilder::new()
        .case_insensitive(case_insensitive)
        .build()
        .parse(text);
    match result {
        Err(regex_syntax::Error::Parse(err)) => Some(err.span().start.offset),
        Err(regex_syntax::Error::Translate(err)) => Some(err.span().start.offset),
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
