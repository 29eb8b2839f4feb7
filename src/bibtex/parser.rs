//! BibTeX reader.
//!
//! Accepts the subset of the format found in real-world `.bib` files:
//!
//! ```text
//! @article{key,
//!     title = {Nested {Braces} kept},
//!     journal = "Quoted",
//!     year = 2024,
//!     month = jan # "uary",
//! }
//! ```
//!
//! `@string` definitions are expanded where referenced, `@comment` and
//! `@preamble` blocks are skipped, and a line outside a block that does not
//! start with `@` is ignored whole.

use std::collections::HashMap;

use tracing::trace;

use crate::error::LoadError;
use crate::record::{Record, RecordSet};

/// Parse BibTeX source text into a [`RecordSet`].
pub fn parse(src: &str) -> Result<RecordSet, LoadError> {
    let mut parser = Parser::new(src);
    let mut records = Vec::new();

    while parser.seek_entry() {
        if let Some(record) = parser.block()? {
            trace!(key = record.key(), fields = record.field_count(), "parsed entry");
            records.push(record);
        }
    }

    Ok(RecordSet::new(records))
}

// =============================================================================
// SCANNER
// =============================================================================

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    strings: HashMap<String, String>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            strings: HashMap::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn error(&self, message: impl Into<String>) -> LoadError {
        LoadError::syntax(self.line, self.column, message)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), LoadError> {
        self.skip_ws();
        match self.peek() {
            Some(ch) if ch == want => {
                self.bump();
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected '{want}', found '{ch}'"))),
            None => Err(self.error(format!("expected '{want}', found end of input"))),
        }
    }

    /// Advance to just past the next `@` that starts a block. A line whose
    /// first non-blank character is anything else is a comment and is
    /// skipped whole. Returns false at end of input.
    fn seek_entry(&mut self) -> bool {
        while let Some(ch) = self.bump() {
            match ch {
                '@' => return true,
                c if c.is_whitespace() => {}
                _ => self.skip_line(),
            }
        }
        false
    }

    fn skip_line(&mut self) {
        while let Some(ch) = self.bump() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn identifier(&mut self) -> Result<String, LoadError> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || "_-:.+/'".contains(c))
        {
            self.bump();
        }
        if start == self.pos {
            return Err(match self.peek() {
                Some(ch) => self.error(format!("expected identifier, found '{ch}'")),
                None => self.error("expected identifier, found end of input"),
            });
        }
        Ok(self.src[start..self.pos].to_string())
    }

    // =========================================================================
    // BLOCKS
    // =========================================================================

    /// Parse one `@...` block. Returns `None` for blocks that carry no entry.
    fn block(&mut self) -> Result<Option<Record>, LoadError> {
        let kind = self.identifier()?.to_lowercase();
        self.skip_ws();
        let close = match self.bump() {
            Some('{') => '}',
            Some('(') => ')',
            Some(ch) => return Err(self.error(format!("expected '{{' or '(' after @{kind}, found '{ch}'"))),
            None => return Err(self.error(format!("unexpected end of input after @{kind}"))),
        };

        match kind.as_str() {
            "comment" | "preamble" => {
                self.skip_balanced(close)?;
                Ok(None)
            }
            "string" => {
                self.string_definition(close)?;
                Ok(None)
            }
            _ => self.entry(kind, close).map(Some),
        }
    }

    fn skip_balanced(&mut self, close: char) -> Result<(), LoadError> {
        let mut depth = 0usize;
        while let Some(ch) = self.bump() {
            match ch {
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                c if c == close && depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error("unterminated block"))
    }

    fn string_definition(&mut self, close: char) -> Result<(), LoadError> {
        let name = self.identifier()?.to_lowercase();
        self.expect('=')?;
        let value = self.value()?;
        self.expect(close)?;
        self.strings.insert(name, value);
        Ok(())
    }

    fn entry(&mut self, entry_type: String, close: char) -> Result<Record, LoadError> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c != ',' && c != close && !c.is_whitespace())
        {
            self.bump();
        }
        let key = self.src[start..self.pos].to_string();
        if key.is_empty() {
            return Err(self.error(format!("@{entry_type} entry without a citation key")));
        }

        let mut record = Record::new(entry_type, key);
        loop {
            self.skip_ws();
            match self.peek() {
                Some(c) if c == close => {
                    self.bump();
                    return Ok(record);
                }
                Some(',') => {
                    self.bump();
                }
                Some(ch) => return Err(self.error(format!("expected ',' or '{close}', found '{ch}'"))),
                None => return Err(self.error(format!("unterminated entry {}", record.key()))),
            }

            self.skip_ws();
            if self.peek() == Some(close) {
                continue;
            }
            let name = self.identifier()?.to_lowercase();
            self.expect('=')?;
            let value = self.value()?;
            record.push_field(name, value);
        }
    }

    // =========================================================================
    // VALUES
    // =========================================================================

    /// `piece ('#' piece)*`
    fn value(&mut self) -> Result<String, LoadError> {
        let mut out = self.piece()?;
        loop {
            self.skip_ws();
            if self.peek() != Some('#') {
                return Ok(out);
            }
            self.bump();
            out.push_str(&self.piece()?);
        }
    }

    fn piece(&mut self) -> Result<String, LoadError> {
        self.skip_ws();
        match self.peek() {
            Some('{') => {
                self.bump();
                self.delimited(None)
            }
            Some('"') => {
                self.bump();
                self.delimited(Some('"'))
            }
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
                Ok(self.src[start..self.pos].to_string())
            }
            Some(_) => {
                let name = self.identifier()?;
                Ok(self
                    .strings
                    .get(&name.to_lowercase())
                    .cloned()
                    .unwrap_or(name))
            }
            None => Err(self.error("expected value, found end of input")),
        }
    }

    /// Read up to the closing delimiter, keeping nested braces verbatim.
    /// `quote` is `None` for a brace-delimited value.
    fn delimited(&mut self, quote: Option<char>) -> Result<String, LoadError> {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            let (end, here) = (self.pos, (self.line, self.column));
            match self.bump() {
                Some('{') => depth += 1,
                Some('}') if depth > 0 => depth -= 1,
                Some('}') if quote.is_none() => return Ok(self.src[start..end].to_string()),
                Some('}') => {
                    return Err(LoadError::syntax(here.0, here.1, "unbalanced '}' in quoted value"));
                }
                Some(c) if Some(c) == quote && depth == 0 => {
                    return Ok(self.src[start..end].to_string());
                }
                Some(_) => {}
                None => return Err(LoadError::syntax(line, column, "unterminated value")),
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
