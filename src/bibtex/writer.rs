//! BibTeX writer - the canonical text form of a [`RecordSet`].
//!
//! Output shape (default options):
//!
//! ```text
//! @article{smith2024,
//!     author = {John Smith},
//!     year = {2024}
//! }
//!
//! @misc{other
//! }
//! ```

use crate::error::RenderError;
use crate::record::{Record, RecordSet};

/// Serializer options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibWriter {
    /// Prefix for each field line.
    pub indent: String,
    /// Order entries by citation key instead of set order.
    pub sort_entries: bool,
    /// Order fields by name instead of insertion order.
    pub sort_fields: bool,
}

impl Default for BibWriter {
    fn default() -> Self {
        Self {
            indent: " ".repeat(4),
            sort_entries: false,
            sort_fields: false,
        }
    }
}

impl BibWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Serialize every record of `set`.
    pub fn write(&self, set: &RecordSet) -> Result<String, RenderError> {
        let mut records: Vec<&Record> = set.iter().map(|r| r.as_ref()).collect();
        if self.sort_entries {
            records.sort_by(|a, b| a.key().cmp(b.key()));
        }

        let mut out = String::new();
        for (i, record) in records.into_iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.write_record(&mut out, record)?;
        }
        Ok(out)
    }

    fn write_record(&self, out: &mut String, record: &Record) -> Result<(), RenderError> {
        let mut fields: Vec<(&str, &str)> = record.fields().collect();
        if self.sort_fields {
            fields.sort_by(|a, b| a.0.cmp(b.0));
        }

        out.push('@');
        out.push_str(record.entry_type());
        out.push('{');
        out.push_str(record.key());
        for (name, value) in fields {
            // Values are written brace-delimited, so they must nest cleanly
            if !braces_balanced(value) {
                return Err(RenderError::UnbalancedBraces {
                    key: record.key().to_string(),
                    field: name.to_string(),
                });
            }
            out.push_str(",\n");
            out.push_str(&self.indent);
            out.push_str(name);
            out.push_str(" = {");
            out.push_str(value);
            out.push('}');
        }
        out.push_str("\n}\n");
        Ok(())
    }
}

fn braces_balanced(value: &str) -> bool {
    let mut depth = 0usize;
    for ch in value.chars() {
        match ch {
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

// =============================================================================
// TESTS
// =============================================================================
