//! Load and serialize boundaries for BibTeX text.

pub mod parser;
pub mod writer;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::LoadError;
use crate::record::RecordSet;

pub use parser::parse;
pub use writer::BibWriter;

/// Read and parse a `.bib` file.
pub fn load_file(path: &Path) -> Result<RecordSet, LoadError> {
    let src = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let set = parse(&src)?;
    info!(path = %path.display(), entries = set.len(), "loaded bibliography");
    Ok(set)
}
