//! Filter State - snapshot types read out of the pipeline.

use std::rc::Rc;

use crate::error::{CompileError, RenderError};
use crate::pattern::Matcher;

/// Where the pattern is in its compile cycle.
///
/// ```text
/// Unset → Compiling → Valid
///                   ↘ Invalid
/// Valid / Invalid → Compiling   (on any source change)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterPhase {
    /// Nothing has been typed or toggled yet.
    #[default]
    Unset,
    /// A source changed and the compile node has not settled.
    Compiling,
    Valid,
    Invalid,
}

/// Point-in-time view of the filter.
///
/// `matcher` and `error` are mutually exclusive once the phase has left
/// `Unset`; both are `None` before that.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterState {
    pub pattern: String,
    pub case_insensitive: bool,
    pub matcher: Option<Matcher>,
    pub error: Option<CompileError>,
    pub phase: FilterPhase,
}

/// The rendered payload handed to the frontend.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    /// Serialized text of the current result (last good one on failure).
    pub text: Rc<str>,
    /// Number of records in the current result.
    pub shown: usize,
    /// Number of records in the full set.
    pub total: usize,
    /// Set when the latest render attempt failed.
    pub error: Option<RenderError>,
}

impl Rendered {
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

/// Recompute counters, one per graph stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub compilations: usize,
    pub filters: usize,
    pub renders: usize,
}
