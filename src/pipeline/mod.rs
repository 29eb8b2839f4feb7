//! Reactive Pipeline
//!
//! The dependency graph that turns query edits into a rendered result.
//!
//! # Pipeline Architecture
//!
//! ```text
//! pattern ─┐
//!          ├─→ compiled ─┬─→ matcher ─→ result ─→ rendered ─┐
//! case ────┘             │                                  ├─→ observers
//!                        └─→ compile effect ─→ ErrorSurface ┘
//! ```
//!
//! ## Data Flow
//!
//! 1. **compiled** - Reads both sources, runs the Pattern Compiler once
//! 2. **compile effect** - Publishes the error (or clears it) and settles the phase
//! 3. **matcher** - Last valid matcher; holds its value while the pattern is invalid
//! 4. **result** - Full-Text Matcher over the record store
//! 5. **rendered** - Serialized result for display
//!
//! ## Key Design Principles
//!
//! - **Pure Deriveds**: every stage is a `derived`, memoized and pulled in
//!   dependency order, so each stage runs at most once per source change
//! - **Stale but valid**: an invalid pattern never blanks the result
//! - **Explicit ownership**: the graph lives in a [`FilterPipeline`] value,
//!   not in thread-local globals

pub mod error_surface;
pub mod state;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{derived, effect, flush_sync, signal, Derived, Signal};
use tracing::{debug, warn};

use crate::bibtex::BibWriter;
use crate::error::{CompileError, RenderError};
use crate::pattern::{compile, Matcher};
use crate::record::RecordSet;
use crate::search::filter;

pub use error_surface::ErrorSurface;
pub use state::{FilterPhase, FilterState, PipelineStats, Rendered};

// =============================================================================
// PIPELINE
// =============================================================================

/// The filter graph over one immutable record store.
pub struct FilterPipeline {
    records: RecordSet,
    pattern: Signal<String>,
    case_insensitive: Signal<bool>,
    compiled: Derived<Result<Matcher, CompileError>>,
    matcher: Derived<Matcher>,
    result: Derived<RecordSet>,
    rendered: Derived<Rendered>,
    errors: ErrorSurface,
    phase: Rc<Cell<FilterPhase>>,
    stats: Rc<Cell<PipelineStats>>,
    stop_compile_effect: Option<Box<dyn FnOnce()>>,
}

impl FilterPipeline {
    /// Build the graph. The initial result is the full record set.
    pub fn new(records: RecordSet, writer: BibWriter, case_insensitive: bool) -> Self {
        let pattern = signal(String::new());
        let case_insensitive = signal(case_insensitive);
        let errors = ErrorSurface::new();
        let phase = Rc::new(Cell::new(FilterPhase::Unset));
        let stats = Rc::new(Cell::new(PipelineStats::default()));

        // compiled: both sources feed one compile
        let compiled = {
            let pattern = pattern.clone();
            let case_insensitive = case_insensitive.clone();
            let stats = stats.clone();
            derived(move || {
                let text = pattern.get();
                let ci = case_insensitive.get();
                bump(&stats, |s| s.compilations += 1);
                debug!(pattern = %text, case_insensitive = ci, "compiling pattern");
                compile(&text, ci)
            })
        };

        // matcher: last valid matcher, stale while the pattern is invalid
        let matcher = {
            let compiled = compiled.clone();
            let last_valid = RefCell::new(Matcher::match_all(case_insensitive.get()));
            derived(move || match compiled.get() {
                Ok(m) => {
                    *last_valid.borrow_mut() = m.clone();
                    m
                }
                Err(_) => last_valid.borrow().clone(),
            })
        };

        let result = {
            let matcher = matcher.clone();
            let records = records.clone();
            let stats = stats.clone();
            derived(move || {
                let m = matcher.get();
                bump(&stats, |s| s.filters += 1);
                let out = filter(&records, &m);
                debug!(pattern = m.source(), shown = out.len(), total = records.len(), "filtered");
                out
            })
        };

        let rendered = {
            let result = result.clone();
            let total = records.len();
            let stats = stats.clone();
            let last_text: RefCell<Rc<str>> = RefCell::new(Rc::from(""));
            derived(move || {
                let set = result.get();
                bump(&stats, |s| s.renders += 1);
                let error = match render_text(&writer, &set) {
                    Ok(text) => {
                        *last_text.borrow_mut() = text;
                        None
                    }
                    Err(err) => {
                        warn!(error = %err, "render failed, keeping previous output");
                        Some(err)
                    }
                };
                Rendered {
                    text: last_text.borrow().clone(),
                    shown: set.len(),
                    total,
                    error,
                }
            })
        };

        // compile effect: error surface + phase, never touches the result
        let stop_compile_effect = {
            let compiled = compiled.clone();
            let errors = errors.clone();
            let phase = phase.clone();
            effect(move || {
                let outcome = compiled.get();
                if phase.get() == FilterPhase::Unset {
                    return;
                }
                match outcome {
                    Ok(_) => {
                        errors.set(None);
                        phase.set(FilterPhase::Valid);
                    }
                    Err(err) => {
                        debug!(error = %err, position = ?err.position, "pattern rejected");
                        errors.set(Some(err));
                        phase.set(FilterPhase::Invalid);
                    }
                }
            })
        };

        Self {
            records,
            pattern,
            case_insensitive,
            compiled,
            matcher,
            result,
            rendered,
            errors,
            phase,
            stats,
            stop_compile_effect: Some(Box::new(stop_compile_effect)),
        }
    }

    // =========================================================================
    // SOURCES
    // =========================================================================

    /// Replace the pattern text. A no-op when the text is unchanged.
    pub fn set_pattern(&self, text: &str) {
        if self.pattern.get() == text && self.phase.get() != FilterPhase::Unset {
            return;
        }
        self.phase.set(FilterPhase::Compiling);
        if self.pattern.get() == text {
            // First touch with the initial text: settle without a source change
            self.settle();
            return;
        }
        self.pattern.set(text.to_string());
        self.settle();
    }

    /// Set the case mode, recompiling the current pattern.
    pub fn set_case_insensitive(&self, case_insensitive: bool) {
        if self.case_insensitive.get() == case_insensitive {
            return;
        }
        self.phase.set(FilterPhase::Compiling);
        self.case_insensitive.set(case_insensitive);
        self.settle();
    }

    /// Flip the case mode. Returns the new value.
    pub fn toggle_case(&self) -> bool {
        let next = !self.case_insensitive.get();
        self.set_case_insensitive(next);
        next
    }

    /// Run pending effects and pull the graph so every node is current.
    fn settle(&self) {
        flush_sync();
        let compiled = self.compiled.get();
        // The compile effect settles the phase; cover the path where the
        // compile output did not change and the effect had nothing to do.
        if self.phase.get() == FilterPhase::Compiling {
            match compiled {
                Ok(_) => {
                    self.errors.set(None);
                    self.phase.set(FilterPhase::Valid);
                }
                Err(err) => {
                    self.errors.set(Some(err));
                    self.phase.set(FilterPhase::Invalid);
                }
            }
        }
        let _ = self.rendered.get();
    }

    // =========================================================================
    // READERS
    // =========================================================================

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn pattern(&self) -> String {
        self.pattern.get()
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive.get()
    }

    pub fn phase(&self) -> FilterPhase {
        self.phase.get()
    }

    /// The current (possibly stale) filtered set.
    pub fn result(&self) -> RecordSet {
        self.result.get()
    }

    pub fn rendered(&self) -> Rendered {
        self.rendered.get()
    }

    pub fn error_surface(&self) -> &ErrorSurface {
        &self.errors
    }

    pub fn error(&self) -> Option<CompileError> {
        self.errors.get()
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats.get()
    }

    pub fn state(&self) -> FilterState {
        let phase = self.phase.get();
        let (matcher, error) = match phase {
            FilterPhase::Unset => (None, None),
            _ => match self.compiled.get() {
                Ok(m) => (Some(m), None),
                Err(e) => (None, Some(e)),
            },
        };
        FilterState {
            pattern: self.pattern.get(),
            case_insensitive: self.case_insensitive.get(),
            matcher,
            error,
            phase,
        }
    }

    /// The matcher the current result was produced with.
    pub fn active_matcher(&self) -> Matcher {
        self.matcher.get()
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    /// Subscribe to rendered output and error surface changes.
    ///
    /// `on_change` runs once immediately and then after every change that
    /// alters either value. Returns the unsubscribe function.
    pub fn observe<F>(&self, mut on_change: F) -> impl FnOnce() + use<F>
    where
        F: FnMut(&Rendered, Option<&CompileError>) + 'static,
    {
        let rendered = self.rendered.clone();
        let errors = self.errors.clone();
        effect(move || {
            let payload = rendered.get();
            let error = errors.get();
            on_change(&payload, error.as_ref());
        })
    }
}

impl Drop for FilterPipeline {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_compile_effect.take() {
            stop();
        }
    }
}

fn bump(stats: &Cell<PipelineStats>, f: impl FnOnce(&mut PipelineStats)) {
    let mut s = stats.get();
    f(&mut s);
    stats.set(s);
}

fn render_text(writer: &BibWriter, set: &RecordSet) -> Result<Rc<str>, RenderError> {
    writer.write(set).map(Rc::from)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn records() -> RecordSet {
        RecordSet::new(vec![
            Record::new("article", "first").with_field("title", "Old work").with_field("year", "1999"),
            Record::new("article", "second").with_field("author", "john smith").with_field("year", "2024"),
            Record::new("book", "third").with_field("title", "Recent").with_field("year", "2023"),
        ])
    }

    fn setup() -> FilterPipeline {
        FilterPipeline::new(records(), BibWriter::default(), false)
    }

    #[test]
    fn test_initial_state() {
        let pipeline = setup();
        assert_eq!(pipeline.phase(), FilterPhase::Unset);
        assert!(pipeline.result().same_storage(pipeline.records()));

        let state = pipeline.state();
        assert!(state.matcher.is_none());
        assert!(state.error.is_none());

        let rendered = pipeline.rendered();
        assert_eq!(rendered.shown, 3);
        assert_eq!(rendered.total, 3);
        assert!(rendered.text.contains("@book{third"));
    }

    #[test]
    fn test_pattern_narrows_result() {
        let pipeline = setup();
        pipeline.set_pattern("2024");

        let result = pipeline.result();
        assert_eq!(result.len(), 1);
        assert!(Rc::ptr_eq(result.get(0).unwrap(), pipeline.records().get(1).unwrap()));
        assert_eq!(pipeline.phase(), FilterPhase::Valid);

        let rendered = pipeline.rendered();
        assert_eq!(rendered.shown, 1);
        assert!(rendered.text.starts_with("@article{second,"));
        assert!(!rendered.text.contains("third"));
    }

    #[test]
    fn test_invalid_pattern_keeps_previous_result() {
        let pipeline = setup();
        pipeline.set_pattern("20");
        let before = pipeline.result();
        let rendered_before = pipeline.rendered();
        assert_eq!(before.len(), 2);

        pipeline.set_pattern("(");
        assert_eq!(pipeline.phase(), FilterPhase::Invalid);
        let err = pipeline.error().expect("error surface should be set");
        assert!(!err.message.is_empty());
        assert_eq!(pipeline.result(), before);
        assert_eq!(pipeline.rendered().text, rendered_before.text);

        let state = pipeline.state();
        assert!(state.matcher.is_none());
        assert_eq!(state.error, Some(err));
    }

    #[test]
    fn test_valid_pattern_clears_error() {
        let pipeline = setup();
        pipeline.set_pattern("(");
        assert!(pipeline.error().is_some());

        pipeline.set_pattern("(19)");
        assert!(pipeline.error().is_none());
        assert_eq!(pipeline.phase(), FilterPhase::Valid);
        assert_eq!(pipeline.result().len(), 1);

        let state = pipeline.state();
        assert!(state.matcher.is_some());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_one_compile_per_source_change() {
        let pipeline = setup();
        let base = pipeline.stats().compilations;

        pipeline.set_pattern("Smith");
        assert_eq!(pipeline.stats().compilations, base + 1);

        pipeline.toggle_case();
        assert_eq!(pipeline.stats().compilations, base + 2);

        // Same text again: nothing to do
        pipeline.set_pattern("Smith");
        assert_eq!(pipeline.stats().compilations, base + 2);
    }

    #[test]
    fn test_one_filter_and_render_per_valid_change() {
        let pipeline = setup();
        let base = pipeline.stats();

        pipeline.set_pattern("19");
        let after = pipeline.stats();
        assert_eq!(after.filters, base.filters + 1);
        assert_eq!(after.renders, base.renders + 1);
    }

    #[test]
    fn test_toggle_case_changes_membership() {
        let pipeline = setup();
        pipeline.set_pattern("Smith");
        assert!(pipeline.result().is_empty());

        assert!(pipeline.toggle_case());
        assert_eq!(pipeline.result().len(), 1);
        assert_eq!(pipeline.result().get(0).map(|r| r.key()), Some("second"));

        assert!(!pipeline.toggle_case());
        assert!(pipeline.result().is_empty());
    }

    #[test]
    fn test_toggle_before_typing_settles_phase() {
        let pipeline = setup();
        pipeline.toggle_case();
        assert_eq!(pipeline.phase(), FilterPhase::Valid);
        assert_eq!(pipeline.result().len(), 3);
    }

    #[test]
    fn test_empty_pattern_first_touch_settles() {
        let pipeline = setup();
        pipeline.set_pattern("");
        assert_eq!(pipeline.phase(), FilterPhase::Valid);
        assert!(pipeline.state().matcher.unwrap().is_match_all());
    }

    #[test]
    fn test_observer_sees_error_and_payload() {
        let pipeline = setup();
        let log: Rc<RefCell<Vec<(usize, bool)>>> = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        let stop = pipeline.observe(move |rendered, error| {
            log_clone.borrow_mut().push((rendered.shown, error.is_some()));
        });
        assert_eq!(log.borrow().last(), Some(&(3, false)));

        pipeline.set_pattern("2024");
        assert_eq!(log.borrow().last(), Some(&(1, false)));

        pipeline.set_pattern("[");
        assert_eq!(log.borrow().last(), Some(&(1, true)));

        stop();
        let seen = log.borrow().len();
        pipeline.set_pattern("");
        assert_eq!(log.borrow().len(), seen);
    }

    #[test]
    fn test_render_failure_keeps_last_good_text() {
        let records = RecordSet::new(vec![
            Record::new("misc", "good").with_field("title", "Fine"),
            Record::new("misc", "broken").with_field("note", "a } b"),
        ]);
        let pipeline = FilterPipeline::new(records, BibWriter::default(), true);

        // The full set cannot be written yet; nothing good exists to keep
        let rendered = pipeline.rendered();
        assert!(matches!(rendered.error, Some(RenderError::UnbalancedBraces { .. })));
        assert_eq!(rendered.text.as_ref(), "");

        pipeline.set_pattern("good");
        let good = pipeline.rendered();
        assert!(good.error.is_none());
        assert!(good.text.starts_with("@misc{good,"));

        pipeline.set_pattern("broken");
        let failed = pipeline.rendered();
        assert!(failed.error.is_some());
        assert_eq!(failed.shown, 1);
        assert_eq!(failed.text, good.text);
        assert_eq!(pipeline.result().get(0).unwrap().key(), "broken");

        pipeline.set_pattern("fine");
        assert!(pipeline.rendered().error.is_none());
    }
}
