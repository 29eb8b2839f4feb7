//! # bibfilter
//!
//! Interactive regex filtering of BibTeX bibliographies.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! The record store is loaded once and never mutated. Everything the user
//! sees is derived from two signals, the pattern text and the case mode:
//! ```text
//! pattern, case → compiled → matcher → result → rendered → observers
//!                    └─────→ error surface ──────────────→ observers
//! ```
//! A failed compilation only updates the error surface; `matcher` keeps the
//! last valid value, so the result and the rendered text stay put.
//!
//! ## Modules
//!
//! - [`record`] - records and shared record sets
//! - [`bibtex`] - parse `.bib` text into records and serialize them back
//! - [`pattern`] - compile pattern text into a [`pattern::Matcher`]
//! - [`search`] - full-text filtering
//! - [`pipeline`] - the reactive graph
//! - [`input`] - keys, bindings, the query line and the debouncer
//! - [`session`] - one interactive run, independent of the terminal
//! - [`tui`] - the terminal frontend
//! - [`logging`] - tracing subscriber setup

pub mod bibtex;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod pattern;
pub mod pipeline;
pub mod record;
pub mod search;
pub mod session;
pub mod tui;
pub mod types;

pub use config::FilterConfig;
pub use error::{CompileError, LoadError, RenderError};
pub use pattern::{compile, Matcher};
pub use pipeline::{FilterPhase, FilterPipeline, FilterState, Rendered};
pub use record::{Record, RecordSet};
pub use search::filter;
pub use session::{Exit, Session};
