//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! The interactive screen owns the terminal, so stderr logging there would
//! scribble over the interface. Logs are written to `--log-file` when one is
//! given; without it they go to stderr, and only when verbosity was asked
//! for or the session is non-interactive.
//!
//! # Log Levels
//!
//! - `warn`: submit failures, terminal restore failures
//! - `info`: load summary, submit and quit
//! - `debug`: recompilations, compile errors, debounce scheduling
//! - `trace`: every pipeline notification

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-readable format.
    Pretty,
    /// Single-line format.
    #[default]
    Compact,
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` override `level_filter`.
    pub use_env_filter: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// When set, logs are appended to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_ansi: false,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl LogConfig {
    /// A config that installs no subscriber at all.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            level_filter: LevelFilter::OFF,
            use_env_filter: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.level_filter != LevelFilter::OFF || self.use_env_filter
    }
}

/// Install the global tracing subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if !config.is_enabled() {
        return Ok(());
    }
    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            init_logging_with_writer(config, Mutex::new(file));
        }
        None => init_logging_with_writer(config, io::stderr),
    }
    Ok(())
}

/// Install the subscriber with a custom writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(config);
    let ansi = config.with_ansi && config.log_file.is_none();

    match config.format {
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(false);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_writer(writer)
                .with_ansi(ansi);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(config.level_filter.into());
    if config.use_env_filter {
        builder.from_env_lossy()
    } else {
        builder.parse_lossy("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config() {
        let config = LogConfig::disabled();
        assert!(!config.is_enabled());
        assert!(init_logging(&config).is_ok());
    }

    #[test]
    fn test_explicit_level_enables() {
        let config = LogConfig::disabled().with_level(LevelFilter::DEBUG);
        assert!(config.is_enabled());
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_env_filter_default_directive() {
        let config = LogConfig::default().with_level(LevelFilter::INFO);
        let filter = build_env_filter(&LogConfig {
            use_env_filter: false,
            ..config
        });
        assert!(filter.to_string().contains("info"));
    }
}
