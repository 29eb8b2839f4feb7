//! CLI argument definitions.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

use bibfilter::bibtex::BibWriter;
use bibfilter::config::FilterConfig;

#[derive(Parser, Debug)]
#[command(
    name = "bibfilter",
    version,
    about = "Interactively filter a BibTeX file with a regular expression",
    long_about = "Interactively filter a BibTeX file with a regular expression.\n\n\
                  Every field of every entry is searched, including the entry type \
                  and the citation key. Press Enter to print the matching entries \
                  to stdout, Esc to leave without output."
)]
pub struct Cli {
    /// BibTeX file to filter.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Pattern applied at startup.
    #[arg(short = 'p', long = "pattern", value_name = "REGEX", default_value = "")]
    pub pattern: String,

    /// Start in case-sensitive mode (toggle with Ctrl+B).
    #[arg(short = 's', long = "case-sensitive")]
    pub case_sensitive: bool,

    /// Typing pause before a pattern is applied; 0 applies every keystroke.
    #[arg(long = "debounce-ms", value_name = "MS", default_value_t = 250)]
    pub debounce_ms: u64,

    /// Spaces used to indent fields in the output.
    #[arg(long = "indent", value_name = "N", default_value_t = 4)]
    pub indent: usize,

    /// Sort output entries by citation key.
    #[arg(long = "sort-entries")]
    pub sort_entries: bool,

    /// Sort fields within each entry by name.
    #[arg(long = "sort-fields")]
    pub sort_fields: bool,

    /// Apply --pattern once and print the result without opening the screen.
    #[arg(long = "no-interactive")]
    pub no_interactive: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "compact")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
}

impl Cli {
    /// Session configuration from the parsed flags.
    pub fn filter_config(&self) -> FilterConfig {
        let mut writer = BibWriter::new().with_indent(" ".repeat(self.indent));
        writer.sort_entries = self.sort_entries;
        writer.sort_fields = self.sort_fields;

        let quiet = if self.no_interactive {
            Duration::ZERO
        } else {
            Duration::from_millis(self.debounce_ms)
        };

        FilterConfig::default()
            .with_quiet_interval(quiet)
            .with_case_insensitive(!self.case_sensitive)
            .with_initial_pattern(self.pattern.clone())
            .with_writer(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["bibfilter", "refs.bib"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("refs.bib"));
        assert!(!cli.no_interactive);
        assert_eq!(cli.log_format, LogFormatArg::Compact);

        let config = cli.filter_config();
        assert_eq!(config.quiet_interval, Duration::from_millis(250));
        assert!(config.case_insensitive);
        assert_eq!(config.writer.indent, "    ");
        assert!(config.initial_pattern.is_empty());
    }

    #[test]
    fn test_flags_flow_into_config() {
        let cli = Cli::try_parse_from([
            "bibfilter",
            "refs.bib",
            "--pattern",
            "knuth",
            "--case-sensitive",
            "--debounce-ms",
            "0",
            "--indent",
            "2",
            "--sort-entries",
        ])
        .unwrap();

        let config = cli.filter_config();
        assert_eq!(config.quiet_interval, Duration::ZERO);
        assert!(!config.case_insensitive);
        assert_eq!(config.initial_pattern, "knuth");
        assert_eq!(config.writer.indent, "  ");
        assert!(config.writer.sort_entries);
        assert!(!config.writer.sort_fields);
    }

    #[test]
    fn test_batch_mode_never_debounces() {
        let cli = Cli::try_parse_from(["bibfilter", "refs.bib", "--no-interactive", "-p", "x"])
            .unwrap();
        assert_eq!(cli.filter_config().quiet_interval, Duration::ZERO);
    }

    #[test]
    fn test_file_is_required() {
        assert!(Cli::try_parse_from(["bibfilter"]).is_err());
    }
}
