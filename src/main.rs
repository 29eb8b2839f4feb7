//! bibfilter CLI.

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use bibfilter::bibtex;
use bibfilter::logging::{init_logging, LogConfig, LogFormat};
use bibfilter::session::{Exit, Session};
use bibfilter::tui;

mod cli;

use crate::cli::{Cli, LogFormatArg};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let records = bibtex::load_file(&cli.file)?;
    let mut session = Session::new(records, cli.filter_config());

    let output = if cli.no_interactive {
        if let Some(error) = session.pipeline().error() {
            bail!("invalid pattern {:?}: {error}", error.pattern);
        }
        Some(session.submit().context("failed to render result")?)
    } else {
        match tui::run(&mut session).context("terminal session failed")? {
            Exit::Submitted(text) => Some(text),
            Exit::Quit => None,
        }
    };

    if let Some(text) = output {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .context("failed to write result")?;
        info!(bytes = text.len(), "result written");
    }
    Ok(())
}

/// Build logging configuration from CLI flags.
///
/// Interactive sessions log only to a file or on explicit `-v`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit = cli.verbosity.is_present();
    if !cli.no_interactive && cli.log_file.is_none() && !explicit {
        return LogConfig::disabled();
    }

    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !explicit,
        with_ansi: cli.log_file.is_none() && io::stderr().is_terminal(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
        },
        log_file: cli.log_file.clone(),
    }
}
