//! ADE request generator CLI.

use ade_cli::logging::{LogConfig, LogFormat, init_logging};
use ade_cli::status::{ExitStatus, exit_status};
use ade_uploader::TerminalOperator;
use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_check, run_generate, run_rules};
use crate::summary::{print_check, print_generated};
use crate::types::GenerateOutcome;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(ExitStatus::Failure.code());
    }
    let result = match &cli.command {
        Command::Generate(args) => {
            let mut operator = TerminalOperator::new();
            run_generate(args, &mut operator).map(|outcome| {
                match outcome {
                    GenerateOutcome::Declined => {}
                    GenerateOutcome::Generated(summary) => {
                        // stdout carries the document itself
                        if summary.output.is_some() {
                            print_generated(&summary);
                        }
                    }
                }
                ExitStatus::Success
            })
        }
        Command::Check(args) => run_check(args).map(|result| {
            print_check(&result);
            if result.report.is_valid() {
                ExitStatus::Success
            } else {
                ExitStatus::ValidationFailed
            }
        }),
        Command::Rules(args) => run_rules(args).map(|()| ExitStatus::Success),
    };
    let status = match result {
        Ok(status) => status,
        Err(error) => {
            eprintln!("error: {error:#}");
            exit_status(&error)
        }
    };
    std::process::exit(status.code());
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    let mut config = LogConfig::default()
        .with_level(level_filter)
        .with_format(format)
        .with_ansi(with_ansi)
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config
}
