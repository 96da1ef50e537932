//! CRM mapper CLI.

use clap::{ColorChoice, Parser};
use crm_cli::logging::{LogConfig, LogFormat, init_logging};
use crm_model::EditError;
use crm_service::{ServiceError, WizardError};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_check, run_crms, run_edit, run_generate, run_prompt, run_transform};
use crate::summary::{print_check, print_edit, print_generate, print_issues, print_transform};

fn main() {
    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Prompt(args) => match run_prompt(&args) {
            Ok(()) => 0,
            Err(error) => report_error(&error),
        },
        Command::Generate(args) => match run_generate(&args) {
            Ok(result) => {
                print_generate(&result);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Check(args) => match run_check(&args) {
            Ok(result) => {
                print_check(&result);
                if result.report.has_errors() { 1 } else { 0 }
            }
            Err(error) => report_error(&error),
        },
        Command::Edit(args) => match run_edit(&args) {
            Ok(result) => {
                print_edit(&result);
                if result.report.has_errors() { 1 } else { 0 }
            }
            Err(error) => report_error(&error),
        },
        Command::Transform(args) => match run_transform(&args) {
            Ok(result) => {
                print_transform(&result);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Crms => match run_crms() {
            Ok(()) => 0,
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

/// Print the error chain, any offending invariants and a hint. Returns the
/// exit code.
fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    let hint = if let Some(wizard) = error.downcast_ref::<WizardError>() {
        match wizard {
            WizardError::Response(response) => {
                print_issues(response.issues());
                Some(response.suggestion().to_string())
            }
            WizardError::InvalidDocument { issues } => {
                print_issues(issues);
                Some("Run `crm-mapper check` and fix the listed rules first.".to_string())
            }
            WizardError::Service(service) => service.suggestion(),
            WizardError::Edit(edit) => edit.suggestion().map(str::to_string),
            _ => None,
        }
    } else if let Some(service) = error.downcast_ref::<ServiceError>() {
        service.suggestion()
    } else if let Some(edit) = error.downcast_ref::<EditError>() {
        edit.suggestion().map(str::to_string)
    } else {
        None
    };
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
