//! Command-line interface entry point for the attendance tracker

mod args;
mod commands;

use args::{Cli, Command, DataCommand};
use clap::Parser;
use school_attendance::config::Config;
use school_attendance::core::Result;
use school_attendance::info;
use school_attendance::logger::{
    close_file_logging, enable_debug, enable_verbose, init_file_logging, set_level, Level,
};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; fall back to warn
    let mut level = args
        .log_level
        .map(Into::into)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    let config_log_path = (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));
    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let outcome = match args.command {
        // Config is managed without logging in
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults)
        }
        Command::Data(command) => {
            dispatch(command, args.password.as_deref(), &config).map_err(|e| e.to_string())
        }
    };

    close_file_logging();
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("✗ {message}");
            ExitCode::FAILURE
        }
    }
}

/// Run a data command behind the login gate
fn dispatch(command: DataCommand, password: Option<&str>, config: &Config) -> Result<()> {
    let session = commands::login(password, config)?;
    session.require()?;

    match command {
        DataCommand::Student { subcommand } => commands::student::run(subcommand, config),
        DataCommand::Attendance { subcommand } => commands::attendance::run(subcommand, config),
        DataCommand::Stats { target } => commands::stats::run(target, config),
        DataCommand::Overview => commands::stats::overview(config),
        DataCommand::Report {
            target,
            kind,
            output,
        } => commands::report::run(target, kind, output.as_deref(), config),
        DataCommand::Export { target } => commands::report::export(target, config),
    }
}
