//! CLI argument definitions for the attendance tool

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use school_attendance::config::ConfigOverrides;
use school_attendance::core::models::{ClassId, Section};
use school_attendance::core::report::ReportKind;
use school_attendance::logger::Level;

/// `--log-level` values, mapped onto [`Level`]
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Failures only
    Error,
    /// Failures and skipped data
    Warn,
    /// Also every change to stored data
    Info,
    /// Everything
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&Level::from(*self), f)
    }
}

fn parse_class(value: &str) -> Result<ClassId, String> {
    ClassId::parse(value).map_err(|e| e.to_string())
}

fn parse_section(value: &str) -> Result<Section, String> {
    Section::parse(value).map_err(|e| e.to_string())
}

fn parse_kind(value: &str) -> Result<ReportKind, String> {
    value.parse()
}

/// Split `ROLL=TEXT`
fn parse_remark(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((roll, text)) if !roll.trim().is_empty() => {
            Ok((roll.trim().to_string(), text.trim().to_string()))
        }
        _ => Err(format!("'{value}' must look like ROLL=TEXT")),
    }
}

/// Class and section selecting one class file
#[derive(Debug, Clone, Copy, Args)]
pub struct ClassSection {
    /// Class number (1-12)
    #[arg(short, long, value_name = "CLASS", value_parser = parse_class)]
    pub class: ClassId,

    /// Section letter (A-Z)
    #[arg(short, long, value_name = "SECTION", value_parser = parse_section)]
    pub section: Section,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Print one value, or the whole configuration without KEY
    Get {
        /// Key such as `level`, `data_dir` or `school_name`
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Store a value in the config file
    Set {
        /// Key to change
        #[arg(value_name = "KEY")]
        key: String,
        /// New value
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Put one key back to its default
    Unset {
        /// Key to restore
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Delete the config file after confirmation
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum StudentSubcommand {
    /// Register a new student
    Add {
        #[command(flatten)]
        target: ClassSection,
        /// Roll number, unique within the class and section
        #[arg(long)]
        roll: String,
        /// Full name
        #[arg(long)]
        name: String,
        /// Ten-digit contact number
        #[arg(long)]
        contact: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Gender: M, F or O
        #[arg(long)]
        gender: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        dob: String,
    },
    /// Find a student by exact roll number or part of the name
    Search {
        #[command(flatten)]
        target: ClassSection,
        /// Roll number or name fragment
        #[arg(value_name = "TEXT")]
        text: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AttendanceSubcommand {
    /// Mark the whole class for one day; everyone not listed as absent is present
    Mark {
        #[command(flatten)]
        target: ClassSection,
        /// Day to mark (YYYY-MM-DD); defaults to today
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
        /// Roll numbers of absent students
        #[arg(long, value_name = "ROLLS", value_delimiter = ',')]
        absent: Vec<String>,
        /// Remark for one student, as ROLL=TEXT (repeatable)
        #[arg(long, value_name = "ROLL=TEXT", value_parser = parse_remark)]
        remark: Vec<(String, String)>,
    },
    /// Show attendance percentages, optionally for a date range or one student
    View {
        #[command(flatten)]
        target: ClassSection,
        /// First day of the range (YYYY-MM-DD)
        #[arg(long, value_name = "DATE", requires = "to")]
        from: Option<String>,
        /// Last day of the range (YYYY-MM-DD)
        #[arg(long, value_name = "DATE", requires = "from")]
        to: Option<String>,
        /// Show the day-by-day history of one roll number; covers every day, so no range
        #[arg(long, conflicts_with_all = ["from", "to"])]
        roll: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show or edit the configuration file; no login needed
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    #[command(flatten)]
    Data(DataCommand),
}

/// Commands that read or write student data; all require login
#[derive(Debug, Subcommand)]
pub enum DataCommand {
    /// Register and look up students
    Student {
        #[command(subcommand)]
        subcommand: StudentSubcommand,
    },
    /// Record and review daily attendance
    Attendance {
        #[command(subcommand)]
        subcommand: AttendanceSubcommand,
    },
    /// Class statistics: average, best student, streak and distribution
    Stats {
        #[command(flatten)]
        target: ClassSection,
    },
    /// School-wide summary across every stored class
    Overview,
    /// Generate a class report.
    ///
    /// Writes to the configured reports directory unless `--output` is given.
    Report {
        #[command(flatten)]
        target: ClassSection,
        /// Report kind: html, csv, detailed, monthly or trend
        #[arg(short, long, value_name = "KIND", default_value = "html", value_parser = parse_kind)]
        kind: ReportKind,
        /// Output file path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Copy a class file into the exports directory
    Export {
        #[command(flatten)]
        target: ClassSection,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "attendance",
    about = "School attendance command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Password for data commands; prompted for when omitted
    #[arg(long, env = "ATTENDANCE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Log level for this run; the configured level applies when omitted
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Print per-student progress
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Shorthand for `--log-level debug`
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Append log lines to this file instead of the console
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Use this logging level in place of the configured one
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Use this log file in place of the configured one
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Use this verbose setting (true/false) in place of the configured one
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the data directory holding class files
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the exports directory
    #[arg(long = "exports-dir", value_name = "DIR")]
    pub exports_dir: Option<PathBuf>,

    /// Override the reports directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` fields leave the loaded configuration unchanged.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.to_string_lossy().to_string());
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path(&self.config_log_file),
            verbose: self.config_verbose,
            data_dir: path(&self.data_dir),
            exports_dir: path(&self.exports_dir),
            reports_dir: path(&self.reports_dir),
        }
    }
}
