use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use treesnap_watch::TriggerVariant;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages (default)
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Trigger variant selector for the watch command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TriggerArg {
    /// Regenerate after bursts of file changes (debounced)
    Save,
    /// Regenerate when the repository revision changes (polled)
    Revision,
}

impl From<TriggerArg> for TriggerVariant {
    fn from(arg: TriggerArg) -> Self {
        match arg {
            TriggerArg::Save => TriggerVariant::Save,
            TriggerArg::Revision => TriggerVariant::Revision,
        }
    }
}

#[derive(Parser)]
#[command(name = "treesnap")]
#[command(about = "treesnap - keeps a filtered listing of tracked files in sync with the repository")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file path (defaults to <workspace>/treesnap.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Workspace root to operate in (defaults to the current directory)
    #[arg(short = 'w', long, global = true)]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate the tree snapshot once and exit
    Generate,

    /// Watch the workspace and regenerate the snapshot on changes
    Watch {
        /// Trigger variant to react to
        #[arg(short, long, value_enum, default_value = "save")]
        trigger: TriggerArg,
    },
}
