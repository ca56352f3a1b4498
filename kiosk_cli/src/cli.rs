//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Keeps the file log writer alive; taken and dropped on exit to flush.
pub static FILE_GUARD: Mutex<Option<tracing_appender::non_blocking::WorkerGuard>> =
    Mutex::new(None);
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "kiosk_cli", version, about = "Parcel kiosk detection CLI")]
pub struct Cli {
    /// Path to config TOML (missing file means defaults)
    #[arg(long, value_name = "FILE", default_value = "etc/kiosk_config.toml")]
    pub config: PathBuf,

    /// Optional parcel size ranges CSV (strict header); replaces [[parcels]]
    #[arg(long, value_name = "FILE")]
    pub parcels: Option<PathBuf>,

    /// Log and report as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one detection screen until it navigates away
    Detect {
        /// Visitor started by tapping: classify only after a weight change
        #[arg(long, action = ArgAction::SetTrue)]
        tapped: bool,
        /// Use the simulated scale and classifier instead of the HTTP services
        #[arg(long, action = ArgAction::SetTrue)]
        sim: bool,
        /// Accept the parcel as soon as it is detected
        #[arg(long, action = ArgAction::SetTrue)]
        auto_continue: bool,
        /// Override detection.long_timeout_ms
        #[arg(long, value_name = "MS")]
        long_timeout_ms: Option<u64>,
        /// Override detection.short_timeout_ms
        #[arg(long, value_name = "MS")]
        short_timeout_ms: Option<u64>,
    },
    /// Show or edit the persisted configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Quick check that config and parcel ranges load
    SelfCheck,
    /// Health check for operational monitoring
    Health,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Set one value by dotted key, e.g. `detection.long_timeout_ms 30000`
    Set { key: String, value: String },
}
