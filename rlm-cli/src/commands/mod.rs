//! CLI Commands Module
//!
//! Command definitions for the retention lifecycle CLI.

pub mod config;
pub mod evidence;
pub mod hold;
pub mod policy;
pub mod scheduler;

use clap::{Parser, Subcommand};
use rlm_core::telemetry::{LogFormat, LogLevel};
use rlm_core::Role;

/// Retention Lifecycle Manager CLI
#[derive(Parser, Debug)]
#[command(name = "rlm")]
#[command(author = "Rainbow City Foundation")]
#[command(version)]
#[command(about = "Evidence retention policy and legal hold management")]
#[command(long_about = "A command-line tool for managing evidence retention policies, \
    legal holds, deletion checks and scheduled expiry processing against an \
    evidence-management API.")]
pub struct Cli {
    /// API endpoint URL
    #[arg(short, long, env = "RLM_API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "RLM_REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub timeout: u64,

    /// Acting user / wallet id
    #[arg(long, env = "RLM_ACTOR_ID")]
    pub actor: Option<String>,

    /// Acting user's role
    #[arg(long, env = "RLM_ACTOR_ROLE")]
    pub role: Option<Role>,

    /// Output format (json, table, plain)
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RLM_LOG_LEVEL", default_value = "warn")]
    pub log_level: LogLevel,

    /// Log format (pretty, json, compact)
    #[arg(long, env = "RLM_LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormat,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Table format (human-readable)
    #[default]
    Table,
    /// Plain text
    Plain,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retention policy management
    #[command(subcommand)]
    Policy(policy::PolicyCommands),

    /// Legal hold management
    #[command(subcommand)]
    Hold(hold::HoldCommands),

    /// Evidence checks and archival
    #[command(subcommand)]
    Evidence(evidence::EvidenceCommands),

    /// Expiry scheduler
    #[command(subcommand)]
    Scheduler(scheduler::SchedulerCommands),

    /// Configuration inspection
    #[command(subcommand)]
    Config(config::ConfigCommands),
}
