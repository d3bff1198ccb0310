//! Config Commands
//!
//! Commands for inspecting the effective configuration.

use clap::Subcommand;

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// List the environment variables the CLI reads
    Env,
}

/// Environment variables the CLI reads
pub mod keys {
    pub const API_URL: &str = "RLM_API_URL";
    pub const REQUEST_TIMEOUT: &str = "RLM_REQUEST_TIMEOUT_SECS";
    pub const SCHEDULER_INTERVAL: &str = "RLM_SCHEDULER_INTERVAL_SECS";
    pub const EXPIRY_WARNING_DAYS: &str = "RLM_EXPIRY_WARNING_DAYS";
    pub const ARCHIVE_LOCATION: &str = "RLM_ARCHIVE_LOCATION";
    pub const SCHEDULER_ENABLED: &str = "RLM_SCHEDULER_ENABLED";
    pub const ACTOR_ID: &str = "RLM_ACTOR_ID";
    pub const ACTOR_ROLE: &str = "RLM_ACTOR_ROLE";
    pub const LOG_LEVEL: &str = "RLM_LOG_LEVEL";
    pub const LOG_FORMAT: &str = "RLM_LOG_FORMAT";

    /// Every key with a short description
    pub const ALL: [(&str, &str); 10] = [
        (API_URL, "Evidence-management API base URL"),
        (REQUEST_TIMEOUT, "Per-request timeout in seconds"),
        (SCHEDULER_INTERVAL, "Seconds between scheduler ticks"),
        (EXPIRY_WARNING_DAYS, "Expiry warning window in days"),
        (ARCHIVE_LOCATION, "Auto-archive destination"),
        (SCHEDULER_ENABLED, "Whether the scheduler may run (true/false)"),
        (ACTOR_ID, "Acting user / wallet id"),
        (ACTOR_ROLE, "Acting user's role"),
        (LOG_LEVEL, "trace, debug, info, warn or error"),
        (LOG_FORMAT, "pretty, json or compact"),
    ];
}
