//! Retention Lifecycle CLI
//!
//! Command-line interface over `rlm-core`: retention policies, legal holds,
//! deletion checks and the expiry scheduler.
//!
//! # Usage
//!
//! ```text
//! rlm [OPTIONS] <COMMAND>
//!
//! Commands:
//!   policy     Retention policy management
//!   hold       Legal hold management
//!   evidence   Evidence checks and archival
//!   scheduler  Expiry scheduler
//!   config     Configuration inspection
//!
//! Options:
//!   -a, --api-url <URL>    API endpoint URL [env: RLM_API_URL] [default: http://localhost:3000]
//!       --actor <ID>       Acting user / wallet id [env: RLM_ACTOR_ID]
//!       --role <ROLE>      Acting user's role [env: RLM_ACTOR_ROLE]
//!   -f, --format <FORMAT>  Output format (json, table, plain) [default: table]
//!   -v, --verbose          Enable verbose output
//! ```
//!
//! # Examples
//!
//! ## Create a policy
//! ```text
//! rlm --actor 0xadmin --role admin policy create \
//!   --name "Case Files 1yr" --days 365 --types photo,document
//! ```
//!
//! ## Place a legal hold
//! ```text
//! rlm --actor 0xcounsel --role legal_professional hold create \
//!   --case CASE-42 --reason "Subpoena" --evidence EV-1,EV-2 --stakeholders 0xjudge
//! ```
//!
//! ## Check deletion
//! ```text
//! rlm evidence can-delete --id EV-1
//! ```

pub mod commands;
pub mod error;
pub mod handler;
pub mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use error::{CliError, CliResult};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
