//! Policy Commands
//!
//! Commands for managing retention policies.

use clap::Subcommand;

/// Retention policy subcommands
#[derive(Subcommand, Debug)]
pub enum PolicyCommands {
    /// List cached policies
    List,

    /// Show a policy
    Get {
        /// Policy ID
        #[arg(short, long)]
        id: String,
    },

    /// Create a policy (admin)
    Create {
        /// Policy name
        #[arg(short, long)]
        name: String,

        /// Retention period in days (1-36500)
        #[arg(short, long, allow_negative_numbers = true)]
        days: i64,

        /// Evidence types covered (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        types: Vec<String>,

        /// Jurisdiction
        #[arg(short, long, default_value = "")]
        jurisdiction: String,

        /// Legal basis
        #[arg(short, long, default_value = "")]
        legal_basis: String,

        /// Archive evidence automatically once expired
        #[arg(long)]
        auto_archive: bool,
    },

    /// Update a policy (admin)
    Update {
        /// Policy ID
        #[arg(short, long)]
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long, allow_negative_numbers = true)]
        days: Option<i64>,

        #[arg(short, long, value_delimiter = ',')]
        types: Option<Vec<String>>,

        #[arg(short, long)]
        jurisdiction: Option<String>,

        #[arg(short, long)]
        legal_basis: Option<String>,

        #[arg(long)]
        auto_archive: Option<bool>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a policy no evidence uses (admin)
    Delete {
        /// Policy ID
        #[arg(short, long)]
        id: String,
    },

    /// Assign evidence to a policy (admin)
    Apply {
        /// Policy ID
        #[arg(short, long)]
        id: String,

        /// Evidence IDs (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        evidence: Vec<String>,
    },
}
