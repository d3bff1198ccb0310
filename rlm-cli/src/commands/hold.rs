//! Legal Hold Commands

use chrono::{DateTime, Utc};
use clap::Subcommand;
use rlm_core::NotificationFrequency;

/// Legal hold subcommands
#[derive(Subcommand, Debug)]
pub enum HoldCommands {
    /// List cached holds
    List {
        /// Only active holds
        #[arg(long)]
        active: bool,

        /// Only holds for this case
        #[arg(short, long)]
        case: Option<String>,

        /// Only active holds covering this evidence item
        #[arg(short, long)]
        evidence: Option<String>,
    },

    /// Show a hold
    Get {
        /// Hold ID
        #[arg(short, long)]
        id: String,
    },

    /// Place a legal hold (privileged)
    Create {
        /// Case reference
        #[arg(short, long)]
        case: String,

        /// Reason for the hold
        #[arg(short, long)]
        reason: String,

        /// Legal basis
        #[arg(short, long, default_value = "")]
        legal_basis: String,

        /// Court order reference
        #[arg(short = 'o', long)]
        court_order: Option<String>,

        /// Evidence IDs (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        evidence: Vec<String>,

        /// Planned end date (RFC 3339)
        #[arg(long)]
        end_date: Option<DateTime<Utc>>,

        /// Stakeholders to notify (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        stakeholders: Vec<String>,

        /// Reminder frequency (daily, weekly, monthly)
        #[arg(long)]
        frequency: Option<NotificationFrequency>,
    },

    /// Update an active hold (privileged)
    Update {
        /// Hold ID
        #[arg(short, long)]
        id: String,

        #[arg(short, long)]
        reason: Option<String>,

        #[arg(short, long)]
        legal_basis: Option<String>,

        #[arg(short = 'o', long)]
        court_order: Option<String>,

        /// Replacement evidence list (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        evidence: Option<Vec<String>>,

        #[arg(long)]
        end_date: Option<DateTime<Utc>>,

        #[arg(short, long, value_delimiter = ',')]
        stakeholders: Option<Vec<String>>,

        #[arg(long)]
        frequency: Option<NotificationFrequency>,
    },

    /// Release a hold (privileged)
    Release {
        /// Hold ID
        #[arg(short, long)]
        id: String,

        /// Reason for release
        #[arg(short, long)]
        reason: String,
    },

    /// Hold statistics
    Stats,
}
