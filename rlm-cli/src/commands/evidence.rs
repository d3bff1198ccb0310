//! Evidence Commands

use clap::Subcommand;

/// Evidence subcommands
#[derive(Subcommand, Debug)]
pub enum EvidenceCommands {
    /// Check whether an evidence item may be deleted
    CanDelete {
        /// Evidence ID
        #[arg(short, long)]
        id: String,
    },

    /// Check whether an evidence item may be modified
    CanModify {
        /// Evidence ID
        #[arg(short, long)]
        id: String,
    },

    /// List evidence expiring within a window
    Expiring {
        /// Days ahead (0 = already expired)
        #[arg(short, long, default_value = "7")]
        days: u32,
    },

    /// Archive evidence (admin)
    Archive {
        /// Evidence IDs (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        ids: Vec<String>,

        /// Archive location
        #[arg(short, long, env = "RLM_ARCHIVE_LOCATION", default_value = "auto-archive")]
        location: String,
    },
}
