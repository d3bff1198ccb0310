//! Scheduler Commands

use clap::Subcommand;

/// Scheduler subcommands
#[derive(Subcommand, Debug)]
pub enum SchedulerCommands {
    /// Run a single expiry tick and print its report
    Tick,

    /// Run the scheduler until interrupted (Ctrl-C)
    Run {
        /// Seconds between ticks
        #[arg(short, long, env = "RLM_SCHEDULER_INTERVAL_SECS")]
        interval: Option<u64>,

        /// Run one tick immediately on start
        #[arg(long)]
        tick_on_start: bool,
    },
}
