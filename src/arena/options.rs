use clap::Parser;

use crate::contestant::Deadlines;

/// `arena <bot0> <bot1> [workers]` - plays the two bots against each other
/// until stopped, printing a running estimate of which one is stronger.
#[derive(Clone, Debug, Parser)]
#[command(name = "arena")]
pub struct ArenaOptions {
    /// Path to the first contestant executable.
    pub bot0: String,

    /// Path to the second contestant executable.
    pub bot1: String,

    /// Number of parallel arena workers; clamped to twice the CPU count.
    pub workers: Option<usize>,

    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Forward contestant stderr to the debug log.
    #[arg(short, long, default_value_t = false)]
    pub debug_ai: bool,

    /// Enforce the competitive 1s / 100ms deadlines instead of the relaxed
    /// tenfold budgets.
    #[arg(short, long, default_value_t = false)]
    pub strict_timeout: bool,

    /// Stop after this many counted rounds instead of running until a
    /// termination signal.
    #[arg(short, long)]
    pub rounds: Option<usize>,
}

impl ArenaOptions {
    pub fn deadlines(&self) -> Deadlines {
        if self.strict_timeout { Deadlines::strict() } else { Deadlines::relaxed() }
    }

    pub fn worker_count(&self) -> usize {
        let ncpu = std::thread::available_parallelism().map_or(1, |n| n.get());
        self.workers.unwrap_or(1).clamp(1, 2 * ncpu)
    }
}
