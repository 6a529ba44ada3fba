//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plover")]
#[command(about = "Pattern generation for pattern database heuristics")]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate a pattern and its abstract distance table for a task
    Generate(GenerateArgs),

    /// Show the variables, goal and causal graph of a task
    Inspect {
        /// Path to the JSON task file
        task: PathBuf,

        /// Output format: text | json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct GenerateArgs {
    /// Path to the JSON task file
    pub(crate) task: PathBuf,

    /// Pattern generator: cegar | random
    #[arg(long, default_value = "cegar")]
    pub(crate) generator: String,

    /// Maximum number of abstract states of the pattern
    #[arg(long)]
    pub(crate) max_pdb_size: Option<usize>,

    /// Wall-clock budget in seconds
    #[arg(long)]
    pub(crate) max_time: Option<f64>,

    /// Follow a single optimal operator per abstract state instead of all tied ones
    #[arg(long, default_value_t = false)]
    pub(crate) no_wildcard: bool,

    /// Random seed for reproducible runs
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Maximum number of refinements
    #[arg(long)]
    pub(crate) max_refinements: Option<usize>,

    /// Variables never added by refinement (comma-separated ids)
    #[arg(long, value_delimiter = ',')]
    pub(crate) blacklist: Vec<usize>,

    /// Start from this variable instead of a random goal variable
    #[arg(long)]
    pub(crate) seed_variable: Option<usize>,

    /// JSON file with generator options; command-line flags override it
    #[arg(long)]
    pub(crate) options: Option<PathBuf>,

    /// Output format: text | json
    #[arg(long, default_value = "text")]
    pub(crate) format: String,

    /// Also write the JSON report to this path
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}
