use clap::{Args, Parser, Subcommand};
use kmer_recover::RecoveryStrategy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kmer-recover", version, about = "Recovery of missing k-mers in sampled de Bruijn graphs", long_about = None)]
pub struct Cli {
    /// Log every distance round
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Number of threads to use
    #[arg(long, global = true, default_value_t = num_cpus::get())]
    pub threads: usize,

    #[command(subcommand)]
    pub command: Commands,
}

/// Recovery parameters shared by every command that runs a recovery
#[derive(Args, Debug, Clone)]
pub struct RecoveryArgs {
    /// Window (k-mer) length
    #[arg(short, long, default_value_t = 31)]
    pub k: usize,

    /// Largest gap filled, in window shifts
    #[arg(long, default_value_t = 31)]
    pub distance_cutoff: usize,

    /// Smallest gap considered
    #[arg(long, default_value_t = 0)]
    pub min_distance: usize,

    /// Matching strategy
    #[arg(long, value_enum, default_value_t = RecoveryStrategy::Bucketed)]
    pub strategy: RecoveryStrategy,

    /// Point mutations tolerated by the mutation-tolerant strategy
    #[arg(long, default_value_t = 1)]
    pub max_mutations: u32,
}

/// Synthetic graph parameters
#[derive(Args, Debug, Clone)]
pub struct SimulationArgs {
    /// Number of random paths
    #[arg(long, default_value_t = 10)]
    pub paths: usize,

    /// Windows per path (defaults to k)
    #[arg(long)]
    pub path_len: Option<usize>,

    /// Probability of dropping a window
    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    /// Do not pair paths with a mutated copy
    #[arg(long)]
    pub single_path: bool,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recover missing windows from a window list
    Recover {
        /// Input window list (.gz supported)
        #[arg(short, long)]
        input: PathBuf,

        /// Output window list (.gz supported)
        #[arg(short, long)]
        output: PathBuf,

        /// Write run statistics as JSON
        #[arg(long)]
        stats: Option<PathBuf>,

        #[command(flatten)]
        recovery: RecoveryArgs,
    },

    /// Generate sampled windows from random paths
    Simulate {
        /// Window length
        #[arg(short, long, default_value_t = 31)]
        k: usize,

        /// Sampled windows
        #[arg(short, long)]
        output: PathBuf,

        /// Canonical reference windows before dropout
        #[arg(long)]
        reference: Option<PathBuf>,

        #[command(flatten)]
        simulation: SimulationArgs,
    },

    /// Compare a recovered window list against a reference
    Evaluate {
        #[arg(short, long, default_value_t = 31)]
        k: usize,

        /// Reference window list
        #[arg(long)]
        truth: PathBuf,

        /// Recovered window list
        #[arg(long)]
        pred: PathBuf,

        /// Write metrics as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Simulate, recover and evaluate over several seeded runs
    Trial {
        /// Number of runs (seeds `seed..seed + runs`)
        #[arg(long, default_value_t = 1)]
        runs: u64,

        #[command(flatten)]
        recovery: RecoveryArgs,

        #[command(flatten)]
        simulation: SimulationArgs,
    },

    /// CSV of recovery quality over dropout probabilities 0.01 to 0.99
    Sweep {
        /// Runs per probability
        #[arg(long, default_value_t = 1)]
        runs: u64,

        /// CSV output (stdout when absent)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        recovery: RecoveryArgs,

        #[command(flatten)]
        simulation: SimulationArgs,
    },

    /// Print the complete canonical de Bruijn graph as DOT
    Graph {
        #[arg(short, long, default_value_t = 3)]
        k: usize,
    },

    /// Print unbranched walks through a window list
    Paths {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value_t = 31)]
        k: usize,

        /// Maximum windows per walk
        #[arg(long, default_value_t = 100)]
        max_len: usize,
    },
}
