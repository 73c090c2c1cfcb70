mod cli_main;

use clap::Parser;
use cli_main::{Cli, Commands, RecoveryArgs, SimulationArgs};
use kmer_recover::eval::{evaluate_recovery, RecoveryMetrics};
use kmer_recover::graph::paths::find_paths;
use kmer_recover::io::dot::write_dot;
use kmer_recover::io::windows::{read_windows, WindowWriter};
use kmer_recover::kmer::kmer::{canonical, decode_kmer};
use kmer_recover::kmer::word::KmerWord;
use kmer_recover::sim::{complete_graph, simulate, SimulationConfig};
use kmer_recover::{RecoveryConfig, RecoveryEngine, Result};
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Runs `$body` with `$w` bound to the narrowest word holding `$k` symbols.
macro_rules! with_word {
    ($k:expr, $w:ident => $body:expr) => {
        if $k <= <u64 as KmerWord>::MAX_K {
            type $w = u64;
            $body
        } else {
            type $w = u128;
            $body
        }
    };
}

#[derive(Serialize)]
struct EvaluationReport {
    #[serde(flatten)]
    metrics: RecoveryMetrics,
    precision: f64,
    recall: f64,
    f1: f64,
}

impl From<RecoveryMetrics> for EvaluationReport {
    fn from(metrics: RecoveryMetrics) -> Self {
        let (precision, recall, f1) = metrics.scores();
        Self {
            metrics,
            precision,
            recall,
            f1,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting tracing default failed: {}", e);
    }

    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
    {
        warn!("Failed to build thread pool: {}", e);
    }

    if let Err(e) = run(cli.command) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Recover {
            input,
            output,
            stats,
            recovery,
        } => with_word!(recovery.k, W => recover_file::<W>(&input, &output, stats.as_deref(), &recovery)),

        Commands::Simulate {
            k,
            output,
            reference,
            simulation,
        } => with_word!(k, W => simulate_file::<W>(k, &output, reference.as_deref(), &simulation)),

        Commands::Evaluate {
            k,
            truth,
            pred,
            output,
        } => with_word!(k, W => evaluate_files::<W>(k, &truth, &pred, output.as_deref())),

        Commands::Trial {
            runs,
            recovery,
            simulation,
        } => with_word!(recovery.k, W => trial::<W>(runs, &recovery, &simulation)),

        Commands::Sweep {
            runs,
            output,
            recovery,
            simulation,
        } => {
            let out: Box<dyn Write> = match output {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(io::stdout().lock()),
            };
            with_word!(recovery.k, W => sweep::<W>(out, runs, &recovery, &simulation))
        }

        Commands::Graph { k } => {
            let (nodes, edges) = complete_graph::<u64>(k)?;
            info!("Complete graph for k = {}: {} nodes, {} edges", k, nodes.len(), edges.len());
            let mut out = BufWriter::new(io::stdout().lock());
            write_dot(&mut out, edges, k)?;
            out.flush()?;
            Ok(())
        }

        Commands::Paths { input, k, max_len } => {
            with_word!(k, W => print_paths::<W>(&input, k, max_len))
        }
    }
}

fn recovery_config(args: &RecoveryArgs) -> RecoveryConfig {
    RecoveryConfig::new(args.k, args.distance_cutoff, args.min_distance)
        .with_strategy(args.strategy)
        .with_max_mutations(args.max_mutations)
}

fn simulation_config(k: usize, args: &SimulationArgs, seed: u64, dropout: f64) -> SimulationConfig {
    SimulationConfig {
        k,
        paths: args.paths,
        path_len: args.path_len.unwrap_or(k),
        dropout,
        mutated: !args.single_path,
        seed,
    }
}

fn recover_file<W: KmerWord>(
    input: &Path,
    output: &Path,
    stats: Option<&Path>,
    args: &RecoveryArgs,
) -> Result<()> {
    let engine = RecoveryEngine::new(recovery_config(args))?;
    let windows: Vec<W> = read_windows(input, args.k)?;
    info!("Read {} windows from {}", windows.len(), input.display());

    let recovery = engine.run(&windows)?;
    let mut writer = WindowWriter::new(output)?;
    writer.write_all(recovery.windows.iter().copied(), args.k)?;
    writer.finish()?;
    info!("Wrote {} windows to {}", recovery.windows.len(), output.display());

    if let Some(path) = stats {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &recovery.stats)?;
        info!("Statistics written to {}", path.display());
    }
    Ok(())
}

fn simulate_file<W: KmerWord>(
    k: usize,
    output: &Path,
    reference: Option<&Path>,
    args: &SimulationArgs,
) -> Result<()> {
    let graph = simulate::<W>(&simulation_config(k, args, args.seed, args.dropout))?;
    let mut writer = WindowWriter::new(output)?;
    writer.write_all(graph.sampled.iter().copied(), k)?;
    writer.finish()?;
    info!(
        "Sampled {} of {} windows into {}",
        graph.sampled.len(),
        graph.path_windows(),
        output.display()
    );

    if let Some(path) = reference {
        let mut writer = WindowWriter::new(path)?;
        writer.write_all(graph.reference(), k)?;
        writer.finish()?;
    }
    Ok(())
}

fn evaluate_files<W: KmerWord>(k: usize, truth: &Path, pred: &Path, output: Option<&Path>) -> Result<()> {
    let canonical_set = |path: &Path| -> Result<BTreeSet<W>> {
        Ok(read_windows::<W>(path, k)?
            .into_iter()
            .map(|w| canonical(w, k))
            .collect())
    };
    let report = EvaluationReport::from(evaluate_recovery(&canonical_set(truth)?, &canonical_set(pred)?));

    println!("Evaluation Results:");
    println!("  Correct: {}", report.metrics.correct);
    println!("  Missing: {}", report.metrics.missing);
    println!("  Wrong: {}", report.metrics.wrong);
    println!("  Precision: {:.4}", report.precision);
    println!("  Recall: {:.4}", report.recall);
    println!("  F1 Score: {:.4}", report.f1);

    if let Some(path) = output {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &report)?;
        info!("Evaluation results written to {}", path.display());
    }
    Ok(())
}

fn trial<W: KmerWord>(runs: u64, recovery: &RecoveryArgs, simulation: &SimulationArgs) -> Result<()> {
    let start = Instant::now();
    let engine = RecoveryEngine::new(recovery_config(recovery))?;
    let mut total = RecoveryMetrics::default();
    let mut sampled = 0usize;

    for run in 0..runs {
        let config = simulation_config(recovery.k, simulation, simulation.seed + run, simulation.dropout);
        let graph = simulate::<W>(&config)?;
        let recovered = engine.run(&graph.sampled)?;
        total += evaluate_recovery(&graph.reference(), &recovered.windows);
        sampled += graph.sampled.len();
    }

    let runs = runs.max(1) as f64;
    println!(
        "Begin with: {:.2} Correct: {:.2}, Missing: {:.2}, Wrong: {:.2}",
        sampled as f64 / runs,
        total.correct as f64 / runs,
        total.missing as f64 / runs,
        total.wrong as f64 / runs
    );
    println!("Time elapsed: {} ms", start.elapsed().as_millis());
    Ok(())
}

fn sweep<W: KmerWord>(
    mut out: Box<dyn Write>,
    runs: u64,
    recovery: &RecoveryArgs,
    simulation: &SimulationArgs,
) -> Result<()> {
    let engine = RecoveryEngine::new(recovery_config(recovery))?;
    writeln!(out, "Prob,Cor,Miss,Fail,Ratio")?;

    for step in 1..100u32 {
        let dropout = f64::from(step) / 100.0;
        let mut total = RecoveryMetrics::default();
        let mut length = 0usize;
        let mut sampled = 0usize;
        let mut recovered = 0usize;

        for run in 0..runs {
            let config = simulation_config(recovery.k, simulation, simulation.seed + run, dropout);
            let graph = simulate::<W>(&config)?;
            let result = engine.run(&graph.sampled)?;
            total += evaluate_recovery(&graph.reference(), &result.windows);
            length += graph.path_windows();
            sampled += graph.sampled.len();
            recovered += result.windows.len();
        }

        let length = length.max(1) as f64;
        writeln!(
            out,
            "{:.2},{},{},{},{}",
            dropout,
            total.correct as f64 / length,
            total.missing as f64 / length,
            total.wrong as f64 / length,
            recovered as f64 / sampled.max(1) as f64
        )?;
    }
    out.flush()?;
    Ok(())
}

fn print_paths<W: KmerWord>(input: &Path, k: usize, max_len: usize) -> Result<()> {
    let windows: Vec<W> = read_windows(input, k)?;
    let paths = find_paths(&windows, k, max_len);
    info!("Found {} walks through {} windows", paths.len(), windows.len());

    let mut out = BufWriter::new(io::stdout().lock());
    for (id, path) in paths.iter().enumerate() {
        let mut sequence = String::with_capacity(k + path.len());
        for (index, &window) in path.iter().enumerate() {
            let decoded = decode_kmer(window, k);
            if index == 0 {
                sequence.push_str(&decoded);
            } else {
                sequence.push_str(&decoded[k - 1..]);
            }
        }
        writeln!(out, ">path_{} windows={}", id, path.len())?;
        writeln!(out, "{}", sequence)?;
    }
    out.flush()?;
    Ok(())
}
