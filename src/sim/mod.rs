//! Synthetic window sets: random paths, mutated copies and random dropout.
//!
//! All randomness flows through a caller-provided [`Rng`]; [`simulate`] seeds a
//! [`StdRng`] so that a run is reproducible from its configuration alone.

use crate::error::{Error, Result};
use crate::kmer::kmer::{canonical, check_k, left_neighbors, right_neighbors};
use crate::kmer::word::{symbol_mask, KmerWord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Largest k for which the complete graph is enumerated
pub const MAX_COMPLETE_K: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub k: usize,
    /// Number of independent random paths
    pub paths: usize,
    /// Windows per path; a path of `k` windows shares one base across all of them
    pub path_len: usize,
    /// Probability of dropping each window
    pub dropout: f64,
    /// Pair each path with a single-mutation copy
    pub mutated: bool,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            k: 31,
            paths: 10,
            path_len: 31,
            dropout: 0.5,
            mutated: true,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(Error::InvalidParameter(format!(
                "dropout probability must lie in [0, 1) but got {}",
                self.dropout
            )));
        }
        if self.path_len == 0 {
            return Err(Error::InvalidParameter("path length must be positive".into()));
        }
        Ok(())
    }
}

/// A random path and its mutated copy, in path order (not canonical).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair<W: KmerWord> {
    pub original: Vec<W>,
    pub mutant: Vec<W>,
}

#[derive(Debug, Clone)]
pub struct SimulatedGraph<W: KmerWord> {
    pub k: usize,
    pub paths: Vec<PathPair<W>>,
    /// Windows surviving dropout
    pub sampled: Vec<W>,
}

impl<W: KmerWord> SimulatedGraph<W> {
    /// Canonical windows of every path, before dropout.
    pub fn reference(&self) -> BTreeSet<W> {
        self.paths
            .iter()
            .flat_map(|pair| pair.original.iter().chain(pair.mutant.iter()))
            .map(|&w| canonical(w, self.k))
            .collect()
    }

    /// Canonical windows handed to recovery.
    pub fn given(&self) -> BTreeSet<W> {
        self.sampled.iter().map(|&w| canonical(w, self.k)).collect()
    }

    /// Number of path windows, counting both copies.
    pub fn path_windows(&self) -> usize {
        self.paths
            .iter()
            .map(|pair| pair.original.len() + pair.mutant.len())
            .sum()
    }
}

/// Random walk of `len` windows, each a right neighbour of the previous one.
pub fn random_path<W: KmerWord, R: Rng>(rng: &mut R, k: usize, len: usize) -> Vec<W> {
    let mut path = Vec::with_capacity(len);
    if len == 0 {
        return path;
    }
    let mut current = W::from_u128(rng.gen::<u128>()) & symbol_mask(k);
    path.push(current);
    for _ in 1..len {
        current = right_neighbors(current, k)[rng.gen_range(0..4)];
        path.push(current);
    }
    path
}

/// Copy of `path` carrying one point mutation in the base shared by its first `k` windows.
///
/// The mutated slot starts at the right end of the first window and moves one slot up per
/// window, so windows from index `k` on are left unchanged.
pub fn mutate_path<W: KmerWord, R: Rng>(rng: &mut R, path: &[W], k: usize) -> Vec<W> {
    let change = W::from_symbol(rng.gen_range(1..4u8));
    let window = symbol_mask::<W>(k);
    path.iter()
        .enumerate()
        .map(|(position, &w)| w ^ (change.shl_symbols(position) & window))
        .collect()
}

/// Keeps each window with probability `1 - dropout`.
pub fn drop_windows<W: KmerWord, R: Rng>(
    rng: &mut R,
    windows: impl IntoIterator<Item = W>,
    dropout: f64,
) -> Vec<W> {
    windows
        .into_iter()
        .filter(|_| rng.gen::<f64>() > dropout)
        .collect()
}

/// Generates the paths of `config` and samples them with dropout.
pub fn simulate<W: KmerWord>(config: &SimulationConfig) -> Result<SimulatedGraph<W>> {
    check_k::<W>(config.k)?;
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let paths: Vec<PathPair<W>> = (0..config.paths)
        .map(|_| {
            let original = random_path(&mut rng, config.k, config.path_len);
            let mutant = if config.mutated {
                mutate_path(&mut rng, &original, config.k)
            } else {
                original.clone()
            };
            PathPair { original, mutant }
        })
        .collect();

    let all = paths
        .iter()
        .flat_map(|pair| pair.original.iter().chain(pair.mutant.iter()).copied())
        .collect::<Vec<W>>();
    let sampled = drop_windows(&mut rng, all, config.dropout);
    debug!(
        "Simulated {} paths, {} windows kept after dropout {}",
        paths.len(),
        sampled.len(),
        config.dropout
    );

    Ok(SimulatedGraph {
        k: config.k,
        paths,
        sampled,
    })
}

/// Every canonical k-mer and the canonical edges joining neighbours.
pub fn complete_graph<W: KmerWord>(k: usize) -> Result<(BTreeSet<W>, BTreeSet<(W, W)>)> {
    check_k::<W>(k)?;
    if k > MAX_COMPLETE_K {
        return Err(Error::InvalidParameter(format!(
            "complete graph is limited to k <= {} but got {}",
            MAX_COMPLETE_K, k
        )));
    }
    let mut nodes = BTreeSet::new();
    let mut edges = BTreeSet::new();
    for value in 0..(1u128 << (2 * k)) {
        let kmer = W::from_u128(value);
        let node = canonical(kmer, k);
        nodes.insert(node);
        for neighbor in right_neighbors(kmer, k)
            .into_iter()
            .chain(left_neighbors(kmer, k))
        {
            edges.insert((node, canonical(neighbor, k)));
        }
    }
    Ok((nodes, edges))
}
