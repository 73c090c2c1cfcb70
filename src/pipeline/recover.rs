use crate::error::{Error, Result};
use crate::graph::accumulator::{PathAccumulator, MAX_ACCUMULATED_K};
use crate::graph::bucket::{BucketMatcher, DistanceSchedule, MatchReport, OverlapMatcher};
use crate::graph::interpolate::{find_closest_directed, interpolate};
use crate::graph::mutation_bucket::MutationTolerantMatcher;
use crate::graph::seed::{find_seeds, link_seeds, Seed, SeedKey};
use crate::kmer::kmer::{canonical, check_k, complement};
use crate::kmer::word::{symbol_mask, KmerWord};
use crate::pipeline::config::{RecoveryConfig, RecoveryStrategy};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::{debug, info};

/// Counters collected during one recovery run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecoveryStats {
    /// Distinct canonical windows given
    pub input_windows: usize,
    /// Canonical windows added by recovery
    pub filled_windows: usize,
    pub matched_pairs: usize,
    /// Windows left without a partner at the distance cutoff
    pub unresolved_windows: usize,
    pub seeds: usize,
    pub accumulated_paths: usize,
    pub rejected_extensions: usize,
}

/// Canonical recovered window set and the run counters
#[derive(Debug, Clone)]
pub struct Recovery<W: KmerWord> {
    pub windows: BTreeSet<W>,
    pub stats: RecoveryStats,
}

/// Runs one configured recovery strategy over window sets.
#[derive(Debug, Clone)]
pub struct RecoveryEngine {
    config: RecoveryConfig,
}

impl RecoveryEngine {
    pub fn new(config: RecoveryConfig) -> Result<Self> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Recovers the windows missing between `windows` and returns the canonical superset.
    pub fn run<W: KmerWord>(&self, windows: &[W]) -> Result<Recovery<W>> {
        let k = self.config.k;
        check_k::<W>(k)?;
        let start = Instant::now();

        let window_mask = symbol_mask::<W>(k);
        let input: Vec<W> = windows
            .iter()
            .map(|&w| w & window_mask)
            .collect::<BTreeSet<W>>()
            .into_iter()
            .collect();

        info!(
            "Recovering {} windows with {} strategy (k = {}, distances {}..={})",
            input.len(),
            self.config.strategy.name(),
            k,
            self.config.min_distance,
            self.config.distance_cutoff
        );

        let mut stats = RecoveryStats::default();
        let filled = match self.config.strategy {
            RecoveryStrategy::BruteForce => self.brute_force(&input, &mut stats)?,
            RecoveryStrategy::Bucketed => {
                self.scheduled(&BucketMatcher::new(k), &input, &mut stats)
            }
            RecoveryStrategy::MutationTolerant => self.scheduled(
                &MutationTolerantMatcher::new(k, self.config.max_mutations),
                &input,
                &mut stats,
            ),
            RecoveryStrategy::SeedPaths => self.seed_paths(&input, &mut stats)?,
        };

        let given: BTreeSet<W> = input.iter().map(|&w| canonical(w, k)).collect();
        let mut recovered = given.clone();
        recovered.extend(filled.into_iter().map(|w| canonical(w, k)));

        stats.input_windows = given.len();
        stats.filled_windows = recovered.len() - given.len();
        info!(
            "Recovered {} new windows ({} total) in {:.2}s",
            stats.filled_windows,
            recovered.len(),
            start.elapsed().as_secs_f32()
        );

        Ok(Recovery {
            windows: recovered,
            stats,
        })
    }

    fn brute_force<W: KmerWord>(&self, input: &[W], stats: &mut RecoveryStats) -> Result<Vec<W>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }
        if input.len() < 2 {
            return Err(Error::InsufficientCandidates(input.len()));
        }
        let k = self.config.k;
        let cutoff = self.config.distance_cutoff;
        let min_distance = self.config.min_distance;

        let fills: Vec<Option<Vec<W>>> = input
            .par_iter()
            .map(|&window| -> Result<Option<Vec<W>>> {
                let closest = match find_closest_directed(window, k, input, min_distance)? {
                    Some(closest) if closest.distance <= cutoff => closest,
                    _ => return Ok(None),
                };
                let upstream = if closest.direction.uses_complement() {
                    complement(closest.kmer, k)
                } else {
                    closest.kmer
                };
                Ok(Some(interpolate(window, upstream, k, closest.distance).collect()))
            })
            .collect::<Result<_>>()?;

        stats.matched_pairs = fills.iter().filter(|fill| fill.is_some()).count();
        stats.unresolved_windows = fills.len() - stats.matched_pairs;
        Ok(fills.into_iter().flatten().flatten().collect())
    }

    fn scheduled<W, M>(&self, matcher: &M, input: &[W], stats: &mut RecoveryStats) -> Vec<W>
    where
        W: KmerWord,
        M: OverlapMatcher<W>,
    {
        let k = self.config.k;
        let both = with_complements(input, k);
        let schedule = DistanceSchedule {
            min_distance: self.config.min_distance,
            distance_cutoff: self.config.distance_cutoff,
        };
        let MatchReport {
            matches,
            unresolved,
        } = schedule.run(matcher, both.clone(), &both);

        stats.matched_pairs = matches.len();
        stats.unresolved_windows = unresolved.len();
        matches
            .par_iter()
            .flat_map_iter(|found| found.fill(k))
            .collect()
    }

    fn seed_paths<W: KmerWord>(&self, input: &[W], stats: &mut RecoveryStats) -> Result<Vec<W>> {
        let k = self.config.k;
        if k > MAX_ACCUMULATED_K {
            return Err(Error::InvalidParameter(format!(
                "seed paths support k up to {} but got {}",
                MAX_ACCUMULATED_K, k
            )));
        }

        let both = with_complements(input, k);
        let seeds = find_seeds(&both, k);
        stats.seeds = seeds.len();

        let mut groups: BTreeMap<SeedKey, Vec<Seed<W>>> = BTreeMap::new();
        for seed in seeds {
            groups.entry(seed.key()).or_default().push(seed);
        }
        debug!("{} seeds in {} mutation groups", stats.seeds, groups.len());

        let grown: Vec<GroupPaths<W>> = groups
            .into_par_iter()
            .map(|(_, group)| {
                grow_group(&group, k, self.config.min_distance, self.config.distance_cutoff)
            })
            .collect();

        let mut windows = Vec::new();
        for group in grown {
            stats.matched_pairs += group.links;
            stats.unresolved_windows += group.unlinked;
            stats.accumulated_paths += group.paths;
            stats.rejected_extensions += group.rejected;
            windows.extend(group.windows);
        }
        Ok(windows)
    }
}

struct GroupPaths<W> {
    windows: Vec<W>,
    links: usize,
    /// Seeds without a right link
    unlinked: usize,
    paths: usize,
    rejected: usize,
}

/// Greedy growth of one path per unvisited seed, right links first, then incoming links.
fn grow_group<W: KmerWord>(
    seeds: &[Seed<W>],
    k: usize,
    min_distance: usize,
    distance_cutoff: usize,
) -> GroupPaths<W> {
    let links = link_seeds(seeds, k, min_distance, distance_cutoff);
    let mut incoming: Vec<Vec<(usize, usize)>> = vec![Vec::new(); seeds.len()];
    for (index, link) in links.iter().enumerate() {
        if let Some((next, distance)) = *link {
            incoming[next].push((index, distance));
        }
    }

    let mut grown = GroupPaths {
        windows: Vec::new(),
        links: links.iter().filter(|link| link.is_some()).count(),
        unlinked: links.iter().filter(|link| link.is_none()).count(),
        paths: 0,
        rejected: 0,
    };
    let mut visited = vec![false; seeds.len()];
    for start in 0..seeds.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut path = PathAccumulator::new(&seeds[start], k);

        let mut current = start;
        while let Some((next, distance)) = links[current] {
            if visited[next] {
                break;
            }
            if !path.try_add_right(&seeds[next], distance) {
                grown.rejected += 1;
                break;
            }
            visited[next] = true;
            current = next;
        }

        current = start;
        loop {
            let candidate = incoming[current]
                .iter()
                .copied()
                .find(|&(index, _)| !visited[index]);
            let (previous, distance) = match candidate {
                Some(found) => found,
                None => break,
            };
            if !path.try_add_left(&seeds[previous], distance) {
                grown.rejected += 1;
                break;
            }
            visited[previous] = true;
            current = previous;
        }

        grown.paths += 1;
        grown.windows.extend(path.kmers::<W>());
    }
    grown
}

/// Sorted distinct windows together with their reverse complements.
fn with_complements<W: KmerWord>(windows: &[W], k: usize) -> Vec<W> {
    windows
        .iter()
        .flat_map(|&w| [w, complement(w, k)])
        .collect::<BTreeSet<W>>()
        .into_iter()
        .collect()
}

/// Bucketed recovery of the windows missing from `windows`.
pub fn recover_graph<W: KmerWord>(
    windows: &[W],
    k: usize,
    distance_cutoff: usize,
    min_distance: usize,
) -> Result<BTreeSet<W>> {
    let config = RecoveryConfig::new(k, distance_cutoff, min_distance);
    Ok(RecoveryEngine::new(config)?.run(windows)?.windows)
}

/// Recovery whose overlaps may carry a single point mutation.
pub fn recover_graph_mutation_tolerant<W: KmerWord>(
    windows: &[W],
    k: usize,
    distance_cutoff: usize,
    min_distance: usize,
) -> Result<BTreeSet<W>> {
    let config = RecoveryConfig::new(k, distance_cutoff, min_distance)
        .with_strategy(RecoveryStrategy::MutationTolerant);
    Ok(RecoveryEngine::new(config)?.run(windows)?.windows)
}
