//! Shortest-gap-first bucket matching of k-mers.
//!
//! For each distance `d`, k-mers of the target set are bucketed by their high `k - d`
//! symbols and every unresolved source k-mer looks up its low `k - d` symbols. A key
//! collision keeps the first k-mer inserted, so some valid matches are never reported.

use crate::graph::interpolate::{interpolate, PathInterpolator};
use crate::kmer::word::{symbol_mask, KmerWord};
use ahash::AHashMap;
use tracing::debug;

/// `representative` lies `distance` symbols downstream of `kmer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match<W: KmerWord> {
    pub representative: W,
    pub kmer: W,
    pub distance: usize,
}

impl<W: KmerWord> Match<W> {
    /// K-mers strictly between the matched pair.
    pub fn fill(&self, k: usize) -> PathInterpolator<W> {
        interpolate(self.representative, self.kmer, k, self.distance)
    }
}

/// Result of one distance round.
#[derive(Debug, Clone, Default)]
pub struct RoundOutcome<W: KmerWord> {
    /// `(representative, kmer)` pairs
    pub found: Vec<(W, W)>,
    pub unresolved: Vec<W>,
    /// Matched only up to a mutation; still waiting for an exact partner
    pub tolerated: Vec<W>,
}

/// Result of a whole ascending-distance schedule.
#[derive(Debug, Clone, Default)]
pub struct MatchReport<W: KmerWord> {
    pub matches: Vec<Match<W>>,
    pub unresolved: Vec<W>,
}

/// One round of overlap matching at a fixed distance.
pub trait OverlapMatcher<W: KmerWord> {
    fn match_round(&self, from: &[W], to: &[W], distance: usize) -> RoundOutcome<W>;

    /// Round for k-mers that already produced approximate readings; only exact overlaps count.
    fn exact_round(&self, from: &[W], to: &[W], distance: usize) -> RoundOutcome<W> {
        self.match_round(from, to, distance)
    }

    fn name(&self) -> &'static str;
}

/// Exact overlap on the high/low `k - d` symbols.
#[derive(Debug, Clone, Copy)]
pub struct BucketMatcher {
    k: usize,
}

impl BucketMatcher {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

/// First k-mer of `to` for every high `k - distance` symbol key.
pub(crate) fn exact_buckets<W: KmerWord>(to: &[W], distance: usize) -> AHashMap<W, W> {
    let mut buckets: AHashMap<W, W> = AHashMap::with_capacity(to.len());
    for &kmer in to {
        buckets.entry(kmer.shr_symbols(distance)).or_insert(kmer);
    }
    buckets
}

/// Downstream partner of `kmer` whose high symbols equal its low `overlap` key.
#[inline]
pub(crate) fn exact_partner<W: KmerWord>(buckets: &AHashMap<W, W>, kmer: W, overlap: W) -> Option<W> {
    buckets
        .get(&overlap)
        .copied()
        .filter(|&representative| representative != kmer)
}

impl<W: KmerWord> OverlapMatcher<W> for BucketMatcher {
    fn match_round(&self, from: &[W], to: &[W], distance: usize) -> RoundOutcome<W> {
        let buckets = exact_buckets(to, distance);
        let mask = symbol_mask::<W>(self.k.saturating_sub(distance));
        let mut outcome = RoundOutcome::default();
        for &kmer in from {
            match exact_partner(&buckets, kmer, kmer & mask) {
                Some(representative) => outcome.found.push((representative, kmer)),
                None => outcome.unresolved.push(kmer),
            }
        }
        outcome
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

/// Ascending distance range driving a matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceSchedule {
    pub min_distance: usize,
    pub distance_cutoff: usize,
}

impl DistanceSchedule {
    /// Runs `min_distance..=distance_cutoff`; k-mers matched exactly at a distance leave the
    /// source set. K-mers matched only up to a mutation keep looking for an exact partner.
    pub fn run<W, M>(&self, matcher: &M, from: Vec<W>, to: &[W]) -> MatchReport<W>
    where
        W: KmerWord,
        M: OverlapMatcher<W> + ?Sized,
    {
        let mut matches = Vec::new();
        let mut pending = from;
        let mut tolerated: Vec<W> = Vec::new();
        for distance in self.min_distance..=self.distance_cutoff {
            if pending.is_empty() && tolerated.is_empty() {
                break;
            }
            let round = matcher.match_round(&pending, to, distance);
            let settled = if tolerated.is_empty() {
                RoundOutcome::default()
            } else {
                matcher.exact_round(&tolerated, to, distance)
            };
            debug!(
                "{} round at distance {}: {} matched, {} tolerated, {} unresolved",
                matcher.name(),
                distance,
                round.found.len() + settled.found.len(),
                round.tolerated.len(),
                round.unresolved.len()
            );
            matches.extend(
                round
                    .found
                    .into_iter()
                    .chain(settled.found)
                    .map(|(representative, kmer)| Match {
                        representative,
                        kmer,
                        distance,
                    }),
            );
            pending = round.unresolved;
            tolerated = settled.unresolved;
            tolerated.extend(round.tolerated);
        }
        MatchReport {
            matches,
            unresolved: pending,
        }
    }
}
