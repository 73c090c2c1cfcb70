//! Seeds: pairs of k-mers differing by exactly one point mutation.
//!
//! Two k-mers with one differing slot agree on every slot of the opposite parity,
//! so bucketing by the odd and even slot masks brings them together. Buckets holding
//! exactly two k-mers are confirmed with [`locate_mutation`].

use crate::kmer::mutation::{locate_mutation, mutation_code};
use crate::kmer::word::{symbol_mask, KmerWord, SymbolParity};
use ahash::{AHashMap, AHashSet};

/// `first` and `first ^ difference` differ only at `position` (slot from the right).
///
/// `first` is the partner holding the smaller symbol code at the mutated slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Seed<W: KmerWord> {
    pub first: W,
    pub difference: W,
    pub position: usize,
}

/// Mutation normalised to slot 0: the symbol codes of both partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeedKey {
    pub original: u8,
    pub mutant: u8,
}

impl<W: KmerWord> Seed<W> {
    /// Orders the pair so that `first` holds the smaller symbol at the mutated slot.
    pub fn from_pair(a: W, b: W) -> Option<Self> {
        let position = locate_mutation(a, b)?;
        let (first, second) = if a.shr_symbols(position).low_symbol()
            <= b.shr_symbols(position).low_symbol()
        {
            (a, b)
        } else {
            (b, a)
        };
        Some(Seed {
            first,
            difference: first ^ second,
            position,
        })
    }

    #[inline]
    pub fn second(&self) -> W {
        self.first ^ self.difference
    }

    #[inline]
    pub fn code(&self) -> u8 {
        mutation_code(self.difference, self.position)
    }

    pub fn key(&self) -> SeedKey {
        let original = self.first.shr_symbols(self.position).low_symbol();
        SeedKey {
            original,
            mutant: original ^ self.code(),
        }
    }
}

/// Finds every seed among `kmers`; duplicates are ignored and output is sorted.
pub fn find_seeds<W: KmerWord>(kmers: &[W], k: usize) -> Vec<Seed<W>> {
    let window = symbol_mask::<W>(k);
    let unique: AHashSet<W> = kmers.iter().map(|&kmer| kmer & window).collect();

    let mut seeds = AHashSet::new();
    for parity in SymbolParity::BOTH {
        let mask: W = parity.mask();
        let mut buckets: AHashMap<W, Vec<W>> = AHashMap::with_capacity(unique.len());
        for &kmer in &unique {
            buckets.entry(kmer & mask).or_default().push(kmer);
        }
        for bucket in buckets.values() {
            if let [a, b] = bucket.as_slice() {
                if let Some(seed) = Seed::from_pair(*a, *b) {
                    seeds.insert(seed);
                }
            }
        }
    }

    let mut seeds: Vec<Seed<W>> = seeds.into_iter().collect();
    seeds.sort_unstable();
    seeds
}

/// Right-hand link of a seed: index of the next seed and its distance.
pub type SeedLink = Option<(usize, usize)>;

/// Greedy ascending-distance linking of seed anchors.
///
/// Seed `j` follows seed `i` at distance `d` when the high `k - d` symbols of `j.first`
/// equal the low `k - d` symbols of `i.first` and the mutation moved `d` slots up.
/// Each seed receives at most one right link; a bucket collision keeps the first seed.
pub fn link_seeds<W: KmerWord>(
    seeds: &[Seed<W>],
    k: usize,
    min_distance: usize,
    distance_cutoff: usize,
) -> Vec<SeedLink> {
    let mut links: Vec<SeedLink> = vec![None; seeds.len()];
    let mut pending: Vec<usize> = (0..seeds.len()).collect();
    let last = distance_cutoff.min(k.saturating_sub(1));

    for distance in min_distance.max(1)..=last {
        if pending.is_empty() {
            break;
        }
        let mut anchors: AHashMap<(W, usize), usize> = AHashMap::with_capacity(seeds.len());
        for (index, seed) in seeds.iter().enumerate() {
            if seed.position >= distance {
                anchors
                    .entry((seed.first.shr_symbols(distance), seed.position))
                    .or_insert(index);
            }
        }

        let mask = symbol_mask::<W>(k - distance);
        let mut unresolved = Vec::with_capacity(pending.len());
        for index in pending {
            let seed = &seeds[index];
            let found = anchors
                .get(&(seed.first & mask, seed.position + distance))
                .copied();
            match found {
                Some(next) if next != index => links[index] = Some((next, distance)),
                _ => unresolved.push(index),
            }
        }
        pending = unresolved;
    }
    links
}
