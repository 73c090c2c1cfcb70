//! Reconstruction of the k-mers lying between two k-mers of a known shift distance.

use crate::error::{Error, Result};
use crate::graph::overlap::{determine_distance, determine_distance_directed, Direction};
use crate::kmer::kmer::complement;
use crate::kmer::word::KmerWord;

/// Lazy chain of the `max(distance - 1, 0)` k-mers strictly between `from` and `to`.
///
/// Each step drops the lowest symbol of `from` and injects the next symbol of `to`
/// at the top, walking from `from` towards `to` one base at a time.
#[derive(Debug, Clone)]
pub struct PathInterpolator<W: KmerWord> {
    current: W,
    remainder: W,
    remaining: usize,
    k: usize,
}

impl<W: KmerWord> Iterator for PathInterpolator<W> {
    type Item = W;

    #[inline]
    fn next(&mut self) -> Option<W> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let symbol = W::from_symbol(self.remainder.low_symbol());
        self.remainder = self.remainder.shr_symbols(1);
        self.current = self.current.shr_symbols(1) | symbol.shl_symbols(self.k - 1);
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<W: KmerWord> ExactSizeIterator for PathInterpolator<W> {}

/// K-mers between `from` and `to` when `to` lies `distance` symbols upstream of `from`.
pub fn interpolate<W: KmerWord>(from: W, to: W, k: usize, distance: usize) -> PathInterpolator<W> {
    PathInterpolator {
        current: from,
        // high `distance` symbols of `to` are the bases missing from `from`
        remainder: to.shr_symbols(k.saturating_sub(distance)),
        remaining: distance.saturating_sub(1),
        k,
    }
}

/// Nearest candidate reached from `kmer` under the directed distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosestMatch<W: KmerWord> {
    pub kmer: W,
    pub distance: usize,
    pub direction: Direction,
}

/// Linear scan for the candidate closest to `kmer` with distance at least `min_distance`.
///
/// Candidates equal to `kmer` are skipped; the first candidate at the minimal distance wins.
/// `Ok(None)` when every candidate is skipped or closer than `min_distance`.
pub fn find_closest_directed<W: KmerWord>(
    kmer: W,
    k: usize,
    candidates: &[W],
    min_distance: usize,
) -> Result<Option<ClosestMatch<W>>> {
    if candidates.len() < 2 {
        return Err(Error::InsufficientCandidates(candidates.len()));
    }

    let mut closest: Option<ClosestMatch<W>> = None;
    for &candidate in candidates {
        if candidate == kmer {
            continue;
        }
        let (distance, direction) = determine_distance_directed(kmer, candidate, k);
        if distance < min_distance {
            continue;
        }
        if closest.map_or(true, |c| distance < c.distance) {
            closest = Some(ClosestMatch {
                kmer: candidate,
                distance,
                direction,
            });
        }
    }
    Ok(closest)
}

/// Shortest chain of k-mers joining `a` and `b` in whichever orientation overlaps best.
pub fn find_shortest_path<W: KmerWord>(a: W, b: W, k: usize) -> PathInterpolator<W> {
    let (distance, direction) = determine_distance(a, b, k);
    let b_rc = complement(b, k);
    let (from, to) = match direction {
        Direction::AToB => (a, b),
        Direction::BToA => (b, a),
        Direction::AToBComplement => (a, b_rc),
        Direction::BComplementToA => (b_rc, a),
    };
    interpolate(from, to, k, distance)
}
