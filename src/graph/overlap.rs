//! Shift distance and relative orientation between two k-mers.
//!
//! Evaluation order and the strict `<` tie-break below are part of the contract:
//! recovered sets are only reproducible if earlier configurations win ties.

use crate::kmer::kmer::complement;
use crate::kmer::word::{symbol_mask, KmerWord};
use serde::Serialize;

/// Relative orientation of two k-mers `a` and `b`.
///
/// `AToB` means the high symbols of `a` equal the low symbols of `b`, i.e. `a` is
/// reached from `b` by sliding the window `distance` symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    AToB,
    BToA,
    AToBComplement,
    BComplementToA,
}

impl Direction {
    /// True when the reverse complement of `b` takes part in the overlap.
    pub fn uses_complement(self) -> bool {
        matches!(self, Direction::AToBComplement | Direction::BComplementToA)
    }
}

/// Smallest shift `c` such that `a >> c` symbols equals the low `k - c` symbols of `b`.
///
/// Returns `k` when only the empty overlap matches.
pub fn largest_prefix_suffix_shift<W: KmerWord>(a: W, b: W, k: usize) -> usize {
    let mut prefix = a & symbol_mask(k);
    let mut suffix = b & symbol_mask(k);
    let mut shift = 0;
    while prefix != suffix && shift < k {
        shift += 1;
        prefix = prefix.shr_symbols(1);
        suffix = suffix & symbol_mask(k - shift);
    }
    shift
}

/// Minimal shift over (a,b), (b,a), (a,rc(b)), (rc(b),a); earlier configurations win ties.
pub fn determine_distance<W: KmerWord>(a: W, b: W, k: usize) -> (usize, Direction) {
    let mut best = (largest_prefix_suffix_shift(a, b, k), Direction::AToB);

    let ba = largest_prefix_suffix_shift(b, a, k);
    if ba < best.0 {
        best = (ba, Direction::BToA);
    }

    let b_rc = complement(b, k);
    let a_brc = largest_prefix_suffix_shift(a, b_rc, k);
    if a_brc < best.0 {
        best = (a_brc, Direction::AToBComplement);
    }

    let brc_a = largest_prefix_suffix_shift(b_rc, a, k);
    if brc_a < best.0 {
        best = (brc_a, Direction::BComplementToA);
    }

    best
}

/// Directed variant: only (a,b) and (a,rc(b)).
pub fn determine_distance_directed<W: KmerWord>(a: W, b: W, k: usize) -> (usize, Direction) {
    let mut best = (largest_prefix_suffix_shift(a, b, k), Direction::AToB);

    let a_brc = largest_prefix_suffix_shift(a, complement(b, k), k);
    if a_brc < best.0 {
        best = (a_brc, Direction::AToBComplement);
    }

    best
}
