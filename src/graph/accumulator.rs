//! Growth of a mutation-paired path from linked seeds.
//!
//! Every k-mer that contains the same point mutation lies inside the `2k - 1` bases
//! centred on it. The accumulator stores those bases in a `u128` with the mutation
//! fixed at slot `k - 1`; a seed whose mutation sits at window slot `p` occupies path
//! slots `k - 1 - p ..= 2k - 2 - p`. Known bits are tracked in `mask`.

use crate::graph::seed::Seed;
use crate::kmer::word::{symbol_mask, KmerWord};

/// Longest k-mer whose `2k - 1` bases fit the 128-bit path.
pub const MAX_ACCUMULATED_K: usize = 32;

#[derive(Debug, Clone)]
pub struct PathAccumulator {
    k: usize,
    path: u128,
    mask: u128,
    code: u8,
    left: usize,
    right: usize,
}

impl PathAccumulator {
    /// Starts a path at `seed`; `k` must not exceed [`MAX_ACCUMULATED_K`].
    pub fn new<W: KmerWord>(seed: &Seed<W>, k: usize) -> Self {
        debug_assert!(k <= MAX_ACCUMULATED_K);
        let offset = k - 1 - seed.position;
        Self {
            k,
            path: seed.first.to_u128().shl_symbols(offset),
            mask: symbol_mask::<u128>(k).shl_symbols(offset),
            code: seed.code(),
            left: seed.position,
            right: seed.position,
        }
    }

    /// Window slots of the outermost seeds (left grows down, right grows up).
    pub fn extent(&self) -> (usize, usize) {
        (self.left, self.right)
    }

    /// Attaches `seed` lying `distance` k-mers to the right of the current right end.
    pub fn try_add_right<W: KmerWord>(&mut self, seed: &Seed<W>, distance: usize) -> bool {
        if seed.position != self.right + distance {
            return false;
        }
        if !self.merge(seed) {
            return false;
        }
        self.right = seed.position;
        true
    }

    /// Attaches `seed` lying `distance` k-mers to the left of the current left end.
    pub fn try_add_left<W: KmerWord>(&mut self, seed: &Seed<W>, distance: usize) -> bool {
        if distance > self.left || seed.position != self.left - distance {
            return false;
        }
        if !self.merge(seed) {
            return false;
        }
        self.left = seed.position;
        true
    }

    fn merge<W: KmerWord>(&mut self, seed: &Seed<W>) -> bool {
        if seed.position >= self.k || seed.code() != self.code {
            return false;
        }
        let offset = self.k - 1 - seed.position;
        let value = seed.first.to_u128().shl_symbols(offset);
        let value_mask = symbol_mask::<u128>(self.k).shl_symbols(offset);
        if (value ^ self.path) & self.mask & value_mask != 0 {
            return false;
        }
        self.path |= value;
        self.mask |= value_mask;
        true
    }

    /// Every k-mer of the path followed by its mutated partner, left to right.
    pub fn kmers<W: KmerWord>(&self) -> impl Iterator<Item = W> + '_ {
        let window = symbol_mask::<u128>(self.k);
        (self.left..=self.right).flat_map(move |position| {
            let offset = self.k - 1 - position;
            let original = W::from_u128(self.path.shr_symbols(offset) & window);
            let mutant = original ^ W::from_symbol(self.code).shl_symbols(position);
            [original, mutant]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmer::kmer::{decode_kmer, encode_kmer};

    fn seed(a: &str, b: &str) -> Seed<u64> {
        Seed::from_pair(encode_kmer(a).unwrap(), encode_kmer(b).unwrap()).unwrap()
    }

    #[test]
    fn test_grow_right_fills_gap() {
        // ACGTACGTT / ACGTCCGTT with the mutation at base 4
        let k = 6;
        let mut acc = PathAccumulator::new(&seed("ACGTAC", "ACGTCC"), k);
        assert!(acc.try_add_right(&seed("GTACGT", "GTCCGT"), 2));
        assert_eq!(acc.extent(), (1, 3));
        let kmers: Vec<String> = acc.kmers::<u64>().map(|w| decode_kmer(w, k)).collect();
        assert_eq!(
            kmers,
            vec!["ACGTAC", "ACGTCC", "CGTACG", "CGTCCG", "GTACGT", "GTCCGT"]
        );
    }

    #[test]
    fn test_grow_left() {
        let k = 6;
        let mut acc = PathAccumulator::new(&seed("GTACGT", "GTCCGT"), k);
        assert!(acc.try_add_left(&seed("ACGTAC", "ACGTCC"), 2));
        assert_eq!(acc.extent(), (1, 3));
        assert!(!acc.try_add_left(&seed("ACGTAC", "ACGTCC"), 2));
    }

    #[test]
    fn test_conflicting_seed_is_rejected() {
        let k = 6;
        let mut acc = PathAccumulator::new(&seed("ACGTAC", "ACGTCC"), k);
        // right slot but disagrees on the shared GTA
        assert!(!acc.try_add_right(&seed("GGACGT", "GGCCGT"), 2));
        assert_eq!(acc.extent(), (1, 1));
    }

    #[test]
    fn test_other_mutation_code_is_rejected() {
        let k = 6;
        let mut acc = PathAccumulator::new(&seed("ACGTAC", "ACGTCC"), k);
        assert!(!acc.try_add_right(&seed("GTACGT", "GTGCGT"), 2));
    }
}
