//! Single point mutations between equal-length k-mers.

use crate::kmer::word::KmerWord;

/// Slot (counted from the right) of the only symbol where `a` and `b` differ.
///
/// Returns `None` when the k-mers are identical or differ in more than one slot.
pub fn locate_mutation<W: KmerWord>(a: W, b: W) -> Option<usize> {
    let diff = a ^ b;
    if diff == W::ZERO {
        return None;
    }
    let slot = (diff.trailing_zeros() / 2) as usize;
    if diff.shr_symbols(slot + 1) != W::ZERO {
        return None;
    }
    Some(slot)
}

/// XOR code (1..=3) of the mutation at `slot`.
#[inline]
pub fn mutation_code<W: KmerWord>(difference: W, slot: usize) -> u8 {
    difference.shr_symbols(slot).low_symbol()
}
