//! Fixed-width integer storage for 2-bit packed k-mers.
//!
//! A window of length `k` occupies the low `2k` bits of a word, leftmost symbol in the
//! most significant pair. `u64` holds up to 32 symbols and `u128` up to 64. Every shift
//! goes through [`KmerWord::shl_bits`] / [`KmerWord::shr_bits`] which saturate to zero
//! at the word width, so `k == 32` on `u64` needs no special casing.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// Alternating symbol pattern `..00110011` spanning all 128 bits.
const EVEN_SYMBOLS: u128 = 0x3333_3333_3333_3333_3333_3333_3333_3333;
/// Alternating symbol pattern `..11001100` spanning all 128 bits.
const ODD_SYMBOLS: u128 = 0xcccc_cccc_cccc_cccc_cccc_cccc_cccc_cccc;

pub trait KmerWord:
    Copy
    + Eq
    + Ord
    + Hash
    + Debug
    + Default
    + Send
    + Sync
    + 'static
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    const ZERO: Self;
    const BITS: u32;
    /// Longest window the word can hold.
    const MAX_K: usize = (Self::BITS / 2) as usize;

    /// Places a 2-bit symbol code in the lowest slot.
    fn from_symbol(symbol: u8) -> Self;
    /// Lowest 2-bit slot.
    fn low_symbol(self) -> u8;
    fn count_ones(self) -> u32;
    fn trailing_zeros(self) -> u32;
    /// Left shift returning zero once `bits >= BITS`.
    fn shl_bits(self, bits: u32) -> Self;
    /// Right shift returning zero once `bits >= BITS`.
    fn shr_bits(self, bits: u32) -> Self;
    fn to_u128(self) -> u128;
    /// Truncating conversion.
    fn from_u128(value: u128) -> Self;

    #[inline]
    fn shl_symbols(self, symbols: usize) -> Self {
        self.shl_bits(symbol_bits(symbols))
    }

    #[inline]
    fn shr_symbols(self, symbols: usize) -> Self {
        self.shr_bits(symbol_bits(symbols))
    }
}

#[inline]
fn symbol_bits(symbols: usize) -> u32 {
    u32::try_from(symbols.saturating_mul(2)).unwrap_or(u32::MAX)
}

macro_rules! impl_kmer_word {
    ($t:ty) => {
        impl KmerWord for $t {
            const ZERO: Self = 0;
            const BITS: u32 = <$t>::BITS;

            #[inline]
            fn from_symbol(symbol: u8) -> Self {
                (symbol & 0b11) as $t
            }

            #[inline]
            fn low_symbol(self) -> u8 {
                (self & 0b11) as u8
            }

            #[inline]
            fn count_ones(self) -> u32 {
                <$t>::count_ones(self)
            }

            #[inline]
            fn trailing_zeros(self) -> u32 {
                <$t>::trailing_zeros(self)
            }

            #[inline]
            fn shl_bits(self, bits: u32) -> Self {
                self.checked_shl(bits).unwrap_or(0)
            }

            #[inline]
            fn shr_bits(self, bits: u32) -> Self {
                self.checked_shr(bits).unwrap_or(0)
            }

            #[inline]
            fn to_u128(self) -> u128 {
                self as u128
            }

            #[inline]
            fn from_u128(value: u128) -> Self {
                value as $t
            }
        }
    };
}

impl_kmer_word!(u64);
impl_kmer_word!(u128);

/// Mask covering the low `symbols` slots (all ones once `symbols` reaches the word width).
#[inline]
pub fn symbol_mask<W: KmerWord>(symbols: usize) -> W {
    let used = symbol_bits(symbols).min(W::BITS);
    (!W::ZERO).shr_bits(W::BITS - used)
}

/// Which half of the symbol slots an alternating mask keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolParity {
    /// Slots 0, 2, 4, ... counted from the right.
    Even,
    /// Slots 1, 3, 5, ... counted from the right.
    Odd,
}

impl SymbolParity {
    pub const BOTH: [SymbolParity; 2] = [SymbolParity::Odd, SymbolParity::Even];

    #[inline]
    pub fn mask<W: KmerWord>(self) -> W {
        match self {
            SymbolParity::Even => W::from_u128(EVEN_SYMBOLS),
            SymbolParity::Odd => W::from_u128(ODD_SYMBOLS),
        }
    }
}
