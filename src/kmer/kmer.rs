use crate::error::{Error, Result};
use crate::kmer::word::{symbol_mask, KmerWord};

/// Nucleotide alphabet in 2-bit code order
pub const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Checks that `k` is non-zero and fits the word.
pub fn check_k<W: KmerWord>(k: usize) -> Result<()> {
    if k == 0 {
        return Err(Error::InvalidParameter("k-mer length must be positive".into()));
    }
    if k > W::MAX_K {
        return Err(Error::InvalidParameter(format!(
            "k-mer length {} does not fit a {}-bit word (max {})",
            k,
            W::BITS,
            W::MAX_K
        )));
    }
    Ok(())
}

#[inline]
fn symbol_code(symbol: u8, position: usize) -> Result<u8> {
    match symbol {
        b'A' | b'a' => Ok(0),
        b'C' | b'c' => Ok(1),
        b'G' | b'g' => Ok(2),
        b'T' | b't' => Ok(3),
        _ => Err(Error::InvalidSymbol {
            symbol: symbol as char,
            position,
        }),
    }
}

/// Encodes a DNA k-mer to an integer (2 bits per nucleotide, leftmost base highest)
pub fn encode_kmer<W: KmerWord>(seq: &str) -> Result<W> {
    check_k::<W>(seq.len())?;
    let mut val = W::ZERO;
    for (position, &b) in seq.as_bytes().iter().enumerate() {
        val = val.shl_symbols(1) | W::from_symbol(symbol_code(b, position)?);
    }
    Ok(val)
}

/// Encodes a k-mer and checks it has exactly `k` bases.
pub fn encode_kmer_exact<W: KmerWord>(seq: &str, k: usize) -> Result<W> {
    if seq.len() != k {
        return Err(Error::InvalidParameter(format!(
            "expected a {}-mer but got {} bases in '{}'",
            k,
            seq.len(),
            seq
        )));
    }
    encode_kmer(seq)
}

/// Symbol code at `position` counted from the left; `position < k`.
#[inline]
fn symbol_at<W: KmerWord>(kmer: W, k: usize, position: usize) -> u8 {
    debug_assert!(position < k);
    kmer.shr_symbols(k - position - 1).low_symbol()
}

/// Decodes the low `k` symbols back to a string.
pub fn decode_kmer<W: KmerWord>(kmer: W, k: usize) -> String {
    (0..k)
        .map(|i| NUCLEOTIDES[symbol_at(kmer, k, i) as usize] as char)
        .collect()
}

/// Reverse complement of a packed k-mer.
pub fn complement<W: KmerWord>(kmer: W, k: usize) -> W {
    let mut rest = kmer;
    let mut rc = W::ZERO;
    for _ in 0..k {
        rc = rc.shl_symbols(1) | W::from_symbol(0b11 - rest.low_symbol());
        rest = rest.shr_symbols(1);
    }
    rc
}

/// Complements every symbol in place, without reversing.
#[inline]
pub fn symbol_complement<W: KmerWord>(kmer: W, k: usize) -> W {
    (kmer ^ symbol_mask(k)) & symbol_mask(k)
}

/// Numerically smaller of a k-mer and its reverse complement.
#[inline]
pub fn canonical<W: KmerWord>(kmer: W, k: usize) -> W {
    kmer.min(complement(kmer, k))
}

/// The four k-mers reached by appending one base on the right.
pub fn right_neighbors<W: KmerWord>(kmer: W, k: usize) -> [W; 4] {
    let shifted = kmer.shl_symbols(1) & symbol_mask(k);
    [0u8, 1, 2, 3].map(|s| shifted | W::from_symbol(s))
}

/// The four k-mers reached by prepending one base on the left.
pub fn left_neighbors<W: KmerWord>(kmer: W, k: usize) -> [W; 4] {
    let shifted = kmer.shr_symbols(1);
    [0u8, 1, 2, 3].map(|s| shifted | W::from_symbol(s).shl_symbols(k - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_short_values() {
        let pairs = [("AA", 0b0000u64), ("AC", 0b0001), ("GT", 0b1011), ("TT", 0b1111)];
        for (s, v) in pairs {
            assert_eq!(encode_kmer::<u64>(s).unwrap(), v);
            assert_eq!(decode_kmer(v, 2), s);
        }
        assert_eq!(encode_kmer::<u64>("AAAATC").unwrap(), 0b00_00_00_00_11_01);
    }

    #[test]
    fn test_symbol_at_reads_from_left() {
        let kmer: u64 = encode_kmer("GATC").unwrap();
        let codes: Vec<u8> = (0..4).map(|i| symbol_at(kmer, 4, i)).collect();
        assert_eq!(codes, vec![2, 0, 3, 1]);
        assert_eq!(decode_kmer(kmer, 0), "");
    }

    #[test]
    fn test_encode_invalid_symbol() {
        match encode_kmer::<u64>("ACNT") {
            Err(Error::InvalidSymbol { symbol, position }) => {
                assert_eq!(symbol, 'N');
                assert_eq!(position, 2);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_encode_rejects_too_long() {
        let long = "A".repeat(33);
        assert!(matches!(encode_kmer::<u64>(&long), Err(Error::InvalidParameter(_))));
        assert!(encode_kmer::<u128>(&long).is_ok());
        assert!(matches!(encode_kmer::<u64>(""), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_complement_pairs() {
        let pairs = [
            ("A", "T"),
            ("C", "G"),
            ("AT", "AT"),
            ("AAT", "ATT"),
            ("CCG", "CGG"),
            ("AAAAGAAAAG", "CTTTTCTTTT"),
        ];
        for (s, rc) in pairs {
            let k = s.len();
            let w: u64 = encode_kmer(s).unwrap();
            assert_eq!(decode_kmer(complement(w, k), k), rc);
        }
    }

    #[test]
    fn test_symbol_complement_keeps_order() {
        let w: u64 = encode_kmer("AACG").unwrap();
        assert_eq!(decode_kmer(symbol_complement(w, 4), 4), "TTGC");
    }

    #[test]
    fn test_neighbors() {
        let w: u64 = encode_kmer("ACG").unwrap();
        let right: Vec<String> = right_neighbors(w, 3).iter().map(|&n| decode_kmer(n, 3)).collect();
        assert_eq!(right, vec!["CGA", "CGC", "CGG", "CGT"]);
        let left: Vec<String> = left_neighbors(w, 3).iter().map(|&n| decode_kmer(n, 3)).collect();
        assert_eq!(left, vec!["AAC", "CAC", "GAC", "TAC"]);
    }

    #[test]
    fn test_full_width_u64() {
        let s = "T".repeat(32);
        let w: u64 = encode_kmer(&s).unwrap();
        assert_eq!(w, u64::MAX);
        assert_eq!(complement(w, 32), 0);
        assert_eq!(canonical(w, 32), 0);
    }
}
