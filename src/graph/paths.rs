//! Extraction of unbranched walks from a recovered window set.

use crate::kmer::kmer::{canonical, complement, left_neighbors, right_neighbors};
use crate::kmer::word::KmerWord;
use ahash::AHashSet;

/// Walks right from `start`, taking the first present right neighbour each step.
///
/// Stops after `max_len` windows or when no right neighbour is present; `start` is
/// always the first element unless `max_len` is zero.
pub fn find_path_from_left_endpoint<W: KmerWord>(
    start: W,
    windows: &AHashSet<W>,
    k: usize,
    max_len: usize,
) -> Vec<W> {
    let mut path = Vec::new();
    let mut current = start;
    while path.len() < max_len {
        path.push(current);
        match right_neighbors(current, k)
            .into_iter()
            .find(|next| windows.contains(next))
        {
            Some(next) => current = next,
            None => break,
        }
    }
    path
}

/// One walk per left endpoint of `windows` together with their complements.
///
/// A left endpoint is a canonical window none of whose left neighbours is present.
/// Endpoints are visited in ascending order.
pub fn find_paths<W: KmerWord>(windows: &[W], k: usize, max_len: usize) -> Vec<Vec<W>> {
    let both: AHashSet<W> = windows
        .iter()
        .flat_map(|&w| [w, complement(w, k)])
        .collect();

    let mut endpoints: Vec<W> = both
        .iter()
        .copied()
        .filter(|&w| canonical(w, k) == w)
        .filter(|&w| left_neighbors(w, k).iter().all(|n| !both.contains(n)))
        .collect();
    endpoints.sort_unstable();

    endpoints
        .into_iter()
        .map(|start| find_path_from_left_endpoint(start, &both, k, max_len))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmer::kmer::{decode_kmer, encode_kmer};

    fn enc(s: &str) -> u64 {
        encode_kmer(s).unwrap()
    }

    fn decode(path: &[u64], k: usize) -> Vec<String> {
        path.iter().map(|&w| decode_kmer(w, k)).collect()
    }

    #[test]
    fn test_single_walk() {
        // AAACCG, windows of length 4
        let k = 4;
        let windows = [enc("ACCG"), enc("AAAC"), enc("AACC")];
        let paths = find_paths(&windows, k, 10);
        assert_eq!(paths.len(), 1);
        assert_eq!(decode(&paths[0], k), vec!["AAAC", "AACC", "ACCG"]);
    }

    #[test]
    fn test_walk_is_capped() {
        let k = 4;
        let windows: AHashSet<u64> = [enc("AACG"), enc("ACGT"), enc("CGTT")].into_iter().collect();
        let path = find_path_from_left_endpoint(enc("AACG"), &windows, k, 2);
        assert_eq!(decode(&path, k), vec!["AACG", "ACGT"]);
        assert!(find_path_from_left_endpoint(enc("AACG"), &windows, k, 0).is_empty());
    }

    #[test]
    fn test_walk_continues_into_complement() {
        let k = 3;
        let paths = find_paths(&[enc("ACG")], k, 5);
        // the complement CGT continues ACG to the right
        assert_eq!(paths.len(), 1);
        assert_eq!(decode(&paths[0], k), vec!["ACG", "CGT"]);
    }
}
