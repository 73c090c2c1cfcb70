//! Bucket matching that tolerates point mutations inside the overlap.
//!
//! Exact overlaps are looked up first, exactly as [`BucketMatcher`] does. Failing that, the
//! overlap key is split into the odd and even symbol slots. A single mutation can only spoil
//! one half, so a lookup succeeding on either half yields a candidate. A candidate is kept
//! when the xor of the full keys has at most `2 * max_mutations` bits. Such a k-mer yields
//! both readings once and keeps waiting for an exact partner at larger distances.
//!
//! [`BucketMatcher`]: crate::graph::bucket::BucketMatcher

use crate::graph::bucket::{exact_buckets, exact_partner, OverlapMatcher, RoundOutcome};
use crate::kmer::word::{symbol_mask, KmerWord, SymbolParity};
use ahash::AHashMap;

/// Below this distance no window lies between a pair, so approximate readings fill nothing.
const MIN_TOLERATED_DISTANCE: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct MutationTolerantMatcher {
    k: usize,
    max_mutations: u32,
}

impl MutationTolerantMatcher {
    pub fn new(k: usize, max_mutations: u32) -> Self {
        Self { k, max_mutations }
    }

    #[inline]
    fn max_differing_bits(&self) -> u32 {
        self.max_mutations.saturating_mul(2)
    }

    fn exact_only<W: KmerWord>(&self, from: &[W], to: &[W], distance: usize) -> RoundOutcome<W> {
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
}

impl<W: KmerWord> OverlapMatcher<W> for MutationTolerantMatcher {
    fn match_round(&self, from: &[W], to: &[W], distance: usize) -> RoundOutcome<W> {
        if distance < MIN_TOLERATED_DISTANCE {
            return self.exact_only(from, to, distance);
        }
        let odd: W = SymbolParity::Odd.mask();
        let even: W = SymbolParity::Even.mask();

        let buckets = exact_buckets(to, distance);
        let mut odd_buckets: AHashMap<W, W> = AHashMap::with_capacity(to.len());
        let mut even_buckets: AHashMap<W, W> = AHashMap::with_capacity(to.len());
        for &kmer in to {
            let key = kmer.shr_symbols(distance);
            odd_buckets.entry(key & odd).or_insert(kmer);
            even_buckets.entry(key & even).or_insert(kmer);
        }

        let mask = symbol_mask::<W>(self.k.saturating_sub(distance));
        let budget = self.max_differing_bits();
        let mut outcome = RoundOutcome::default();

        for &kmer in from {
            let overlap = kmer & mask;
            if let Some(representative) = exact_partner(&buckets, kmer, overlap) {
                outcome.found.push((representative, kmer));
                continue;
            }

            // fewest differing bits wins; the odd half is tried first on a tie
            let closest = [
                odd_buckets.get(&(overlap & odd)),
                even_buckets.get(&(overlap & even)),
            ]
            .into_iter()
            .flatten()
            .copied()
            .filter(|&candidate| candidate != kmer)
            .map(|candidate| (candidate, candidate.shr_symbols(distance) ^ overlap))
            .filter(|&(_, diff)| diff != W::ZERO && diff.count_ones() <= budget)
            .min_by_key(|&(_, diff)| diff.count_ones());

            match closest {
                Some((representative, diff)) => {
                    // either the k-mer or its partner carries the mutation; keep both readings
                    outcome.found.push((representative, kmer ^ diff));
                    outcome
                        .found
                        .push((representative ^ diff.shl_symbols(distance), kmer));
                    outcome.tolerated.push(kmer);
                }
                None => outcome.unresolved.push(kmer),
            }
        }
        outcome
    }

    fn exact_round(&self, from: &[W], to: &[W], distance: usize) -> RoundOutcome<W> {
        self.exact_only(from, to, distance)
    }

    fn name(&self) -> &'static str {
        "mutation-tolerant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::bucket::BucketMatcher;
    use crate::kmer::kmer::encode_kmer;

    fn enc(s: &str) -> u64 {
        encode_kmer(s).unwrap()
    }

    #[test]
    fn test_exact_overlap_yields_single_pair() {
        let matcher = MutationTolerantMatcher::new(5, 1);
        let to = [enc("GTACC")];
        let from = [enc("ACGTA")];
        let round = OverlapMatcher::<u64>::match_round(&matcher, &from, &to, 2);
        assert_eq!(round.found, vec![(enc("GTACC"), enc("ACGTA"))]);
    }

    #[test]
    fn test_single_mutation_yields_both_readings() {
        let k = 5;
        let matcher = MutationTolerantMatcher::new(k, 1);
        // GTACC downstream of ACGTA, but the shared G was read as C in the source
        let to = [enc("GTACC")];
        let from = [enc("ACCTA")];

        let exact = OverlapMatcher::<u64>::match_round(&BucketMatcher::new(k), &from, &to, 2);
        assert!(exact.found.is_empty());

        let round = OverlapMatcher::<u64>::match_round(&matcher, &from, &to, 2);
        assert_eq!(
            round.found,
            vec![
                (enc("GTACC"), enc("ACGTA")),
                (enc("CTACC"), enc("ACCTA")),
            ]
        );
        assert!(round.unresolved.is_empty());
        assert_eq!(round.tolerated, vec![enc("ACCTA")]);
    }

    #[test]
    fn test_exact_partner_wins_over_half_key_hit() {
        let k = 5;
        let matcher = MutationTolerantMatcher::new(k, 1);
        // ATGAC takes the shared half bucket first, ACGTA overlaps CACGT exactly
        let to = [enc("ATGAC"), enc("ACGTA")];
        let from = [enc("CACGT")];
        let exact = OverlapMatcher::<u64>::match_round(&BucketMatcher::new(k), &from, &to, 1);
        let round = OverlapMatcher::<u64>::match_round(&matcher, &from, &to, 1);
        assert_eq!(round.found, exact.found);
        assert_eq!(round.found, vec![(enc("ACGTA"), enc("CACGT"))]);
        assert!(round.unresolved.is_empty());

        // CTCAA shares the odd slot of GTA and is inserted first
        let to = [enc("CTCAA"), enc("GTACC")];
        let from = [enc("ACGTA")];
        let round = OverlapMatcher::<u64>::match_round(&matcher, &from, &to, 2);
        assert_eq!(round.found, vec![(enc("GTACC"), enc("ACGTA"))]);
        assert!(round.tolerated.is_empty());
    }

    #[test]
    fn test_second_half_candidate_checked() {
        let matcher = MutationTolerantMatcher::new(5, 1);
        // GTCAA hits the odd bucket but is three bits off, CGAAA hits the even one a bit off
        let to = [enc("GTCAA"), enc("CGAAA")];
        let from = [enc("ACCTA")];
        let round = OverlapMatcher::<u64>::match_round(&matcher, &from, &to, 2);
        assert_eq!(
            round.found,
            vec![
                (enc("CGAAA"), enc("ACCGA")),
                (enc("CTAAA"), enc("ACCTA")),
            ]
        );
        assert_eq!(round.tolerated, vec![enc("ACCTA")]);
    }

    #[test]
    fn test_no_readings_without_a_gap() {
        let matcher = MutationTolerantMatcher::new(5, 1);
        // one substitution apart, but nothing lies between them
        let to = [enc("ACGTG")];
        let from = [enc("ACGTA")];
        let round = OverlapMatcher::<u64>::match_round(&matcher, &from, &to, 0);
        assert!(round.found.is_empty());
        assert_eq!(round.unresolved, vec![enc("ACGTA")]);
    }

    #[test]
    fn test_tolerated_kmer_keeps_exact_match() {
        use crate::graph::bucket::DistanceSchedule;

        let k = 5;
        // ACCTA is a mutation away from GTACC at distance 2 and exactly overlaps TACGG at 3
        let to = [enc("GTACC"), enc("TACGG")];
        let schedule = DistanceSchedule {
            min_distance: 2,
            distance_cutoff: 3,
        };
        let report = schedule.run(&MutationTolerantMatcher::new(k, 1), vec![enc("ACCTA")], &to);
        let exact = schedule.run(&BucketMatcher::new(k), vec![enc("ACCTA")], &to);
        assert_eq!(exact.matches.len(), 1);
        assert_eq!(report.matches.len(), 3);
        assert!(report.matches.contains(&exact.matches[0]));
        assert!(report.unresolved.is_empty());
    }

    #[test]
    fn test_too_many_differences_unresolved() {
        let matcher = MutationTolerantMatcher::new(5, 1);
        // G->T and T->C in adjacent slots: both halves miss
        let to = [enc("GTACC")];
        let from = [enc("ACTCA")];
        let round = OverlapMatcher::<u64>::match_round(&matcher, &from, &to, 2);
        assert!(round.found.is_empty());
        assert_eq!(round.unresolved, vec![enc("ACTCA")]);
    }

    #[test]
    fn test_mutation_budget_limits_bits() {
        // G (10) vs C (01) differs in two bits, rejected with a zero budget
        let matcher = MutationTolerantMatcher::new(5, 0);
        let to = [enc("GTACC")];
        let from = [enc("ACCTA")];
        let round = OverlapMatcher::<u64>::match_round(&matcher, &from, &to, 2);
        assert!(round.found.is_empty());
    }
}
