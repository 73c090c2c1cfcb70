use kmer_recover::eval::evaluate_recovery;
use kmer_recover::kmer::kmer::{canonical, encode_kmer};
use kmer_recover::sim::{simulate, SimulationConfig};
use kmer_recover::{
    recover_graph, recover_graph_mutation_tolerant, RecoveryConfig, RecoveryEngine, RecoveryStrategy,
};
use std::collections::BTreeSet;

const STRATEGIES: [RecoveryStrategy; 4] = [
    RecoveryStrategy::BruteForce,
    RecoveryStrategy::Bucketed,
    RecoveryStrategy::MutationTolerant,
    RecoveryStrategy::SeedPaths,
];

fn enc(s: &str) -> u64 {
    encode_kmer(s).unwrap()
}

fn windows_of(seq: &str, k: usize) -> Vec<u64> {
    (0..=seq.len() - k).map(|i| enc(&seq[i..i + k])).collect()
}

fn canonical_set(windows: &[u64], k: usize) -> BTreeSet<u64> {
    windows.iter().map(|&w| canonical(w, k)).collect()
}

#[test]
fn test_opposite_strand_gap_is_filled() {
    let recovered = recover_graph(&[enc("AAA"), enc("TTT")], 3, 3, 0).unwrap();
    let expected = canonical_set(&[enc("AAA"), enc("TAA"), enc("TTA"), enc("TTT")], 3);
    assert_eq!(recovered, expected);
}

#[test]
fn test_dropped_windows_are_recovered() {
    let seq = "GATTACAGGCTTCAACGTGGCATCCATGAGTCAAGCTTGAC";
    let k = 11;
    let all = windows_of(seq, k);
    let sampled: Vec<u64> = all
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 != 1)
        .map(|(_, &w)| w)
        .collect();

    let recovered = recover_graph(&sampled, k, k, 0).unwrap();
    let metrics = evaluate_recovery(&canonical_set(&all, k), &recovered);
    assert_eq!(metrics.missing, 0);
    assert_eq!(metrics.correct, canonical_set(&all, k).len() as u64);
}

#[test]
fn test_adjacent_windows_add_nothing() {
    let k = 7;
    let windows = windows_of("GATTACAGGCTTCAACG", k);
    let given = canonical_set(&windows, k);
    for strategy in [RecoveryStrategy::Bucketed, RecoveryStrategy::MutationTolerant] {
        let engine =
            RecoveryEngine::new(RecoveryConfig::new(k, 1, 0).with_strategy(strategy)).unwrap();
        let recovery = engine.run(&windows).unwrap();
        assert_eq!(recovery.windows, given);
        assert_eq!(recovery.stats.filled_windows, 0);
    }
}

#[test]
fn test_mutated_overlap_needs_tolerant_matching() {
    let k = 5;
    // ACCTA carries a G->C mutation in the bases it shares with GTACC
    let windows = [enc("ACCTA"), enc("GTACC")];
    let exact = recover_graph(&windows, k, 2, 2).unwrap();
    let tolerant = recover_graph_mutation_tolerant(&windows, k, 2, 2).unwrap();

    let bridge = canonical(enc("CGTAC"), k);
    let mutant_bridge = canonical(enc("CCTAC"), k);
    assert!(!exact.contains(&bridge));
    assert!(tolerant.contains(&bridge));
    assert!(tolerant.contains(&mutant_bridge));
}

#[test]
fn test_tolerant_recovery_keeps_exact_fills() {
    let k = 5;
    // ATGAC shares a half key with ACGTA, which overlaps CACGT exactly
    let windows = [enc("ATGAC"), enc("ACGTA"), enc("CACGT")];
    for min_distance in 0..=1 {
        let exact = recover_graph(&windows, k, k, min_distance).unwrap();
        let tolerant = recover_graph_mutation_tolerant(&windows, k, k, min_distance).unwrap();
        assert!(exact.is_subset(&tolerant), "min distance {}", min_distance);
    }

    let config = SimulationConfig {
        k: 21,
        paths: 20,
        path_len: 21,
        dropout: 0.3,
        mutated: false,
        seed: 3,
    };
    let graph = simulate::<u64>(&config).unwrap();
    let exact = recover_graph(&graph.sampled, 21, 21, 0).unwrap();
    let tolerant = recover_graph_mutation_tolerant(&graph.sampled, 21, 21, 0).unwrap();
    assert!(exact.is_subset(&tolerant));
}

#[test]
fn test_every_strategy_returns_a_superset() {
    let config = SimulationConfig {
        k: 15,
        paths: 4,
        path_len: 15,
        dropout: 0.4,
        mutated: true,
        seed: 11,
    };
    let graph = simulate::<u64>(&config).unwrap();
    let given = graph.given();
    for strategy in STRATEGIES {
        let engine =
            RecoveryEngine::new(RecoveryConfig::new(15, 15, 0).with_strategy(strategy)).unwrap();
        let recovery = engine.run(&graph.sampled).unwrap();
        assert!(given.is_subset(&recovery.windows), "{:?}", strategy);
        assert_eq!(recovery.stats.input_windows, given.len());
        assert_eq!(
            recovery.stats.filled_windows,
            recovery.windows.len() - given.len()
        );
    }
}

#[test]
fn test_seed_paths_on_mutated_paths() {
    let config = SimulationConfig {
        k: 21,
        paths: 10,
        path_len: 21,
        dropout: 0.3,
        mutated: true,
        seed: 5,
    };
    let graph = simulate::<u64>(&config).unwrap();
    let engine = RecoveryEngine::new(
        RecoveryConfig::new(21, 21, 0).with_strategy(RecoveryStrategy::SeedPaths),
    )
    .unwrap();
    let recovery = engine.run(&graph.sampled).unwrap();
    assert!(recovery.stats.seeds > 0);
    assert!(recovery.stats.accumulated_paths > 0);

    let before = evaluate_recovery(&graph.reference(), &graph.given());
    let after = evaluate_recovery(&graph.reference(), &recovery.windows);
    assert!(after.missing < before.missing);
    assert!(after.correct > before.correct);
    assert_eq!(
        recovery.stats.matched_pairs + recovery.stats.unresolved_windows,
        recovery.stats.seeds
    );
}

#[test]
fn test_wide_windows() {
    let seq = "GATTACAGGCTTCAACGTGGCATCCATGAGTCAAGCTTGACATTGCAGT";
    let k = 40;
    let all: Vec<u128> = (0..=seq.len() - k)
        .map(|i| encode_kmer(&seq[i..i + k]).unwrap())
        .collect();
    let sampled = vec![all[0], all[all.len() - 1]];
    let recovered = recover_graph(&sampled, k, 12, 1).unwrap();
    for &w in &all {
        assert!(recovered.contains(&canonical(w, k)));
    }
}

#[test]
fn test_invalid_distance_range() {
    assert!(recover_graph(&[enc("AAA")], 3, 1, 2).is_err());
}
