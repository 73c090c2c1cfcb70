//! Evaluation module - compares recovered window sets against the sampled reference

use crate::kmer::word::KmerWord;
use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::AddAssign;

/// Set comparison of a recovered graph against the reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecoveryMetrics {
    /// Reference windows present in the recovered set
    pub correct: u64,
    /// Reference windows absent from the recovered set
    pub missing: u64,
    /// Recovered windows absent from the reference
    pub wrong: u64,
}

impl RecoveryMetrics {
    /// Precision, recall and F1 of the recovered set
    pub fn scores(&self) -> (f64, f64, f64) {
        calculate_metrics(self.correct, self.wrong, self.missing)
    }
}

impl AddAssign for RecoveryMetrics {
    fn add_assign(&mut self, other: Self) {
        self.correct += other.correct;
        self.missing += other.missing;
        self.wrong += other.wrong;
    }
}

/// Counts correct, missing and wrong windows; both sets must use the same (canonical) form.
pub fn evaluate_recovery<W: KmerWord>(
    original: &BTreeSet<W>,
    recovered: &BTreeSet<W>,
) -> RecoveryMetrics {
    let correct = original.intersection(recovered).count() as u64;
    RecoveryMetrics {
        correct,
        missing: original.len() as u64 - correct,
        wrong: recovered.difference(original).count() as u64,
    }
}

/// Calculate precision, recall, and F1 score
pub fn calculate_metrics(tp: u64, fp: u64, fn_: u64) -> (f64, f64, f64) {
    let precision = if tp + fp > 0 {
        tp as f64 / (tp + fp) as f64
    } else {
        0.0
    };

    let recall = if tp + fn_ > 0 {
        tp as f64 / (tp + fn_) as f64
    } else {
        0.0
    };

    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    (precision, recall, f1)
}

/// Where a reference window came from after recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecoveryState {
    /// Present in the sampled input
    Given,
    /// Absent from the input but filled in
    Recovered,
    NotRecovered,
}

/// Classifies each window of one reference path, in path order.
pub fn evaluate_path_recovery<W: KmerWord>(
    path: &[W],
    given: &BTreeSet<W>,
    recovered: &BTreeSet<W>,
) -> Vec<RecoveryState> {
    path.iter()
        .map(|window| {
            if given.contains(window) {
                RecoveryState::Given
            } else if recovered.contains(window) {
                RecoveryState::Recovered
            } else {
                RecoveryState::NotRecovered
            }
        })
        .collect()
}
