use crate::error::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How missing windows are located and filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryStrategy {
    /// Nearest window by linear scan, one query per window
    BruteForce,
    /// Exact overlap buckets, shortest gap first
    #[default]
    Bucketed,
    /// Overlap buckets split by alternating slots, tolerating point mutations
    MutationTolerant,
    /// Mutation-paired seeds grown into local paths
    SeedPaths,
}

impl RecoveryStrategy {
    pub fn name(self) -> &'static str {
        match self {
            RecoveryStrategy::BruteForce => "brute-force",
            RecoveryStrategy::Bucketed => "bucketed",
            RecoveryStrategy::MutationTolerant => "mutation-tolerant",
            RecoveryStrategy::SeedPaths => "seed-paths",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub k: usize,
    /// Largest gap (in window shifts) that may be filled
    pub distance_cutoff: usize,
    /// Smallest gap considered
    pub min_distance: usize,
    pub strategy: RecoveryStrategy,
    /// Point mutations tolerated per overlap by the mutation-tolerant matcher
    pub max_mutations: u32,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            k: 31,
            distance_cutoff: 31,
            min_distance: 0,
            strategy: RecoveryStrategy::Bucketed,
            max_mutations: 1,
        }
    }
}

impl RecoveryConfig {
    pub fn new(k: usize, distance_cutoff: usize, min_distance: usize) -> Self {
        Self {
            k,
            distance_cutoff,
            min_distance,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: RecoveryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_mutations(mut self, max_mutations: u32) -> Self {
        self.max_mutations = max_mutations;
        self
    }

    /// Checks the distance range and clamps a cutoff beyond `k`.
    ///
    /// Word-width limits on `k` are checked when the window type is known.
    pub fn validate(mut self) -> Result<Self> {
        if self.k == 0 {
            return Err(Error::InvalidParameter("k-mer length must be positive".into()));
        }
        if self.distance_cutoff < self.min_distance {
            return Err(Error::InvalidParameter(format!(
                "distance cutoff {} is below the minimal distance {}",
                self.distance_cutoff, self.min_distance
            )));
        }
        if self.distance_cutoff > self.k {
            warn!(
                "Distance cutoff {} exceeds k = {}, clamping to {}",
                self.distance_cutoff, self.k, self.k
            );
            self.distance_cutoff = self.k;
            if self.min_distance > self.k {
                return Err(Error::InvalidParameter(format!(
                    "minimal distance {} exceeds k = {}",
                    self.min_distance, self.k
                )));
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecoveryConfig::default();
        assert_eq!(config.k, 31);
        assert_eq!(config.distance_cutoff, 31);
        assert_eq!(config.min_distance, 0);
        assert_eq!(config.strategy, RecoveryStrategy::Bucketed);
        assert_eq!(config.max_mutations, 1);
    }

    #[test]
    fn test_cutoff_below_min_is_rejected() {
        let err = RecoveryConfig::new(5, 1, 2).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_cutoff_is_clamped() {
        let config = RecoveryConfig::new(5, 12, 0).validate().unwrap();
        assert_eq!(config.distance_cutoff, 5);
        assert!(RecoveryConfig::new(5, 12, 7).validate().is_err());
    }

    #[test]
    fn test_zero_k_is_rejected() {
        assert!(RecoveryConfig::new(0, 0, 0).validate().is_err());
    }

    #[test]
    fn test_json_uses_kebab_case_strategy() {
        let config = RecoveryConfig::new(7, 3, 1).with_strategy(RecoveryStrategy::SeedPaths);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"seed-paths\""));
        let back: RecoveryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        let partial: RecoveryConfig = serde_json::from_str(r#"{"k": 9}"#).unwrap();
        assert_eq!(partial.k, 9);
        assert_eq!(partial.distance_cutoff, 31);
    }
}
