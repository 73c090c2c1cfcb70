//! Recovery of missing k-mers in sparsely sampled de Bruijn graphs.
//!
//! Windows are 2-bit packed k-mers held in a [`kmer::word::KmerWord`] (`u64` for k ≤ 32,
//! `u128` for k ≤ 64). The [`pipeline::recover::RecoveryEngine`] links windows by their
//! overlaps and interpolates the windows lying between linked pairs.

pub mod error;
pub mod eval;
pub mod graph;
pub mod io;
pub mod kmer;
pub mod pipeline;
pub mod sim;

pub use error::{Error, Result};
pub use pipeline::config::{RecoveryConfig, RecoveryStrategy};
pub use pipeline::recover::{recover_graph, recover_graph_mutation_tolerant, RecoveryEngine};
