//! Overlap analysis, gap interpolation and the matching engines used during recovery

pub mod overlap;
pub mod interpolate;
pub mod bucket;
pub mod mutation_bucket;
pub mod seed;
pub mod accumulator;
pub mod paths;
