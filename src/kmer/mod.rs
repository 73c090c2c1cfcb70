//! K-mer module - 2-bit window packing, complements and mutation helpers

pub mod word;
pub mod kmer;
pub mod mutation;
