//! Pipeline module - recovery configuration and the strategy-driven recovery engine

pub mod config;
pub mod recover;
