//! Window list files and graph export

pub mod windows;
pub mod dot;
