use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised by the codec, the overlap queries and the recovery entry points
pub enum Error {
    #[error("Only A, C, G and T symbols are allowed but got '{symbol}' at position {position}")]
    /// Symbol outside the nucleotide alphabet
    InvalidSymbol { symbol: char, position: usize },
    #[error("At least 2 candidate windows are required but got {0}")]
    /// A nearest-window query needs a distinct other window
    InsufficientCandidates(usize),
    #[error("Invalid parameter: {0}")]
    /// Window length, distance range or simulation parameter out of range
    InvalidParameter(String),
    #[error("Could not read or write window file")]
    /// I/O on window or report files
    Io(#[from] std::io::Error),
    #[error("Could not serialize report")]
    /// JSON report output
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
