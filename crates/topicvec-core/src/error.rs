use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Input file not found: {}", .0.display())]
    InputFileMissing(PathBuf),

    #[error("Malformed record {record}: {reason}")]
    MalformedRecord { record: String, reason: String },

    #[error("Degenerate vector for {0}: zero norm cannot be normalized")]
    DegenerateVector(String),

    #[error("Topic {0} has no member documents")]
    EmptyTopic(i64),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn malformed(record: impl ToString, reason: impl Into<String>) -> Self {
        Self::MalformedRecord { record: record.to_string(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
