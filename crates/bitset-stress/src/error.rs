use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("yaml deserialize error: {0}")]
    YamlDeserializeError(#[from] serde_yaml::Error),
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("threads must be at least 1")]
    NoThreads,
    #[error("capacity {capacity} is smaller than thread count {threads}")]
    CapacityBelowThreads { capacity: usize, threads: usize },
    #[error("toggle index {index} out of range for capacity {capacity}")]
    ToggleIndexOutOfRange { index: usize, capacity: usize },
}

/// Failure of a stress scenario.
#[derive(Debug, Error)]
pub enum StressError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("bitmap error: {0}")]
    Bitmap(#[from] atomic_bitset::Error),
    #[error("round {round}: expected {expected} set bits, counted {actual}")]
    CountMismatch {
        round: usize,
        expected: usize,
        actual: usize,
    },
    #[error("round {round}: expected {expected} flips, workers reported {actual}")]
    FlipMismatch {
        round: usize,
        expected: usize,
        actual: usize,
    },
    #[error("round {round}: set bits differ from expected at position {position}")]
    OnesMismatch { round: usize, position: usize },
}

pub type Result<T> = std::result::Result<T, StressError>;
