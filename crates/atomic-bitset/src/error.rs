use thiserror::Error;

/// Error type for bitmap operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Bit index is not below the bitmap length.
    #[error("bit index {index} out of range for bitmap of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Convenient result alias for bitmap operations.
pub type Result<T> = std::result::Result<T, Error>;
