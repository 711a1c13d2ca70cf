//! Error types for spacewise point kernels.

use thiserror::Error;

/// Primary error type for the window filter, the distance engine and the
/// trajectory helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpatialError {
    #[error("shape mismatch: {what} has length {got}, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid space partition: {0}")]
    InvalidPartition(#[from] PartitionError),
}

/// Reasons a space offsets array is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    #[error("offsets are empty; at least one offset (0) is required")]
    Empty,

    #[error("first offset is {first}, expected 0")]
    BadStart { first: usize },

    #[error("last offset is {last}, expected the point count {len}")]
    BadEnd { last: usize, len: usize },

    #[error("offsets decrease at index {index}: {prev} > {next}")]
    Decreasing {
        index: usize,
        prev: usize,
        next: usize,
    },
}

/// Convenience Result type alias for SpatialError.
pub type Result<T> = std::result::Result<T, SpatialError>;
