//! Error types shared by the accumulators.

use thiserror::Error;

/// Failures raised while wiring an accumulator to its source.
///
/// Percentage changes that cannot be computed are reported as `NaN`, not as errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccumulatorError {
    /// The source is missing or does not expose an `all` snapshot.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl AccumulatorError {
    pub(crate) fn missing_group(detail: impl Into<String>) -> Self {
        Self::InvalidArgument(format!("a group exposing `all` is required ({})", detail.into()))
    }
}

pub type Result<T> = std::result::Result<T, AccumulatorError>;
