use thiserror::Error;

/// Per-call failures. No partial results are produced on error.
///
/// An aggregation in which every leaf was excluded is not an error: it
/// yields an empty score map and a root-only decoded branch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("score vector has length {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
