use thiserror::Error;

/// Failures of model construction and of the batch-correction path.
///
/// The per-sample online path (`get_value`, `update`) never produces these.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(&'static str),
    #[error("matrix is singular or too ill-conditioned to invert")]
    Singular,
    #[error("grid must have at least two points, got {0}")]
    TooFewPoints(usize),
    #[error("invalid bounds: {0}")]
    InvalidBounds(&'static str),
    #[error("non-finite value in coefficient correction")]
    NonFinite,
    #[error("unrepresentable number")]
    Unrepresentable,
}
