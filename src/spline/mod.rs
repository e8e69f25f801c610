//! Linear systems behind cubic spline interpolation.
//!
//! The model only needs three capabilities from a spline solver: assembling the
//! tri-diagonal interpolation system for a set of segment widths, inverting a
//! dense square matrix, and turning node values into per-segment polynomial
//! coefficients given the inverted system. These are captured by
//! [`SplineSystem`] so that any dense linear-algebra backend can be substituted;
//! [`NaturalSpline`] is the self-contained default.
use num_traits::Float;

use crate::FitError;

pub mod natural;

pub use natural::NaturalSpline;

/// Per-segment polynomial coefficients of an interpolating cubic spline,
/// in the local coordinate `t = x - x_i` of each segment `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct SplineCoefficients<T> {
    pub a: Vec<T>,
    pub b: Vec<T>,
    pub c: Vec<T>,
    pub d: Vec<T>,
}

impl<T> SplineCoefficients<T> {
    /// Number of segments
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }
}

/// A provider of cubic spline interpolation systems.
pub trait SplineSystem<T: Float> {
    /// Assemble the `n x n` system governing a cubic spline through `n` nodes
    /// separated by segment widths `h` (length `n - 1`).
    fn build_tridiagonal_system(&self, n: usize, h: &[T]) -> Result<Vec<Vec<T>>, FitError>;

    /// Invert a dense square matrix.
    ///
    /// # Errors
    /// * `DimensionMismatch` if the input is not square
    /// * `Singular` if the input has no numerically usable inverse
    fn invert(&self, m: &[Vec<T>]) -> Result<Vec<Vec<T>>, FitError>;

    /// Produce the per-segment coefficients of the spline interpolating
    /// node values `y`, using the inverse of the governing system.
    fn fit_splines(
        &self,
        inverse: &[Vec<T>],
        y: &[T],
        h: &[T],
    ) -> Result<SplineCoefficients<T>, FitError>;
}
