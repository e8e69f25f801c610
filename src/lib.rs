//! Identification of one-dimensional functions from sampled data,
//! using a linear combination of cardinal cubic spline basis functions
//! over an evenly spaced, adaptively stretched grid.
//!
//! This is the univariate building block of discrete Urysohn operator and
//! Kolmogorov-Arnold style identification schemes: each inner or outer
//! function of such a decomposition is one [`Univariate`] model.
//!
//! # Fitting
//! Coefficients can be learned online, one sample at a time, with a
//! Kaczmarz step ([`Univariate::update`]), or in one shot with a
//! least-squares correction against a batch of residuals
//! ([`Univariate::update_model_by_residual`]). The two can be mixed.
//!
//! The domain is never fixed: any input outside the current bounds
//! stretches the grid to cover it, keeping the number of basis functions
//! and the learned coefficients.
//!
//! | Operation                      | Cost              |
//! |--------------------------------|-------------------|
//! | construction                   | O(points^3)       |
//! | get_value / update             | O(points)         |
//! | update_model_by_residual       | O(n points^2 + points^3) |
//!
//! # Example: Online Fitting
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use univariate::Univariate;
//!
//! let rng = &mut StdRng::seed_from_u64(7);
//!
//! // Samples of the function to identify
//! let x: Vec<f64> = (0..500).map(|i| i as f64 / 500.0).collect();
//! let y: Vec<f64> = x.iter().map(|v| v * v).collect();
//!
//! // Model over the sample range, with 6 grid nodes
//! let mut model = Univariate::new(0.0, 1.0, 0.0, 1.0, 6, rng).unwrap();
//!
//! // A few passes of Kaczmarz updates
//! for _ in 0..30 {
//!     model.train_epoch(&x, &y, 0.1).unwrap();
//! }
//!
//! assert!((model.get_value(0.5) - 0.25).abs() < 2e-2);
//! ```
//!
//! # Example: Least-Squares Correction
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use univariate::Univariate;
//!
//! let rng = &mut StdRng::seed_from_u64(7);
//! let x: Vec<f64> = (0..500).map(|i| i as f64 / 500.0).collect();
//! let y: Vec<f64> = x.iter().map(|v| v * v).collect();
//!
//! let mut model = Univariate::new(0.0, 1.0, 0.0, 1.0, 6, rng).unwrap();
//!
//! // Correct the coefficients against the current residuals
//! let residuals = model.residuals(&x, &y).unwrap();
//! model.update_model_by_residual(&residuals, &x).unwrap();
//!
//! assert!((model.get_value(0.5) - 0.25).abs() < 5e-3);
//! ```
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

pub mod basis;
pub use basis::{BasisFunction, CubicSegment};

pub mod error;
pub use error::FitError;

pub mod matrix;

pub mod spline;
pub use spline::{NaturalSpline, SplineCoefficients, SplineSystem};

pub mod univariate;
pub use univariate::Univariate;

pub mod utils;

#[cfg(test)]
pub(crate) mod testing;
