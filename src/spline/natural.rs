//! Natural cubic splines, with zero curvature imposed at both end nodes.
use log::warn;
use num_traits::{Float, NumCast};

use super::{SplineCoefficients, SplineSystem};
use crate::FitError;

/// Natural cubic spline solver using dense Gauss-Jordan inversion.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalSpline;

impl<T: Float> SplineSystem<T> for NaturalSpline {
    /// Rows 0 and n-1 pin the end moments to zero; interior row `i` is
    /// `h[i-1], 2(h[i-1] + h[i]), h[i]` on the sub-, main and super-diagonal.
    ///
    /// # Errors
    /// * If `n < 2`
    /// * If `h` does not have `n - 1` entries
    /// * If any segment width is not finite and positive
    fn build_tridiagonal_system(&self, n: usize, h: &[T]) -> Result<Vec<Vec<T>>, FitError> {
        check_widths(n, h)?;

        let two = T::one() + T::one();
        let mut m = vec![vec![T::zero(); n]; n];
        m[0][0] = T::one();
        m[n - 1][n - 1] = T::one();
        for i in 1..n - 1 {
            m[i][i - 1] = h[i - 1];
            m[i][i] = two * (h[i - 1] + h[i]);
            m[i][i + 1] = h[i];
        }

        Ok(m)
    }

    fn invert(&self, m: &[Vec<T>]) -> Result<Vec<Vec<T>>, FitError> {
        gauss_jordan(m)
    }

    /// # Errors
    /// * If `y` has fewer than 2 entries
    /// * If `h` or `inverse` do not match the number of nodes
    fn fit_splines(
        &self,
        inverse: &[Vec<T>],
        y: &[T],
        h: &[T],
    ) -> Result<SplineCoefficients<T>, FitError> {
        let n = y.len();
        check_widths(n, h)?;
        if inverse.len() != n || inverse.iter().any(|row| row.len() != n) {
            return Err(FitError::DimensionMismatch(
                "Inverse system does not match number of nodes",
            ));
        }

        let one = T::one();
        let two = one + one;
        let three = two + one;

        // Right hand side; end rows are the natural boundary condition
        let mut r = vec![T::zero(); n];
        for i in 1..n - 1 {
            r[i] = three * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        }

        // Moments at each node
        let mut moments = vec![T::zero(); n];
        for i in 0..n {
            let mut acc = T::zero();
            for k in 0..n {
                acc = acc + inverse[i][k] * r[k];
            }
            moments[i] = acc;
        }

        let nseg = n - 1;
        let mut coefs = SplineCoefficients {
            a: Vec::with_capacity(nseg),
            b: Vec::with_capacity(nseg),
            c: Vec::with_capacity(nseg),
            d: Vec::with_capacity(nseg),
        };
        for i in 0..nseg {
            let (c0, c1) = (moments[i], moments[i + 1]);
            coefs.a.push(y[i]);
            coefs.b.push((y[i + 1] - y[i]) / h[i] - h[i] * (two * c0 + c1) / three);
            coefs.c.push(c0);
            coefs.d.push((c1 - c0) / (three * h[i]));
        }

        Ok(coefs)
    }
}

fn check_widths<T: Float>(n: usize, h: &[T]) -> Result<(), FitError> {
    if n < 2 {
        return Err(FitError::TooFewPoints(n));
    }
    if h.len() != n - 1 {
        return Err(FitError::DimensionMismatch(
            "Need exactly one segment width per segment",
        ));
    }
    if !h.iter().all(|&w| w.is_finite() && w > T::zero()) {
        return Err(FitError::InvalidBounds(
            "Segment widths must be finite and positive",
        ));
    }

    Ok(())
}

/// Invert a square matrix by Gauss-Jordan elimination with partial pivoting.
///
/// A pivot no larger than `n * eps * max|m|` is treated as zero.
fn gauss_jordan<T: Float>(m: &[Vec<T>]) -> Result<Vec<Vec<T>>, FitError> {
    let n = m.len();
    if n == 0 || m.iter().any(|row| row.len() != n) {
        return Err(FitError::DimensionMismatch("Matrix is not square"));
    }

    let scale = m
        .iter()
        .flatten()
        .fold(T::zero(), |acc, &v| acc.max(v.abs()));
    if !(scale > T::zero() && scale.is_finite()) {
        warn!("Refusing to invert a zero or non-finite {n}x{n} matrix");
        return Err(FitError::Singular);
    }
    let tol = scale * T::epsilon() * <T as NumCast>::from(n).ok_or(FitError::Unrepresentable)?;

    let mut a = m.to_vec();
    let mut inv = vec![vec![T::zero(); n]; n];
    (0..n).for_each(|i| inv[i][i] = T::one());

    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if !(a[pivot][col].abs() > tol) {
            warn!("Zero pivot in column {col} of a {n}x{n} matrix");
            return Err(FitError::Singular);
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let p = a[col][col];
        for j in 0..n {
            a[col][j] = a[col][j] / p;
            inv[col][j] = inv[col][j] / p;
        }

        for row in 0..n {
            let f = a[row][col];
            if row == col || f == T::zero() {
                continue;
            }
            for j in 0..n {
                a[row][j] = a[row][j] - f * a[col][j];
                inv[row][j] = inv[row][j] - f * inv[col][j];
            }
        }
    }

    if inv.iter().flatten().any(|v| !v.is_finite()) {
        warn!("Inverse of a {n}x{n} matrix has non-finite entries");
        return Err(FitError::Singular);
    }

    Ok(inv)
}
