//! Dense matrix routines for the least-squares correction path.
//!
//! Matrices are row-major nested vectors, `m[row][col]`. Every routine checks
//! that its inputs are rectangular and conformable, and reports violations as
//! [`FitError::DimensionMismatch`].
use num_traits::Float;

use crate::spline::SplineSystem;
use crate::FitError;

/// Get (rows, cols) of a rectangular matrix.
///
/// # Errors
/// * If the matrix is empty, has empty rows, or is ragged
#[inline]
pub fn shape<T>(m: &[Vec<T>]) -> Result<(usize, usize), FitError> {
    let rows = m.len();
    if rows == 0 {
        return Err(FitError::DimensionMismatch("Empty matrix"));
    }
    let cols = m[0].len();
    if cols == 0 || m.iter().any(|row| row.len() != cols) {
        return Err(FitError::DimensionMismatch("Matrix rows have unequal length"));
    }

    Ok((rows, cols))
}

/// Matrix product `left * right`.
///
/// # Errors
/// * If `left` has a different number of columns than `right` has rows
pub fn product<T: Float>(left: &[Vec<T>], right: &[Vec<T>]) -> Result<Vec<Vec<T>>, FitError> {
    let (n, inner) = shape(left)?;
    let (inner_r, m) = shape(right)?;
    if inner != inner_r {
        return Err(FitError::DimensionMismatch(
            "Left columns do not match right rows",
        ));
    }

    let mut out = vec![vec![T::zero(); m]; n];
    for i in 0..n {
        for j in 0..m {
            let mut acc = T::zero();
            for k in 0..inner {
                acc = acc + left[i][k] * right[k][j];
            }
            out[i][j] = acc;
        }
    }

    Ok(out)
}

/// Gram matrix `X^T X` of a tall matrix, size cols x cols.
///
/// # Errors
/// * If `x` has fewer rows than columns
pub fn gram<T: Float>(x: &[Vec<T>]) -> Result<Vec<Vec<T>>, FitError> {
    let (rows, cols) = shape(x)?;
    if rows < cols {
        return Err(FitError::DimensionMismatch(
            "Gram matrix needs at least as many rows as columns",
        ));
    }

    // Symmetric; fill the upper triangle and mirror it
    let mut out = vec![vec![T::zero(); cols]; cols];
    for i in 0..cols {
        for j in i..cols {
            let mut acc = T::zero();
            for k in 0..rows {
                acc = acc + x[k][i] * x[k][j];
            }
            out[i][j] = acc;
            out[j][i] = acc;
        }
    }

    Ok(out)
}

/// Combine a tall matrix with the inverse of its Gram matrix,
/// `P[i][j] = sum_k X[i][k] * Inv[j][k]`, i.e. `X * Inv^T`.
///
/// The result is the transpose of the Moore-Penrose left inverse
/// `(X^T X)^-1 X^T`, laid out like `x` (rows x cols).
///
/// # Errors
/// * If `x` has fewer rows than columns
/// * If `inv` is not square with size matching the columns of `x`
pub fn pseudo<T: Float>(x: &[Vec<T>], inv: &[Vec<T>]) -> Result<Vec<Vec<T>>, FitError> {
    let (rows, cols) = shape(x)?;
    if rows < cols {
        return Err(FitError::DimensionMismatch(
            "Pseudo-inverse needs at least as many rows as columns",
        ));
    }
    let (inv_rows, inv_cols) = shape(inv)?;
    if inv_rows != cols || inv_cols != cols {
        return Err(FitError::DimensionMismatch(
            "Inverse must be square and match the columns of the design matrix",
        ));
    }

    let mut out = vec![vec![T::zero(); cols]; rows];
    for i in 0..rows {
        for j in 0..cols {
            let mut acc = T::zero();
            for k in 0..cols {
                acc = acc + x[i][k] * inv[j][k];
            }
            out[i][j] = acc;
        }
    }

    Ok(out)
}

/// Moore-Penrose left pseudo-inverse of a tall, full-column-rank matrix,
/// returned in the transposed (rows x cols) layout of [`pseudo`].
///
/// # Errors
/// * If `x` has fewer rows than columns
/// * If the Gram matrix of `x` cannot be inverted by `system`
pub fn pseudo_inverse<T, S>(x: &[Vec<T>], system: &S) -> Result<Vec<Vec<T>>, FitError>
where
    T: Float,
    S: SplineSystem<T>,
{
    let xtx = gram(x)?;
    let inv = system.invert(&xtx)?;
    pseudo(x, &inv)
}

/// Cross product `X^T Y` of two matrices with the same number of rows,
/// size cols(X) x cols(Y).
///
/// # Errors
/// * If `x` and `y` have different numbers of rows
pub fn two_rectangular<T: Float>(x: &[Vec<T>], y: &[Vec<T>]) -> Result<Vec<Vec<T>>, FitError> {
    let (rows, xcols) = shape(x)?;
    let (yrows, ycols) = shape(y)?;
    if rows != yrows {
        return Err(FitError::DimensionMismatch(
            "Paired matrices must have the same number of rows",
        ));
    }

    let mut out = vec![vec![T::zero(); ycols]; xcols];
    for i in 0..xcols {
        for j in 0..ycols {
            let mut acc = T::zero();
            for k in 0..rows {
                acc = acc + x[k][i] * y[k][j];
            }
            out[i][j] = acc;
        }
    }

    Ok(out)
}
