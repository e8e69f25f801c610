//! Convenience methods for constructing grids in a way that echoes,
//! but does not exactly match, methods common in scripting languages.
use num_traits::{Float, NumCast};

use crate::FitError;

/// Generates evenly spaced values from start to stop,
/// including the endpoint.
///
/// # Errors
/// * If `n` is not representable in `T`
pub fn linspace<T>(start: T, stop: T, n: usize) -> Result<Vec<T>, FitError>
where
    T: Float,
{
    match n {
        0 => Ok(Vec::new()),
        1 => Ok(vec![start]),
        _ => {
            let dx: T =
                (stop - start) / <T as NumCast>::from(n - 1).ok_or(FitError::Unrepresentable)?;
            let mut out = (0..n - 1)
                .map(|i| {
                    <T as NumCast>::from(i)
                        .map(|fi| start + fi * dx)
                        .ok_or(FitError::Unrepresentable)
                })
                .collect::<Result<Vec<T>, FitError>>()?;

            // Land exactly on the endpoint
            out.push(stop);
            Ok(out)
        }
    }
}

/// Root-mean-square of a set of residuals; zero for an empty set.
pub fn rms<T: Float>(residuals: &[T]) -> T {
    let n = match <T as NumCast>::from(residuals.len()) {
        Some(n) if !residuals.is_empty() => n,
        _ => return T::zero(),
    };
    let ss = residuals.iter().fold(T::zero(), |acc, &r| acc + r * r);

    (ss / n).sqrt()
}
