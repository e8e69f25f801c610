//! Piecewise-cubic basis functions.
//!
//! Each basis function is stored as one cubic polynomial per grid segment,
//! expressed in the segment's relative coordinate. The polynomials describe
//! shape only; the mapping from a global location to a segment and relative
//! coordinate is owned by the model, so the same basis can be reused as the
//! domain stretches.
use num_traits::{Float, NumCast};

use crate::spline::SplineCoefficients;
use crate::FitError;

/// A single cubic `a + b*t + c*t^2 + d*t^3` over a local coordinate `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment<T: Float> {
    a: T,
    b: T,
    c: T,
    d: T,
}

impl<T: Float> CubicSegment<T> {
    pub fn new(a: T, b: T, c: T, d: T) -> Self {
        Self { a, b, c, d }
    }

    /// Polynomial coefficients like (a, b, c, d)
    pub fn coefficients(&self) -> (T, T, T, T) {
        (self.a, self.b, self.c, self.d)
    }

    #[inline]
    pub fn value(&self, t: T) -> T {
        let t2 = t * t;
        let t3 = t2 * t;

        self.a + (self.b * t) + (self.c * t2) + (self.d * t3)
    }

    /// First derivative with respect to the local coordinate `t`.
    #[inline]
    pub fn derivative(&self, t: T) -> T {
        let two = T::one() + T::one();
        let three = two + T::one();

        self.b + (two * self.c * t) + (three * self.d * t * t)
    }
}

/// One globally-supported piecewise-cubic function, with one
/// [`CubicSegment`] per grid segment, indexed by segment id.
#[derive(Clone, Debug, PartialEq)]
pub struct BasisFunction<T: Float> {
    segments: Vec<CubicSegment<T>>,
}

impl<T: Float> BasisFunction<T> {
    pub fn new(segments: Vec<CubicSegment<T>>) -> Self {
        Self { segments }
    }

    /// Assemble a basis function from per-segment spline coefficients.
    ///
    /// # Errors
    /// * If the four coefficient vectors differ in length
    pub fn from_coefficients(coefs: &SplineCoefficients<T>) -> Result<Self, FitError> {
        let n = coefs.a.len();
        if coefs.b.len() != n || coefs.c.len() != n || coefs.d.len() != n {
            return Err(FitError::DimensionMismatch(
                "Need one coefficient of each order per segment",
            ));
        }

        let segments = (0..n)
            .map(|i| CubicSegment::new(coefs.a[i], coefs.b[i], coefs.c[i], coefs.d[i]))
            .collect();

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[CubicSegment<T>] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Value on segment `segment` at relative coordinate `t`.
    ///
    /// # Panics
    /// If `segment` is not a valid segment index.
    #[inline]
    pub fn value(&self, segment: usize, t: T) -> T {
        self.segments[segment].value(t)
    }

    /// Derivative w.r.t. the relative coordinate on segment `segment`.
    ///
    /// # Panics
    /// If `segment` is not a valid segment index.
    #[inline]
    pub fn derivative(&self, segment: usize, t: T) -> T {
        self.segments[segment].derivative(t)
    }

    /// Sample every segment at `per_segment` evenly spaced relative
    /// positions in `[0, 1)`, in segment order.
    ///
    /// # Errors
    /// * If `per_segment` is not representable in `T`
    pub fn tabulate(&self, per_segment: usize) -> Result<Vec<T>, FitError> {
        let n = <T as NumCast>::from(per_segment).ok_or(FitError::Unrepresentable)?;
        let mut out = Vec::with_capacity(self.segments.len() * per_segment);
        for seg in self.segments.iter() {
            for j in 0..per_segment {
                let t = <T as NumCast>::from(j).ok_or(FitError::Unrepresentable)? / n;
                out.push(seg.value(t));
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::{BasisFunction, CubicSegment};
    use crate::spline::SplineCoefficients;
    use crate::FitError;

    #[test]
    fn test_cubic_segment() {
        let seg = CubicSegment::new(1.0_f64, -2.0, 0.5, 3.0);

        assert_eq!(seg.coefficients(), (1.0, -2.0, 0.5, 3.0));
        assert_eq!(seg.value(0.0), 1.0);
        assert_eq!(seg.derivative(0.0), -2.0);
        // 1 - 4 + 2 + 24
        assert!((seg.value(2.0) - 23.0).abs() < 1e-12);
        // -2 + 2 + 36
        assert!((seg.derivative(2.0) - 36.0).abs() < 1e-12);
        // Local coordinate is not restricted to [0, 1]
        assert!((seg.value(-1.0) - (1.0 + 2.0 + 0.5 - 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let seg = CubicSegment::new(0.3_f64, 1.7, -2.2, 0.9);
        let h = 1e-6;
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let fd = (seg.value(t + h) - seg.value(t - h)) / (2.0 * h);
            assert!((fd - seg.derivative(t)).abs() < 1e-7);
        }
    }

    #[test]
    fn test_basis_delegates_to_segment() {
        let basis = BasisFunction::new(vec![
            CubicSegment::new(0.0_f64, 1.0, 0.0, 0.0),
            CubicSegment::new(1.0, 0.0, 0.0, -1.0),
        ]);

        assert_eq!(basis.len(), 2);
        assert_eq!(basis.segments()[1].coefficients(), (1.0, 0.0, 0.0, -1.0));
        assert_eq!(basis.value(0, 0.25), 0.25);
        assert_eq!(basis.value(1, 0.5), 1.0 - 0.125);
        assert_eq!(basis.derivative(1, 1.0), -3.0);

        let table = basis.tabulate(4).unwrap();
        assert_eq!(table.len(), 8);
        assert_eq!(table[..4], [0.0, 0.25, 0.5, 0.75]);
        assert_eq!(table[4], 1.0);
    }

    #[test]
    fn test_from_coefficients() {
        let coefs = SplineCoefficients {
            a: vec![0.0_f64, 1.0],
            b: vec![1.0, 0.0],
            c: vec![0.0, 0.0],
            d: vec![0.0, -1.0],
        };
        let basis = BasisFunction::from_coefficients(&coefs).unwrap();
        assert_eq!(basis.len(), 2);
        assert_eq!(basis.segments()[1].coefficients(), (1.0, 0.0, 0.0, -1.0));

        let ragged = SplineCoefficients {
            d: vec![0.0],
            ..coefs
        };
        assert!(matches!(
            BasisFunction::from_coefficients(&ragged),
            Err(FitError::DimensionMismatch(_))
        ));
    }

    #[test]
    #[should_panic]
    fn test_segment_out_of_range() {
        let basis = BasisFunction::new(vec![CubicSegment::new(0.0_f64, 1.0, 0.0, 0.0)]);
        basis.value(1, 0.0);
    }
}
