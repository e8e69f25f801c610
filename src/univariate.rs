//! Identification of a single scalar function of one variable.
//!
//! The model is a linear combination of cardinal cubic spline basis functions,
//! one per node of an evenly spaced grid. Basis shapes are computed once, in
//! relative coordinates, and reused as the domain grows to cover new inputs;
//! only the coefficient vector is learned.
//!
//! Two fitting procedures are available:
//! * [`Univariate::update`], a single-sample Kaczmarz step, for online fitting
//! * [`Univariate::update_model_by_residual`], a least-squares correction
//!   of the coefficients against a batch of residuals
use log::{debug, trace};
use num_traits::{Float, NumCast, ToPrimitive};
use rand::Rng;

use crate::basis::BasisFunction;
use crate::matrix::pseudo_inverse;
use crate::spline::{NaturalSpline, SplineSystem};
use crate::utils::{linspace, rms};
use crate::FitError;

/// Fraction of the domain width added beyond an input that falls outside it.
const MARGIN: f64 = 0.01;

/// A univariate function model over an adaptive, evenly spaced grid.
#[derive(Clone, Debug)]
pub struct Univariate<T: Float, S = NaturalSpline> {
    /// Number of grid nodes; also the number of basis functions
    points: usize,

    /// Number of segments, `points - 1`, as a float
    nseg: T,

    xmin: T,
    xmax: T,
    ymin: T,
    ymax: T,

    /// Segment width
    deltax: T,

    /// Relative domain margin
    margin: T,

    basis: Vec<BasisFunction<T>>,
    coefficients: Vec<T>,

    /// Solver for the batch-correction inverse
    system: S,
}

impl<T: Float> Univariate<T, NaturalSpline> {
    /// Build a model over `[xmin, xmax]` with `points` grid nodes, using
    /// natural cubic splines for the basis.
    ///
    /// `ymin` and `ymax` bound the expected output and only set the scale of
    /// the randomly initialized coefficients, which are drawn from `rng`.
    ///
    /// # Errors
    /// * If `points < 2`
    /// * If any bound is not finite, `xmax <= xmin`, or `ymax < ymin`
    pub fn new<R: Rng>(
        xmin: T,
        xmax: T,
        ymin: T,
        ymax: T,
        points: usize,
        rng: &mut R,
    ) -> Result<Self, FitError> {
        Self::with_system(xmin, xmax, ymin, ymax, points, NaturalSpline, rng)
    }
}

impl<T: Float, S: SplineSystem<T>> Univariate<T, S> {
    /// Build a model using a caller-supplied spline solver.
    ///
    /// The solver is asked once for the inverse of the interpolation system
    /// on a unit-spaced grid, then once per grid node to produce the cardinal
    /// basis function for that node. It is kept for the batch correction.
    ///
    /// # Errors
    /// * If `points < 2`
    /// * If any bound is not finite, `xmax <= xmin`, or `ymax < ymin`
    /// * If the solver fails, or returns the wrong number of segments
    pub fn with_system<R: Rng>(
        xmin: T,
        xmax: T,
        ymin: T,
        ymax: T,
        points: usize,
        system: S,
        rng: &mut R,
    ) -> Result<Self, FitError> {
        if points < 2 {
            return Err(FitError::TooFewPoints(points));
        }
        if !(xmin.is_finite() && xmax.is_finite()) {
            return Err(FitError::InvalidBounds("Domain bounds must be finite"));
        }
        if xmax <= xmin {
            return Err(FitError::InvalidBounds("Domain must have xmax > xmin"));
        }
        if !(ymin.is_finite() && ymax.is_finite()) || ymax < ymin {
            return Err(FitError::InvalidBounds(
                "Target range must be finite with ymax >= ymin",
            ));
        }

        let margin = <T as NumCast>::from(MARGIN).ok_or(FitError::Unrepresentable)?;
        let nseg = <T as NumCast>::from(points - 1).ok_or(FitError::Unrepresentable)?;

        // Widen the domain; the upper margin is taken on the already-widened width
        let xmin = xmin - margin * (xmax - xmin);
        let xmax = xmax + margin * (xmax - xmin);
        let deltax = (xmax - xmin) / nseg;

        let basis = build_basis(&system, points)?;
        let coefficients = init_coefficients(ymin, ymax, points, rng)?;

        debug!(
            "Built univariate model with {points} nodes on [{:.6e}, {:.6e}]",
            as_f64(xmin),
            as_f64(xmax)
        );

        Ok(Self {
            points,
            nseg,
            xmin,
            xmax,
            ymin,
            ymax,
            deltax,
            margin,
            basis,
            coefficients,
            system,
        })
    }

    /// Number of grid nodes, which is also the number of basis functions
    /// and coefficients.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Width of each segment
    pub fn deltax(&self) -> T {
        self.deltax
    }

    /// Current domain like (xmin, xmax)
    pub fn domain(&self) -> (T, T) {
        (self.xmin, self.xmax)
    }

    /// Target range used to scale the initial coefficients, like (ymin, ymax)
    pub fn target_range(&self) -> (T, T) {
        (self.ymin, self.ymax)
    }

    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    pub fn basis(&self) -> &[BasisFunction<T>] {
        &self.basis
    }

    /// Locations of the grid nodes on the current domain.
    ///
    /// # Errors
    /// * If the number of nodes is not representable in `T`
    pub fn nodes(&self) -> Result<Vec<T>, FitError> {
        linspace(self.xmin, self.xmax, self.points)
    }

    /// Stretch the domain so that it covers `x`, if it does not already.
    ///
    /// The new bound lands one margin (1% of the current width) past `x`,
    /// and all segments are re-spaced evenly. The domain never shrinks.
    /// Basis shapes and coefficients are untouched; only the mapping from
    /// a location to a segment and relative coordinate changes.
    ///
    /// Returns `true` if the bounds changed.
    pub fn extend_domain_if_needed(&mut self, x: T) -> bool {
        let (old_min, old_max) = (self.xmin, self.xmax);
        if x < self.xmin {
            let xmin = x - self.margin * (self.xmax - self.xmin);
            self.deltax = (self.xmax - xmin) / self.nseg;
            self.xmin = xmin;
        } else if x > self.xmax {
            let xmax = x + self.margin * (self.xmax - self.xmin);
            self.deltax = (xmax - self.xmin) / self.nseg;
            self.xmax = self.xmin + self.nseg * self.deltax;
        } else {
            return false;
        }

        debug!(
            "Extended domain from [{:.6e}, {:.6e}] to [{:.6e}, {:.6e}]",
            as_f64(old_min),
            as_f64(old_max),
            as_f64(self.xmin),
            as_f64(self.xmax)
        );
        true
    }

    /// Get the segment containing `x` and the relative coordinate of `x`
    /// within it, like (segment, relative).
    ///
    /// The segment is clipped to `[0, points - 2]`, so `relative` is in
    /// `[0, 1]` for any `x` inside the domain. Outside the domain the
    /// relative coordinate extends past that range; call
    /// [`Self::extend_domain_if_needed`] first to avoid that.
    #[inline]
    pub fn locate(&self, x: T) -> (usize, T) {
        // Nominal location in units of segments; may be outside the grid
        let loc = (x - self.xmin) / self.deltax;

        // Clip to inside of grid
        let floc = loc.floor().max(T::zero()).min(self.nseg - T::one());
        let segment = floc.to_usize().unwrap_or(0);

        // At the upper bound, rounding in deltax can put loc just past nseg
        let relative = if x <= self.xmax {
            (loc - floc).min(T::one())
        } else {
            loc - floc
        };

        (segment, relative)
    }

    /// Evaluate the model at `x`, extending the domain first if needed.
    pub fn get_value(&mut self, x: T) -> T {
        self.extend_domain_if_needed(x);
        let (segment, relative) = self.locate(x);

        self.basis
            .iter()
            .zip(self.coefficients.iter())
            .fold(T::zero(), |acc, (b, &c)| acc + c * b.value(segment, relative))
    }

    /// Evaluate the first derivative of the model at `x`,
    /// extending the domain first if needed.
    pub fn get_derivative(&mut self, x: T) -> T {
        self.extend_domain_if_needed(x);
        let (segment, relative) = self.locate(x);

        // Basis derivatives are w.r.t. the relative coordinate
        self.basis
            .iter()
            .zip(self.coefficients.iter())
            .fold(T::zero(), |acc, (b, &c)| {
                acc + c * b.derivative(segment, relative) / self.deltax
            })
    }

    /// Kaczmarz step for a single sample: move every coefficient by
    /// `delta * mu` times the activation of its basis function at `x`.
    ///
    /// `delta` is the residual (target minus current prediction) at `x`
    /// and `mu` is the step size. `x` must be finite; a NaN location would
    /// turn every coefficient into NaN.
    ///
    /// # Panics
    /// In debug builds, if `x` is not finite.
    pub fn update(&mut self, x: T, delta: T, mu: T) {
        debug_assert!(x.is_finite(), "Kaczmarz update at a non-finite location");
        self.extend_domain_if_needed(x);
        let (segment, relative) = self.locate(x);

        let step = delta * mu;
        for (c, b) in self.coefficients.iter_mut().zip(self.basis.iter()) {
            *c = *c + step * b.value(segment, relative);
        }
    }

    /// Activation of every basis function at `x`, extending the domain
    /// first if needed. This is one row of the design matrix.
    pub fn get_basic_vector(&mut self, x: T) -> Vec<T> {
        self.extend_domain_if_needed(x);
        let (segment, relative) = self.locate(x);

        self.basis
            .iter()
            .map(|b| b.value(segment, relative))
            .collect()
    }

    /// Add `c * mu` to the coefficients.
    ///
    /// # Errors
    /// * If `c` does not have one entry per coefficient
    pub fn update_direct(&mut self, c: &[T], mu: T) -> Result<(), FitError> {
        if c.len() != self.coefficients.len() {
            return Err(FitError::DimensionMismatch(
                "Need one correction per coefficient",
            ));
        }

        for (coef, &ci) in self.coefficients.iter_mut().zip(c.iter()) {
            *coef = *coef + ci * mu;
        }

        Ok(())
    }

    /// Least-squares correction of the coefficients against `residuals`
    /// observed at `xs`.
    ///
    /// Builds the design matrix of basis activations at each sample, then
    /// applies the coefficient change that best explains the residuals
    /// through its pseudo-inverse. The coefficients are left untouched on
    /// failure, though the domain may already have been extended to cover
    /// `xs`.
    ///
    /// # Errors
    /// * If `residuals` and `xs` have different lengths
    /// * If there are fewer samples than grid nodes
    /// * If the design matrix is rank deficient
    /// * If the correction is not finite
    pub fn update_model_by_residual(&mut self, residuals: &[T], xs: &[T]) -> Result<(), FitError> {
        let n = xs.len();
        if residuals.len() != n {
            return Err(FitError::DimensionMismatch(
                "Need one residual per sample",
            ));
        }
        debug!(
            "Batch correction on {n} samples with {} basis functions",
            self.points
        );

        let design: Vec<Vec<T>> = xs.iter().map(|&x| self.get_basic_vector(x)).collect();
        let p = pseudo_inverse(&design, &self.system)?;

        let mut correction = vec![T::zero(); self.points];
        for i in 0..self.points {
            let mut acc = T::zero();
            for j in 0..n {
                acc = acc + p[j][i] * residuals[j];
            }
            correction[i] = acc;
        }
        if !correction.iter().all(|c| c.is_finite()) {
            return Err(FitError::NonFinite);
        }

        self.update_direct(&correction, T::one())
    }

    /// Evaluate the model at a set of observation points.
    ///
    /// # Errors
    /// * If `locs` and `out` have different lengths
    pub fn eval(&mut self, locs: &[T], out: &mut [T]) -> Result<(), FitError> {
        if locs.len() != out.len() {
            return Err(FitError::DimensionMismatch("Length mismatch"));
        }

        for i in 0..locs.len() {
            out[i] = self.get_value(locs[i]);
        }

        Ok(())
    }

    /// Evaluate the model at a set of observation points, allocating
    /// for the output values for convenience.
    pub fn eval_alloc(&mut self, locs: &[T]) -> Vec<T> {
        locs.iter().map(|&x| self.get_value(x)).collect()
    }

    /// Residuals (target minus prediction) at each sample.
    ///
    /// # Errors
    /// * If `xs` and `ys` have different lengths
    pub fn residuals(&mut self, xs: &[T], ys: &[T]) -> Result<Vec<T>, FitError> {
        if xs.len() != ys.len() {
            return Err(FitError::DimensionMismatch("Length mismatch"));
        }

        Ok(xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| y - self.get_value(x))
            .collect())
    }

    /// One pass of online Kaczmarz fitting over paired samples, in order.
    ///
    /// Each sample is predicted with the current coefficients and then used
    /// for an [`Self::update`] with step size `mu`. Returns the RMS of the
    /// residuals seen before each update.
    ///
    /// # Errors
    /// * If `xs` and `ys` have different lengths
    pub fn train_epoch(&mut self, xs: &[T], ys: &[T], mu: T) -> Result<T, FitError> {
        if xs.len() != ys.len() {
            return Err(FitError::DimensionMismatch("Length mismatch"));
        }

        let mut seen = Vec::with_capacity(xs.len());
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let delta = y - self.get_value(x);
            self.update(x, delta, mu);
            seen.push(delta);
        }

        let err = rms(&seen);
        trace!("Epoch over {} samples, rms residual {:.6e}", xs.len(), as_f64(err));
        Ok(err)
    }
}

/// One cardinal basis function per node, each interpolating
/// 1 at its own node and 0 at every other node on a unit-spaced grid.
fn build_basis<T: Float, S: SplineSystem<T>>(
    system: &S,
    points: usize,
) -> Result<Vec<BasisFunction<T>>, FitError> {
    let h = vec![T::one(); points - 1];
    let m = system.build_tridiagonal_system(points, &h)?;
    let inv = system.invert(&m)?;

    let mut basis = Vec::with_capacity(points);
    for i in 0..points {
        let mut e = vec![T::zero(); points];
        e[i] = T::one();

        let coefs = system.fit_splines(&inv, &e, &h)?;
        let b = BasisFunction::from_coefficients(&coefs)?;
        if b.len() != points - 1 {
            return Err(FitError::DimensionMismatch(
                "Spline solver must return one polynomial per segment",
            ));
        }
        basis.push(b);
    }

    Ok(basis)
}

/// Small positive-leaning random coefficients, `(u * (ymax - ymin) + ymax) / points`
/// with `u` drawn from `[0.01, 1)` in steps of 0.001.
fn init_coefficients<T: Float, R: Rng>(
    ymin: T,
    ymax: T,
    points: usize,
    rng: &mut R,
) -> Result<Vec<T>, FitError> {
    let thousand = <T as NumCast>::from(1000).ok_or(FitError::Unrepresentable)?;
    let count = <T as NumCast>::from(points).ok_or(FitError::Unrepresentable)?;

    (0..points)
        .map(|_| {
            let u = <T as NumCast>::from(rng.random_range(10_u32..1000))
                .ok_or(FitError::Unrepresentable)?
                / thousand;
            Ok((u * (ymax - ymin) + ymax) / count)
        })
        .collect()
}

#[inline]
fn as_f64<T: ToPrimitive>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}
