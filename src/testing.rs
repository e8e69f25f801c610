use rand::Rng;
use rand::SeedableRng;
use rand::distr::StandardUniform;
use rand::rngs::StdRng;

/// Fixed random seed to support repeatable testing
const SEED: [u8; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6,
    5, 4, 3, 2, 1,
];

/// Get a random number generator with a const seed for repeatable testing
pub fn rng_fixed_seed() -> StdRng {
    StdRng::from_seed(SEED)
}

/// Generate `n` random numbers using provided generator
pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
where
    StandardUniform: rand::distr::Distribution<T>,
{
    std::iter::repeat_with(|| rng.random::<T>())
        .take(n)
        .collect()
}

/// Two superposed sines, `sin(pi x) + sin(pi (2x + 2))`
pub fn two_sines(x: f64) -> f64 {
    use std::f64::consts::PI;
    (PI * x).sin() + (PI * (2.0 * x + 2.0)).sin()
}

/// Draw `n` locations uniformly from `[lo, hi)` and evaluate `f` at each
pub fn sample(
    rng: &mut StdRng,
    n: usize,
    lo: f64,
    hi: f64,
    f: fn(f64) -> f64,
) -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = randn::<f64>(rng, n)
        .into_iter()
        .map(|u| lo + u * (hi - lo))
        .collect();
    let y = x.iter().map(|&xi| f(xi)).collect();
    (x, y)
}

/// Smallest and largest entry like (min, max)
pub fn bounds(v: &[f64]) -> (f64, f64) {
    v.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)))
}
