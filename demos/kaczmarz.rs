//! Identify two superposed sines from random samples, first by online
//! Kaczmarz updates and then, on a fresh model, by a single least-squares
//! correction. Run with `RUST_LOG=debug` to see domain extensions.
use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use univariate::{utils::rms, FitError, Univariate};

fn target(x: f64) -> f64 {
    (PI * x).sin() + (PI * (2.0 * x + 2.0)).sin()
}

fn sample(rng: &mut StdRng, n: usize, xmin: f64, xmax: f64) -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = (0..n)
        .map(|_| rng.random_range(10..1000) as f64 / 1000.0 * (xmax - xmin) + xmin)
        .collect();
    let y = x.iter().map(|&v| target(v)).collect();
    (x, y)
}

fn extent(v: &[f64]) -> (f64, f64) {
    v.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)))
}

fn main() -> Result<(), FitError> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let rng = &mut StdRng::seed_from_u64(0);
    let (x, y) = sample(rng, 2000, 0.5, 1.5);
    let (xmin, xmax) = extent(&x);
    let (ymin, ymax) = extent(&y);
    let range = ymax - ymin;

    // Online identification
    let mut model = Univariate::new(xmin, xmax, ymin, ymax, 10, rng)?;
    for epoch in 0..8 {
        let error = model.train_epoch(&x, &y, 0.05)? / range;
        log::info!("epoch {epoch}, error {error:.6}");
    }

    let (x_test, y_test) = sample(rng, 100, 0.5, 1.5);
    let error = rms(&model.residuals(&x_test, &y_test)?) / range;
    log::info!("Relative error for unseen data after identification {error:.6}");

    // Least-squares identification
    let mut model = Univariate::new(xmin, xmax, ymin, ymax, 10, rng)?;
    let residuals = model.residuals(&x, &y)?;
    log::info!(
        "Relative error for initial approximation {:.4}",
        rms(&residuals) / range
    );
    model.update_model_by_residual(&residuals, &x)?;

    let error = rms(&model.residuals(&x_test, &y_test)?) / range;
    log::info!("Relative error for unseen data after correction {error:.6}");

    Ok(())
}
