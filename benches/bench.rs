#![allow(clippy::all)] // Clippy will attempt to remove black_box() internals

use criterion::*;
use samplegen::*;
use univariate::Univariate;

fn bench_eval(c: &mut Criterion) {
    for points in [10, 100] {
        let mut group = c.benchmark_group(format!("Eval_{points}-point"));
        for size in [1, 100, 100_000].iter() {
            group.throughput(Throughput::Elements(*size as u64));
            for random in [true, false] {
                let order = match random {
                    true => "Random Order",
                    false => "Scanning Order",
                };
                group.bench_with_input(
                    BenchmarkId::new(format!("get_value {points}-point, {order}"), size),
                    size,
                    |b, &size| {
                        let (x, y) = gen_samples(size, random);
                        let mut model = gen_model(&x, &y, points);
                        let mut out = vec![0.0; size];

                        b.iter(|| black_box(model.eval(&x, &mut out).unwrap()));
                    },
                );
            }
        }
        group.finish();
    }
}

fn bench_fit(c: &mut Criterion) {
    for points in [10, 100] {
        let mut group = c.benchmark_group(format!("Fit_{points}-point"));
        for size in [1_000, 10_000].iter() {
            group.throughput(Throughput::Elements(*size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("Kaczmarz epoch {points}-point"), size),
                size,
                |b, &size| {
                    let (x, y) = gen_samples(size, true);
                    let mut model = gen_model(&x, &y, points);

                    b.iter(|| black_box(model.train_epoch(&x, &y, 0.05).unwrap()));
                },
            );

            group.bench_with_input(
                BenchmarkId::new(format!("Batch correction {points}-point"), size),
                size,
                |b, &size| {
                    let (x, y) = gen_samples(size, true);
                    let mut model = gen_model(&x, &y, points);
                    let residuals = model.residuals(&x, &y).unwrap();

                    b.iter(|| {
                        black_box({
                            let mut m = model.clone();
                            m.update_model_by_residual(&residuals, &x).unwrap()
                        })
                    });
                },
            );
        }
        group.finish();
    }
}

criterion_group!(benches_eval, bench_eval);
criterion_group!(benches_fit, bench_fit);
criterion_main!(benches_eval, benches_fit,);

mod randn {
    use rand::distr::{Distribution, StandardUniform};
    use rand::rngs::StdRng;
    use rand::Rng;
    use rand::SeedableRng;

    /// Fixed random seed to support repeatable testing
    const SEED: [u8; 32] = [
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7,
        6, 5, 4, 3, 2, 1,
    ];

    /// Get a random number generator with a const seed for repeatable testing
    pub fn rng_fixed_seed() -> StdRng {
        StdRng::from_seed(SEED)
    }

    /// Generate `n` random numbers using provided generator
    pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
    where
        StandardUniform: Distribution<T>,
    {
        let out: Vec<T> = (0..n).map(|_| rng.random::<T>()).collect();
        out
    }
}

mod samplegen {
    use super::randn::*;
    use univariate::utils::linspace;
    use univariate::Univariate;

    // Samples of two superposed sines on [0.5, 1.5],
    // either evenly spaced in scanning order or drawn at random.
    pub fn gen_samples(size: usize, random: bool) -> (Vec<f64>, Vec<f64>) {
        let mut rng = rng_fixed_seed();
        let x: Vec<f64> = match random {
            true => randn::<f64>(&mut rng, size)
                .iter()
                .map(|u| 0.5 + u)
                .collect(),
            false => linspace(0.5, 1.5, size).unwrap(),
        };
        let y = x
            .iter()
            .map(|&v| {
                use std::f64::consts::PI;
                (PI * v).sin() + (PI * (2.0 * v + 2.0)).sin()
            })
            .collect();

        (x, y)
    }

    // A model spanning the samples
    pub fn gen_model(x: &[f64], y: &[f64], points: usize) -> Univariate<f64> {
        let mut rng = rng_fixed_seed();
        let (xmin, xmax) = extent(x);
        let (ymin, ymax) = extent(y);

        // Guard against a single sample
        let xmax = if xmax > xmin { xmax } else { xmin + 1.0 };
        Univariate::new(xmin, xmax, ymin, ymax, points, &mut rng).unwrap()
    }

    fn extent(v: &[f64]) -> (f64, f64) {
        v.iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)))
    }
}
