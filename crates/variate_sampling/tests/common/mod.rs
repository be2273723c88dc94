//! Shared helpers for the statistical integration tests.

/// Kolmogorov–Smirnov critical value at α = 0.001 for large `n`.
pub fn ks_critical(n: usize) -> f64 {
    1.95 / (n as f64).sqrt()
}

/// One-sample Kolmogorov–Smirnov statistic of `samples` against `cdf`.
pub fn ks_statistic<F: Fn(f64) -> f64>(samples: &[f64], cdf: F) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            let above = (i as f64 + 1.0) / n - f;
            let below = f - i as f64 / n;
            above.max(below)
        })
        .fold(0.0, f64::max)
}

/// Asserts that `samples` are consistent with `cdf` at α = 0.001.
pub fn assert_fits<F: Fn(f64) -> f64>(label: &str, samples: &[f64], cdf: F) {
    let d = ks_statistic(samples, cdf);
    let critical = ks_critical(samples.len());
    assert!(
        d < critical,
        "{}: KS statistic {:.4} exceeds critical value {:.4}",
        label,
        d,
        critical
    );
}
