//! Kolmogorov–Smirnov checks that each sampler reproduces its target
//! distribution. Seeds are fixed so the checks are deterministic.

mod common;

use common::assert_fits;
use variate_sampling::{
    invert_density, AcceptanceRejection, Clamp, Density, DistributionSpec, InverseTransform,
    SamplerConfig, Support, VariateRng,
};

const N: usize = 1_000;

#[test]
fn test_catalog_distributions_fit() {
    let sampler = InverseTransform::default();
    let cases = [
        DistributionSpec::new("norm", vec![]).with_loc(1.0).with_scale(2.0),
        DistributionSpec::new("expon", vec![]).with_scale(0.5),
        DistributionSpec::new("uniform", vec![]).with_loc(-3.0).with_scale(6.0),
        DistributionSpec::new("gamma", vec![2.5]),
        DistributionSpec::new("beta", vec![2.0, 5.0]),
        DistributionSpec::new("lognorm", vec![0.75]),
        DistributionSpec::new("weibull_min", vec![1.5]),
        DistributionSpec::new("laplace", vec![]),
        DistributionSpec::new("triang", vec![0.25]),
        DistributionSpec::new("chi2", vec![4.0]),
    ];

    for (index, spec) in cases.iter().enumerate() {
        let mut rng = VariateRng::from_seed(1_000 + index as u64);
        let draws = sampler
            .sample_catalog(&mut rng, N, spec, &Clamp::unbounded())
            .unwrap();
        assert_eq!(draws.len(), N);
        let distribution = spec.build().unwrap();
        assert_fits(&spec.to_string(), &draws, |x| distribution.cdf(x));
    }
}

#[test]
fn test_clamped_catalog_fits_truncated_distribution() {
    let spec = DistributionSpec::new("norm", vec![]);
    let distribution = spec.build().unwrap();
    let (lo, hi) = (-0.5, 1.5);
    let clamp = Clamp::new(Some(lo), Some(hi)).unwrap();

    let mut rng = VariateRng::from_seed(77);
    let draws = InverseTransform::default()
        .sample_catalog(&mut rng, N, &spec, &clamp)
        .unwrap();
    assert!(draws.iter().all(|&x| (lo..=hi).contains(&x)));

    let mass = distribution.cdf(hi) - distribution.cdf(lo);
    assert_fits("truncated norm", &draws, |x| {
        (distribution.cdf(x) - distribution.cdf(lo)) / mass
    });
}

#[test]
fn test_acceptance_rejection_with_bound_fits() {
    // f(x) = (x - 10)/50 on [10, 20], F(x) = (x - 10)^2 / 100
    let density = Density::parse("1.0/50.0 * (x - 10.0)").unwrap();
    let support = Support::new(10.0, 20.0).unwrap();
    let sampler = AcceptanceRejection::default();
    let mut rng = VariateRng::from_seed(2024);

    let accepted: Vec<_> = (0..N)
        .map(|_| {
            sampler
                .sample_with_bound(&mut rng, 0.2, &support, &density, 1_000)
                .unwrap()
        })
        .collect();
    let candidates: Vec<f64> = accepted.iter().map(|a| a.candidate).collect();
    let densities: Vec<f64> = accepted.iter().map(|a| a.density).collect();

    assert_fits("triangular (bound supplied)", &candidates, |x| {
        (x - 10.0).powi(2) / 100.0
    });
    // Image Y = f(X) on [0, 0.2]: P(Y <= y) = P(X <= 10 + 50y) = (50y)^2 / 100
    assert!(densities.iter().all(|&y| (0.0..=0.2 + 1e-12).contains(&y)));
    assert_fits("triangular density image", &densities, |y| {
        (50.0 * y).powi(2) / 100.0
    });
}

#[test]
fn test_acceptance_rejection_auto_bound_fits() {
    // f(x) = 6x(1 - x) on [0, 1], F(x) = 3x^2 - 2x^3
    let density = Density::parse("6*x*(1 - x)").unwrap();
    let support = Support::new(0.0, 1.0).unwrap();
    let sampler =
        AcceptanceRejection::new(SamplerConfig::builder().grid_points(501).build().unwrap());
    let mut rng = VariateRng::from_seed(99);

    let mut draws = Vec::with_capacity(N);
    while draws.len() < N {
        if let Some(accepted) = sampler
            .sample_auto_bound(&mut rng, &support, &density, 100)
            .unwrap()
        {
            assert!((accepted.bound - 1.5).abs() < 1e-9);
            draws.push(accepted.candidate);
        }
    }
    assert_fits("beta(2, 2) (auto bound)", &draws, |x| {
        3.0 * x * x - 2.0 * x * x * x
    });
}

#[test]
fn test_symbolic_inverse_fits() {
    // Exponential(2) through the solved inverse CDF
    let density = Density::parse("2*exp(-2*x)").unwrap();
    let inversion = invert_density(&density, Some(0.0)).unwrap();
    let inverse = inversion.unique().unwrap();

    let mut rng = VariateRng::from_seed(31);
    let draws = InverseTransform::default()
        .sample_user_inverse(&mut rng, N, inverse.expr(), &Clamp::unbounded())
        .unwrap();
    assert_fits("exp(2) (symbolic inverse)", &draws, |x| {
        1.0 - (-2.0 * x).exp()
    });
}

#[test]
fn test_selected_branch_fits() {
    // Two algebraic branches; the one inside [10, 20] must be picked
    let density = Density::parse("1.0/50.0 * (x - 10.0)").unwrap();
    let support = Support::new(10.0, 20.0).unwrap();
    let inversion = invert_density(&density, Some(10.0)).unwrap();
    let branch = inversion.select_branch(&support).unwrap();

    let mut rng = VariateRng::from_seed(8);
    let draws = InverseTransform::default()
        .sample_user_inverse(&mut rng, N, branch.expr(), &Clamp::unbounded())
        .unwrap();
    assert!(draws.iter().all(|&x| (10.0..=20.0).contains(&x)));
    assert_fits("triangular (selected branch)", &draws, |x| {
        (x - 10.0).powi(2) / 100.0
    });
}
