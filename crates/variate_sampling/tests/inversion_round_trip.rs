//! Density → CDF → inverse round trips through the sampling API.

use approx::assert_relative_eq;
use variate_sampling::{
    invert_density, sample_user_inverse, Clamp, Density, SamplingError, Support, VariateRng,
};

#[test]
fn test_uniform_density_inverse_is_affine() {
    for (a, b) in [(2.0, 5.0), (-1.0, 1.0), (0.0, 10.0)] {
        let density = Density::parse(&format!("1/({} - ({}))", b, a)).unwrap();
        let inversion = invert_density(&density, Some(a)).unwrap();
        let inverse = inversion.unique().unwrap();
        for r in [0.0, 0.125, 0.5, 0.9, 1.0] {
            assert_relative_eq!(inverse.eval(r), a + r * (b - a), epsilon = 1e-10);
        }
    }
}

#[test]
fn test_cdf_of_inverse_is_identity() {
    let cases = [
        ("3*x^2", 0.0, 1.0),
        ("2*x", 0.0, 1.0),
        ("(x + 1)/2", -1.0, 1.0),
        ("sin(x)/2", 0.0, std::f64::consts::PI),
        ("exp(x)/(exp(1) - 1)", 0.0, 1.0),
    ];
    for (text, a, b) in cases {
        let density = Density::parse(text).unwrap();
        let support = Support::new(a, b).unwrap();
        let inversion = invert_density(&density, Some(a)).unwrap();
        let quantile = inversion.select_branch(&support).unwrap();

        for r in [0.05, 0.25, 0.5, 0.75, 0.95] {
            let x = quantile.eval(r);
            let level = inversion.cdf().eval_at("x", x).unwrap();
            assert_relative_eq!(level, r, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_ambiguous_inverse_is_reported() {
    let density = Density::parse("2*x").unwrap();
    let inversion = invert_density(&density, None).unwrap();
    assert_eq!(
        inversion.unique().unwrap_err(),
        SamplingError::AmbiguousInverse { branches: 2 }
    );
}

#[test]
fn test_failures_are_errors_not_empty_results() {
    let gaussian = Density::parse("exp(-x^2/2)").unwrap();
    assert!(matches!(
        invert_density(&gaussian, Some(0.0)),
        Err(SamplingError::Inversion(_))
    ));
}

#[test]
fn test_odd_degree_cdf_inverse_covers_negative_half() {
    // F(x) = (x^3 + 1)/2 on [-1, 1], Q(r) = cbrt(2r - 1)
    let density = Density::parse("1.5*x^2").unwrap();
    let support = Support::new(-1.0, 1.0).unwrap();
    let inversion = invert_density(&density, Some(-1.0)).unwrap();
    let quantile = inversion.select_branch(&support).unwrap();

    for r in [0.05, 0.25, 0.5, 0.75, 0.95] {
        assert_relative_eq!(quantile.eval(r), (2.0 * r - 1.0).cbrt(), epsilon = 1e-12);
    }

    let mut rng = VariateRng::from_seed(17);
    let draws =
        sample_user_inverse(&mut rng, 1_000, quantile.expr(), &Clamp::unbounded()).unwrap();
    let negative = draws.iter().filter(|&&x| x < 0.0).count();
    assert!((400..=600).contains(&negative), "negative draws: {}", negative);
}
