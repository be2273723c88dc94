//! # Distribution Catalogue
//!
//! Named continuous distributions for inverse-transform sampling.
//!
//! Every entry is a standard form with zero or more shape parameters,
//! shifted and stretched by `loc` and `scale`:
//!
//! ```text
//! Q(u) = loc + scale * Q_std(u; shapes)
//! ```
//!
//! | Name | Shapes | Standard form |
//! |------|--------|---------------|
//! | `norm` | | N(0, 1) |
//! | `expon` | | Exp(1) |
//! | `uniform` | | U(0, 1) |
//! | `gamma` | `a` | Gamma(a, 1) |
//! | `beta` | `a`, `b` | Beta(a, b) |
//! | `lognorm` | `s` | exp(s * N(0, 1)) |
//! | `weibull_min` | `c` | Weibull(c, 1) |
//! | `cauchy` | | Cauchy(0, 1) |
//! | `t` | `df` | Student's t |
//! | `chi2` | `df` | χ² |
//! | `laplace` | | Laplace(0, 1) |
//! | `pareto` | `b` | Pareto(x_m = 1, b) |
//! | `triang` | `c` | triangular on [0, 1] with mode `c` |
//!
//! Parameters are validated by the `statrs` constructors. Quantiles with an
//! elementary closed form are computed directly; the rest use
//! `statrs`'s `inverse_cdf`.

use std::f64::consts::PI;
use std::fmt;

use statrs::distribution::{
    Beta, Cauchy, ChiSquared, ContinuousCDF, Exp, Gamma, Laplace, LogNormal, Normal, Pareto,
    StudentsT, Triangular, Uniform, Weibull,
};

use crate::error::SamplingError;

/// Names accepted by [`DistributionSpec`].
pub const CATALOG_NAMES: &[&str] = &[
    "norm",
    "expon",
    "uniform",
    "gamma",
    "beta",
    "lognorm",
    "weibull_min",
    "cauchy",
    "t",
    "chi2",
    "laplace",
    "pareto",
    "triang",
];

/// A catalogue distribution request: name, shapes, location and scale.
///
/// # Examples
///
/// ```rust
/// use variate_sampling::DistributionSpec;
///
/// let spec = DistributionSpec::new("expon", vec![]).with_scale(2.0);
/// let dist = spec.build().unwrap();
/// // Median of Exp(rate 1/2) is 2 ln 2
/// assert!((dist.quantile(0.5) - 2.0 * 2.0_f64.ln()).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistributionSpec {
    /// Catalogue name.
    pub name: String,
    /// Shape parameters, in catalogue order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shapes: Vec<f64>,
    /// Location shift.
    #[cfg_attr(feature = "serde", serde(default))]
    pub loc: f64,
    /// Scale factor (positive).
    #[cfg_attr(feature = "serde", serde(default = "unit_scale"))]
    pub scale: f64,
}

#[cfg(feature = "serde")]
fn unit_scale() -> f64 {
    1.0
}

impl DistributionSpec {
    /// Standard form (`loc = 0`, `scale = 1`) with the given shapes.
    pub fn new(name: impl Into<String>, shapes: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            shapes,
            loc: 0.0,
            scale: 1.0,
        }
    }

    /// Sets the location shift.
    pub fn with_loc(mut self, loc: f64) -> Self {
        self.loc = loc;
        self
    }

    /// Sets the scale factor.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Validates the request and constructs the distribution.
    ///
    /// # Errors
    ///
    /// [`SamplingError::Domain`] for an unknown name, a wrong number of
    /// shapes, invalid shape values, a non-finite `loc`, or a scale that is
    /// not positive and finite.
    pub fn build(&self) -> Result<CatalogDistribution, SamplingError> {
        if !self.loc.is_finite() {
            return Err(SamplingError::domain(format!("loc = {} must be finite", self.loc)));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SamplingError::domain(format!(
                "scale = {} must be positive and finite",
                self.scale
            )));
        }

        let standard = match self.name.as_str() {
            "norm" => {
                self.expect_shapes::<0>()?;
                Standard::Normal(checked(Normal::new(0.0, 1.0))?)
            }
            "expon" => {
                self.expect_shapes::<0>()?;
                Standard::Exponential(checked(Exp::new(1.0))?)
            }
            "uniform" => {
                self.expect_shapes::<0>()?;
                Standard::Uniform(checked(Uniform::new(0.0, 1.0))?)
            }
            "gamma" => {
                let [a] = self.expect_shapes::<1>()?;
                Standard::Gamma(checked(Gamma::new(a, 1.0))?)
            }
            "beta" => {
                let [a, b] = self.expect_shapes::<2>()?;
                Standard::Beta(checked(Beta::new(a, b))?)
            }
            "lognorm" => {
                let [s] = self.expect_shapes::<1>()?;
                Standard::LogNormal(checked(LogNormal::new(0.0, s))?)
            }
            "weibull_min" => {
                let [c] = self.expect_shapes::<1>()?;
                Standard::Weibull(checked(Weibull::new(c, 1.0))?, c)
            }
            "cauchy" => {
                self.expect_shapes::<0>()?;
                Standard::Cauchy(checked(Cauchy::new(0.0, 1.0))?)
            }
            "t" => {
                let [df] = self.expect_shapes::<1>()?;
                Standard::StudentsT(checked(StudentsT::new(0.0, 1.0, df))?)
            }
            "chi2" => {
                let [df] = self.expect_shapes::<1>()?;
                Standard::ChiSquared(checked(ChiSquared::new(df))?)
            }
            "laplace" => {
                self.expect_shapes::<0>()?;
                Standard::Laplace(checked(Laplace::new(0.0, 1.0))?)
            }
            "pareto" => {
                let [b] = self.expect_shapes::<1>()?;
                Standard::Pareto(checked(Pareto::new(1.0, b))?, b)
            }
            "triang" => {
                let [c] = self.expect_shapes::<1>()?;
                if !(0.0..=1.0).contains(&c) {
                    return Err(SamplingError::domain(format!(
                        "triang mode c = {} must lie in [0, 1]",
                        c
                    )));
                }
                Standard::Triangular(checked(Triangular::new(0.0, 1.0, c))?, c)
            }
            other => {
                return Err(SamplingError::domain(format!(
                    "unknown distribution '{}' (expected one of: {})",
                    other,
                    CATALOG_NAMES.join(", ")
                )))
            }
        };

        Ok(CatalogDistribution {
            spec: self.clone(),
            standard,
        })
    }

    fn expect_shapes<const N: usize>(&self) -> Result<[f64; N], SamplingError> {
        <[f64; N]>::try_from(self.shapes.as_slice()).map_err(|_| {
            SamplingError::domain(format!(
                "{} expects {} shape parameter(s), got {}",
                self.name,
                N,
                self.shapes.len()
            ))
        })
    }
}

impl fmt::Display for DistributionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for shape in &self.shapes {
            write!(f, "{}, ", shape)?;
        }
        write!(f, "loc={}, scale={})", self.loc, self.scale)
    }
}

fn checked<D, E: fmt::Display>(result: Result<D, E>) -> Result<D, SamplingError> {
    result.map_err(|e| SamplingError::domain(format!("invalid distribution parameters: {}", e)))
}

/// Standard forms; the extra `f64` caches the shape used by a closed-form
/// quantile.
#[derive(Clone, Debug)]
enum Standard {
    Normal(Normal),
    Exponential(Exp),
    Uniform(Uniform),
    Gamma(Gamma),
    Beta(Beta),
    LogNormal(LogNormal),
    Weibull(Weibull, f64),
    Cauchy(Cauchy),
    StudentsT(StudentsT),
    ChiSquared(ChiSquared),
    Laplace(Laplace),
    Pareto(Pareto, f64),
    Triangular(Triangular, f64),
}

impl Standard {
    fn quantile(&self, u: f64) -> f64 {
        match self {
            Standard::Exponential(_) => -(-u).ln_1p(),
            Standard::Uniform(_) => u,
            Standard::Weibull(_, c) => (-(-u).ln_1p()).powf(1.0 / c),
            Standard::Cauchy(_) => (PI * (u - 0.5)).tan(),
            Standard::Laplace(_) => {
                if u < 0.5 {
                    (2.0 * u).ln()
                } else {
                    -(2.0 * (1.0 - u)).ln()
                }
            }
            Standard::Pareto(_, b) => (1.0 - u).powf(-1.0 / b),
            Standard::Triangular(_, c) => {
                if u < *c {
                    (u * c).sqrt()
                } else {
                    1.0 - ((1.0 - u) * (1.0 - c)).sqrt()
                }
            }
            Standard::Normal(d) => d.inverse_cdf(u),
            Standard::Gamma(d) => d.inverse_cdf(u),
            Standard::Beta(d) => d.inverse_cdf(u),
            Standard::LogNormal(d) => d.inverse_cdf(u),
            Standard::StudentsT(d) => d.inverse_cdf(u),
            Standard::ChiSquared(d) => d.inverse_cdf(u),
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        match self {
            Standard::Normal(d) => d.cdf(x),
            Standard::Exponential(d) => d.cdf(x),
            Standard::Uniform(d) => d.cdf(x),
            Standard::Gamma(d) => d.cdf(x),
            Standard::Beta(d) => d.cdf(x),
            Standard::LogNormal(d) => d.cdf(x),
            Standard::Weibull(d, _) => d.cdf(x),
            Standard::Cauchy(d) => d.cdf(x),
            Standard::StudentsT(d) => d.cdf(x),
            Standard::ChiSquared(d) => d.cdf(x),
            Standard::Laplace(d) => d.cdf(x),
            Standard::Pareto(d, _) => d.cdf(x),
            Standard::Triangular(d, _) => d.cdf(x),
        }
    }
}

/// A validated catalogue distribution.
#[derive(Clone, Debug)]
pub struct CatalogDistribution {
    spec: DistributionSpec,
    standard: Standard,
}

impl CatalogDistribution {
    /// The request this distribution was built from.
    pub fn spec(&self) -> &DistributionSpec {
        &self.spec
    }

    /// Quantile function `Q(u) = loc + scale * Q_std(u)`.
    ///
    /// Returns a non-finite value at levels where the quantile diverges
    /// (e.g. `u = 0` for `norm`) and NaN outside `[0, 1]`.
    #[inline]
    pub fn quantile(&self, u: f64) -> f64 {
        if !(0.0..=1.0).contains(&u) {
            return f64::NAN;
        }
        self.spec.loc + self.spec.scale * self.standard.quantile(u)
    }

    /// Cumulative distribution function.
    pub fn cdf(&self, x: f64) -> f64 {
        self.standard.cdf((x - self.spec.loc) / self.spec.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::LN_2;

    fn build(name: &str, shapes: &[f64]) -> CatalogDistribution {
        DistributionSpec::new(name, shapes.to_vec()).build().unwrap()
    }

    #[test]
    fn test_every_catalog_name_builds() {
        let shapes: &[(&str, &[f64])] = &[
            ("norm", &[]),
            ("expon", &[]),
            ("uniform", &[]),
            ("gamma", &[2.0]),
            ("beta", &[2.0, 3.0]),
            ("lognorm", &[0.5]),
            ("weibull_min", &[1.5]),
            ("cauchy", &[]),
            ("t", &[5.0]),
            ("chi2", &[3.0]),
            ("laplace", &[]),
            ("pareto", &[3.0]),
            ("triang", &[0.3]),
        ];
        assert_eq!(shapes.len(), CATALOG_NAMES.len());
        for (name, params) in shapes {
            let dist = build(name, params);
            let median = dist.quantile(0.5);
            assert!(median.is_finite(), "{} median not finite", name);
            assert_relative_eq!(dist.cdf(median), 0.5, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_closed_form_quantiles() {
        let cases: &[(&str, &[f64], f64, f64)] = &[
            ("expon", &[], 0.5, LN_2),
            ("uniform", &[], 0.3, 0.3),
            ("cauchy", &[], 0.75, 1.0),
            ("laplace", &[], 0.25, -LN_2),
            ("pareto", &[2.0], 0.75, 2.0),
            ("triang", &[0.5], 0.5, 0.5),
            ("weibull_min", &[1.0], 0.5, LN_2),
        ];
        for (name, shapes, u, expected) in cases {
            assert_relative_eq!(build(name, shapes).quantile(*u), *expected, epsilon = 1e-12);
        }
        assert!(build("expon", &[]).quantile(1.5).is_nan());
    }

    #[test]
    fn test_normal_quantile() {
        let dist = build("norm", &[]);
        assert_relative_eq!(dist.quantile(0.5), 0.0, epsilon = 1e-9);
        assert_relative_eq!(dist.quantile(0.975), 1.959964, epsilon = 1e-5);
        assert!(dist.quantile(0.0).is_infinite());
    }

    #[test]
    fn test_loc_and_scale() {
        let dist = DistributionSpec::new("uniform", vec![])
            .with_loc(2.0)
            .with_scale(3.0)
            .build()
            .unwrap();
        assert_relative_eq!(dist.quantile(0.0), 2.0);
        assert_relative_eq!(dist.quantile(1.0), 5.0);
        assert_relative_eq!(dist.cdf(3.5), 0.5);
    }

    #[test]
    fn test_unknown_name() {
        let err = DistributionSpec::new("zipf", vec![]).build().unwrap_err();
        assert!(matches!(err, SamplingError::Domain(_)));
        assert!(err.to_string().contains("zipf"));
    }

    #[test]
    fn test_wrong_shape_count() {
        let err = DistributionSpec::new("gamma", vec![]).build().unwrap_err();
        assert!(err.to_string().contains("expects 1 shape parameter(s), got 0"));
        assert!(DistributionSpec::new("norm", vec![1.0]).build().is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(DistributionSpec::new("gamma", vec![-1.0]).build().is_err());
        assert!(DistributionSpec::new("triang", vec![1.5]).build().is_err());
        assert!(DistributionSpec::new("norm", vec![]).with_scale(0.0).build().is_err());
        assert!(DistributionSpec::new("norm", vec![]).with_loc(f64::NAN).build().is_err());
    }

    #[test]
    fn test_display() {
        let spec = DistributionSpec::new("gamma", vec![2.0]).with_scale(0.5);
        assert_eq!(spec.to_string(), "gamma(2, loc=0, scale=0.5)");
    }
}
