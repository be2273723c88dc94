//! Invert command implementation
//!
//! Integrates a density, solves for its quantile function and optionally
//! samples through it.

use serde::Serialize;
use tracing::info;
use variate_sampling::{
    invert_density, Clamp, Density, InverseBranch, InverseTransform, SamplerConfig, Support,
    VariateRng,
};

use super::{emit, value_table, OutputFormat, Report};
use crate::{CliError, Result};

/// Arguments of the invert command
#[derive(Debug, Clone, Default)]
pub struct InvertArgs {
    pub density: String,
    /// Lower integration limit; the antiderivative is used when absent
    pub lower: Option<f64>,
    /// Upper end of the support, used to select among several branches
    pub upper: Option<f64>,
    /// Number of variates to draw through the inverse
    pub samples: Option<usize>,
}

/// One solution of `F(x) = r`
#[derive(Debug, Serialize)]
pub struct BranchReport {
    pub kind: String,
    pub inverse: String,
}

impl From<&InverseBranch> for BranchReport {
    fn from(branch: &InverseBranch) -> Self {
        Self {
            kind: branch.kind().to_string(),
            inverse: branch.expr().to_string(),
        }
    }
}

/// Symbolic inversion result
#[derive(Debug, Serialize)]
pub struct InvertReport {
    pub density: String,
    pub variable: String,
    pub level: String,
    pub cdf: String,
    pub branches: Vec<BranchReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<BranchReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<f64>>,
}

impl Report for InvertReport {
    fn table(&self) -> String {
        let mut out = format!("f({}) = {}\n", self.variable, self.density);
        out.push_str(&format!("F({}) = {}\n", self.variable, self.cdf));
        for branch in &self.branches {
            out.push_str(&format!(
                "Q({}) = {}   [{}]\n",
                self.level, branch.inverse, branch.kind
            ));
        }
        if let Some(selected) = &self.selected {
            out.push_str(&format!("selected: {} ({})\n", selected.inverse, selected.kind));
        }
        if let Some(samples) = &self.samples {
            out.push_str(&value_table(&self.variable, samples));
        }
        out
    }
}

/// Builds the invert report
pub fn execute(args: &InvertArgs, config: &SamplerConfig) -> Result<InvertReport> {
    let density = Density::parse(&args.density)?;
    let inversion = invert_density(&density, args.lower)?;

    let support = match (args.lower, args.upper) {
        (Some(lower), Some(upper)) => Some(Support::new(lower, upper)?),
        (None, Some(_)) => {
            return Err(CliError::InvalidArgument(
                "--upper requires --lower".to_string(),
            ))
        }
        _ => None,
    };

    let selected = match &support {
        Some(support) => Some(inversion.select_branch(support)?),
        None => None,
    };

    let samples = match args.samples {
        Some(n) => {
            let quantile = match selected {
                Some(branch) => branch,
                None => inversion.unique()?,
            };
            let clamp = match &support {
                Some(s) => Clamp::new(Some(s.lower()), Some(s.upper()))?,
                None => Clamp::unbounded(),
            };
            let mut rng = VariateRng::from_config(config);
            info!("Drawing {} variates (seed {})", n, rng.seed());
            let sampler = InverseTransform::new(config.clone());
            Some(sampler.sample_quantile(&mut rng, n, |r| quantile.eval(r), &clamp)?)
        }
        None => None,
    };

    Ok(InvertReport {
        density: density.to_string(),
        variable: inversion.variable().to_string(),
        level: inversion.level().to_string(),
        cdf: inversion.cdf().to_string(),
        branches: inversion.branches().iter().map(BranchReport::from).collect(),
        selected: selected.map(BranchReport::from),
        samples,
    })
}

/// Run the invert command
pub fn run(args: &InvertArgs, config: &SamplerConfig, format: OutputFormat) -> Result<()> {
    info!("Inverting density {}", args.density);
    let report = execute(args, config)?;
    emit(&report, format)
}
