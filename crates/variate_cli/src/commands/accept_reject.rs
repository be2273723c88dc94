//! Accept-reject command implementation
//!
//! Draws variates from a density on a bounded support with the
//! acceptance-rejection method.

use serde::Serialize;
use tracing::{info, warn};
use variate_sampling::{
    Acceptance, AcceptanceRejection, Density, SamplerConfig, SamplingError, Support, VariateRng,
};

use super::{emit, OutputFormat, Report};
use crate::Result;

/// Arguments of the accept-reject command
#[derive(Debug, Clone)]
pub struct AcceptRejectArgs {
    pub density: String,
    pub lower: f64,
    pub upper: f64,
    /// Explicit bound; computed from the density when absent
    pub bound: Option<f64>,
    pub max_trials: usize,
    pub count: usize,
}

/// Accepted variates
#[derive(Debug, Serialize)]
pub struct AcceptRejectReport {
    pub density: String,
    pub support: [f64; 2],
    pub bound: f64,
    pub bound_computed: bool,
    pub seed: u64,
    pub samples: Vec<Acceptance>,
    /// Requests whose trial budget ran out (computed bound only)
    pub exhausted: usize,
}

impl AcceptRejectReport {
    /// Fraction of trials that were accepted
    pub fn acceptance_rate(&self) -> f64 {
        let trials: usize = self.samples.iter().map(|s| s.trials).sum();
        if trials == 0 {
            0.0
        } else {
            self.samples.len() as f64 / trials as f64
        }
    }
}

impl Report for AcceptRejectReport {
    fn table(&self) -> String {
        let mut out = format!(
            "f(x) = {} on [{}, {}], m = {}{}\n",
            self.density,
            self.support[0],
            self.support[1],
            self.bound,
            if self.bound_computed { " (computed)" } else { "" }
        );
        out.push_str(&format!("{:>8}  {:>22}  {:>22}  {:>8}\n", "#", "x", "f(x)", "trials"));
        for (i, s) in self.samples.iter().enumerate() {
            out.push_str(&format!(
                "{:>8}  {:>22}  {:>22}  {:>8}\n",
                i, s.candidate, s.density, s.trials
            ));
        }
        out.push_str(&format!(
            "accepted {} of {} requested, acceptance rate {:.4}\n",
            self.samples.len(),
            self.samples.len() + self.exhausted,
            self.acceptance_rate()
        ));
        out
    }
}

/// Builds the accept-reject report
pub fn execute(args: &AcceptRejectArgs, config: &SamplerConfig) -> Result<AcceptRejectReport> {
    let density = Density::parse(&args.density)?;
    let support = Support::new(args.lower, args.upper)?;
    let sampler = AcceptanceRejection::new(config.clone());
    let mut rng = VariateRng::from_config(config);

    let (bound, bound_computed) = match args.bound {
        Some(bound) => (bound, false),
        None => (sampler.supremum(&support, &density)?, true),
    };

    let mut samples = Vec::with_capacity(args.count);
    let mut exhausted = 0usize;
    for _ in 0..args.count {
        match sampler.sample_with_bound(&mut rng, bound, &support, &density, args.max_trials) {
            Ok(accepted) => samples.push(accepted),
            Err(SamplingError::Exhausted { trials }) if bound_computed => {
                warn!(trials, "no candidate accepted");
                exhausted += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(AcceptRejectReport {
        density: density.to_string(),
        support: [support.lower(), support.upper()],
        bound,
        bound_computed,
        seed: rng.seed(),
        samples,
        exhausted,
    })
}

/// Run the accept-reject command
pub fn run(args: &AcceptRejectArgs, config: &SamplerConfig, format: OutputFormat) -> Result<()> {
    info!("Starting acceptance-rejection sampling...");
    info!("  Density: {}", args.density);
    let report = execute(args, config)?;
    info!("Sampling complete (seed {})", report.seed);
    emit(&report, format)
}
