//! Variate CLI - Monte Carlo Random Variate Generation
//!
//! Command-line entry point for the variate workspace.
//!
//! # Commands
//!
//! - `variate lcg` - Print a mixed congruential sequence
//! - `variate accept-reject --density <f>` - Acceptance-rejection sampling
//! - `variate invert --density <f>` - Symbolic CDF and inverse CDF
//! - `variate inverse-transform --dist <name> | --inverse <q>` - Inverse-transform sampling
//!
//! # Configuration
//!
//! Settings are read from `variate.toml` (or `--config`), then `VARIATE_*`
//! environment variables, then command-line flags. Logs go to stderr so
//! that stdout carries only the report.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use variate_sampling::RecurrenceParams;

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::accept_reject::AcceptRejectArgs;
use commands::inverse_transform::InverseTransformArgs;
use commands::invert::InvertArgs;
use commands::OutputFormat;
use config::{build_config, CliOverrides};

/// Monte Carlo random variate generation
#[derive(Parser)]
#[command(name = "variate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (defaults to ./variate.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the random source
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Output format (json, table)
    #[arg(short, long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a mixed congruential sequence
    Lcg {
        /// Multiplier
        #[arg(short = 'a', long = "multiplier")]
        a: u64,

        /// Increment
        #[arg(short = 'i', long = "increment")]
        c: u64,

        /// Modulus
        #[arg(short = 'm', long = "modulus")]
        m: u64,

        /// Seed value of the recurrence
        #[arg(long)]
        x0: u64,

        /// Iteration cap
        #[arg(long, default_value = "1000")]
        max_iter: u64,

        /// Map values to (x + 0.5) / m
        #[arg(long)]
        normalised: bool,
    },

    /// Sample a density on [lower, upper] by acceptance-rejection
    AcceptReject {
        /// Density expression, e.g. "6*x*(1 - x)"
        #[arg(short, long)]
        density: String,

        /// Lower end of the support
        #[arg(long, allow_hyphen_values = true)]
        lower: f64,

        /// Upper end of the support
        #[arg(long, allow_hyphen_values = true)]
        upper: f64,

        /// Bound m >= max f; computed from the density when omitted
        #[arg(long)]
        bound: Option<f64>,

        /// Trials per variate
        #[arg(long, default_value = "10000")]
        max_trials: usize,

        /// Number of variates
        #[arg(short, long, default_value = "1")]
        n: usize,
    },

    /// Integrate a density and solve for its inverse CDF
    Invert {
        /// Density expression
        #[arg(short, long)]
        density: String,

        /// Lower integration limit
        #[arg(long, allow_hyphen_values = true)]
        lower: Option<f64>,

        /// Upper end of the support, selects among several branches
        #[arg(long, allow_hyphen_values = true)]
        upper: Option<f64>,

        /// Draw this many variates through the inverse
        #[arg(long)]
        samples: Option<usize>,
    },

    /// Sample by inverse transform
    InverseTransform {
        /// Catalogue distribution (norm, expon, gamma, ...)
        #[arg(long, conflicts_with = "inverse")]
        dist: Option<String>,

        /// Shape parameters, comma-delimited
        #[arg(long, allow_hyphen_values = true)]
        params: Option<String>,

        /// Location shift
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        loc: f64,

        /// Scale factor
        #[arg(long, default_value = "1")]
        scale: f64,

        /// Inverse CDF expression in r
        #[arg(long)]
        inverse: Option<String>,

        /// Discard variates below this value
        #[arg(long, allow_hyphen_values = true)]
        lower: Option<f64>,

        /// Discard variates above this value
        #[arg(long, allow_hyphen_values = true)]
        upper: Option<f64>,

        /// Number of variates
        #[arg(short, long, default_value = "10")]
        n: usize,

        /// Independent parallel streams
        #[arg(long)]
        streams: Option<usize>,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = build_config(&CliOverrides {
        config_file: cli.config.clone(),
        seed: cli.seed,
        verbose: cli.verbose,
    })?;
    init_tracing(settings.log_level.as_filter_str());
    debug!(?settings, "configuration loaded");

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let format: OutputFormat = cli.format.parse()?;
    let sampler = settings.sampler_config()?;

    match cli.command {
        Commands::Lcg {
            a,
            c,
            m,
            x0,
            max_iter,
            normalised,
        } => commands::lcg::run(RecurrenceParams::new(a, c, m, x0, max_iter), normalised, format),
        Commands::AcceptReject {
            density,
            lower,
            upper,
            bound,
            max_trials,
            n,
        } => commands::accept_reject::run(
            &AcceptRejectArgs {
                density,
                lower,
                upper,
                bound,
                max_trials,
                count: n,
            },
            &sampler,
            format,
        ),
        Commands::Invert {
            density,
            lower,
            upper,
            samples,
        } => commands::invert::run(
            &InvertArgs {
                density,
                lower,
                upper,
                samples,
            },
            &sampler,
            format,
        ),
        Commands::InverseTransform {
            dist,
            params,
            loc,
            scale,
            inverse,
            lower,
            upper,
            n,
            streams,
        } => commands::inverse_transform::run(
            &InverseTransformArgs {
                dist,
                params,
                loc,
                scale,
                inverse,
                lower,
                upper,
                n,
                streams,
            },
            &sampler,
            format,
        ),
    }
}
