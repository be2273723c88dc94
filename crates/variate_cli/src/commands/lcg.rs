//! Lcg command implementation
//!
//! Prints the sequence of a mixed congruential generator.

use serde::Serialize;
use tracing::info;
use variate_sampling::{generate_sequence, generate_uniform_sequence, RecurrenceParams};

use super::{emit, value_table, OutputFormat, Report};
use crate::Result;

/// Generated sequence together with its parameters
#[derive(Debug, Serialize)]
pub struct LcgReport {
    pub params: RecurrenceParams,
    /// Whether the recurrence returned to the seed
    pub closed_cycle: bool,
    pub values: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniforms: Option<Vec<f64>>,
}

impl Report for LcgReport {
    fn table(&self) -> String {
        let p = &self.params;
        let mut out = format!(
            "x(n+1) = ({} * x(n) + {}) mod {}, x0 = {}\n",
            p.a, p.c, p.m, p.x0
        );
        match &self.uniforms {
            Some(uniforms) => out.push_str(&value_table("u", uniforms)),
            None => out.push_str(&value_table("x", &self.values)),
        }
        out.push_str(&format!(
            "{} values, {}\n",
            self.values.len(),
            if self.closed_cycle { "cycle closed" } else { "stopped at max_iter" }
        ));
        out
    }
}

/// Builds the lcg report
pub fn execute(params: RecurrenceParams, normalised: bool) -> Result<LcgReport> {
    let values = generate_sequence(&params)?;
    let uniforms = if normalised {
        Some(generate_uniform_sequence(&params)?)
    } else {
        None
    };
    Ok(LcgReport {
        params,
        closed_cycle: values.last() == Some(&params.x0),
        values,
        uniforms,
    })
}

/// Run the lcg command
pub fn run(params: RecurrenceParams, normalised: bool, format: OutputFormat) -> Result<()> {
    info!("Generating congruential sequence...");
    let report = execute(params, normalised)?;
    emit(&report, format)
}
