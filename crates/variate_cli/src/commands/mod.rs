//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands build a
//! serialisable report in `execute` and print it in `run`.

pub mod accept_reject;
pub mod inverse_transform;
pub mod invert;
pub mod lcg;

use serde::Serialize;
use std::str::FromStr;

use crate::{CliError, Result};

/// Output formats for command reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown output format: {}. Supported: json, table",
                other
            ))),
        }
    }
}

/// A command result that can be printed in every output format
pub trait Report: Serialize {
    /// Plain-text rendering
    fn table(&self) -> String;
}

/// Renders a report in the requested format
pub fn render<R: Report>(report: &R, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Table => Ok(report.table()),
    }
}

/// Prints a report to stdout
pub fn emit<R: Report>(report: &R, format: OutputFormat) -> Result<()> {
    println!("{}", render(report, format)?);
    Ok(())
}

/// One value per line, right-aligned under an index column
fn value_table<T: std::fmt::Display>(header: &str, values: &[T]) -> String {
    let mut out = format!("{:>8}  {}\n", "#", header);
    for (i, value) in values.iter().enumerate() {
        out.push_str(&format!("{:>8}  {}\n", i, value));
    }
    out
}

/// Splits a comma-delimited list of numbers
pub fn parse_list(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<f64>().map_err(|_| {
                CliError::InvalidArgument(format!("'{}' is not a number", item))
            })
        })
        .collect()
}
