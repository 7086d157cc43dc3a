//! Whitespace-delimited table ingest.
//!
//! This module is responsible for turning a benchmark log such as
//!
//! ```text
//! # n   time
//! 30    0.0012
//! 35    0.0019
//! ```
//!
//! into an ordered list of `Sample`s.
//!
//! Design goals:
//! - **Strict schema**: every row has the same column count (at least two),
//!   every field is numeric. Column 0 is `n`, column 1 is `time`; further
//!   columns are validated and ignored.
//! - **Fail loudly**: a bad row is an error pointing at its line, never skipped.
//! - **Separation of concerns**: positivity is a fitting precondition and is
//!   checked by the fitters, not here.

use std::fs;
use std::path::Path;

use crate::domain::{DatasetStats, Sample};
use crate::error::{AppError, EXIT_INPUT, FitError};

/// Ingest output: samples in file order + summary stats.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub samples: Vec<Sample>,
    pub stats: DatasetStats,
}

/// Read and parse the table at `path`.
pub fn load_samples(path: &Path) -> Result<IngestedData, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read '{}': {e}", path.display())))?;

    let (samples, columns) = parse_table(&text)?;
    let stats = compute_stats(&samples)
        .ok_or_else(|| AppError::from(FitError::invalid(format!("'{}' contains no samples", path.display()))))?;

    tracing::info!(
        path = %path.display(),
        samples = samples.len(),
        columns,
        "loaded samples"
    );

    Ok(IngestedData { samples, stats })
}

/// Parse table text into samples, returning the shared column count.
pub fn parse_table(text: &str) -> Result<(Vec<Sample>, usize), FitError> {
    let mut samples = Vec::new();
    let mut columns: Option<usize> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let content = content.trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<f64> = content
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|_| FitError::invalid(format!("line {line}: '{tok}' is not a number")))
            })
            .collect::<Result<_, _>>()?;

        match columns {
            None if fields.len() < 2 => {
                return Err(FitError::invalid(format!(
                    "line {line}: expected at least 2 columns (n, time), found {}",
                    fields.len()
                )));
            }
            None => columns = Some(fields.len()),
            Some(expected) if expected != fields.len() => {
                return Err(FitError::invalid(format!(
                    "line {line}: expected {expected} columns, found {}",
                    fields.len()
                )));
            }
            Some(_) => {}
        }

        samples.push(Sample {
            n: fields[0],
            time: fields[1],
            line: Some(line),
        });
    }

    Ok((samples, columns.unwrap_or(0)))
}

pub fn compute_stats(samples: &[Sample]) -> Option<DatasetStats> {
    if samples.is_empty() {
        return None;
    }
    let mut stats = DatasetStats {
        n_points: samples.len(),
        n_min: f64::INFINITY,
        n_max: f64::NEG_INFINITY,
        time_min: f64::INFINITY,
        time_max: f64::NEG_INFINITY,
    };
    for s in samples {
        stats.n_min = stats.n_min.min(s.n);
        stats.n_max = stats.n_max.max(s.n);
        stats.time_min = stats.time_min.min(s.time);
        stats.time_max = stats.time_max.max(s.time);
    }
    Some(stats)
}
