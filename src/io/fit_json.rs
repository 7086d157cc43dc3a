//! Write fit JSON files.
//!
//! Fit JSON is the portable representation of a run:
//! - strategy + parameters (`c`, `k`) + quality diagnostics
//! - the input path
//! - fitted values at every input `n`, in input order
//!
//! The schema is defined by `domain::FitFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{FitFile, FitGrid, FitResult, SampleFit};
use crate::error::{AppError, EXIT_INPUT};

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, input: &Path, fit: &FitResult, fits: &[SampleFit]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create fit JSON '{}': {e}", path.display())))?;

    let doc = FitFile {
        tool: env!("CARGO_PKG_NAME").to_string(),
        input: input.to_path_buf(),
        fit: fit.clone(),
        grid: FitGrid {
            n: fits.iter().map(|f| f.sample.n).collect(),
            time: fits.iter().map(|f| f.sample.time).collect(),
            time_fit: fits.iter().map(|f| f.time_fit).collect(),
        },
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write fit JSON: {e}")))?;

    tracing::info!(path = %path.display(), "wrote fit JSON");
    Ok(())
}
