//! Shared "fit pipeline" logic used by both the CLI and the plot window.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load table -> fit -> fitted values
//!
//! The front-ends can then focus on presentation (printing vs widgets).

use crate::domain::{FitConfig, FitResult, NonlinearOptions, SampleFit, Strategy};
use crate::error::AppError;
use crate::fit::fit_samples;
use crate::io::ingest::{IngestedData, load_samples};
use crate::report::{compute_fitted, format_fit_summary};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub fit: FitResult,
    pub fitted: Vec<SampleFit>,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let ingest = load_samples(&config.input)?;
    fit_ingested(ingest, config.strategy, &config.nonlinear)
}

/// Refit already-loaded samples with another strategy.
pub fn refit(run: &RunOutput, strategy: Strategy, options: &NonlinearOptions) -> Result<RunOutput, AppError> {
    fit_ingested(run.ingest.clone(), strategy, options)
}

fn fit_ingested(ingest: IngestedData, strategy: Strategy, options: &NonlinearOptions) -> Result<RunOutput, AppError> {
    let fit = fit_samples(&ingest.samples, strategy, options)?;
    let fitted = compute_fitted(&ingest.samples, &fit)?;
    tracing::info!(summary = %format_fit_summary(&fit), "fit complete");

    Ok(RunOutput { ingest, fit, fitted })
}
