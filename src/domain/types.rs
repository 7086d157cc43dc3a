//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - handed to the renderers without any shared plotting state

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One measured benchmark observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Problem size.
    pub n: f64,
    /// Measured time (seconds).
    pub time: f64,
    /// 1-based line in the source table, if the sample was read from a file.
    pub line: Option<usize>,
}

impl Sample {
    pub fn new(n: f64, time: f64) -> Self {
        Self { n, time, line: None }
    }

    /// Human-readable location used in validation errors.
    pub fn location(&self, index: usize) -> String {
        match self.line {
            Some(line) => format!("line {line}"),
            None => format!("sample #{}", index + 1),
        }
    }
}

/// Estimation strategy for `time = C·n^k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Strategy {
    /// Levenberg–Marquardt on the raw model (natural time metric).
    #[serde(rename = "nonlinear")]
    #[value(name = "nonlinear")]
    Nonlinear,
    /// Ordinary least squares on `ln time = ln C + k·ln n`.
    #[serde(rename = "loglog")]
    #[value(name = "loglog", alias = "log-log")]
    LogLog,
}

impl Strategy {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Strategy::Nonlinear => "nonlinear least squares",
            Strategy::LogLog => "log-log regression",
        }
    }

    /// The other strategy (used by the plot window toggle).
    pub fn other(self) -> Strategy {
        match self {
            Strategy::Nonlinear => Strategy::LogLog,
            Strategy::LogLog => Strategy::Nonlinear,
        }
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    /// Sum of squared residuals in the natural time metric.
    pub sse: f64,
    pub rmse: f64,
    /// Coefficient of determination of the log-log line.
    ///
    /// `None` when some time is non-positive (only possible for the nonlinear strategy).
    pub r_squared_log: Option<f64>,
    pub n: usize,
    /// Solver iterations (0 for the closed-form strategy).
    pub iterations: usize,
    /// The nonlinear solver was restarted from the log-log estimate.
    pub reseeded: bool,
}

/// Fitted power law `time ≈ c·n^k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub strategy: Strategy,
    pub c: f64,
    pub k: f64,
    pub quality: FitQuality,
}

impl FitResult {
    /// Evaluate the fitted model at `n`.
    pub fn predict(&self, n: f64) -> f64 {
        crate::models::predict(self.c, self.k, n)
    }
}

/// Per-sample fitted value (used for plotting and exports).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleFit {
    pub sample: Sample,
    pub time_fit: f64,
    pub residual: f64,
}

/// Summary stats about the loaded samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub n_min: f64,
    pub n_max: f64,
    pub time_min: f64,
    pub time_max: f64,
}

/// Options for the Levenberg–Marquardt fitter.
#[derive(Debug, Clone, PartialEq)]
pub struct NonlinearOptions {
    /// Starting value for `C`.
    pub initial_c: f64,
    /// Starting value for `k`.
    pub initial_k: f64,
    /// Budget of model evaluations before giving up.
    pub max_evaluations: usize,
    /// Retry once from the log-log estimate when the first attempt does not converge.
    pub reseed: bool,
}

/// Default evaluation budget: `200 · (params + 1)` for two parameters.
pub const DEFAULT_MAX_EVALUATIONS: usize = 600;

impl Default for NonlinearOptions {
    fn default() -> Self {
        Self {
            initial_c: 1.0,
            initial_k: 1.0,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            reseed: true,
        }
    }
}

/// How (and whether) to show the fitted curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotMode {
    /// Interactive terminal window.
    Window,
    /// ASCII plot printed to stdout.
    Ascii,
    None,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input: PathBuf,
    pub strategy: Strategy,
    pub nonlinear: NonlinearOptions,

    pub plot: PlotMode,
    pub plot_width: usize,
    pub plot_height: usize,
    pub svg: Option<PathBuf>,

    pub export_results: Option<PathBuf>,
    pub export_fit: Option<PathBuf>,
}

/// A saved fit (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub input: PathBuf,
    pub fit: FitResult,
    pub grid: FitGrid,
}

/// Fitted values at the input `n`s, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitGrid {
    pub n: Vec<f64>,
    pub time: Vec<f64>,
    pub time_fit: Vec<f64>,
}
