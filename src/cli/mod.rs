//! Command-line parsing for the power-law fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting code.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::domain::{DEFAULT_MAX_EVALUATIONS, Strategy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "powerfit",
    version,
    about = "Fit time = C·n^k to benchmark samples and plot the fit"
)]
pub struct Cli {
    #[command(flatten)]
    pub fit: FitArgs,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options for fitting and plotting.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Whitespace-delimited table: column 0 = n, column 1 = time.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Estimation strategy.
    #[arg(short, long, value_enum, default_value_t = Strategy::Nonlinear)]
    pub strategy: Strategy,

    /// Starting value of C for the nonlinear fit.
    #[arg(long, default_value_t = 1.0)]
    pub initial_c: f64,

    /// Starting value of k for the nonlinear fit.
    #[arg(long, default_value_t = 1.0)]
    pub initial_k: f64,

    /// Model evaluation budget for the nonlinear fit.
    #[arg(long, default_value_t = DEFAULT_MAX_EVALUATIONS)]
    pub max_evals: usize,

    /// Do not retry a failed nonlinear fit from the log-log estimate.
    #[arg(long)]
    pub no_reseed: bool,

    /// Print the parameters only; do not plot.
    #[arg(long, conflicts_with = "ascii")]
    pub no_plot: bool,

    /// Print an ASCII plot instead of opening the plot window.
    #[arg(long)]
    pub ascii: bool,

    /// ASCII plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// ASCII plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub height: usize,

    /// Also write the plot to an SVG file.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Export per-sample fitted values to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the fit (parameters + fitted values) to JSON.
    #[arg(long = "export-fit", value_name = "JSON")]
    pub export_fit: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_path_uses_defaults() {
        let cli = Cli::try_parse_from(["powerfit", "bench.txt"]).unwrap();
        assert_eq!(cli.fit.input, PathBuf::from("bench.txt"));
        assert_eq!(cli.fit.strategy, Strategy::Nonlinear);
        assert_eq!(cli.fit.max_evals, DEFAULT_MAX_EVALUATIONS);
        assert!(!cli.fit.no_reseed && !cli.fit.ascii && !cli.fit.no_plot);
        assert!(!cli.verbose);
    }

    #[test]
    fn strategy_accepts_both_spellings() {
        for name in ["loglog", "log-log"] {
            let cli = Cli::try_parse_from(["powerfit", "-s", name, "bench.txt"]).unwrap();
            assert_eq!(cli.fit.strategy, Strategy::LogLog);
        }
    }

    #[test]
    fn missing_path_is_an_error() {
        assert!(Cli::try_parse_from(["powerfit"]).is_err());
        assert!(Cli::try_parse_from(["powerfit", "a.txt", "--ascii", "--no-plot"]).is_err());
    }
}
