//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads samples and fits the power law
//! - prints the parameters
//! - writes optional exports
//! - shows the plot (window, ASCII, or nothing)

use std::io::IsTerminal;

use clap::Parser;

use crate::cli::{Cli, FitArgs};
use crate::domain::{FitConfig, NonlinearOptions, PlotMode};
use crate::error::AppError;

pub mod logging;
pub mod pipeline;

/// Entry point for the `powerfit` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let config = fit_config_from_args(&cli.fit);
    handle_fit(&config)
}

fn handle_fit(config: &FitConfig) -> Result<(), AppError> {
    let run = pipeline::run_fit(config)?;

    println!("{}", crate::report::format_fit_lines(&run.fit));

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::write_results_csv(path, &run.fitted)?;
    }
    if let Some(path) = &config.export_fit {
        crate::io::write_fit_json(path, &config.input, &run.fit, &run.fitted)?;
    }

    let figure = crate::plot::build_figure(&run.fitted, &run.fit);
    if let Some(path) = &config.svg {
        crate::plot::write_svg(&figure, path, crate::plot::SVG_SIZE)?;
    }

    match resolve_plot_mode(config.plot, std::io::stdout().is_terminal()) {
        PlotMode::Window => crate::tui::run(run, config.nonlinear.clone()),
        PlotMode::Ascii => {
            print!(
                "{}",
                crate::plot::render_ascii_plot(&figure, config.plot_width, config.plot_height)
            );
            Ok(())
        }
        PlotMode::None => Ok(()),
    }
}

/// The window needs a terminal; when stdout is piped we fall back to ASCII.
fn resolve_plot_mode(requested: PlotMode, stdout_is_terminal: bool) -> PlotMode {
    match requested {
        PlotMode::Window if !stdout_is_terminal => {
            tracing::warn!("stdout is not a terminal; printing an ASCII plot instead of opening the window");
            PlotMode::Ascii
        }
        other => other,
    }
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    let plot = if args.no_plot {
        PlotMode::None
    } else if args.ascii {
        PlotMode::Ascii
    } else {
        PlotMode::Window
    };

    FitConfig {
        input: args.input.clone(),
        strategy: args.strategy,
        nonlinear: NonlinearOptions {
            initial_c: args.initial_c,
            initial_k: args.initial_k,
            max_evaluations: args.max_evals,
            reseed: !args.no_reseed,
        },
        plot,
        plot_width: args.width,
        plot_height: args.height,
        svg: args.svg.clone(),
        export_results: args.export.clone(),
        export_fit: args.export_fit.clone(),
    }
}
