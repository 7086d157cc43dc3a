//! SVG rendering via Plotters.
//!
//! Draws the same figure as the terminal window but with proper markers and a
//! legend, for sharing or embedding in reports.

use std::path::Path;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::error::{AppError, EXIT_INPUT};
use crate::plot::figure::{ACTUAL_LABEL, FITTED_LABEL, Figure, X_LABEL, Y_LABEL};

/// Default SVG size in pixels.
pub const SVG_SIZE: (u32, u32) = (800, 600);

/// Write `figure` to an SVG file.
pub fn write_svg(figure: &Figure, path: &Path, size: (u32, u32)) -> Result<(), AppError> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    draw_figure(&root, figure)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to render SVG '{}': {e}", path.display())))?;

    tracing::info!(path = %path.display(), "wrote SVG plot");
    Ok(())
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let [x0, x1] = figure.x_bounds;
    let [y0, y1] = figure.y_bounds;

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", 18))
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .draw()?;

    let actual_style = BLUE.stroke_width(1);
    let fitted_style = RED.stroke_width(2);

    chart
        .draw_series(
            figure
                .actual
                .iter()
                .map(|&(x, y)| Cross::new((x, y), 4, actual_style)),
        )?
        .label(ACTUAL_LABEL)
        .legend(move |(x, y)| Cross::new((x, y), 4, actual_style));

    chart
        .draw_series(LineSeries::new(figure.fitted.iter().copied(), fitted_style))?
        .label(FITTED_LABEL)
        .legend(move |(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], fitted_style));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
