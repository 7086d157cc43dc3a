//! Plotters-powered fit chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::Figure;
use crate::plot::figure::{X_LABEL, Y_LABEL};

/// Series colors, shared with the legend line in the window header.
pub const ACTUAL_COLOR: RGBColor = WHITE;
pub const FITTED_COLOR: RGBColor = RGBColor(0, 255, 255); // cyan

/// The same color as a Ratatui style color.
pub fn tui_color(color: RGBColor) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

/// A render-only chart over a prepared `Figure`.
pub struct FigureChart<'a> {
    pub figure: &'a Figure,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for FigureChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.figure.x_bounds;
        let [y0, y1] = self.figure.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let figure = self.figure;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(X_LABEL)
                .y_desc(Y_LABEL)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // 1) Fitted curve line.
            chart.draw_series(LineSeries::new(figure.fitted.iter().copied(), &FITTED_COLOR))?;

            // 2) Actual samples.
            //
            // `Cross`/`Circle` markers are sized in pixels, which the ratatui backend
            // maps onto normalized canvas units and blows up. A `Pixel` gives a clean
            // dot that reliably sits on top of the line.
            chart.draw_series(
                figure
                    .actual
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), ACTUAL_COLOR)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
