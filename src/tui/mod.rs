//! Ratatui-based plot window.
//!
//! Shows the fitted curve over the samples, the fitted parameters and a legend.
//! `s` refits with the other strategy; `q` closes the window.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::{self, RunOutput};
use crate::domain::NonlinearOptions;
use crate::error::{AppError, EXIT_FIT};
use crate::plot::figure::{ACTUAL_LABEL, FITTED_LABEL, X_LABEL, Y_LABEL};
use crate::plot::{Figure, build_figure};
use crate::report::{format_fit_summary, format_general, format_stats};

mod plotters_chart;

use plotters_chart::{ACTUAL_COLOR, FITTED_COLOR, FigureChart, tui_color};

/// Open the window for a finished run and block until the user closes it.
pub fn run(run: RunOutput, options: NonlinearOptions) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_FIT, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(run, options);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_FIT, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_FIT, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    run: RunOutput,
    figure: Figure,
    options: NonlinearOptions,
    status: String,
}

impl App {
    fn new(run: RunOutput, options: NonlinearOptions) -> Self {
        let figure = build_figure(&run.fitted, &run.fit);
        Self {
            run,
            figure,
            options,
            status: "Ready.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_FIT, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_FIT, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_FIT, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the window should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('s') | KeyCode::Tab => self.switch_strategy(),
            _ => {}
        }
        false
    }

    fn switch_strategy(&mut self) {
        let next = self.run.fit.strategy.other();
        match pipeline::refit(&self.run, next, &self.options) {
            Ok(run) => {
                self.figure = build_figure(&run.fitted, &run.fit);
                self.run = run;
                self.status = format!("Refit with {}.", next.display_name());
            }
            Err(err) => {
                // Keep showing the previous fit; the failure is only a status message.
                self.status = format!("{} failed: {err}", next.display_name());
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let fit = &self.run.fit;
        let lines = vec![
            Line::from(vec![
                Span::styled("powerfit", Style::default().fg(Color::Cyan)),
                Span::raw(format!(
                    " | C = {} | n^{{{:.3}}}",
                    format_general(fit.c),
                    fit.k
                )),
            ]),
            Line::from(Span::styled(
                format_fit_summary(fit),
                Style::default().fg(Color::Gray),
            )),
            Line::from(vec![
                Span::styled("● ", Style::default().fg(tui_color(ACTUAL_COLOR))),
                Span::raw(format!("{ACTUAL_LABEL}   ")),
                Span::styled("── ", Style::default().fg(tui_color(FITTED_COLOR))),
                Span::raw(FITTED_LABEL),
                Span::styled(
                    format!("   {}", format_stats(&self.run.ingest.stats)),
                    Style::default().fg(Color::Gray),
                ),
            ]),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.figure.title.as_str()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = FigureChart {
            figure: &self.figure,
            fmt_x: fmt_axis,
            fmt_y: fmt_axis,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, self.figure.x_bounds, self.figure.y_bounds);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "s switch strategy  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn fmt_axis(v: f64) -> String {
    format_general(v)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 10,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format_general(x_val);
        let label_len = label.chars().count() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format_general(y_val);
        let label_len = label.chars().count() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(X_LABEL)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(Y_LABEL).style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_layout_reserves_axis_insets() {
        let inner = Rect::new(0, 0, 80, 30);
        let (rect, insets) = chart_layout(inner);
        assert!(insets.is_some());
        assert_eq!(rect, Rect::new(10, 1, 68, 27));
    }

    #[test]
    fn legend_colors_match_chart_series() {
        assert_eq!(tui_color(ACTUAL_COLOR), Color::Rgb(255, 255, 255));
        assert_eq!(tui_color(FITTED_COLOR), Color::Rgb(0, 255, 255));
    }

    #[test]
    fn chart_layout_falls_back_when_cramped() {
        let inner = Rect::new(0, 0, 20, 6);
        let (rect, insets) = chart_layout(inner);
        assert!(insets.is_none());
        assert_eq!(rect, inner);
    }
}
