//! Render-independent chart description.

use crate::domain::{FitResult, SampleFit};
use crate::report::format_general;

pub const X_LABEL: &str = "n";
pub const Y_LABEL: &str = "time [s]";
pub const ACTUAL_LABEL: &str = "actual";
pub const FITTED_LABEL: &str = "fitted";

/// Actual vs fitted time over `n`.
///
/// Both series keep the input order of the samples; the fitted series is drawn
/// as a line through the fitted value at each input `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub actual: Vec<(f64, f64)>,
    pub fitted: Vec<(f64, f64)>,
    /// Data range of `n` (unpadded).
    pub x_bounds: [f64; 2],
    /// Range of both series, padded by 5%.
    pub y_bounds: [f64; 2],
}

/// Build the figure for a fit.
pub fn build_figure(fits: &[SampleFit], fit: &FitResult) -> Figure {
    let actual: Vec<(f64, f64)> = fits.iter().map(|f| (f.sample.n, f.sample.time)).collect();
    let fitted: Vec<(f64, f64)> = fits.iter().map(|f| (f.sample.n, f.time_fit)).collect();

    let (x_min, x_max) = range(actual.iter().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(actual.iter().chain(fitted.iter()).map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    Figure {
        title: format!(
            "time ≈ {}·n^{:.3} ({})",
            format_general(fit.c),
            fit.k,
            fit.strategy.display_name()
        ),
        actual,
        fitted,
        x_bounds: [x_min, x_max],
        y_bounds: [y_min, y_max],
    }
}

/// Min/max of finite values; `None` if there are none or they are all equal.
fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else if min.is_finite() {
        Some((min - 0.5, max + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sample;
    use crate::fit::{LogLogFitter, PowerLawFitter};
    use crate::report::compute_fitted;

    #[test]
    fn figure_keeps_input_order_and_pads_y() {
        let samples = vec![Sample::new(4.0, 16.0), Sample::new(1.0, 1.0), Sample::new(2.0, 4.0)];
        let fit = LogLogFitter.fit(&samples).unwrap();
        let fits = compute_fitted(&samples, &fit).unwrap();
        let fig = build_figure(&fits, &fit);

        assert_eq!(fig.actual[0], (4.0, 16.0));
        assert_eq!(fig.fitted.len(), 3);
        assert_eq!(fig.x_bounds, [1.0, 4.0]);
        assert!((fig.y_bounds[0] - 0.25).abs() < 1e-9);
        assert!((fig.y_bounds[1] - 16.75).abs() < 1e-9);
        assert_eq!(fig.title, "time ≈ 1·n^2.000 (log-log regression)");
    }

    #[test]
    fn degenerate_range_is_widened() {
        assert_eq!(range([2.0, 2.0].into_iter()), Some((1.5, 2.5)));
        assert_eq!(range(std::iter::empty()), None);
    }
}
