//! Log-log linear regression.
//!
//! `ln time = ln C + k·ln n` is linear in `ln n`, so one OLS solve gives both
//! parameters. Deterministic and closed-form; it weights relative (not
//! absolute) errors equally.

use nalgebra::{DMatrix, DVector};

use crate::domain::{FitResult, Sample, Strategy};
use crate::error::FitError;
use crate::fit::fitter::{PowerLawFitter, compute_quality, validate_samples};
use crate::math::solve_least_squares;
use crate::models::fill_design_row;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogFitter;

impl PowerLawFitter for LogLogFitter {
    fn strategy(&self) -> Strategy {
        Strategy::LogLog
    }

    fn fit(&self, samples: &[Sample]) -> Result<FitResult, FitError> {
        validate_samples(samples, true)?;
        let (ln_c, k) = log_log_line(samples)?;
        let c = ln_c.exp();

        Ok(FitResult {
            strategy: Strategy::LogLog,
            c,
            k,
            quality: compute_quality(samples, c, k, 0, false),
        })
    }
}

/// Fit `(intercept, slope)` of the log-log line.
///
/// Callers must have validated that every `n` and `time` is positive.
pub(crate) fn log_log_line(samples: &[Sample]) -> Result<(f64, f64), FitError> {
    let n = samples.len();
    let mut x = DMatrix::<f64>::zeros(n, 2);
    let mut y = DVector::<f64>::zeros(n);
    let mut row = [0.0; 2];

    for (i, s) in samples.iter().enumerate() {
        fill_design_row(s.n, &mut row);
        x[(i, 0)] = row[0];
        x[(i, 1)] = row[1];
        y[i] = s.time.ln();
    }

    let beta = solve_least_squares(&x, &y)
        .ok_or_else(|| FitError::invalid("log-log system is singular (are all n equal?)"))?;
    Ok((beta[0], beta[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(c: f64, k: f64, ns: &[f64]) -> Vec<Sample> {
        ns.iter().map(|&n| Sample::new(n, c * n.powf(k))).collect()
    }

    fn rel_err(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn recovers_exact_power_law() {
        let ns = [3.0, 10.0, 30.0, 100.0, 300.0, 1000.0];
        let fit = LogLogFitter.fit(&exact(4.2e-7, 2.75, &ns)).unwrap();
        assert!(rel_err(fit.c, 4.2e-7) < 1e-6, "c = {}", fit.c);
        assert!(rel_err(fit.k, 2.75) < 1e-6, "k = {}", fit.k);
        assert_eq!(fit.quality.iterations, 0);
        assert!(!fit.quality.reseeded);
    }

    #[test]
    fn square_law_scenario() {
        let samples = exact(1.0, 2.0, &[1.0, 2.0, 4.0, 8.0]);
        let fit = LogLogFitter.fit(&samples).unwrap();
        assert!((fit.k - 2.0).abs() < 1e-9);
        assert!((fit.c - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rescaling_time_scales_c_only() {
        let samples: Vec<Sample> = [(5.0, 0.8), (10.0, 3.1), (20.0, 13.0), (40.0, 49.0), (80.0, 210.0)]
            .iter()
            .map(|&(n, t)| Sample::new(n, t))
            .collect();
        let lambda = 1e-3;
        let scaled: Vec<Sample> = samples.iter().map(|s| Sample::new(s.n, s.time * lambda)).collect();

        let base = LogLogFitter.fit(&samples).unwrap();
        let fit = LogLogFitter.fit(&scaled).unwrap();
        assert!((fit.k - base.k).abs() < 1e-9);
        assert!(rel_err(fit.c, base.c * lambda) < 1e-9);
    }

    #[test]
    fn two_points_give_the_line_through_them() {
        let samples = vec![Sample::new(2.0, 3.0), Sample::new(5.0, 11.0)];
        let fit = LogLogFitter.fit(&samples).unwrap();

        let k = (11.0f64.ln() - 3.0f64.ln()) / (5.0f64.ln() - 2.0f64.ln());
        let b = 3.0f64.ln() - k * 2.0f64.ln();
        assert!((fit.k - k).abs() < 1e-12);
        assert!((fit.c.ln() - b).abs() < 1e-12);
        assert!(rel_err(fit.predict(2.0), 3.0) < 1e-12);
        assert!(rel_err(fit.predict(5.0), 11.0) < 1e-12);
    }

    #[test]
    fn non_positive_time_is_invalid() {
        for bad in [0.0, -1.5] {
            let samples = vec![Sample::new(1.0, 1.0), Sample::new(2.0, bad), Sample::new(3.0, 9.0)];
            let err = LogLogFitter.fit(&samples).unwrap_err();
            assert!(matches!(err, FitError::InvalidInput(_)));
            assert!(err.to_string().contains("sample #2"), "{err}");
        }
    }
}
