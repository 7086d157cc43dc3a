//! The fitting contract shared by both strategies.
//!
//! Given an ordered slice of samples, a fitter returns `(C, k)` for
//! `time ≈ C·n^k` plus quality diagnostics. Strategies differ only in how
//! they estimate the parameters; validation and diagnostics live here.

use crate::domain::{FitQuality, NonlinearOptions, Sample, Strategy};
use crate::domain::FitResult;
use crate::error::FitError;
use crate::fit::{LogLogFitter, NonlinearFitter};
use crate::math::r_squared;
use crate::models::predict;

/// A power-law estimation strategy.
pub trait PowerLawFitter {
    fn strategy(&self) -> Strategy;

    /// Fit `time ≈ C·n^k` to `samples`.
    fn fit(&self, samples: &[Sample]) -> Result<FitResult, FitError>;
}

/// Build the fitter for `strategy`.
pub fn fitter_for(strategy: Strategy, options: &NonlinearOptions) -> Box<dyn PowerLawFitter> {
    match strategy {
        Strategy::Nonlinear => Box::new(NonlinearFitter::new(options.clone())),
        Strategy::LogLog => Box::new(LogLogFitter),
    }
}

/// Fit `samples` with the selected strategy.
pub fn fit_samples(
    samples: &[Sample],
    strategy: Strategy,
    options: &NonlinearOptions,
) -> Result<FitResult, FitError> {
    let fit = fitter_for(strategy, options).fit(samples)?;
    tracing::debug!(
        strategy = ?fit.strategy,
        c = fit.c,
        k = fit.k,
        sse = fit.quality.sse,
        iterations = fit.quality.iterations,
        "power law fitted"
    );
    Ok(fit)
}

/// Check the preconditions common to both strategies.
///
/// `positive_time` additionally requires every time to be `> 0` (needed to
/// take logarithms).
pub(crate) fn validate_samples(samples: &[Sample], positive_time: bool) -> Result<(), FitError> {
    if samples.len() < 2 {
        return Err(FitError::invalid(format!(
            "need at least 2 samples, got {}",
            samples.len()
        )));
    }

    for (idx, s) in samples.iter().enumerate() {
        if !s.n.is_finite() || !s.time.is_finite() {
            return Err(FitError::invalid(format!(
                "{}: non-finite value (n={}, time={})",
                s.location(idx),
                s.n,
                s.time
            )));
        }
        if s.n <= 0.0 {
            return Err(FitError::invalid(format!(
                "{}: n must be > 0, got {}",
                s.location(idx),
                s.n
            )));
        }
        if positive_time && s.time <= 0.0 {
            return Err(FitError::invalid(format!(
                "{}: time must be > 0 for log-log regression, got {}",
                s.location(idx),
                s.time
            )));
        }
    }

    let first_n = samples[0].n;
    if samples.iter().all(|s| s.n == first_n) {
        return Err(FitError::invalid(
            "need at least 2 distinct n values to determine an exponent",
        ));
    }

    Ok(())
}

/// Diagnostics for a fitted `(c, k)`.
pub(crate) fn compute_quality(
    samples: &[Sample],
    c: f64,
    k: f64,
    iterations: usize,
    reseeded: bool,
) -> FitQuality {
    let sse: f64 = samples
        .iter()
        .map(|s| {
            let r = s.time - predict(c, k, s.n);
            r * r
        })
        .sum();
    let n = samples.len();
    let rmse = (sse / n as f64).sqrt();

    let r_squared_log = if c > 0.0 && samples.iter().all(|s| s.time > 0.0) {
        let ln_time: Vec<f64> = samples.iter().map(|s| s.time.ln()).collect();
        let ln_fit: Vec<f64> = samples.iter().map(|s| c.ln() + k * s.n.ln()).collect();
        r_squared(&ln_time, &ln_fit)
    } else {
        None
    };

    FitQuality {
        sse,
        rmse,
        r_squared_log,
        n,
        iterations,
        reseeded,
    }
}
