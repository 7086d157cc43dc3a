//! Reporting utilities: fitted values and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{FitResult, Sample, SampleFit};
use crate::error::FitError;

/// Compute the fitted value and residual for each sample, in input order.
pub fn compute_fitted(samples: &[Sample], fit: &FitResult) -> Result<Vec<SampleFit>, FitError> {
    let mut out = Vec::with_capacity(samples.len());
    for (idx, s) in samples.iter().enumerate() {
        let time_fit = fit.predict(s.n);
        if !time_fit.is_finite() {
            return Err(FitError::invalid(format!(
                "{}: fitted value is not finite (n={})",
                s.location(idx),
                s.n
            )));
        }
        out.push(SampleFit {
            sample: *s,
            time_fit,
            residual: s.time - time_fit,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, Strategy};

    fn square_fit() -> FitResult {
        FitResult {
            strategy: Strategy::LogLog,
            c: 1.0,
            k: 2.0,
            quality: FitQuality {
                sse: 0.0,
                rmse: 0.0,
                r_squared_log: None,
                n: 0,
                iterations: 0,
                reseeded: false,
            },
        }
    }

    #[test]
    fn fitted_values_keep_input_order() {
        let samples = vec![Sample::new(3.0, 10.0), Sample::new(1.0, 1.0), Sample::new(2.0, 3.0)];
        let fits = compute_fitted(&samples, &square_fit()).unwrap();

        assert_eq!(fits.len(), 3);
        assert_eq!(fits[0].sample.n, 3.0);
        assert_eq!(fits[0].time_fit, 9.0);
        assert_eq!(fits[0].residual, 1.0);
        assert_eq!(fits[2].residual, -1.0);
    }

    #[test]
    fn overflowing_prediction_is_an_error() {
        let mut fit = square_fit();
        fit.k = 400.0;
        let err = compute_fitted(&[Sample::new(1e3, 1.0)], &fit).unwrap_err();
        assert!(err.to_string().contains("not finite"));
    }
}
