//! Model evaluation for `time = C·n^k`.
//!
//! The fitters rely on three primitive operations:
//! - predict `time(n)` given `(C, k)` (for residuals/plots)
//! - build a Jacobian row of the raw model (for Levenberg–Marquardt)
//! - build a design row of the log-log line (for OLS)

/// Predict `time(n) = c·n^k`.
pub fn predict(c: f64, k: f64, n: f64) -> f64 {
    c * n.powf(k)
}

/// Fill `[∂f/∂C, ∂f/∂k]` at `n`.
///
/// # Panics
/// Panics if `out` has fewer than 2 elements.
pub fn fill_jacobian_row(c: f64, k: f64, n: f64, out: &mut [f64]) {
    let nk = n.powf(k);
    out[0] = nk;
    out[1] = c * nk * n.ln();
}

/// Fill the log-log design row `[1, ln n]` (intercept first).
///
/// # Panics
/// Panics if `out` has fewer than 2 elements.
pub fn fill_design_row(n: f64, out: &mut [f64]) {
    out[0] = 1.0;
    out[1] = n.ln();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_square_law() {
        assert_eq!(predict(1.0, 2.0, 4.0), 16.0);
        assert!((predict(0.5, 1.5, 9.0) - 13.5).abs() < 1e-12);
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let (c, k, n) = (2.0, 1.3, 7.0);
        let mut row = [0.0; 2];
        fill_jacobian_row(c, k, n, &mut row);

        let h = 1e-6;
        let dc = (predict(c + h, k, n) - predict(c - h, k, n)) / (2.0 * h);
        let dk = (predict(c, k + h, n) - predict(c, k - h, n)) / (2.0 * h);
        assert!((row[0] - dc).abs() < 1e-6);
        assert!((row[1] - dk).abs() < 1e-5);
    }
}
