//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{DatasetStats, FitResult};

/// Significant digits used by [`format_general`] (C's default `%g` precision).
const GENERAL_PRECISION: i32 = 6;

/// The two result lines: `C = <%g>` and `n^{<k:.3>}`.
pub fn format_fit_lines(fit: &FitResult) -> String {
    format!("C = {}\nn^{{{:.3}}}", format_general(fit.c), fit.k)
}

/// One-line diagnostics summary (strategy, error, solver effort).
pub fn format_fit_summary(fit: &FitResult) -> String {
    let q = &fit.quality;
    let mut out = format!(
        "{} | time ≈ {}·n^{:.3} | rmse={} | n={}",
        fit.strategy.display_name(),
        format_general(fit.c),
        fit.k,
        format_general(q.rmse),
        q.n,
    );
    if let Some(r2) = q.r_squared_log {
        out.push_str(&format!(" | R²(log)={r2:.4}"));
    }
    if q.iterations > 0 {
        out.push_str(&format!(" | iters={}", q.iterations));
    }
    if q.reseeded {
        out.push_str(" | reseeded");
    }
    out
}

/// Dataset ranges as shown in plot headers.
pub fn format_stats(stats: &DatasetStats) -> String {
    format!(
        "samples={} | n=[{}, {}] | time=[{}, {}]s",
        stats.n_points,
        format_general(stats.n_min),
        format_general(stats.n_max),
        format_general(stats.time_min),
        format_general(stats.time_max),
    )
}

/// Format like C's `%g`: six significant digits, trailing zeros removed,
/// scientific notation when the exponent is below -4 or at least 6.
pub fn format_general(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the target precision first: the exponent after rounding decides the style.
    let sci = format!("{:.*e}", (GENERAL_PRECISION - 1) as usize, v);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    if exp < -4 || exp >= GENERAL_PRECISION {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", strip_trailing_zeros(mantissa), exp.abs())
    } else {
        let decimals = (GENERAL_PRECISION - 1 - exp) as usize;
        strip_trailing_zeros(&format!("{v:.decimals$}"))
    }
}

fn strip_trailing_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, Strategy};

    fn fit(c: f64, k: f64) -> FitResult {
        FitResult {
            strategy: Strategy::Nonlinear,
            c,
            k,
            quality: FitQuality {
                sse: 0.0,
                rmse: 0.0,
                r_squared_log: Some(0.99871),
                n: 11,
                iterations: 7,
                reseeded: false,
            },
        }
    }

    #[test]
    fn general_format_matches_printf() {
        let cases = [
            (1.0, "1"),
            (2.5, "2.5"),
            (100.0, "100"),
            (123456.0, "123456"),
            (1234567.0, "1.23457e+06"),
            (999999.5, "1e+06"),
            (0.0001234567, "0.000123457"),
            (0.00001, "1e-05"),
            (1.5e-9, "1.5e-09"),
            (-3.25e-7, "-3.25e-07"),
            (6.02214076e23, "6.02214e+23"),
            (0.0, "0"),
        ];
        for (v, expected) in cases {
            assert_eq!(format_general(v), expected, "value {v}");
        }
        assert_eq!(format_general(f64::INFINITY), "inf");
        assert_eq!(format_general(f64::NAN), "nan");
    }

    #[test]
    fn fit_lines_use_general_and_three_decimals() {
        assert_eq!(format_fit_lines(&fit(1.0, 2.0)), "C = 1\nn^{2.000}");
        assert_eq!(
            format_fit_lines(&fit(3.14159e-9, 2.71828)),
            "C = 3.14159e-09\nn^{2.718}"
        );
    }

    #[test]
    fn summary_mentions_strategy_and_diagnostics() {
        let line = format_fit_summary(&fit(0.5, 1.25));
        assert_eq!(
            line,
            "nonlinear least squares | time ≈ 0.5·n^1.250 | rmse=0 | n=11 | R²(log)=0.9987 | iters=7"
        );
    }
}
