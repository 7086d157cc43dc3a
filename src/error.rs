//! Error types.
//!
//! - `FitError` is what the library returns: typed, matchable, no exit codes.
//! - `AppError` is what the binary returns: a message plus the process exit code.

use thiserror::Error;

/// Exit code for malformed input and file I/O failures.
pub const EXIT_INPUT: u8 = 2;

/// Exit code for solver and terminal failures.
pub const EXIT_FIT: u8 = 4;

/// Errors produced while loading samples or fitting a power law.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Malformed or insufficient input data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The nonlinear optimizer exhausted its budget without converging.
    #[error(
        "fit did not converge after {iterations} iterations ({evaluations} evaluations, last SSE {last_sse:e})"
    )]
    DidNotConverge {
        iterations: usize,
        evaluations: usize,
        last_sse: f64,
    },
}

impl FitError {
    pub fn invalid(message: impl Into<String>) -> Self {
        FitError::InvalidInput(message.into())
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let exit_code = match err {
            FitError::InvalidInput(_) => EXIT_INPUT,
            FitError::DidNotConverge { .. } => EXIT_FIT,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_errors_map_to_exit_codes() {
        let invalid: AppError = FitError::invalid("need at least 2 samples").into();
        assert_eq!(invalid.exit_code(), EXIT_INPUT);
        assert_eq!(invalid.to_string(), "invalid input: need at least 2 samples");

        let stuck: AppError = FitError::DidNotConverge {
            iterations: 10,
            evaluations: 600,
            last_sse: 1.5,
        }
        .into();
        assert_eq!(stuck.exit_code(), EXIT_FIT);
        assert!(stuck.to_string().starts_with("fit did not converge after 10 iterations"));
    }
}
