//! Power-law fitting.
//!
//! Responsibilities:
//!
//! - validate samples against each strategy's preconditions
//! - estimate `(C, k)` by log-log regression or nonlinear least squares
//! - compute fit diagnostics

pub mod fitter;
pub mod loglog;
pub mod nonlinear;

pub use fitter::*;
pub use loglog::*;
pub use nonlinear::*;
