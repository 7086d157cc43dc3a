//! `powerfit` library crate.
//!
//! Fits `time = C·n^k` to measured `(n, time)` samples, either by nonlinear
//! least squares on the raw model or by linear regression in log-log space,
//! and renders the fit against the data.
//!
//! The binary (`powerfit`) is a thin wrapper around this library so that
//! the fitting core is testable without spawning processes or opening a
//! terminal.

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
