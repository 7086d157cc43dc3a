//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input observations (`Sample`) and their summary (`DatasetStats`)
//! - the strategy selector (`Strategy`) and solver options
//! - fit outputs (`FitResult`, `FitQuality`, `SampleFit`)

pub mod types;

pub use types::*;
