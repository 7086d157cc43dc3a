//! Plotting.
//!
//! A `Figure` is a plain value built from the fitted samples; renderers take it
//! by reference and own no state of their own:
//!
//! - `ascii`: fixed-size character grid for stdout
//! - `svg`: Plotters SVG file with a legend
//! - `crate::tui`: the interactive terminal window

pub mod ascii;
pub mod figure;
pub mod svg;

pub use ascii::*;
pub use figure::*;
pub use svg::*;
