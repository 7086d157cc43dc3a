//! Export per-sample results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::SampleFit;
use crate::error::{AppError, EXIT_INPUT};

/// Write `n,time,time_fit,residual` rows in input order.
pub fn write_results_csv(path: &Path, fits: &[SampleFit]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "n,time,time_fit,residual")
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV header: {e}")))?;

    for f in fits {
        writeln!(
            out,
            "{},{:e},{:e},{:e}",
            f.sample.n, f.sample.time, f.time_fit, f.residual
        )
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to flush export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = fits.len(), "wrote results CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sample;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let fits = vec![
            SampleFit {
                sample: Sample::new(2.0, 4.0),
                time_fit: 4.0,
                residual: 0.0,
            },
            SampleFit {
                sample: Sample::new(3.0, 9.5),
                time_fit: 9.0,
                residual: 0.5,
            },
        ];

        write_results_csv(&path, &fits).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "n,time,time_fit,residual\n2,4e0,4e0,0e0\n3,9.5e0,9e0,5e-1\n");
    }
}
