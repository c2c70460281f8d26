//! Export formats for waterfalls.
//!
//! - PGM grayscale images of the normalized power grid
//! - Tab-delimited dump of a single logarithmic spectrum

use crate::error::{AnalysisError, Result};
use crate::waterfall::PowerWaterfall;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Which grid of a waterfall to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridScale {
    /// Linear frequency bins
    #[default]
    Linear,
    /// Logarithmic frequency bins
    Log,
}

/// Fixed-width numeric cell used by all tab-delimited outputs: `%014.4f`.
///
/// ```rust
/// use notefall_analysis::export::format_fixed;
///
/// assert_eq!(format_fixed(440.0), "000000440.0000");
/// assert_eq!(format_fixed(-1.5), "-00000001.5000");
/// ```
pub fn format_fixed(value: f64) -> String {
    format!("{:014.4}", value)
}

/// Write the waterfall as an ASCII PGM (P2) image.
///
/// Time runs along X, frequency along Y with low frequencies at the bottom.
/// Pixel values are the normalized [0, 1] grid scaled to 0-255.
pub fn write_waterfall_pgm<W: Write>(
    waterfall: &PowerWaterfall,
    scale: GridScale,
    mut out: W,
) -> Result<()> {
    let grid = match scale {
        GridScale::Linear => waterfall.normalized_power_grid(),
        GridScale::Log => waterfall.normalized_log_power_grid(),
    };
    let width = grid.len();
    let height = grid.first().map_or(0, Vec::len);

    writeln!(out, "P2")?;
    writeln!(out, "# Waterfall export from notefall-analysis")?;
    writeln!(out, "# Width: {} chunks, Height: {} bins", width, height)?;
    writeln!(out, "{} {}", width, height)?;
    writeln!(out, "255")?;

    for bin in (0..height).rev() {
        let row: Vec<String> = grid
            .iter()
            .map(|chunk| ((chunk[bin] * 255.0).round() as u8).to_string())
            .collect();
        writeln!(out, "{}", row.join(" "))?;
    }

    out.flush()?;
    Ok(())
}

/// Export the waterfall to a PGM file.
///
/// # Example
///
/// ```rust,ignore
/// use notefall_analysis::export::{export_waterfall_pgm, GridScale};
///
/// export_waterfall_pgm(&waterfall, GridScale::Linear, "waterfall.pgm")?;
/// ```
pub fn export_waterfall_pgm(
    waterfall: &PowerWaterfall,
    scale: GridScale,
    path: impl AsRef<Path>,
) -> Result<()> {
    let file = File::create(path)?;
    write_waterfall_pgm(waterfall, scale, BufWriter::new(file))
}

/// Write one chunk's logarithmic spectrum as `Frequency\tPower` rows.
///
/// Frequencies are the lower bin edges in Hz.
pub fn write_log_spectrum_tsv<W: Write>(
    waterfall: &PowerWaterfall,
    chunk: usize,
    mut out: W,
) -> Result<()> {
    let spectrum = waterfall.log_spectrum(chunk).ok_or_else(|| {
        AnalysisError::invalid(format!(
            "chunk {chunk} out of range ({} chunks)",
            waterfall.num_chunks()
        ))
    })?;

    writeln!(out, "Frequency\tPower")?;
    for (&log_freq, &power) in waterfall.log_frequencies().iter().zip(spectrum) {
        writeln!(
            out,
            "{}\t{}",
            format_fixed(10f64.powf(log_freq)),
            format_fixed(power)
        )?;
    }

    out.flush()?;
    Ok(())
}

/// Export one chunk's logarithmic spectrum to a file.
pub fn export_log_spectrum_tsv(
    waterfall: &PowerWaterfall,
    chunk: usize,
    path: impl AsRef<Path>,
) -> Result<()> {
    let file = File::create(path)?;
    write_log_spectrum_tsv(waterfall, chunk, BufWriter::new(file))
}
