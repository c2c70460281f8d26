//! Statistical note detection on the logarithmic grid.
//!
//! A cell counts as a note when its log power exceeds
//! `median + k * stddev` of the whole grid and the lower edge of its log bin
//! lies within ±1% of a catalog note.

use crate::catalog::NoteCatalog;
use crate::grid::{DetectedNote, NoteGrid};
use notefall_analysis::PowerWaterfall;

/// Linear amplitude estimate for a log-compressed power value.
///
/// `10^(p - 3)` for positive `p`, otherwise 0. The offset keeps resynthesized
/// amplitudes in a usable range; it does not undo the `log10(|X| + 2)`
/// compression exactly.
pub fn amplitude_from_log_power(log_power: f64) -> f64 {
    if log_power > 0.0 {
        10f64.powf(log_power - 3.0)
    } else {
        0.0
    }
}

/// Maps thresholded waterfall cells to catalog notes
#[derive(Debug, Clone, Copy)]
pub struct NoteDetector<'a> {
    catalog: &'a NoteCatalog,
}

impl<'a> NoteDetector<'a> {
    /// Detector backed by `catalog`
    pub fn new(catalog: &'a NoteCatalog) -> Self {
        Self { catalog }
    }

    /// Catalog used for lookups
    pub fn catalog(&self) -> &'a NoteCatalog {
        self.catalog
    }

    /// Log-power level a cell must exceed for `threshold_std_devs`
    pub fn threshold(waterfall: &PowerWaterfall, threshold_std_devs: f64) -> f64 {
        waterfall.median_log_power() + threshold_std_devs * waterfall.std_dev_log_power()
    }

    /// Detect notes in every chunk of `waterfall`.
    ///
    /// Only cells strictly above the threshold count, so a NaN
    /// `threshold_std_devs` detects nothing. Cells over the threshold whose
    /// frequency has no catalog match are dropped without a trace.
    pub fn detect(&self, waterfall: &PowerWaterfall, threshold_std_devs: f64) -> NoteGrid {
        let threshold = Self::threshold(waterfall, threshold_std_devs);
        let bin_freqs: Vec<f64> = waterfall
            .log_frequencies()
            .iter()
            .map(|&l| 10f64.powf(l))
            .collect();
        let mut grid = NoteGrid::for_waterfall(waterfall);

        #[cfg(feature = "tracing")]
        if threshold.is_nan() {
            tracing::warn!(threshold_std_devs, "detection threshold is NaN, no cell can pass");
        }

        #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
        let misses: usize = waterfall
            .log_spectra()
            .iter()
            .enumerate()
            .map(|(chunk, row)| self.detect_row(&mut grid, chunk, row, &bin_freqs, threshold))
            .sum();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            threshold,
            detected = grid.note_count(),
            misses,
            "note detection finished"
        );

        grid
    }

    /// Record the notes of one chunk; returns the cells over the threshold
    /// that matched no catalog note.
    fn detect_row(
        &self,
        grid: &mut NoteGrid,
        chunk: usize,
        row: &[f64],
        bin_freqs: &[f64],
        threshold: f64,
    ) -> usize {
        let mut misses = 0;
        for (&power, &freq) in row.iter().zip(bin_freqs) {
            if power > threshold {
                match self.catalog.lookup_nearest(freq) {
                    Some(note) => grid.push(DetectedNote::new(
                        *note,
                        amplitude_from_log_power(power),
                        chunk,
                    )),
                    None => misses += 1,
                }
            }
        }
        misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notefall_analysis::WaterfallParams;

    #[test]
    fn test_amplitude_mapping() {
        assert!((amplitude_from_log_power(3.0) - 1.0).abs() < 1e-12);
        assert!((amplitude_from_log_power(5.0) - 100.0).abs() < 1e-9);
        assert_eq!(amplitude_from_log_power(0.0), 0.0);
        assert_eq!(amplitude_from_log_power(-0.5), 0.0);
    }

    #[test]
    fn test_unreachable_threshold_detects_nothing() {
        let samples: Vec<i16> = (0..4096)
            .map(|i| ((i as f64 * 0.37).sin() * 9000.0) as i16)
            .collect();
        let params = WaterfallParams::new(8000.0, 256, 48, 110.0, 1760.0);
        let waterfall = PowerWaterfall::new(&samples, &params).unwrap();
        let catalog = NoteCatalog::standard();

        let grid = NoteDetector::new(&catalog).detect(&waterfall, 1000.0);
        assert_eq!(grid.len(), waterfall.num_chunks());
        assert_eq!(grid.note_count(), 0);
    }

    #[test]
    fn test_row_hits_and_misses() {
        let catalog = NoteCatalog::standard();
        let detector = NoteDetector::new(&catalog);
        let mut grid = NoteGrid::new(vec![0.0, 0.1, 0.2], 0.1);

        // A4 over the threshold, 450 Hz over it but between notes,
        // C4 under it, and an over-threshold bin off both ends of the catalog.
        let freqs = [440.0, 450.0, 261.63, 20.0, 6000.0];
        let row = [5.0, 5.0, 1.0, 4.0, 4.0];
        let misses = detector.detect_row(&mut grid, 1, &row, &freqs, 2.0);

        assert_eq!(misses, 3);
        assert_eq!(grid.note_count(), 1);
        assert!(grid.notes_at(0).unwrap().is_empty());
        assert!(grid.notes_at(2).unwrap().is_empty());

        let hit = grid.notes_at(1).unwrap()[0];
        assert_eq!(hit.note.full_name(), "A4");
        assert_eq!(hit.chunk, 1);
        assert!((hit.amplitude - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_row_threshold_is_strict() {
        let catalog = NoteCatalog::standard();
        let mut grid = NoteGrid::new(vec![0.0], 0.1);
        let misses = NoteDetector::new(&catalog).detect_row(&mut grid, 0, &[2.0], &[440.0], 2.0);
        assert_eq!(misses, 0);
        assert_eq!(grid.note_count(), 0);
    }

    #[test]
    fn test_nan_threshold_detects_nothing() {
        let samples = vec![0i16; 4096];
        let params = WaterfallParams::new(8000.0, 256, 48, 110.0, 1760.0);
        let waterfall = PowerWaterfall::new(&samples, &params).unwrap();
        let catalog = NoteCatalog::standard();
        let detector = NoteDetector::new(&catalog);

        let grid = detector.detect(&waterfall, f64::NAN);
        assert_eq!(grid.len(), waterfall.num_chunks());
        assert_eq!(grid.note_count(), 0);
    }

    #[test]
    fn test_threshold_uses_cached_statistics() {
        let samples: Vec<i16> = (0..4096).map(|i| ((i % 17) as i16 - 8) * 300).collect();
        let params = WaterfallParams::new(8000.0, 256, 48, 110.0, 1760.0);
        let waterfall = PowerWaterfall::new(&samples, &params).unwrap();

        let t = NoteDetector::threshold(&waterfall, 2.0);
        let expected = waterfall.median_log_power() + 2.0 * waterfall.std_dev_log_power();
        assert_eq!(t, expected);
    }
}
