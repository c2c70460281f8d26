//! Overlapping-window power waterfall
//!
//! A [`PowerWaterfall`] slices a sample buffer into windows of `chunk_size`
//! samples advancing by `chunk_size / 4`, transforms each window, and keeps
//! two grids per chunk:
//!
//! - a linear grid of `chunk_size / 2` bins holding `log10(|X| + 2)`, ordered
//!   by ascending frequency, with `freq[j] = j * sample_rate / (2 * chunk_size)`
//! - a logarithmic grid of `num_freq_log` bins equally spaced in `log10(f)`
//!   over `[freq_min, freq_max)`, filled by averaging the linear bins that fall
//!   inside each log bin
//!
//! Median and standard deviation of the logarithmic grid are computed on first
//! access and cached.

use crate::error::{AnalysisError, Result};
use crate::fft::{Fft, is_power_of_two, magnitudes};
use crate::stats::{RunningRange, mean_std_dev, upper_median};
use std::sync::OnceLock;

/// Smallest accepted chunk size.
pub const MIN_CHUNK_SIZE: usize = 8;

/// Construction parameters for a [`PowerWaterfall`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterfallParams {
    /// Input sample rate in Hz
    pub sample_rate: f64,
    /// Window length in samples (power of two, at least 8)
    pub chunk_size: usize,
    /// Number of logarithmic frequency bins
    pub num_freq_log: usize,
    /// Lower edge of the logarithmic axis in Hz
    pub freq_min: f64,
    /// Upper edge of the logarithmic axis in Hz (exclusive)
    pub freq_max: f64,
}

impl WaterfallParams {
    /// Bundle parameters; call [`validate`](Self::validate) or pass to
    /// [`PowerWaterfall::new`] to check them.
    pub fn new(
        sample_rate: f64,
        chunk_size: usize,
        num_freq_log: usize,
        freq_min: f64,
        freq_max: f64,
    ) -> Self {
        Self {
            sample_rate,
            chunk_size,
            num_freq_log,
            freq_min,
            freq_max,
        }
    }

    /// Check every constraint, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(AnalysisError::invalid(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if !is_power_of_two(self.chunk_size) || self.chunk_size < MIN_CHUNK_SIZE {
            return Err(AnalysisError::invalid(format!(
                "chunk size must be a power of two >= {MIN_CHUNK_SIZE}, got {}",
                self.chunk_size
            )));
        }
        if self.num_freq_log == 0 {
            return Err(AnalysisError::invalid(
                "number of log frequency bins must be nonzero",
            ));
        }
        if !(self.freq_min.is_finite() && self.freq_min > 0.0) {
            return Err(AnalysisError::invalid(format!(
                "minimum frequency must be a positive, nonzero number, got {}",
                self.freq_min
            )));
        }
        if !(self.freq_max.is_finite() && self.freq_max > self.freq_min) {
            return Err(AnalysisError::invalid(format!(
                "maximum frequency {} must exceed minimum frequency {}",
                self.freq_max, self.freq_min
            )));
        }
        Ok(())
    }

    /// Samples between consecutive windows
    pub fn hop_size(&self) -> usize {
        self.chunk_size / 4
    }

    /// Number of windows produced for `len` samples: `4 * floor(len / chunk_size) + 1`
    pub fn num_chunks(&self, len: usize) -> usize {
        4 * (len / self.chunk_size) + 1
    }
}

/// Equally spaced axis in log10(Hz).
#[derive(Debug, Clone)]
struct LogAxis {
    min_log: f64,
    delta: f64,
    edges: Vec<f64>,
}

impl LogAxis {
    fn new(freq_min: f64, freq_max: f64, bins: usize) -> Self {
        let min_log = freq_min.log10();
        let delta = (freq_max.log10() - min_log) / bins as f64;
        let edges = (0..bins).map(|j| j as f64 * delta + min_log).collect();
        Self {
            min_log,
            delta,
            edges,
        }
    }

    /// Log bin containing `freq`, if inside the axis
    fn bin_of(&self, freq: f64) -> Option<usize> {
        let pos = ((freq.log10() - self.min_log) / self.delta).floor();
        if pos >= 0.0 && pos < self.edges.len() as f64 {
            Some(pos as usize)
        } else {
            None
        }
    }
}

/// Time-frequency power grid with a logarithmic companion grid
#[derive(Debug, Clone)]
pub struct PowerWaterfall {
    params: WaterfallParams,
    /// `[chunk][linear_bin]`, log10-compressed magnitude
    spectra: Vec<Vec<f64>>,
    /// `[chunk][log_bin]`
    spectra_log: Vec<Vec<f64>>,
    freq: Vec<f64>,
    freq_log: Vec<f64>,
    time: Vec<f64>,
    power: RunningRange,
    log_power: RunningRange,
    median_log_power: OnceLock<f64>,
    std_dev_log_power: OnceLock<f64>,
}

impl PowerWaterfall {
    /// Build the waterfall for `samples`.
    ///
    /// Fails with [`AnalysisError::InvalidArgument`] when `params` violates
    /// a constraint; nothing is computed in that case.
    pub fn new(samples: &[i16], params: &WaterfallParams) -> Result<Self> {
        params.validate()?;

        let chunk_size = params.chunk_size;
        let spectra_size = chunk_size / 2;
        let hop = params.hop_size();
        let num_chunks = params.num_chunks(samples.len());
        let fft = Fft::new(chunk_size)?;

        let freq: Vec<f64> = (0..spectra_size)
            .map(|j| j as f64 * params.sample_rate / (spectra_size as f64 * 4.0))
            .collect();
        let axis = LogAxis::new(params.freq_min, params.freq_max, params.num_freq_log);

        let mut spectra = Vec::with_capacity(num_chunks);
        let mut spectra_log = Vec::with_capacity(num_chunks);
        let mut time = Vec::with_capacity(num_chunks);
        let mut power = RunningRange::new();
        let mut log_power = RunningRange::new();
        let mut window = vec![0.0; chunk_size];

        for chunk in 0..num_chunks {
            let start = chunk * hop;
            time.push(start as f64 / params.sample_rate);

            for (j, slot) in window.iter_mut().enumerate() {
                *slot = samples.get(start + j).map_or(0.0, |&s| f64::from(s));
            }
            let mags = magnitudes(&fft.forward(&window));

            // Even outputs walk up from DC, odd outputs walk down from the
            // top of the FFT (the mirrored negative frequencies).
            let row: Vec<f64> = (0..spectra_size)
                .map(|j| {
                    let mag = if j % 2 == 0 {
                        mags[j / 2]
                    } else {
                        mags[chunk_size - 1 - j / 2]
                    };
                    let compressed = (mag + 2.0).log10();
                    power.observe(compressed);
                    compressed
                })
                .collect();

            spectra_log.push(rebin_log(&row, &freq, &axis, &mut log_power));
            spectra.push(row);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            num_chunks,
            chunk_size,
            num_freq_log = params.num_freq_log,
            min_power = power.min(),
            max_power = power.max(),
            "waterfall built"
        );

        Ok(Self {
            params: *params,
            spectra,
            spectra_log,
            freq,
            freq_log: axis.edges,
            time,
            power,
            log_power,
            median_log_power: OnceLock::new(),
            std_dev_log_power: OnceLock::new(),
        })
    }

    /// Parameters the waterfall was built with
    pub fn params(&self) -> &WaterfallParams {
        &self.params
    }

    /// Window length in samples
    pub fn chunk_size(&self) -> usize {
        self.params.chunk_size
    }

    /// Number of linear bins per chunk (`chunk_size / 2`)
    pub fn spectra_size(&self) -> usize {
        self.params.chunk_size / 2
    }

    /// Number of logarithmic bins per chunk
    pub fn num_freq_log(&self) -> usize {
        self.params.num_freq_log
    }

    /// Number of chunks (time steps)
    pub fn num_chunks(&self) -> usize {
        self.spectra.len()
    }

    /// Samples between chunks
    pub fn hop_size(&self) -> usize {
        self.params.hop_size()
    }

    /// Seconds between chunks
    pub fn hop_duration(&self) -> f64 {
        self.params.hop_size() as f64 / self.params.sample_rate
    }

    /// Input sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.params.sample_rate
    }

    /// Linear spectrum of one chunk
    pub fn spectrum(&self, chunk: usize) -> Option<&[f64]> {
        self.spectra.get(chunk).map(Vec::as_slice)
    }

    /// Logarithmic spectrum of one chunk
    pub fn log_spectrum(&self, chunk: usize) -> Option<&[f64]> {
        self.spectra_log.get(chunk).map(Vec::as_slice)
    }

    /// All linear spectra, `[chunk][bin]`
    pub fn spectra(&self) -> &[Vec<f64>] {
        &self.spectra
    }

    /// All logarithmic spectra, `[chunk][log_bin]`
    pub fn log_spectra(&self) -> &[Vec<f64>] {
        &self.spectra_log
    }

    /// Log power at a specific chunk and log bin
    pub fn get_log(&self, chunk: usize, bin: usize) -> Option<f64> {
        self.spectra_log.get(chunk).and_then(|r| r.get(bin)).copied()
    }

    /// Linear frequency axis in Hz
    pub fn frequencies(&self) -> &[f64] {
        &self.freq
    }

    /// Logarithmic axis, in log10(Hz), one lower edge per bin
    pub fn log_frequencies(&self) -> &[f64] {
        &self.freq_log
    }

    /// Lower edge of log bin `bin` converted back to Hz
    pub fn log_bin_frequency(&self, bin: usize) -> Option<f64> {
        self.freq_log.get(bin).map(|&l| 10f64.powf(l))
    }

    /// Start time of every chunk in seconds
    pub fn times(&self) -> &[f64] {
        &self.time
    }

    /// Largest value in the linear grid
    pub fn max_power(&self) -> f64 {
        self.power.max()
    }

    /// Smallest value in the linear grid
    pub fn min_power(&self) -> f64 {
        self.power.min()
    }

    /// Largest averaged value in the logarithmic grid
    ///
    /// Only bins that averaged more than one linear bin contribute.
    pub fn max_log_power(&self) -> f64 {
        self.log_power.max()
    }

    /// Smallest averaged value in the logarithmic grid
    pub fn min_log_power(&self) -> f64 {
        self.log_power.min()
    }

    /// Upper median of the whole logarithmic grid (cached)
    pub fn median_log_power(&self) -> f64 {
        *self.median_log_power.get_or_init(|| {
            let median = upper_median(&self.flatten_log()).unwrap_or(0.0);
            #[cfg(feature = "tracing")]
            tracing::debug!(median, "median log power computed");
            median
        })
    }

    /// Population standard deviation of the whole logarithmic grid (cached)
    pub fn std_dev_log_power(&self) -> f64 {
        *self.std_dev_log_power.get_or_init(|| {
            let std_dev = mean_std_dev(&self.flatten_log()).map_or(0.0, |(_, sd)| sd);
            #[cfg(feature = "tracing")]
            tracing::debug!(std_dev, "log power standard deviation computed");
            std_dev
        })
    }

    /// Linear grid rescaled to [0, 1] using the global min/max
    pub fn normalized_power_grid(&self) -> Vec<Vec<f64>> {
        self.spectra
            .iter()
            .map(|row| row.iter().map(|&v| self.power.normalize(v)).collect())
            .collect()
    }

    /// Logarithmic grid rescaled to [0, 1] using the log-power range
    pub fn normalized_log_power_grid(&self) -> Vec<Vec<f64>> {
        self.spectra_log
            .iter()
            .map(|row| row.iter().map(|&v| self.log_power.normalize(v)).collect())
            .collect()
    }

    fn flatten_log(&self) -> Vec<f64> {
        self.spectra_log.iter().flatten().copied().collect()
    }
}

/// Average one linear row into the logarithmic axis.
fn rebin_log(source: &[f64], freq: &[f64], axis: &LogAxis, range: &mut RunningRange) -> Vec<f64> {
    let bins = axis.edges.len();
    let mut sums = vec![0.0; bins];
    let mut counts = vec![0usize; bins];

    for (&f, &p) in freq.iter().zip(source) {
        if f <= 0.0 {
            continue;
        }
        if let Some(bin) = axis.bin_of(f) {
            sums[bin] += p;
            counts[bin] += 1;
        }
    }

    // Single-sample bins are left as-is and kept out of the range.
    for (sum, &count) in sums.iter_mut().zip(&counts) {
        if count > 1 {
            *sum /= count as f64;
            range.observe(*sum);
        }
    }

    fill_gaps(&mut sums);
    sums
}

/// Replace every exact 0.0 with the nearest preceding non-zero value.
///
/// Leading zeros take the first non-zero value of the row. A row of zeros is
/// left untouched.
pub fn fill_gaps(row: &mut [f64]) {
    let Some(mut last) = row.iter().copied().find(|&v| v != 0.0) else {
        return;
    };
    for v in row.iter_mut() {
        if *v == 0.0 {
            *v = last;
        } else {
            last = *v;
        }
    }
}
