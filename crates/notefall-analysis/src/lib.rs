//! Notefall Analysis - spectral front end for note detection
//!
//! This crate turns a buffer of 16-bit samples into a power "waterfall":
//!
//! - [`fft`] - In-place radix-2 FFT over interleaved complex data
//! - [`stats`] - Upper median, single-pass standard deviation, min/max tracking
//! - [`waterfall`] - Overlapping-window spectrogram with a logarithmic frequency grid
//! - [`export`] - Normalized grids, PGM images and tab-delimited spectrum dumps
//!
//! ## Example
//!
//! ```rust,ignore
//! use notefall_analysis::{PowerWaterfall, WaterfallParams};
//!
//! let params = WaterfallParams::new(44100.0, 8192, 1280, 110.0, 2000.0);
//! let waterfall = PowerWaterfall::new(&samples, &params)?;
//!
//! let threshold = waterfall.median_log_power() + 1.5 * waterfall.std_dev_log_power();
//! println!("{} chunks, threshold {:.3}", waterfall.num_chunks(), threshold);
//! ```
//!
//! ## Layout of a waterfall
//!
//! With chunk size `C`, windows advance by `C / 4` samples (75% overlap) and
//! the final windows are zero padded. Each chunk produces `C / 2` linear bins
//! holding `log10(|X| + 2)` and `num_freq_log` bins equally spaced in
//! `log10(f)` between `freq_min` and `freq_max`.

pub mod error;
pub mod export;
pub mod fft;
pub mod stats;
pub mod waterfall;

pub use error::{AnalysisError, Result};
pub use fft::{Direction, Fft, is_power_of_two, magnitudes, process_in_place, transform};
pub use stats::{RunningRange, mean_std_dev, upper_median};
pub use waterfall::{PowerWaterfall, WaterfallParams};
