//! Notefall Notes - from a power waterfall to a note grid and back to audio
//!
//! - [`catalog`] - Reference notes with ±1% nearest-match lookup
//! - [`detector`] - Median + k·stddev thresholding of the logarithmic grid
//! - [`grid`] - Per-chunk note accumulation, additive resynthesis, TSV dump
//!
//! ## Example
//!
//! ```rust,ignore
//! use notefall_analysis::{PowerWaterfall, WaterfallParams};
//! use notefall_notes::{NoteCatalog, NoteDetector};
//!
//! let waterfall = PowerWaterfall::new(&samples, &params)?;
//! let catalog = NoteCatalog::standard();
//! let grid = NoteDetector::new(&catalog).detect(&waterfall, 1.5);
//!
//! let audio = grid.generate_waveform(44100.0);
//! grid.write_notes(&catalog, std::io::stdout())?;
//! ```

pub mod catalog;
pub mod detector;
mod error;
pub mod grid;

pub use catalog::{Accidental, Letter, MATCH_TOLERANCE, NoteCatalog, ReferenceNote};
pub use detector::{NoteDetector, amplitude_from_log_power};
pub use error::{NoteError, Result};
pub use grid::{DetectedNote, NoteGrid};
