//! Pipeline configuration for notefall.
//!
//! A [`PipelineConfig`] holds every tunable of the analysis, detection and
//! synthesis stages and round-trips through TOML. Missing sections and
//! fields fall back to the defaults.
//!
//! # Example
//!
//! ```rust,no_run
//! use notefall_config::PipelineConfig;
//!
//! let config = PipelineConfig::load("notefall.toml").unwrap();
//! config.validate().unwrap();
//!
//! let params = config.waterfall_params(44100.0);
//! assert_eq!(params.chunk_size, config.analysis.chunk_size);
//! ```

mod error;
mod pipeline;

pub use error::ConfigError;
pub use pipeline::{AnalysisConfig, DetectionConfig, PipelineConfig, SynthesisConfig};
