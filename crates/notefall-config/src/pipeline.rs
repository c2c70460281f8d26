//! Pipeline configuration file format and operations.

use notefall_analysis::waterfall::MIN_CHUNK_SIZE;
use notefall_analysis::{WaterfallParams, is_power_of_two};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Settings for waterfall construction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Window length in samples (power of two)
    pub chunk_size: usize,
    /// Number of logarithmic frequency bins
    pub num_freq_log: usize,
    /// Lower edge of the logarithmic axis in Hz
    pub freq_min: f64,
    /// Upper edge of the logarithmic axis in Hz
    pub freq_max: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            chunk_size: 8192,
            num_freq_log: 1280,
            freq_min: 110.0,
            freq_max: 2000.0,
        }
    }
}

/// Settings for note detection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Standard deviations above the median a cell must exceed
    pub threshold_std_devs: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold_std_devs: 1.5,
        }
    }
}

/// Settings for waveform resynthesis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Output sample rate; the input's rate when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Output bit depth (16, 24 or 32)
    pub bits_per_sample: u16,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            sample_rate: None,
            bits_per_sample: 16,
        }
    }
}

/// Every tunable of the notefall pipeline.
///
/// # TOML Format
///
/// ```toml
/// [analysis]
/// chunk_size = 8192
/// num_freq_log = 1280
/// freq_min = 110.0
/// freq_max = 2000.0
///
/// [detection]
/// threshold_std_devs = 1.5
///
/// [synthesis]
/// sample_rate = 44100
/// bits_per_sample = 16
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Waterfall settings.
    pub analysis: AnalysisConfig,
    /// Detection settings.
    pub detection: DetectionConfig,
    /// Resynthesis settings.
    pub synthesis: SynthesisConfig,
}

impl PipelineConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analysis;
        if !is_power_of_two(a.chunk_size) || a.chunk_size < MIN_CHUNK_SIZE {
            return Err(ConfigError::invalid(
                "analysis.chunk_size",
                format!("must be a power of two >= {MIN_CHUNK_SIZE}, got {}", a.chunk_size),
            ));
        }
        if a.num_freq_log == 0 {
            return Err(ConfigError::invalid("analysis.num_freq_log", "must be nonzero"));
        }
        if !(a.freq_min.is_finite() && a.freq_min > 0.0) {
            return Err(ConfigError::invalid(
                "analysis.freq_min",
                format!("must be positive, got {}", a.freq_min),
            ));
        }
        if !(a.freq_max.is_finite() && a.freq_max > a.freq_min) {
            return Err(ConfigError::invalid(
                "analysis.freq_max",
                format!("must exceed freq_min {}, got {}", a.freq_min, a.freq_max),
            ));
        }
        if !self.detection.threshold_std_devs.is_finite() {
            return Err(ConfigError::invalid(
                "detection.threshold_std_devs",
                format!("must be finite, got {}", self.detection.threshold_std_devs),
            ));
        }
        if self.synthesis.sample_rate == Some(0) {
            return Err(ConfigError::invalid("synthesis.sample_rate", "must be nonzero"));
        }
        if !matches!(self.synthesis.bits_per_sample, 16 | 24 | 32) {
            return Err(ConfigError::invalid(
                "synthesis.bits_per_sample",
                format!("must be 16, 24 or 32, got {}", self.synthesis.bits_per_sample),
            ));
        }
        Ok(())
    }

    /// Waterfall parameters for input sampled at `sample_rate`
    pub fn waterfall_params(&self, sample_rate: f64) -> WaterfallParams {
        WaterfallParams::new(
            sample_rate,
            self.analysis.chunk_size,
            self.analysis.num_freq_log,
            self.analysis.freq_min,
            self.analysis.freq_max,
        )
    }

    /// Resynthesis rate, falling back to `input_rate`
    pub fn synthesis_rate(&self, input_rate: u32) -> u32 {
        self.synthesis.sample_rate.unwrap_or(input_rate)
    }
}
