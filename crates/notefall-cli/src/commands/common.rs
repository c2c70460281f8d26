//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::Args;
use notefall_analysis::{PowerWaterfall, WaterfallParams};
use notefall_config::PipelineConfig;
use notefall_io::{WavSpec, read_wav_pcm16};
use std::path::{Path, PathBuf};

/// Analysis options shared by every command that builds a waterfall.
///
/// Flags override the config file, which overrides the defaults.
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    /// TOML pipeline configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Window length in samples (power of two)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Number of logarithmic frequency bins
    #[arg(long)]
    pub log_bins: Option<usize>,

    /// Lower edge of the logarithmic axis in Hz
    #[arg(long)]
    pub freq_min: Option<f64>,

    /// Upper edge of the logarithmic axis in Hz
    #[arg(long)]
    pub freq_max: Option<f64>,

    /// Input channel to analyze (0 = left)
    #[arg(long, default_value = "0")]
    pub channel: u16,
}

impl PipelineArgs {
    /// Load the config file (or defaults) and apply the flag overrides.
    pub fn resolve(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        let analysis = &mut config.analysis;
        if let Some(v) = self.chunk_size {
            analysis.chunk_size = v;
        }
        if let Some(v) = self.log_bins {
            analysis.num_freq_log = v;
        }
        if let Some(v) = self.freq_min {
            analysis.freq_min = v;
        }
        if let Some(v) = self.freq_max {
            analysis.freq_max = v;
        }
        Ok(config)
    }
}

/// Samples of one input channel plus everything derived from them.
pub struct Analysis {
    /// Input file format
    pub spec: WavSpec,
    /// Number of samples read
    pub num_samples: usize,
    /// Waterfall of the input
    pub waterfall: PowerWaterfall,
}

/// Read `input` and build its waterfall with `config`.
pub fn analyze_file(
    input: &Path,
    channel: u16,
    config: &PipelineConfig,
) -> anyhow::Result<Analysis> {
    let (samples, spec) = read_wav_pcm16(input, channel)
        .with_context(|| format!("reading {}", input.display()))?;
    tracing::info!(
        input = %input.display(),
        samples = samples.len(),
        sample_rate = spec.sample_rate,
        channel,
        "input loaded"
    );

    let params: WaterfallParams = config.waterfall_params(f64::from(spec.sample_rate));
    let waterfall = PowerWaterfall::new(&samples, &params)?;
    tracing::info!(
        chunks = waterfall.num_chunks(),
        chunk_size = waterfall.chunk_size(),
        log_bins = waterfall.num_freq_log(),
        "waterfall built"
    );

    Ok(Analysis {
        spec,
        num_samples: samples.len(),
        waterfall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PipelineArgs {
        PipelineArgs {
            config: None,
            chunk_size: None,
            log_bins: None,
            freq_min: None,
            freq_max: None,
            channel: 0,
        }
    }

    #[test]
    fn no_flags_gives_defaults() {
        assert_eq!(args().resolve().unwrap(), PipelineConfig::default());
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "[analysis]\nchunk_size = 2048\nfreq_min = 55.0\n").unwrap();

        let config = PipelineArgs {
            config: Some(path),
            chunk_size: Some(512),
            ..args()
        }
        .resolve()
        .unwrap();

        assert_eq!(config.analysis.chunk_size, 512);
        assert_eq!(config.analysis.freq_min, 55.0);
        assert_eq!(config.analysis.freq_max, 2000.0);
    }
}
