//! Waterfall analysis command.

use super::common::{PipelineArgs, analyze_file};
use clap::{Args, ValueEnum};
use notefall_analysis::export::{GridScale, export_log_spectrum_tsv, export_waterfall_pgm};
use std::path::PathBuf;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Write the normalized waterfall as a PGM image
    #[arg(long, value_name = "FILE")]
    pgm: Option<PathBuf>,

    /// Grid used for the PGM image
    #[arg(long, value_enum, default_value = "linear")]
    scale: Scale,

    /// Write one chunk's logarithmic spectrum as TSV
    #[arg(long, value_name = "FILE")]
    spectrum: Option<PathBuf>,

    /// Chunk index for --spectrum
    #[arg(long, default_value = "0")]
    chunk: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scale {
    Linear,
    Log,
}

impl From<Scale> for GridScale {
    fn from(scale: Scale) -> Self {
        match scale {
            Scale::Linear => GridScale::Linear,
            Scale::Log => GridScale::Log,
        }
    }
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = args.pipeline.resolve()?;
    config.validate()?;

    let analysis = analyze_file(&args.input, args.pipeline.channel, &config)?;
    let w = &analysis.waterfall;

    println!("Waterfall of {}", args.input.display());
    println!(
        "  {} samples, {} Hz, {:.2}s",
        analysis.num_samples,
        analysis.spec.sample_rate,
        analysis.num_samples as f64 / w.sample_rate()
    );
    println!(
        "  {} chunks of {} samples, hop {} ({:.4}s)",
        w.num_chunks(),
        w.chunk_size(),
        w.hop_size(),
        w.hop_duration()
    );
    println!(
        "  {} linear bins, {} log bins ({} - {} Hz)",
        w.spectra_size(),
        w.num_freq_log(),
        config.analysis.freq_min,
        config.analysis.freq_max
    );
    println!("  power:      {:.4} .. {:.4}", w.min_power(), w.max_power());
    println!(
        "  log power:  {:.4} .. {:.4}",
        w.min_log_power(),
        w.max_log_power()
    );
    println!("  median:     {:.4}", w.median_log_power());
    println!("  std dev:    {:.4}", w.std_dev_log_power());

    if let Some(path) = &args.pgm {
        export_waterfall_pgm(w, args.scale.into(), path)?;
        tracing::info!(path = %path.display(), "waterfall image written");
    }

    if let Some(path) = &args.spectrum {
        export_log_spectrum_tsv(w, args.chunk, path)?;
        tracing::info!(path = %path.display(), chunk = args.chunk, "log spectrum written");
    }

    Ok(())
}
