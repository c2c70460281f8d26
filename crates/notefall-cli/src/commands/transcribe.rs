//! Note transcription and resynthesis command.

use super::common::{PipelineArgs, analyze_file};
use anyhow::Context;
use clap::Args;
use notefall_io::{WavSpec, write_wav};
use notefall_notes::{NoteCatalog, NoteDetector};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Args)]
pub struct TranscribeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file for the resynthesized notes
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Standard deviations above the median a cell must exceed
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Output sample rate (defaults to the input rate)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Output bit depth: 16, 24 or 32 (float)
    #[arg(long)]
    bits: Option<u16>,

    /// Also write the detected notes as a tab-delimited table
    #[arg(long, value_name = "FILE")]
    notes: Option<PathBuf>,
}

pub fn run(args: TranscribeArgs) -> anyhow::Result<()> {
    let mut config = args.pipeline.resolve()?;
    if let Some(v) = args.threshold {
        config.detection.threshold_std_devs = v;
    }
    if let Some(v) = args.sample_rate {
        config.synthesis.sample_rate = Some(v);
    }
    if let Some(v) = args.bits {
        config.synthesis.bits_per_sample = v;
    }
    config.validate()?;

    let analysis = analyze_file(&args.input, args.pipeline.channel, &config)?;
    let waterfall = &analysis.waterfall;

    let catalog = NoteCatalog::standard();
    let threshold_std_devs = config.detection.threshold_std_devs;
    let grid = NoteDetector::new(&catalog).detect(waterfall, threshold_std_devs);
    tracing::info!(
        threshold_std_devs,
        threshold = NoteDetector::threshold(waterfall, threshold_std_devs),
        notes = grid.note_count(),
        chunks = grid.len(),
        "notes detected"
    );

    if let Some(path) = &args.notes {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        grid.write_notes(&catalog, BufWriter::new(file))?;
        tracing::info!(path = %path.display(), "note table written");
    }

    let sample_rate = config.synthesis_rate(analysis.spec.sample_rate);
    let waveform = grid.generate_waveform(f64::from(sample_rate));
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: config.synthesis.bits_per_sample,
    };
    write_wav(&args.output, &waveform, spec)?;
    tracing::info!(
        output = %args.output.display(),
        samples = waveform.len(),
        sample_rate,
        "waveform written"
    );

    println!(
        "{} notes over {} chunks -> {}",
        grid.note_count(),
        grid.len(),
        args.output.display()
    );
    Ok(())
}
