//! Notefall CLI - spectrograms, note transcription and resynthesis from WAV files.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "notefall")]
#[command(author, version, about = "Spectrogram note detection and resynthesis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a power waterfall and print or export it
    Analyze(commands::analyze::AnalyzeArgs),

    /// Detect notes and resynthesize them to a WAV file
    Transcribe(commands::transcribe::TranscribeArgs),

    /// List the reference note catalog
    Notes(commands::notes::NotesArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so table output on stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Transcribe(args) => commands::transcribe::run(args),
        Commands::Notes(args) => commands::notes::run(args),
    }
}
