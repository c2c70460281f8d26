//! Reference note listing.

use clap::Args;
use notefall_notes::{MATCH_TOLERANCE, NoteCatalog};

#[derive(Args)]
pub struct NotesArgs {
    /// Only show the note matching this frequency in Hz
    #[arg(long, value_name = "HZ")]
    lookup: Option<f64>,
}

pub fn run(args: NotesArgs) -> anyhow::Result<()> {
    let catalog = NoteCatalog::standard();

    if let Some(freq) = args.lookup {
        match catalog.lookup_nearest(freq) {
            Some(note) => println!("{freq} Hz -> {note}"),
            None => println!(
                "{freq} Hz -> no note within {:.0}%",
                MATCH_TOLERANCE * 100.0
            ),
        }
        return Ok(());
    }

    println!("Reference Notes ({})", catalog.len());
    println!();
    println!("  {:<6} {:>10}", "Name", "Hz");
    for note in &catalog {
        println!("  {:<6} {:>10.2}", note.full_name(), note.frequency());
    }
    Ok(())
}
