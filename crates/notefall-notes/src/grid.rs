//! Note grid: the detected notes of every chunk, on a fixed time step.
//!
//! The grid can be rendered back to audio with [`NoteGrid::generate_waveform`]
//! or dumped as a tab-delimited table with [`NoteGrid::write_notes`].

use crate::catalog::{NoteCatalog, ReferenceNote};
use crate::error::{NoteError, Result};
use notefall_analysis::PowerWaterfall;
use notefall_analysis::export::format_fixed;
use std::f64::consts::PI;
use std::io::{BufRead, Write};

/// A reference note observed in one chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedNote {
    /// Catalog entry that matched
    pub note: ReferenceNote,
    /// Linear amplitude, arbitrary units
    pub amplitude: f64,
    /// Chunk (time step) index
    pub chunk: usize,
}

impl DetectedNote {
    /// Create a detected note
    pub fn new(note: ReferenceNote, amplitude: f64, chunk: usize) -> Self {
        Self {
            note,
            amplitude,
            chunk,
        }
    }

    /// Frequency of the underlying reference note in Hz
    pub fn frequency(&self) -> f64 {
        self.note.frequency()
    }
}

/// Chords on a fixed time grid
#[derive(Debug, Clone, PartialEq)]
pub struct NoteGrid {
    times: Vec<f64>,
    hop_duration: f64,
    chunks: Vec<Vec<DetectedNote>>,
}

impl NoteGrid {
    /// Empty grid with one chunk per entry of `times`, `hop_duration` seconds apart
    pub fn new(times: Vec<f64>, hop_duration: f64) -> Self {
        let chunks = vec![Vec::new(); times.len()];
        Self {
            times,
            hop_duration,
            chunks,
        }
    }

    /// Empty grid matching the time axis of `waterfall`
    pub fn for_waterfall(waterfall: &PowerWaterfall) -> Self {
        Self::new(waterfall.times().to_vec(), waterfall.hop_duration())
    }

    /// Record a note at its chunk
    pub fn add_one_note(&mut self, note: DetectedNote) -> Result<()> {
        let len = self.chunks.len();
        let slot = self
            .chunks
            .get_mut(note.chunk)
            .ok_or(NoteError::ChunkOutOfRange {
                index: note.chunk,
                len,
            })?;
        slot.push(note);
        Ok(())
    }

    /// Caller guarantees `note.chunk` is in range.
    pub(crate) fn push(&mut self, note: DetectedNote) {
        self.chunks[note.chunk].push(note);
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True when the grid has no chunks
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total number of detected notes
    pub fn note_count(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Notes detected at `chunk`
    pub fn notes_at(&self, chunk: usize) -> Option<&[DetectedNote]> {
        self.chunks.get(chunk).map(Vec::as_slice)
    }

    /// Start time of every chunk in seconds
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Seconds between chunks
    pub fn hop_duration(&self) -> f64 {
        self.hop_duration
    }

    /// Total duration in seconds
    pub fn duration(&self) -> f64 {
        self.hop_duration * self.chunks.len() as f64
    }

    /// Render the grid as a sum of sines, scaled to [-1, 1].
    ///
    /// Each chunk contributes `floor(hop_duration * sample_rate)` samples.
    /// Every note is phased by its absolute chunk start time, so a note held
    /// over consecutive chunks continues its sine without a jump. A grid with
    /// no audible notes renders as silence.
    pub fn generate_waveform(&self, sample_rate: f64) -> Vec<f64> {
        let total = (sample_rate * self.duration()).round() as usize;
        let hop_samples = (self.hop_duration * sample_rate) as usize;
        let dt = 1.0 / sample_rate;

        let mut waveform = Vec::with_capacity(total);
        let mut scratch = vec![0.0; hop_samples];
        for (chunk, notes) in self.chunks.iter().enumerate() {
            scratch.fill(0.0);
            let start = self.hop_duration * chunk as f64;
            for note in notes {
                add_tone(&mut scratch, note.frequency(), note.amplitude, dt, start);
            }
            waveform.extend_from_slice(&scratch);
        }
        waveform.resize(total, 0.0);

        let peak = waveform.iter().fold(0.0f64, |m, s| m.max(s.abs()));
        if peak > 0.0 {
            for s in &mut waveform {
                *s /= peak;
            }
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!(chunks = self.len(), "note grid is silent, skipping normalization");
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(samples = waveform.len(), peak, "waveform generated");

        waveform
    }

    /// Write the grid as a tab-delimited table.
    ///
    /// The header is `Time` followed by every catalog note name. Each chunk
    /// becomes one row: its start time, then the note amplitude or `0` for
    /// every catalog column. Notes below the catalog's lowest frequency, or
    /// not in the catalog at all, are skipped. When a note was detected more
    /// than once in a chunk the largest amplitude is written.
    pub fn write_notes<W: Write>(&self, catalog: &NoteCatalog, mut out: W) -> Result<()> {
        let mut header = vec!["Time".to_string()];
        header.extend(catalog.iter().map(ReferenceNote::full_name));
        writeln!(out, "{}", header.join("\t"))?;

        let min_freq = catalog.min_frequency();
        let mut cells: Vec<Option<f64>> = vec![None; catalog.len()];
        for (chunk, notes) in self.chunks.iter().enumerate() {
            cells.fill(None);
            for detected in notes {
                if detected.frequency() < min_freq {
                    continue;
                }
                if let Some(col) = catalog.position(&detected.note) {
                    let cell = &mut cells[col];
                    *cell = Some(cell.map_or(detected.amplitude, |a| a.max(detected.amplitude)));
                }
            }

            let time = self.times.get(chunk).copied().unwrap_or(self.hop_duration * chunk as f64);
            let mut row = Vec::with_capacity(cells.len() + 1);
            row.push(format_fixed(time));
            row.extend(
                cells
                    .iter()
                    .map(|c| c.map_or_else(|| "0".to_string(), format_fixed)),
            );
            writeln!(out, "{}", row.join("\t"))?;
        }

        out.flush()?;
        Ok(())
    }

    /// Load a table produced by [`write_notes`](Self::write_notes).
    ///
    /// The header must name exactly the notes of `catalog`, in order.
    /// `hop_duration` is not stored in the table and must be supplied.
    pub fn read_notes<R: BufRead>(
        catalog: &NoteCatalog,
        hop_duration: f64,
        input: R,
    ) -> Result<Self> {
        let mut lines = input.lines();
        let header = lines
            .next()
            .ok_or_else(|| NoteError::parse(1, "missing header"))??;

        let columns: Vec<&str> = header.split('\t').collect();
        let expected: Vec<String> = catalog.iter().map(ReferenceNote::full_name).collect();
        if columns.first() != Some(&"Time") || columns[1..] != expected[..] {
            return Err(NoteError::parse(1, "header does not match the note catalog"));
        }

        let mut times = Vec::new();
        let mut chunks = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line_no = idx + 2;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let cells: Vec<&str> = line.split('\t').collect();
            if cells.len() != catalog.len() + 1 {
                return Err(NoteError::parse(
                    line_no,
                    format!("expected {} columns, got {}", catalog.len() + 1, cells.len()),
                ));
            }

            let chunk = chunks.len();
            times.push(parse_cell(cells[0], line_no)?);
            let mut notes = Vec::new();
            for (note, cell) in catalog.iter().zip(&cells[1..]) {
                if *cell == "0" {
                    continue;
                }
                notes.push(DetectedNote::new(*note, parse_cell(cell, line_no)?, chunk));
            }
            chunks.push(notes);
        }

        Ok(Self {
            times,
            hop_duration,
            chunks,
        })
    }
}

fn parse_cell(cell: &str, line: usize) -> Result<f64> {
    cell.trim()
        .parse()
        .map_err(|_| NoteError::parse(line, format!("not a number: {cell:?}")))
}

/// Add `amp * sin(2 pi f (i dt) + 2 pi f t)` to every sample of `buf`.
fn add_tone(buf: &mut [f64], freq: f64, amp: f64, dt: f64, t: f64) {
    let phase = 2.0 * PI * freq * t;
    let step = 2.0 * PI * freq * dt;
    for (i, s) in buf.iter_mut().enumerate() {
        *s += amp * (step * i as f64 + phase).sin();
    }
}
