//! Integration tests for the notefall binary.

use std::path::Path;
use std::process::Command;

const SAMPLE_RATE: u32 = 11520;

/// Helper to get the path to the `notefall` binary built by cargo.
fn notefall_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_notefall"))
}

/// 450 Hz tone, which falls into the A4 log bin with the settings below.
fn write_tone(path: &Path, num_samples: usize) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..num_samples {
        let t = i as f64 / f64::from(SAMPLE_RATE);
        let s = (10000.0 * (2.0 * std::f64::consts::PI * 450.0 * t).sin()).round() as i16;
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

const SMALL_PIPELINE: [&str; 8] = [
    "--chunk-size",
    "1024",
    "--log-bins",
    "48",
    "--freq-min",
    "110",
    "--freq-max",
    "1760",
];

#[test]
fn cli_notes_lists_catalog() {
    let output = notefall_bin().arg("notes").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reference Notes (72)"));
    for name in ["C2", "Db4", "A4", "B7"] {
        assert!(stdout.contains(name), "listing should contain {name}");
    }
}

#[test]
fn cli_notes_lookup() {
    let output = notefall_bin()
        .args(["notes", "--lookup", "443.5"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("A4"));

    let output = notefall_bin()
        .args(["notes", "--lookup", "450"])
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("no note"));
}

#[test]
fn cli_analyze_exports_image_and_spectrum() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tone.wav");
    let pgm = dir.path().join("waterfall.pgm");
    let tsv = dir.path().join("spectrum.tsv");
    write_tone(&input, 8 * 1024);

    let output = notefall_bin()
        .arg("analyze")
        .arg(&input)
        .args(SMALL_PIPELINE)
        .arg("--pgm")
        .arg(&pgm)
        .args(["--scale", "log", "--chunk", "2"])
        .arg("--spectrum")
        .arg(&tsv)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("33 chunks of 1024 samples"), "got: {stdout}");

    let image = std::fs::read_to_string(&pgm).unwrap();
    let mut lines = image.lines();
    assert_eq!(lines.next(), Some("P2"));
    assert!(image.contains("\n33 48\n"));

    let spectrum = std::fs::read_to_string(&tsv).unwrap();
    assert!(spectrum.starts_with("Frequency\tPower\n"));
    assert_eq!(spectrum.lines().count(), 49);
}

#[test]
fn cli_transcribe_writes_wav_and_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tone.wav");
    let output_wav = dir.path().join("notes.wav");
    let table = dir.path().join("notes.tsv");
    write_tone(&input, 16 * 1024);

    let output = notefall_bin()
        .arg("transcribe")
        .arg(&input)
        .arg(&output_wav)
        .args(SMALL_PIPELINE)
        .args(["--threshold", "1.0"])
        .arg("--notes")
        .arg(&table)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let reader = hound::WavReader::open(&output_wav).unwrap();
    assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
    assert_eq!(reader.spec().channels, 1);
    // 65 chunks of 256 samples each
    assert_eq!(reader.duration(), 65 * 256);

    let text = std::fs::read_to_string(&table).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 66);
    let header: Vec<&str> = lines[0].split('\t').collect();
    let a4 = header.iter().position(|&h| h == "A4").unwrap();
    let first: Vec<&str> = lines[1].split('\t').collect();
    assert_ne!(first[a4], "0");
}

#[test]
fn cli_rejects_invalid_chunk_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tone.wav");
    write_tone(&input, 4096);

    let output = notefall_bin()
        .arg("analyze")
        .arg(&input)
        .args(["--chunk-size", "1000"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("analysis.chunk_size"));
}

#[test]
fn cli_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = notefall_bin()
        .arg("analyze")
        .arg(dir.path().join("absent.wav"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}
