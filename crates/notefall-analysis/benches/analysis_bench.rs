//! Criterion benchmarks for notefall-analysis components
//!
//! Run with: cargo bench -p notefall-analysis

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use notefall_analysis::fft::{Direction, Fft, transform};
use notefall_analysis::{PowerWaterfall, WaterfallParams};
use std::f64::consts::PI;

const SAMPLE_RATE: f64 = 44100.0;

/// A tone with a few harmonics, quantized to 16 bits
fn generate_tone(size: usize) -> Vec<i16> {
    (0..size)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            let s = (2.0 * PI * 440.0 * t).sin()
                + 0.5 * (2.0 * PI * 880.0 * t).sin()
                + 0.25 * (2.0 * PI * 1320.0 * t).sin();
            (s * 8000.0) as i16
        })
        .collect()
}

fn bench_fft_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT_Forward");

    for size in [256, 1024, 4096, 8192] {
        let fft = Fft::new(size).unwrap();
        let input: Vec<f64> = generate_tone(size).iter().map(|&s| f64::from(s)).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| fft.forward(black_box(&input)))
        });
    }

    group.finish();
}

fn bench_fft_roundtrip(c: &mut Criterion) {
    let input: Vec<f64> = generate_tone(4096).iter().map(|&s| f64::from(s)).collect();
    let fft = Fft::new(4096).unwrap();

    c.bench_function("FFT_Roundtrip_4096", |b| {
        b.iter(|| {
            let spectrum = transform(black_box(&input), Direction::Forward).unwrap();
            fft.inverse(&spectrum)
        })
    });
}

fn bench_waterfall(c: &mut Criterion) {
    let mut group = c.benchmark_group("Waterfall");
    group.sample_size(10);

    let samples = generate_tone(SAMPLE_RATE as usize * 2);
    for chunk_size in [2048, 8192] {
        let params = WaterfallParams::new(SAMPLE_RATE, chunk_size, 1280, 110.0, 2000.0);
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &chunk_size,
            |b, _| b.iter(|| PowerWaterfall::new(black_box(&samples), &params).unwrap()),
        );
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let samples = generate_tone(SAMPLE_RATE as usize);
    let params = WaterfallParams::new(SAMPLE_RATE, 4096, 1280, 110.0, 2000.0);

    c.bench_function("Waterfall_Statistics", |b| {
        b.iter_batched(
            || PowerWaterfall::new(&samples, &params).unwrap(),
            |w| (w.median_log_power(), w.std_dev_log_power()),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_fft_forward,
    bench_fft_roundtrip,
    bench_waterfall,
    bench_statistics
);
criterion_main!(benches);
