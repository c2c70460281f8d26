//! In-place radix-2 FFT
//!
//! Data is laid out as interleaved complex pairs: `data[2k]` is the real part
//! and `data[2k + 1]` the imaginary part of point `k`. For `N` points with
//! sampling interval `dt`, bin `j` in `0..=N/2` holds frequency `j / (N dt)`
//! and bins past `N/2` hold the negative frequency `-(N - j) / (N dt)`.
//!
//! The transform is unnormalized in both directions. Dividing the inverse
//! output by `N` is the caller's job.

use crate::error::{AnalysisError, Result};
use std::f64::consts::PI;

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward transform (rotation sign +1)
    Forward,
    /// Inverse transform (rotation sign -1), unscaled
    Inverse,
}

impl Direction {
    /// Sign applied to the twiddle rotation angle.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Inverse => -1.0,
        }
    }
}

/// True for 1, 2, 4, 8, ...; false for zero and everything else.
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// Transform a real sequence of `N = 2^k` samples.
///
/// Returns `2N` interleaved `(re, im)` values.
///
/// # Example
///
/// ```rust
/// use notefall_analysis::fft::{Direction, transform};
///
/// let spectrum = transform(&[1.0, 1.0, 1.0, 1.0], Direction::Forward).unwrap();
/// assert_eq!(spectrum.len(), 8);
/// assert!((spectrum[0] - 4.0).abs() < 1e-12);
/// ```
pub fn transform(samples: &[f64], direction: Direction) -> Result<Vec<f64>> {
    if !is_power_of_two(samples.len()) {
        return Err(AnalysisError::InvalidLength { len: samples.len() });
    }

    let mut data = Vec::with_capacity(samples.len() * 2);
    for &x in samples {
        data.push(x);
        data.push(0.0);
    }
    radix2(&mut data, direction);
    Ok(data)
}

/// Transform interleaved complex data in place.
///
/// `data.len()` must be `2N` with `N` a power of two.
pub fn process_in_place(data: &mut [f64], direction: Direction) -> Result<()> {
    if data.len() % 2 != 0 {
        return Err(AnalysisError::invalid(format!(
            "interleaved complex data needs an even length, got {}",
            data.len()
        )));
    }
    if !is_power_of_two(data.len() / 2) {
        return Err(AnalysisError::InvalidLength {
            len: data.len() / 2,
        });
    }
    radix2(data, direction);
    Ok(())
}

/// Magnitude `sqrt(re^2 + im^2)` of every interleaved complex point.
pub fn magnitudes(interleaved: &[f64]) -> Vec<f64> {
    interleaved
        .chunks_exact(2)
        .map(|c| (c[0] * c[0] + c[1] * c[1]).sqrt())
        .collect()
}

/// Fixed-size FFT processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fft {
    size: usize,
}

impl Fft {
    /// Create a processor for `size` points (must be a power of two)
    pub fn new(size: usize) -> Result<Self> {
        if !is_power_of_two(size) {
            return Err(AnalysisError::InvalidLength { len: size });
        }
        Ok(Self { size })
    }

    /// Number of points
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of real input
    ///
    /// Input is zero padded or truncated to the FFT size. Returns `2 * size`
    /// interleaved values.
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut data = vec![0.0; self.size * 2];
        for (pair, &x) in data.chunks_exact_mut(2).zip(input) {
            pair[0] = x;
        }
        radix2(&mut data, Direction::Forward);
        data
    }

    /// Inverse transform of an interleaved spectrum (no 1/N scaling)
    pub fn inverse(&self, spectrum: &[f64]) -> Vec<f64> {
        let mut data = spectrum.to_vec();
        data.resize(self.size * 2, 0.0);
        radix2(&mut data, Direction::Inverse);
        data
    }
}

/// Caller guarantees `data.len() / 2` is a power of two.
fn radix2(data: &mut [f64], direction: Direction) {
    let n = data.len();
    if n < 4 {
        return;
    }

    // Bit-reversal permutation over complex points.
    let mut j = 0;
    for i in (0..n).step_by(2) {
        if j > i {
            data.swap(j, i);
            data.swap(j + 1, i + 1);
        }
        let mut m = n >> 1;
        while m >= 2 && j >= m {
            j -= m;
            m >>= 1;
        }
        j += m;
    }

    // Danielson-Lanczos butterflies. The twiddle factor is rotated by a
    // recurrence each step instead of calling sin/cos per butterfly.
    let mut mmax = 2;
    while n > mmax {
        let istep = mmax << 1;
        let theta = direction.sign() * (2.0 * PI / mmax as f64);
        let wtemp = (0.5 * theta).sin();
        let wpr = -2.0 * wtemp * wtemp;
        let wpi = theta.sin();
        let mut wr = 1.0;
        let mut wi = 0.0;

        for m in (0..mmax).step_by(2) {
            for i in (m..n).step_by(istep) {
                let j = i + mmax;
                let tempr = wr * data[j] - wi * data[j + 1];
                let tempi = wr * data[j + 1] + wi * data[j];
                data[j] = data[i] - tempr;
                data[j + 1] = data[i + 1] - tempi;
                data[i] += tempr;
                data[i + 1] += tempi;
            }
            let prev = wr;
            wr = prev * wpr - wi * wpi + wr;
            wi = wi * wpr + prev * wpi + wi;
        }
        mmax = istep;
    }
}
