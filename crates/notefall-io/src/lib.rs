//! WAV I/O for notefall.
//!
//! - **Input**: [`read_wav_pcm16`] loads one channel of a WAV file as signed
//!   16-bit samples, whatever the file's own format
//! - **Output**: [`write_wav`] saves a normalized mono waveform
//! - **Metadata**: [`read_wav_info`] reads the header only
//!
//! ```rust,ignore
//! use notefall_io::{read_wav_pcm16, write_wav, WavSpec};
//!
//! let (samples, spec) = read_wav_pcm16("input.wav", 0)?;
//! println!("{} samples at {} Hz", samples.len(), spec.sample_rate);
//!
//! let out = WavSpec { sample_rate: spec.sample_rate, ..Default::default() };
//! write_wav("output.wav", &waveform, out)?;
//! ```

mod wav;

pub use wav::{WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_pcm16, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Requested channel does not exist in the file.
    #[error("channel {channel} out of range, file has {channels} channel(s)")]
    ChannelOutOfRange {
        /// Requested 0-based channel.
        channel: u16,
        /// Channels in the file.
        channels: u16,
    },

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
