//! Error types for note detection and grids.

use thiserror::Error;

/// Errors that can occur while building, dumping or loading a note grid.
#[derive(Debug, Error)]
pub enum NoteError {
    /// Chunk index past the end of the grid
    #[error("chunk {index} out of range for grid of {len} chunks")]
    ChunkOutOfRange {
        /// Requested chunk.
        index: usize,
        /// Number of chunks in the grid.
        len: usize,
    },

    /// A catalog needs at least one note
    #[error("note catalog is empty")]
    EmptyCatalog,

    /// Malformed note dump
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NoteError {
    /// Create a parse error.
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        NoteError::Parse {
            line,
            reason: reason.into(),
        }
    }
}

/// Convenience result type for note operations.
pub type Result<T> = std::result::Result<T, NoteError>;
