//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod notes;
pub mod transcribe;
