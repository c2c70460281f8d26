//! File-level tests for notefall-config.

use notefall_config::{ConfigError, PipelineConfig};
use tempfile::TempDir;

#[test]
fn save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("notefall.toml");

    let mut config = PipelineConfig::default();
    config.analysis.chunk_size = 2048;
    config.detection.threshold_std_devs = 2.25;
    config.synthesis.bits_per_sample = 24;
    config.save(&path).unwrap();

    assert!(path.exists());
    let loaded = PipelineConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn load_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = PipelineConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn loaded_file_can_be_invalid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[analysis]\nchunk_size = 3000\n").unwrap();

    let config = PipelineConfig::load(&path).unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "analysis.chunk_size",
            ..
        }
    ));
}
