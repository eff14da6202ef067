//! Config loading tests

use std::fs;

use rankwise_engine::{ConfigError, OutputFormat, RankwiseConfig, UndoPolicy};
use tempfile::tempdir;

#[test]
fn load_from_reads_every_section() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[app]\nhigh_contrast = true\n\n[sort]\nundo = \"replay\"\n\n[output]\nformat = \"json\"\n",
    )
    .unwrap();

    let config = RankwiseConfig::load_from(&path).unwrap();
    assert!(config.ui_options().high_contrast);
    assert!(!config.ui_options().ascii_only);
    assert_eq!(config.undo_policy(), UndoPolicy::Replay);
    assert_eq!(config.output_format(), OutputFormat::Json);
}

#[test]
fn partial_config_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[output]\nformat = \"text\"\n").unwrap();

    let config = RankwiseConfig::load_from(&path).unwrap();
    assert_eq!(config.undo_policy(), UndoPolicy::RetryStep);
    assert!(!config.ui_options().high_contrast);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = RankwiseConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert_eq!(err.path(), path.as_path());
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[sort\nundo = ").unwrap();

    let err = RankwiseConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}
