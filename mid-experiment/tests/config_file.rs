use std::io::Write;

use mid_core::Condition;
use mid_experiment::{ConfigurationError, ExperimentSettings, RemainderPolicy, SeedMode};

#[test]
fn loads_settings_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
total_blocks = 3
total_trials = 31
cue_types = ["lose", "win", "neut"]
remainder_policy = "truncate"
seed_mode = "indiv"
response_key = "j"

[staircase]
step_ms = 25
"#
    )
    .unwrap();

    let settings = ExperimentSettings::load(file.path()).unwrap();
    assert_eq!(settings.trials_per_block, 10);
    assert_eq!(settings.cue_types[0], Condition::Lose);
    assert_eq!(settings.remainder_policy, RemainderPolicy::Truncate);
    assert_eq!(settings.seed_mode, SeedMode::Individual);
    assert_eq!(settings.key_list(), vec!["j".to_string()]);
    assert_eq!(settings.staircase.step_ms, 25);
    assert_eq!(settings.staircase.max_ms, 1500);
    assert_eq!(settings.validate().unwrap().dropped, 1);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings =
        ExperimentSettings::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings, ExperimentSettings::default());
}

#[test]
fn broken_file_is_reported_not_replaced() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "total_blocks = [").unwrap();
    assert!(matches!(
        ExperimentSettings::load_or_default(file.path()),
        Err(ConfigurationError::Parse(_))
    ));
    assert!(matches!(
        ExperimentSettings::load(file.path()),
        Err(ConfigurationError::Parse(_))
    ));
}

#[test]
fn unreadable_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ExperimentSettings::load(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigurationError::Io { .. }));
}
