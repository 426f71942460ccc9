use domaincover::settings::{DEFAULT_LOG_FILTER, DEFAULT_MAX_DECISION_CELLS};
use domaincover::{CoverageError, Settings};

#[test]
fn defaults() {
    let settings = Settings::default();
    assert_eq!(settings.max_decision_cells, DEFAULT_MAX_DECISION_CELLS);
    assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
}

#[test]
fn reads_a_settings_file() {
    let path = std::env::temp_dir().join(format!("domaincover-settings-{}.toml", std::process::id()));
    std::fs::write(&path, "max_decision_cells = 128\nlog_filter = \"debug\"\n").unwrap();
    let settings = Settings::load_from(Some(&path)).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(settings.max_decision_cells, 128);
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn missing_required_file_is_a_config_error() {
    let path = std::env::temp_dir().join("domaincover-does-not-exist.toml");
    let err = Settings::load_from(Some(&path)).unwrap_err();
    assert!(matches!(err, CoverageError::Config(_)));
}
