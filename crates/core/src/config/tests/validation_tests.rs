use crate::config::models::{AppConfig, MAX_HISTORY_DAYS};

#[test]
fn test_zero_workers_rejected() {
    let mut config = AppConfig::default();
    config.dispatcher.max_workers = Some(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_zero_worker_timeout_rejected() {
    let mut config = AppConfig::default();
    config.dispatcher.worker_timeout_seconds = Some(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_empty_condor_command_rejected() {
    let mut config = AppConfig::default();
    config.condor.condor_history = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_negative_history_days_rejected() {
    let mut config = AppConfig::default();
    config.locator.default_history_days = Some(-1.0);
    assert!(config.validate().is_err());
}

#[test]
fn test_out_of_range_history_days_rejected() {
    let mut config = AppConfig::default();
    config.locator.default_history_days = Some(1.0e8);
    assert!(config.validate().is_err());

    config.locator.default_history_days = Some(MAX_HISTORY_DAYS);
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_log_format_rejected() {
    let mut config = AppConfig::default();
    config.observability.log_format = "xml".to_string();
    let err = config.validate().unwrap_err();
    assert!(format!("{err:#}").contains("xml"));
}

#[test]
fn test_zero_retriever_top_k_rejected() {
    let mut config = AppConfig::default();
    config.analysis.retriever_top_k = 0;
    assert!(config.validate().is_err());
}
