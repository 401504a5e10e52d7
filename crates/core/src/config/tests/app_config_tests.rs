use crate::config::models::AppConfig;

#[test]
fn test_default_config() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());

    assert_eq!(config.dispatcher.max_workers, None);
    assert_eq!(config.condor.condor_q, "condor_q");
    assert_eq!(config.locator.job_universe, 7);
    assert_eq!(config.locator.run_label_attribute, "bps_run");
    assert_eq!(config.analysis.finder_default_limit, 10);
    assert_eq!(config.analysis.retriever_top_k, 3);
    assert_eq!(config.observability.log_format, "pretty");
}

#[test]
fn test_config_from_toml() {
    let toml_content = r#"
[dispatcher]
max_workers = 4
worker_timeout_seconds = 60

[condor]
condor_q = "/opt/condor/bin/condor_q"
pool = "collector.example.org"
command_timeout_seconds = 30

[locator]
reject_duplicates = true
default_history_days = 2.5

[observability]
log_level = "debug"
"#;

    let config = AppConfig::from_toml(toml_content).unwrap();

    assert_eq!(config.dispatcher.max_workers, Some(4));
    assert_eq!(config.dispatcher.worker_timeout_seconds, Some(60));
    assert_eq!(config.condor.condor_q, "/opt/condor/bin/condor_q");
    assert_eq!(config.condor.condor_history, "condor_history");
    assert_eq!(config.condor.pool.as_deref(), Some("collector.example.org"));
    assert!(config.locator.reject_duplicates);
    assert_eq!(config.locator.default_history_days, Some(2.5));
    assert_eq!(config.observability.log_level, "debug");
    // 未出现的配置段使用默认值
    assert_eq!(config.analysis.node_status_file, "node_status.json");
}

#[test]
fn test_config_to_toml() {
    let mut config = AppConfig::default();
    config.dispatcher.max_workers = Some(8);
    let toml_str = config.to_toml().unwrap();

    let parsed_config = AppConfig::from_toml(&toml_str).unwrap();
    assert_eq!(parsed_config.dispatcher.max_workers, Some(8));
    assert_eq!(config.condor.condor_status, parsed_config.condor.condor_status);
}
