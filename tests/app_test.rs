#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use condor_monitor::Application;
    use condor_monitor_core::{AppConfig, MonitorError};
    use condor_monitor_dispatcher::DispatchOptions;
    use condor_monitor_testing_utils::{
        log_text, schedulers, CallKind, InMemoryNodeStatusReader, JobRecordBuilder,
        MockQueryBackend, MockSchedulerLocator, NodeInfoBuilder, TestSubmitDir,
    };
    use serde_json::json;
    use tempfile::Builder;

    fn app_with(
        config: AppConfig,
        locator: MockSchedulerLocator,
        backend: &MockQueryBackend,
        reader: InMemoryNodeStatusReader,
    ) -> Application {
        Application::with_backends(
            config,
            Arc::new(locator),
            Arc::new(backend.clone()),
            Arc::new(reader),
        )
    }

    #[tokio::test]
    async fn test_workflows_across_discovered_schedulers() {
        let backend = MockQueryBackend::new()
            .with_live(
                "schedd01",
                JobRecordBuilder::new()
                    .workflow("100.0", "run_a", "/submit/a")
                    .build(),
            )
            .with_live(
                "schedd02",
                JobRecordBuilder::new()
                    .workflow("200.0", "run_b", "/submit/b")
                    .build(),
            );
        let app = app_with(
            AppConfig::default(),
            MockSchedulerLocator::new(schedulers(&["schedd01", "schedd02"])),
            &backend,
            InMemoryNodeStatusReader::new(),
        );

        let workflows = app
            .workflows("jdoe", None, &DispatchOptions::default())
            .await
            .unwrap();

        assert_eq!(workflows.len(), 2);
        assert_eq!(workflows[&100].scheduler, "schedd01");
        assert_eq!(workflows[&200].run_label, "run_b");
        assert!(backend.calls().iter().all(|c| c.kind == CallKind::Live));
    }

    #[tokio::test]
    async fn test_default_history_window_from_config() {
        let backend = MockQueryBackend::new();
        let mut config = AppConfig::default();
        config.locator.default_history_days = Some(2.0);
        let app = app_with(
            config,
            MockSchedulerLocator::new(schedulers(&["schedd01"])),
            &backend,
            InMemoryNodeStatusReader::new(),
        );

        app.workflows("jdoe", None, &DispatchOptions::default())
            .await
            .unwrap();

        let kinds: Vec<CallKind> = backend.calls().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CallKind::Live, CallKind::History]);
    }

    #[tokio::test]
    async fn test_discovery_failure_propagates() {
        let backend = MockQueryBackend::new();
        let app = app_with(
            AppConfig::default(),
            MockSchedulerLocator::failing("collector unreachable"),
            &backend,
            InMemoryNodeStatusReader::new(),
        );

        let err = app
            .workflows("jdoe", None, &DispatchOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, MonitorError::Upstream { .. }));
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_tools_for_workflow() {
        let submit = TestSubmitDir::new();
        let log = submit.write_log(
            "isr",
            &["1"],
            "job_7.0.out",
            &log_text(&["INFO start", "ERROR bad input", "trace", "INFO end"]),
        );
        let reader = InMemoryNodeStatusReader::new().with_store(
            submit.path(),
            vec![NodeInfoBuilder::new("7.0", "isr")
                .node("isr_1")
                .terminated(2, false)
                .build()],
        );
        let app = app_with(
            AppConfig::default(),
            MockSchedulerLocator::default(),
            &MockQueryBackend::new(),
            reader,
        );

        let tools = app
            .agent_tools(Some(submit.path()), &[log.clone()])
            .unwrap();

        assert_eq!(tools.definitions().len(), 3);
        let found = tools
            .invoke("find_log_files", &json!({"query": "ExitCode == 2"}))
            .unwrap();
        assert_eq!(found, json!([log.display().to_string()]));

        let summary = tools
            .invoke("load_log_summary", &json!({"file_list": [log.display().to_string()]}))
            .unwrap();
        assert_eq!(
            summary,
            json!(format!(
                "--- ANALYSIS OF {} ---\nERROR bad input\ntrace\n",
                log.display()
            ))
        );
    }

    #[test]
    fn test_config_file_drives_components() {
        let file = Builder::new().suffix(".toml").tempfile().unwrap();
        fs::write(
            file.path(),
            r#"
[dispatcher]
max_workers = 2

[analysis]
finder_default_limit = 1
retriever_top_k = 1
"#,
        )
        .unwrap();

        let config = AppConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.dispatcher.max_workers, Some(2));

        let app = Application::new(config);
        assert_eq!(app.config().analysis.retriever_top_k, 1);
        assert_eq!(app.config().condor.condor_q, "condor_q");
    }
}
