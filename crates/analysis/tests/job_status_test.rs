#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use condor_monitor_analysis::JobStatusExtractor;
    use condor_monitor_core::MonitorError;
    use condor_monitor_testing_utils::{InMemoryNodeStatusReader, NodeInfoBuilder};
    use serde_json::json;

    #[test]
    fn test_extract_keeps_store_order_and_submit_dir() {
        let store = vec![
            NodeInfoBuilder::new("20.0", "isr")
                .node("isr_903342_10")
                .terminated(0, false)
                .slot("slot1_1@sdfrome001.sdf.slac.stanford.edu")
                .build(),
            NodeInfoBuilder::new("21.0", "calibrate")
                .node("calibrate_903342_10")
                .status(json!("Error"))
                .terminated(1, false)
                .build(),
            NodeInfoBuilder::new("22.0", "finalJob")
                .status(json!(1))
                .node_type(json!({"name": "FINAL"}))
                .build(),
        ];
        let reader = InMemoryNodeStatusReader::new().with_store("/submit/run1", store.clone());
        let extractor = JobStatusExtractor::new(Arc::new(reader));

        let (table, raw) = extractor.extract(Path::new("/submit/run1")).unwrap();

        assert_eq!(raw, store);
        assert_eq!(table.submit_dir(), Path::new("/submit/run1"));
        let ids: Vec<&str> = table.iter().map(|row| row.job_id.as_str()).collect();
        assert_eq!(ids, vec!["20.0", "21.0", "22.0"]);

        let final_job = table.find("22.0").unwrap();
        assert_eq!(final_job.node, "finalJob");
        assert_eq!(final_job.node_status, "Ready");
        assert_eq!(final_job.node_type, "FINAL");
        assert_eq!(final_job.exit_code, -1);
        assert_eq!(final_job.exit_by_signal, None);

        assert_eq!(table.rows()[0].worker_node.as_deref(), Some("sdfrome001"));
        assert_eq!(table.rows()[1].exit_code, 1);
    }

    #[test]
    fn test_missing_label_fails_whole_extraction() {
        let store = vec![
            NodeInfoBuilder::new("1.0", "isr").build(),
            NodeInfoBuilder::new("2.0", "isr").without("bps_job_label").build(),
        ];
        let reader = InMemoryNodeStatusReader::new().with_store("/submit", store);

        let err = JobStatusExtractor::new(Arc::new(reader))
            .extract(Path::new("/submit"))
            .unwrap_err();

        assert!(matches!(
            err,
            MonitorError::MalformedRecord { ref job_id, ref field }
                if job_id == "2.0" && field == "bps_job_label"
        ));
    }

    #[test]
    fn test_unavailable_store_propagates() {
        let extractor = JobStatusExtractor::new(Arc::new(InMemoryNodeStatusReader::new()));
        assert!(matches!(
            extractor.extract(Path::new("/nowhere")),
            Err(MonitorError::NodeStatusUnavailable { .. })
        ));
    }
}
