#[cfg(test)]
mod tests {
    use condor_monitor_analysis::LogFileFinder;
    use condor_monitor_core::models::JobStatusRow;
    use condor_monitor_core::{JobStatusTable, MonitorError};
    use condor_monitor_testing_utils::TestSubmitDir;

    fn row(job_id: &str, node: &str, label: &str, exit_code: i64) -> JobStatusRow {
        JobStatusRow {
            job_id: job_id.to_string(),
            node: node.to_string(),
            node_status: if exit_code == 0 { "Done" } else { "Error" }.to_string(),
            exit_code,
            exit_by_signal: Some(false),
            node_type: "PAYLOAD".to_string(),
            worker_node: None,
            job_label: label.to_string(),
        }
    }

    fn finder(submit: &TestSubmitDir, rows: Vec<JobStatusRow>) -> LogFileFinder {
        LogFileFinder::new(JobStatusTable::new(submit.path(), rows))
    }

    #[test]
    fn test_find_failed_job_logs() {
        let submit = TestSubmitDir::new();
        let failed = submit.write_log(
            "isr",
            &["903342", "10"],
            "u_jdoe_run_31.0_isr_903342_10.out",
            "ERROR boom",
        );
        submit.write_log("isr", &["903342", "10"], "u_jdoe_run_31.0_isr_903342_10.err", "");
        submit.write_log("isr", &["903342", "11"], "u_jdoe_run_32.0_isr_903342_11.out", "INFO ok");

        let finder = finder(
            &submit,
            vec![
                row("31.0", "isr_903342_10", "isr", 1),
                row("32.0", "isr_903342_11", "isr", 0),
            ],
        );

        assert_eq!(finder.find("ExitCode==1", None).unwrap(), vec![failed]);
        assert_eq!(finder.find("ExitCode >= 0", None).unwrap().len(), 2);
    }

    #[test]
    fn test_limit_applies_in_table_order() {
        let submit = TestSubmitDir::new();
        let mut rows = Vec::new();
        for id in 40..45 {
            let component = id.to_string();
            let node = format!("calibrate_{id}");
            submit.write_log("calibrate", &[component.as_str()], &format!("job_{id}.out"), "");
            rows.push(row(&format!("{id}.0"), &node, "calibrate", 1));
        }
        let finder = finder(&submit, rows).with_default_limit(2);

        let files = finder.find("exit_code == 1", None).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("calibrate/40/job_40.out"));
        assert!(files[1].ends_with("calibrate/41/job_41.out"));

        assert_eq!(finder.find("exit_code == 1", Some(4)).unwrap().len(), 4);
        assert!(finder.find("exit_code == 1", Some(0)).unwrap().is_empty());
    }

    #[test]
    fn test_missing_log_directory() {
        let submit = TestSubmitDir::new();
        let finder = finder(&submit, vec![row("7.0", "isr_1", "isr", 1)]);

        let err = finder.find("ExitCode == 1", None).unwrap_err();
        assert!(matches!(err, MonitorError::LogDirectoryMissing { .. }));
    }

    #[test]
    fn test_lookup_mismatch() {
        let submit = TestSubmitDir::new();
        submit.log_dir("isr", &["1"]);
        submit.write_log("isr", &["2"], "a_8.out", "");
        submit.write_log("isr", &["2"], "b_8.out", "");

        let finder = finder(
            &submit,
            vec![row("7.0", "isr_1", "isr", 1), row("8.0", "isr_2", "isr", 1)],
        );

        let err = finder.locate(&finder.table().rows()[0]).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::LookupMismatch { ref job_id, matches: 0, .. } if job_id == "7.0"
        ));

        let err = finder.locate(&finder.table().rows()[1]).unwrap_err();
        assert!(matches!(err, MonitorError::LookupMismatch { matches: 2, .. }));
    }

    #[test]
    fn test_invalid_query_rejected() {
        let submit = TestSubmitDir::new();
        let finder = finder(&submit, Vec::new());
        assert!(matches!(
            finder.find("ExitCode ==", None),
            Err(MonitorError::InvalidQuery(_))
        ));
    }
}
