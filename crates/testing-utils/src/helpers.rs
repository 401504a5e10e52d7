//! Filesystem helpers for log-analysis tests

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary submit directory laid out as `<root>/jobs/<label>/<components>/`
pub struct TestSubmitDir {
    dir: TempDir,
}

impl TestSubmitDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp submit dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Creates (if needed) the log directory for a job and returns it
    pub fn log_dir(&self, job_label: &str, components: &[&str]) -> PathBuf {
        let mut dir = self.dir.path().join("jobs").join(job_label);
        for component in components {
            dir.push(component);
        }
        fs::create_dir_all(&dir).expect("create log dir");
        dir
    }

    /// Writes a log file into the job's log directory
    pub fn write_log(
        &self,
        job_label: &str,
        components: &[&str],
        file_name: &str,
        content: &str,
    ) -> PathBuf {
        let path = self.log_dir(job_label, components).join(file_name);
        fs::write(&path, content).expect("write log file");
        path
    }

    /// Writes an arbitrary file relative to the submit directory
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, content).expect("write file");
        path
    }
}

impl Default for TestSubmitDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Joins lines with `\n`, handy for building log file contents
pub fn log_text(lines: &[&str]) -> String {
    lines.join("\n")
}
