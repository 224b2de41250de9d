//! Shared testing utilities for clusterkit CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated environment for CLI exercises: a scratch working directory with
/// its own configuration file and installation home.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
    home_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        let home_dir = root.path().join("clusterkit-home");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        fs::create_dir_all(&home_dir).expect("Failed to create test home directory");
        Self { root, work_dir, home_dir }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Installation home the deployed release lands in.
    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.work_dir.join("clusterkit.cfg")
    }

    /// Write a configuration file from flat `key=value` lines, with the
    /// installation home pre-filled.
    pub fn write_config(&self, extra_lines: &[&str]) {
        let mut content = format!("home_directory={}\n", self.home_dir.display());
        for line in extra_lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(self.config_path(), content).expect("Failed to write test config");
    }

    /// A single-host configuration that deploys locally without touching
    /// system services.
    pub fn write_local_config(&self, extra_lines: &[&str]) {
        let mut lines = vec![
            "host_name=localhost",
            "userid=tungsten",
            "repl_role=master",
            "install_svc_scripts=false",
            "start_svc_scripts=false",
        ];
        lines.extend_from_slice(extra_lines);
        self.write_config(&lines);
    }

    /// Build a command invoking the compiled `clusterkit` binary in the
    /// work directory.
    pub fn cli(&self) -> Command {
        let mut cmd =
            Command::cargo_bin("clusterkit").expect("Failed to locate clusterkit binary");
        cmd.current_dir(&self.work_dir);
        cmd
    }

    /// Path of the generated replicator configuration directory.
    pub fn replicator_conf(&self) -> PathBuf {
        self.home_dir.join("releases/clusterkit/replicator/conf")
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).expect("Failed to read back test config")
    }
}
