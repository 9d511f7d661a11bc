//! Common utilities for CLI end-to-end tests.
//!
//! Every test gets its own data directory through `STUDYPLANNER_DATA_DIR`,
//! so tests run in parallel and never touch `~/.config/studyplanner/`.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Command for the CLI binary bound to this environment's data dir.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_studyplanner-cli"));
        cmd.env("STUDYPLANNER_DATA_DIR", self.data_dir.path());
        cmd.env_remove("STUDYPLANNER_LOG");
        cmd
    }

    /// Run `args`, expect success, and parse stdout as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.cli().args(args).assert().success().get_output().stdout.clone();
        parse_json(&output)
    }

    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Add a subject and return its id.
    pub fn add_subject(&self, name: &str, hours: &str, priority: &str) -> String {
        let subject = self.json(&["subject", "add", name, hours, "--priority", priority]);
        subject["id"].as_str().unwrap().to_string()
    }

    /// Add a task and return its id.
    pub fn add_task(&self, subject: &str, description: &str) -> String {
        let task = self.json(&["task", "add", subject, description]);
        task["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_json(bytes: &[u8]) -> serde_json::Value {
    serde_json::from_slice(bytes).expect("CLI output is not JSON")
}
