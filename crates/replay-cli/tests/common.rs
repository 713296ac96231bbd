//! Common test utilities shared across integration tests.
//!
//! Clippy cannot track usage across integration test files, hence the
//! `allow(dead_code)` annotation.
#![cfg(test)]
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SAMPLE_ID: &str = "7f3c2a10-5b6e-4d8f-9a1b-2c3d4e5f6a7b";
pub const SAMPLE_PROJECT: &str = "/Users/test_user/agent-sample";

pub struct TestFixture {
    temp_dir: TempDir,
    claude_dir: PathBuf,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let claude_dir = temp_dir.path().join(".claude");

        fs::create_dir_all(claude_dir.join("projects")).expect("Failed to create projects dir");

        Self {
            temp_dir,
            claude_dir,
        }
    }

    pub fn claude_dir(&self) -> &PathBuf {
        &self.claude_dir
    }

    pub fn samples_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("replay-providers/tests/samples")
    }

    /// Claude encodes project paths like: /Users/foo/bar -> -Users-foo-bar
    pub fn project_dir(&self, project: &str) -> PathBuf {
        let encoded = project
            .replace(['/', '.'], "-")
            .trim_start_matches('-')
            .to_string();
        self.claude_dir.join("projects").join(format!("-{}", encoded))
    }

    /// Copy the sample session into a Claude-encoded project directory
    pub fn copy_sample_to_project(&self, dest_name: &str, project: &str) -> anyhow::Result<PathBuf> {
        let dir = self.project_dir(project);
        fs::create_dir_all(&dir)?;

        let dest = dir.join(dest_name);
        fs::copy(Self::samples_dir().join("claude_session.jsonl"), &dest)?;
        Ok(dest)
    }

    pub fn write_session(
        &self,
        project: &str,
        dest_name: &str,
        lines: &[&str],
    ) -> anyhow::Result<PathBuf> {
        let dir = self.project_dir(project);
        fs::create_dir_all(&dir)?;

        let dest = dir.join(dest_name);
        fs::write(&dest, lines.join("\n"))?;
        Ok(dest)
    }

    pub fn write_file(&self, name: &str, content: &str) -> anyhow::Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn command(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("claude-replay");
        cmd.arg("--claude-dir")
            .arg(self.claude_dir())
            .env_remove("RUST_LOG")
            .env_remove("CLAUDE_CONFIG_DIR")
            .env("XDG_CONFIG_HOME", self.temp_dir.path().join("config"));
        cmd
    }
}
