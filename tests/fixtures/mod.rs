//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test file uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the labelsheet binary
pub fn labelsheet_bin() -> &'static str {
    env!("CARGO_BIN_EXE_labelsheet")
}

/// Two entries, no conflicts.
pub const VALID_SHEET_TOML: &str = r#"
layout = "40L"

[[entry]]
text = "12345678"
cells = "1-3,7"

[[entry]]
text = "ABC-42"
cells = [10, 65]
"#;

/// Second entry asks for a cell the first already owns, third leaves the sheet.
pub const CONFLICTING_SHEET_TOML: &str = r#"
[[entry]]
text = "A"
cells = [5]

[[entry]]
text = "B"
cells = [4, 5]

[[entry]]
text = "C"
cells = [66]
"#;

/// Same entries as [`VALID_SHEET_TOML`] in JSON.
pub const VALID_SHEET_JSON: &str = r#"{
  "layout": "40L",
  "entries": [
    {"text": "12345678", "cells": "1-3,7"},
    {"text": "ABC-42", "cells": [10, 65]}
  ]
}"#;

/// Isolated working and config directory for one test.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    /// Creates an empty environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("config")).expect("Failed to create config dir");
        Self { dir }
    }

    /// Root of the environment.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Isolated config directory.
    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    /// Writes a file relative to the root.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    /// Writes `config.toml` into the isolated config directory.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.config_dir().join("config.toml");
        fs::write(&path, content).expect("Failed to write config file");
        path
    }

    /// Command running in the environment root with the isolated config.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(labelsheet_bin());
        cmd.current_dir(self.dir.path());
        cmd.env("LABELSHEET_CONFIG_DIR", self.config_dir());
        cmd.env_remove("RUST_LOG");
        cmd.args(args);
        cmd
    }

    /// Runs a command and returns its output.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute command")
    }
}

/// Stdout as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Stderr as a string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
