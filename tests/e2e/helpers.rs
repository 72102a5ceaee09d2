use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub struct TestProject {
    pub dir: TempDir,
    pub binary_path: String,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary_path = env!("CARGO_BIN_EXE_header-auditor").to_string();

        Self { dir, binary_path }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn run_auditor(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run header-auditor")
    }

    /// Run `check --format json` and parse the report
    pub fn check_json(&self, args: &[&str]) -> (Output, serde_json::Value) {
        let mut full_args = vec!["check", "--format", "json", "--exit-zero"];
        full_args.extend_from_slice(args);
        let output = self.run_auditor(&full_args);
        let report = serde_json::from_slice(&output.stdout).expect("Failed to parse JSON report");
        (output, report)
    }
}

/// Verdict kind of `file` in a JSON report
pub fn kind_of(report: &serde_json::Value, file: &str) -> Option<String> {
    report["verdicts"]
        .as_array()?
        .iter()
        .find(|verdict| verdict["path"].as_str().map_or(false, |path| path.ends_with(file)))
        .and_then(|verdict| verdict["kind"].as_str())
        .map(str::to_string)
}

pub const STANDARD_NOTICE: &str = "// Copyright 2023 The Lynx Authors. All rights reserved.\n\npackage com.lynx;\n";

pub const APACHE_HEADER_BODY: &str = " * Copyright 2013 Paul LeBeau, Cave Rock Software Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the \"License\");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an \"AS IS\" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
";
