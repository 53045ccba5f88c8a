//! Common test utilities and helpers
//!
//! Every command runs with `GENFORGE_HOME` pointed at its own temporary
//! directory and with CI and override variables cleared.

#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CLEARED_VARS: &[&str] = &[
    "GENFORGE_NON_INTERACTIVE",
    "RUST_LOG",
    "CI",
    "CONTINUOUS_INTEGRATION",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TF_BUILD",
    "TEAMCITY_VERSION",
    "BUILD_NUMBER",
];

/// Test command builder for the genforge binary
pub struct TestCommand {
    cmd: Command,
}

impl TestCommand {
    pub fn new(home: &Path) -> Self {
        let mut cmd = Command::cargo_bin("genforge").expect("Failed to find genforge binary");
        for var in CLEARED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("GENFORGE_HOME", home);
        cmd.current_dir(home);
        Self { cmd }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.cmd.arg(arg.as_ref());
        }
        self
    }

    pub fn arg<S: AsRef<std::ffi::OsStr>>(mut self, arg: S) -> Self {
        self.cmd.arg(arg);
        self
    }

    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.cmd.env(key.as_ref(), val.as_ref());
        self
    }

    /// Write stdin input
    pub fn stdin<S: AsRef<str>>(mut self, input: S) -> Self {
        self.cmd.write_stdin(input.as_ref());
        self
    }

    pub fn expect_success(mut self) -> TestAssertion {
        let assert = self.cmd.assert().success();
        TestAssertion { assert }
    }

    /// Execute and expect the given exit code
    pub fn expect_code(mut self, code: i32) -> TestAssertion {
        let assert = self.cmd.assert().code(code);
        TestAssertion { assert }
    }
}

/// Test assertion wrapper with convenient methods
pub struct TestAssertion {
    assert: assert_cmd::assert::Assert,
}

impl TestAssertion {
    pub fn stdout_contains<S: AsRef<str>>(self, text: S) -> Self {
        let assert = self.assert.stdout(predicate::str::contains(text.as_ref()));
        Self { assert }
    }

    pub fn stdout_contains_all<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.assert = self.assert.stdout(predicate::str::contains(pattern.as_ref()));
        }
        Self { assert: self.assert }
    }

    pub fn stdout_empty(self) -> Self {
        let assert = self.assert.stdout(predicate::str::is_empty());
        Self { assert }
    }

    pub fn stderr_contains<S: AsRef<str>>(self, text: S) -> Self {
        let assert = self.assert.stderr(predicate::str::contains(text.as_ref()));
        Self { assert }
    }

    pub fn stderr_lacks<S: AsRef<str>>(self, text: S) -> Self {
        let assert = self
            .assert
            .stderr(predicate::str::contains(text.as_ref()).not());
        Self { assert }
    }

    /// Captured stdout as a string
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stdout).into_owned()
    }

    pub fn done(self) -> assert_cmd::assert::Assert {
        self.assert
    }
}

/// Test environment setup helper
pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    pub fn home(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// A command configured for this environment
    pub fn command(&self) -> TestCommand {
        TestCommand::new(self.home())
    }

    /// Generate a project non-interactively into `<home>/<name>`
    pub fn generate(&self, name: &str, template: &str) -> PathBuf {
        self.command()
            .args(["generate", name, "--non-interactive", "--template", template])
            .expect_success()
            .done();
        self.path(name)
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// Assertion helpers for common patterns
pub mod assertions {
    pub fn assert_path_exists<P: AsRef<std::path::Path>>(path: P) {
        assert!(
            path.as_ref().exists(),
            "Path should exist: {}",
            path.as_ref().display()
        );
    }
}
