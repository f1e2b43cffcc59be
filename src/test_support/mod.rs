//! Test utilities for dt-configure unit tests.
//!
//! [`RecordingRunner`] stands in for real process execution: it records each
//! command it is asked to run (with its working directory) and answers with
//! scripted exit codes.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut runner = RecordingRunner::new();
//! runner.expect_program("make", MockOutcome::Exit(2));
//!
//! // ... drive the orchestration with `&mut runner` ...
//!
//! assert_eq!(runner.programs(), ["cmake", "make", "tests"]);
//! ```

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::util::process::{CommandRunner, ProcessBuilder};

/// What a mocked command does when run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOutcome {
    /// Exit with the given code.
    Exit(i32),
    /// Fail to spawn, as if the program was not found.
    SpawnError,
}

/// Pattern for matching commands.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Match on the program's file name (`cmake`, `make`, `tests`).
    Program(String),
    /// Match if the rendered command line contains a substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &ProcessBuilder) -> bool {
        match self {
            CommandPattern::Program(name) => program_name(cmd) == *name,
            CommandPattern::Contains(s) => cmd.display_command().contains(s.as_str()),
        }
    }
}

/// A recorded invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Program file name.
    pub program: String,
    /// Full rendered command line.
    pub command: String,
    /// Working directory the command was run in.
    pub cwd: Option<PathBuf>,
}

/// Mock command runner that records calls.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    expectations: Vec<(CommandPattern, MockOutcome)>,
    calls: Vec<Invocation>,
}

impl RecordingRunner {
    /// Create a runner where every command exits 0.
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// Script the outcome for a program by file name.
    pub fn expect_program(&mut self, name: &str, outcome: MockOutcome) -> &mut Self {
        self.expectations
            .push((CommandPattern::Program(name.to_string()), outcome));
        self
    }

    /// Script the outcome for any command line containing `substring`.
    pub fn expect_contains(&mut self, substring: &str, outcome: MockOutcome) -> &mut Self {
        self.expectations
            .push((CommandPattern::Contains(substring.to_string()), outcome));
        self
    }

    /// All recorded invocations, in order.
    pub fn calls(&self) -> &[Invocation] {
        &self.calls
    }

    /// Program file names of the recorded invocations, in order.
    pub fn programs(&self) -> Vec<String> {
        self.calls.iter().map(|c| c.program.clone()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<i32> {
        self.calls.push(Invocation {
            program: program_name(cmd),
            command: cmd.display_command(),
            cwd: cmd.get_cwd().map(|p| p.to_path_buf()),
        });

        let outcome = self
            .expectations
            .iter()
            .find(|(pattern, _)| pattern.matches(cmd))
            .map(|(_, outcome)| *outcome)
            .unwrap_or(MockOutcome::Exit(0));

        match outcome {
            MockOutcome::Exit(code) => Ok(code),
            MockOutcome::SpawnError => bail!("failed to execute `{}`", cmd.display_command()),
        }
    }
}

fn program_name(cmd: &ProcessBuilder) -> String {
    cmd.get_program()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_and_scripted_codes() {
        let mut runner = RecordingRunner::new();
        runner.expect_program("make", MockOutcome::Exit(2));
        runner.expect_contains("BOOST", MockOutcome::SpawnError);

        let make = ProcessBuilder::new("/usr/bin/make").args(["-j", "10"]).cwd("/tmp");
        assert_eq!(runner.run(&make).unwrap(), 2);

        let cmake = ProcessBuilder::new("cmake").arg("-DBOOST_LIBRARY_DIRS=/opt");
        assert!(runner.run(&cmake).is_err());

        let other = ProcessBuilder::new("tests");
        assert_eq!(runner.run(&other).unwrap(), 0);

        assert_eq!(runner.programs(), ["make", "cmake", "tests"]);
        assert_eq!(runner.calls()[0].command, "/usr/bin/make -j 10");
        assert_eq!(runner.calls()[0].cwd, Some(PathBuf::from("/tmp")));
    }
}
