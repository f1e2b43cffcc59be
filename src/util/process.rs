//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};

/// Exit code reported for a command that could not be spawned at all,
/// matching what a POSIX shell reports for "command not found".
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute with inherited stdio and return the exit status.
    pub fn status(&self) -> Result<ExitStatus> {
        let mut cmd = self.build_command();
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))?;
        Ok(status)
    }

    /// Display the command as a single shell-style line.
    ///
    /// Arguments containing whitespace are wrapped in double quotes.
    pub fn display_command(&self) -> String {
        let mut parts = vec![quote(&self.program.display().to_string())];
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

fn quote(s: &str) -> String {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        format!("\"{}\"", s)
    } else {
        s.to_string()
    }
}

/// Runs external commands to completion.
///
/// The orchestration layer only ever needs the exit code; stdio is inherited.
pub trait CommandRunner {
    /// Run the command and return its exit code.
    ///
    /// An `Err` means the command could not be started.
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<i32>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<i32> {
        tracing::debug!("spawning `{}`", cmd.display_command());
        let status = cmd.status()?;
        Ok(exit_code(status))
    }
}

/// Map an exit status to a numeric code.
///
/// Signal-terminated processes report `128 + signal` on Unix, like a shell.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Find an executable in PATH.
pub fn find_executable(name: impl AsRef<OsStr>) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("make").args(["-j", "10"]);

        assert_eq!(pb.display_command(), "make -j 10");
    }

    #[test]
    fn test_display_command_quotes_whitespace() {
        let pb = ProcessBuilder::new("cmake").args(["-G", "Unix Makefiles"]);

        assert_eq!(pb.display_command(), "cmake -G \"Unix Makefiles\"");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let mut runner = SystemRunner;

        let ok = ProcessBuilder::new("sh").args(["-c", "exit 0"]);
        assert_eq!(runner.run(&ok).unwrap(), 0);

        let failing = ProcessBuilder::new("sh").args(["-c", "exit 3"]);
        assert_eq!(runner.run(&failing).unwrap(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_uses_cwd() {
        let tmp = tempfile::TempDir::new().unwrap();
        let pb = ProcessBuilder::new("sh")
            .args(["-c", "touch marker"])
            .cwd(tmp.path());

        assert_eq!(SystemRunner.run(&pb).unwrap(), 0);
        assert!(tmp.path().join("marker").exists());
    }

    #[test]
    fn test_system_runner_missing_program() {
        let pb = ProcessBuilder::new("dt-configure-no-such-program");
        assert!(SystemRunner.run(&pb).is_err());
    }
}
