//! Configure, build and test orchestration.
//!
//! The run is a tiny state machine over the build directory:
//!
//! | state     | rebuild | steps                                        |
//! |-----------|---------|----------------------------------------------|
//! | `Missing` | any     | create, configure, build, test               |
//! | `Exists`  | yes     | remove, create, configure, build, test       |
//! | `Exists`  | no      | build, test                                  |
//!
//! External commands never abort the run. A non-zero exit is reported and
//! the next step still runs; the overall exit code is the code of the last
//! command that ran.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::{cmake, make, test_binary};
use crate::core::build_dir::{BuildDir, DirState};
use crate::core::options::Options;
use crate::util::fs::{ensure_dir, remove_dir_all_if_exists};
use crate::util::process::{find_executable, CommandRunner, ProcessBuilder, SPAWN_FAILURE_CODE};
use crate::util::shell::{Shell, Status};

/// One step of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    RemoveDir,
    CreateDir,
    Configure,
    Build,
    Test,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::RemoveDir => "remove build directory",
            Step::CreateDir => "create build directory",
            Step::Configure => "configure",
            Step::Build => "build",
            Step::Test => "test",
        };
        f.write_str(s)
    }
}

/// Decide which steps to run.
pub fn plan(state: DirState, rebuild: bool) -> Vec<Step> {
    match (state, rebuild) {
        (DirState::Missing, _) => vec![Step::CreateDir, Step::Configure, Step::Build, Step::Test],
        (DirState::Exists, true) => vec![
            Step::RemoveDir,
            Step::CreateDir,
            Step::Configure,
            Step::Build,
            Step::Test,
        ],
        (DirState::Exists, false) => vec![Step::Build, Step::Test],
    }
}

/// Result of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub step: Step,
    pub command: String,
    pub exit_code: i32,
}

/// Summary of a run.
#[derive(Debug, Clone)]
pub struct ConfigureReport {
    /// Build directory as the layout presents it.
    pub build_dir: PathBuf,
    /// State found before anything ran.
    pub initial_state: DirState,
    /// Planned steps, in order.
    pub steps: Vec<Step>,
    /// External commands that ran, in order. Empty for a dry run.
    pub commands: Vec<CommandOutcome>,
    /// Exit code of the last command, or 0 if none ran.
    pub exit_code: i32,
}

impl ConfigureReport {
    /// The configure command line, if the configure step ran.
    pub fn configure_command(&self) -> Option<&str> {
        self.commands
            .iter()
            .find(|c| c.step == Step::Configure)
            .map(|c| c.command.as_str())
    }
}

/// Warn about required programs that are not on `PATH`.
///
/// Nothing is aborted: the affected steps will report the spawn failure.
pub fn preflight(opts: &Options, shell: &Shell) {
    for program in [&opts.cmake, &opts.make] {
        if find_executable(program).is_none() {
            shell.warn(format!("`{}` not found in PATH", program.display()));
        }
    }
}

/// Run the configure/build/test sequence.
///
/// `cwd` is the invoking process's working directory; the process's own
/// working directory is never changed. Errors are returned only for invalid
/// options and for failures creating or removing the build directory.
pub fn configure(
    opts: &Options,
    cwd: &Path,
    runner: &mut dyn CommandRunner,
    shell: &Shell,
) -> Result<ConfigureReport> {
    opts.validate()?;

    if opts.build {
        tracing::debug!("--build given; building is part of every run");
    }

    let build_dir = BuildDir::resolve(opts, cwd);
    build_dir.check()?;
    let initial_state = build_dir.state();
    let steps = plan(initial_state, opts.rebuild);

    tracing::debug!(
        "build directory {:?}, rebuild: {}, plan: {:?}",
        initial_state,
        opts.rebuild,
        steps
    );

    shell.note(format!(
        "build directory {} ({} layout)",
        build_dir.path().display(),
        opts.layout
    ));

    let mut report = ConfigureReport {
        build_dir: build_dir.path().to_path_buf(),
        initial_state,
        steps: steps.clone(),
        commands: Vec::new(),
        exit_code: 0,
    };

    if opts.dry_run {
        for step in &steps {
            shell.status(Status::Info, describe(*step, opts, &build_dir));
        }
        return Ok(report);
    }

    if initial_state == DirState::Exists && !opts.rebuild {
        shell.status(
            Status::Skipped,
            "configure (build directory exists; pass --rebuild to reconfigure)",
        );
    }

    for step in steps {
        match step {
            Step::RemoveDir => {
                remove_dir_all_if_exists(build_dir.absolute())?;
                shell.status(Status::Removed, build_dir.path().display());
            }
            Step::CreateDir => {
                ensure_dir(build_dir.absolute())?;
                shell.status(Status::Created, build_dir.path().display());
            }
            Step::Configure => {
                let cmd = cmake::configure_command(opts, &build_dir);
                shell.status(Status::Configuring, cmd.display_command());
                report.commands.push(run_step(step, &cmd, runner, shell));
            }
            Step::Build => {
                let cmd = make::build_command(opts, &build_dir);
                shell.status(Status::Building, cmd.display_command());
                report.commands.push(run_step(step, &cmd, runner, shell));
            }
            Step::Test => {
                let cmd = test_binary::test_command(opts, &build_dir);
                shell.status(
                    Status::Running,
                    test_binary::display_name(opts).display(),
                );
                report.commands.push(run_step(step, &cmd, runner, shell));
            }
        }
    }

    report.exit_code = report.commands.last().map_or(0, |c| c.exit_code);

    if report.exit_code == 0 {
        shell.status(Status::Finished, "all steps succeeded");
    }

    Ok(report)
}

fn run_step(
    step: Step,
    cmd: &ProcessBuilder,
    runner: &mut dyn CommandRunner,
    shell: &Shell,
) -> CommandOutcome {
    let exit_code = match runner.run(cmd) {
        Ok(code) => code,
        Err(e) => {
            shell.warn(format!("{:#}", e));
            SPAWN_FAILURE_CODE
        }
    };

    if exit_code != 0 {
        shell.warn(format!("{} step exited with code {}", step, exit_code));
    }

    CommandOutcome {
        step,
        command: cmd.display_command(),
        exit_code,
    }
}

fn describe(step: Step, opts: &Options, build_dir: &BuildDir) -> String {
    match step {
        Step::RemoveDir => format!("would remove {}", build_dir.path().display()),
        Step::CreateDir => format!("would create {}", build_dir.path().display()),
        Step::Configure => format!(
            "would run `{}`",
            cmake::configure_command(opts, build_dir).display_command()
        ),
        Step::Build => format!(
            "would run `{}`",
            make::build_command(opts, build_dir).display_command()
        ),
        Step::Test => format!("would run `{}`", test_binary::display_name(opts).display()),
    }
}
