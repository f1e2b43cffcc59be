//! Centralized shell output.
//!
//! All user-facing status lines go through [`Shell`] so that commands never
//! manage alignment, color, or quiet mode themselves. Lines are written to
//! stderr as `{status:>12} {message}`, the same shape cargo uses.

use std::fmt::Display;
use std::io::{self, IsTerminal};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: no status output
    Quiet,
    /// Default: status messages
    #[default]
    Normal,
    /// --verbose: status messages plus notes
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Created,
    Removed,
    Finished,

    // In-progress statuses (cyan)
    Configuring,
    Building,
    Running,

    // Info statuses (blue)
    Info,

    // Warning statuses (yellow)
    Skipped,
    Warning,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Removed => "Removed",
            Status::Finished => "Finished",
            Status::Configuring => "Configuring",
            Status::Building => "Building",
            Status::Running => "Running",
            Status::Info => "Info",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Created | Status::Removed | Status::Finished => "\x1b[1;32m",
            Status::Configuring | Status::Building | Status::Running => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Skipped | Status::Warning => "\x1b[1;33m",
        }
    }
}

const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
        }
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Shell::new(verbosity, color)
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status message. Nothing is printed in quiet mode.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print an info message. Only shown in verbose mode.
    pub fn note(&self, msg: impl Display) {
        if self.is_verbose() {
            self.status(Status::Info, msg);
        }
    }

    /// Print a warning message.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.color_code(),
                text,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}
