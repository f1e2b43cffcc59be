//! dt-configure - configure, build and run the dt test suite
//!
//! This crate drives a CMake project through its whole test cycle: it
//! manages the build directory, runs the CMake configure step, builds with
//! `make`, and executes the resulting test binary.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// Only compiled for tests. Provides a recording command runner so the
/// orchestration can be checked without `cmake` or `make` installed.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{BuildDir, DirState, Layout, Options};
pub use ops::{configure, ConfigureReport};
pub use util::config::Config;
