//! Core data structures.

pub mod build_dir;
pub mod options;

pub use build_dir::{BuildDir, DirState};
pub use options::{Layout, Options, OptionsError};
