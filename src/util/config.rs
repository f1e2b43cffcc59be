//! Configuration file support.
//!
//! An optional `dt-configure.toml` in the source directory supplies defaults
//! for anything the command line does not set. Every key is optional:
//!
//! ```toml
//! [build]
//! dir = "build"
//! layout = "anchored"   # or "relative"
//! jobs = 10
//!
//! [tools]
//! cmake = "cmake"
//! make = "make"
//!
//! [cmake]
//! boost_lib_dir = "/opt/boost"
//! defines = ["DT_ENABLE_FOO=ON"]
//!
//! [test]
//! binary = "tests"
//! args = []
//! ```
//!
//! Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::options::Layout;

/// File name looked up in the source directory.
pub const CONFIG_FILE_NAME: &str = "dt-configure.toml";

/// dt-configure configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Build directory settings
    pub build: BuildConfig,

    /// External programs
    pub tools: ToolsConfig,

    /// CMake configure settings
    pub cmake: CMakeConfig,

    /// Test binary settings
    pub test: TestConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Build directory name
    pub dir: Option<PathBuf>,

    /// Build directory resolution strategy
    pub layout: Option<Layout>,

    /// Parallel jobs passed to make
    pub jobs: Option<usize>,
}

/// Paths or names of the external programs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub cmake: Option<PathBuf>,
    pub make: Option<PathBuf>,
}

/// CMake configure settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CMakeConfig {
    /// Custom Boost library directory
    pub boost_lib_dir: Option<String>,

    /// Extra definitions, without the `-D` prefix
    pub defines: Vec<String>,
}

/// Test binary settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestConfig {
    /// Executable name inside the build directory
    pub binary: Option<String>,

    /// Arguments passed to the test executable
    pub args: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file doesn't exist.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!("loading config from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Path of the project config file for a source directory.
pub fn project_config_path(source_dir: &Path) -> PathBuf {
    source_dir.join(CONFIG_FILE_NAME)
}
