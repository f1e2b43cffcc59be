//! Invocation options.
//!
//! [`Options`] is built once per run from the config file and the command
//! line, validated, and never mutated afterwards.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::config::Config;

/// Default build directory name.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default `make -j` parallelism.
pub const DEFAULT_JOBS: usize = 10;

/// Default name of the test executable produced by the build.
pub const DEFAULT_TEST_BINARY: &str = "tests";

/// How the build directory path is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Absolute path under the canonical source directory.
    #[default]
    Anchored,
    /// Path relative to the current working directory.
    Relative,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anchored" => Ok(Layout::Anchored),
            "relative" => Ok(Layout::Relative),
            _ => Err(format!(
                "invalid layout '{}'; expected 'anchored' or 'relative'",
                s
            )),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Anchored => write!(f, "anchored"),
            Layout::Relative => write!(f, "relative"),
        }
    }
}

/// Rejected option values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("`jobs` must be at least 1")]
    ZeroJobs,

    #[error("build directory name must not be empty")]
    EmptyBuildDir,

    #[error("build directory `{}` must be a relative path below the source directory", .0.display())]
    BuildDirEscapes(PathBuf),

    #[error(
        "build directory `{}` would contain the source directory `{}`",
        .build.display(),
        .source_dir.display()
    )]
    BuildDirContainsSource { build: PathBuf, source_dir: PathBuf },

    #[error("build directory `{}` exists but is not a directory", .0.display())]
    BuildDirNotADirectory(PathBuf),

    #[error("test binary name must not be empty")]
    EmptyTestBinary,

    #[error("invalid CMake define `{0}`; expected NAME or NAME=VALUE")]
    InvalidDefine(String),
}

/// Everything a single run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Custom Boost library directory, passed as `-DBOOST_LIBRARY_DIRS`.
    pub boost_lib_dir: Option<String>,

    /// `--build`. Accepted for compatibility; it does not change what runs.
    pub build: bool,

    /// Remove and recreate an existing build directory.
    pub rebuild: bool,

    /// CMake source directory (contains the top-level CMakeLists.txt).
    pub source_dir: PathBuf,

    pub layout: Layout,

    /// Build directory name, relative to the layout's base.
    pub build_dir: PathBuf,

    pub jobs: usize,

    /// CMake program.
    pub cmake: PathBuf,

    /// Make program.
    pub make: PathBuf,

    /// Extra `-D` definitions, appended after the fixed set.
    pub defines: Vec<String>,

    /// Test executable name inside the build directory.
    pub test_binary: String,

    pub test_args: Vec<String>,

    /// Print the plan without touching the filesystem or running anything.
    pub dry_run: bool,
}

impl Options {
    /// Options with every built-in default, rooted at `source_dir`.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Options {
            boost_lib_dir: None,
            build: false,
            rebuild: false,
            source_dir: source_dir.into(),
            layout: Layout::default(),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            jobs: DEFAULT_JOBS,
            cmake: PathBuf::from("cmake"),
            make: PathBuf::from("make"),
            defines: Vec::new(),
            test_binary: DEFAULT_TEST_BINARY.to_string(),
            test_args: Vec::new(),
            dry_run: false,
        }
    }

    /// Defaults overlaid with the values set in a config file.
    pub fn from_config(source_dir: impl Into<PathBuf>, config: &Config) -> Self {
        let mut opts = Options::new(source_dir);

        if let Some(ref dir) = config.build.dir {
            opts.build_dir = dir.clone();
        }
        if let Some(layout) = config.build.layout {
            opts.layout = layout;
        }
        if let Some(jobs) = config.build.jobs {
            opts.jobs = jobs;
        }
        if let Some(ref cmake) = config.tools.cmake {
            opts.cmake = cmake.clone();
        }
        if let Some(ref make) = config.tools.make {
            opts.make = make.clone();
        }
        opts.boost_lib_dir = config.cmake.boost_lib_dir.clone();
        opts.defines = config.cmake.defines.clone();
        if let Some(ref binary) = config.test.binary {
            opts.test_binary = binary.clone();
        }
        opts.test_args = config.test.args.clone();

        opts
    }

    /// Check invariants the orchestration relies on.
    ///
    /// The build directory must stay strictly below its base: a rebuild
    /// deletes it recursively.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.jobs == 0 {
            return Err(OptionsError::ZeroJobs);
        }

        validate_build_dir(&self.build_dir)?;

        if self.test_binary.trim().is_empty() {
            return Err(OptionsError::EmptyTestBinary);
        }

        for define in &self.defines {
            let name = define.split('=').next().unwrap_or_default();
            if name.is_empty() || name.starts_with('-') || name.contains(char::is_whitespace) {
                return Err(OptionsError::InvalidDefine(define.clone()));
            }
        }

        Ok(())
    }
}

fn validate_build_dir(dir: &Path) -> Result<(), OptionsError> {
    if dir.as_os_str().is_empty() {
        return Err(OptionsError::EmptyBuildDir);
    }

    let all_normal = dir
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !all_normal || dir.components().next().is_none() {
        return Err(OptionsError::BuildDirEscapes(dir.to_path_buf()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::new("/src/dt");
        assert_eq!(opts.build_dir, PathBuf::from("build"));
        assert_eq!(opts.layout, Layout::Anchored);
        assert_eq!(opts.jobs, 10);
        assert_eq!(opts.test_binary, "tests");
        assert!(opts.boost_lib_dir.is_none());
        assert!(!opts.rebuild);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("anchored".parse::<Layout>().unwrap(), Layout::Anchored);
        assert_eq!("Relative".parse::<Layout>().unwrap(), Layout::Relative);
        assert!("absolute".parse::<Layout>().is_err());
        assert_eq!(Layout::Relative.to_string(), "relative");
    }

    #[test]
    fn test_from_config_overlays_defaults() {
        let config: Config = toml::from_str(
            r#"
[build]
dir = "out"
jobs = 4

[cmake]
boost_lib_dir = "/opt/boost"
"#,
        )
        .unwrap();

        let opts = Options::from_config("/src/dt", &config);
        assert_eq!(opts.build_dir, PathBuf::from("out"));
        assert_eq!(opts.jobs, 4);
        assert_eq!(opts.boost_lib_dir.as_deref(), Some("/opt/boost"));
        // Untouched fields keep their defaults
        assert_eq!(opts.layout, Layout::Anchored);
        assert_eq!(opts.make, PathBuf::from("make"));
    }

    #[test]
    fn test_validate_rejects_zero_jobs() {
        let mut opts = Options::new("/src/dt");
        opts.jobs = 0;
        assert_eq!(opts.validate(), Err(OptionsError::ZeroJobs));
    }

    #[test]
    fn test_validate_rejects_escaping_build_dir() {
        for dir in ["..", "../build", "/tmp/build", ".", "build/../.."] {
            let mut opts = Options::new("/src/dt");
            opts.build_dir = PathBuf::from(dir);
            assert_eq!(
                opts.validate(),
                Err(OptionsError::BuildDirEscapes(PathBuf::from(dir))),
                "{dir} should be rejected"
            );
        }

        let mut opts = Options::new("/src/dt");
        opts.build_dir = PathBuf::new();
        assert_eq!(opts.validate(), Err(OptionsError::EmptyBuildDir));

        opts.build_dir = PathBuf::from("out/debug");
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_defines() {
        let mut opts = Options::new("/src/dt");
        opts.defines = vec!["ENABLE_FOO=ON".into(), "BAR".into()];
        assert!(opts.validate().is_ok());

        opts.defines = vec!["=ON".into()];
        assert!(matches!(opts.validate(), Err(OptionsError::InvalidDefine(_))));

        opts.defines = vec!["-DFOO=1".into()];
        assert!(matches!(opts.validate(), Err(OptionsError::InvalidDefine(_))));
    }

    #[test]
    fn test_validate_rejects_empty_test_binary() {
        let mut opts = Options::new("/src/dt");
        opts.test_binary = "  ".into();
        assert_eq!(opts.validate(), Err(OptionsError::EmptyTestBinary));
    }
}
