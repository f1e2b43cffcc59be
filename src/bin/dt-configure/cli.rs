//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use dt_configure::util::shell::ColorChoice;
use dt_configure::{Config, Layout, Options};

/// Configure, build and run the dt test suite.
///
/// On the first run the build directory is created and CMake is configured.
/// Later runs reuse it and only rebuild and test, unless --rebuild is given.
#[derive(Debug, Parser)]
#[command(name = "dt-configure")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a custom Boost library directory
    #[arg(long = "boost_lib_dir", value_name = "PATH")]
    pub boost_lib_dir: Option<String>,

    /// Configure and build (always done; accepted for compatibility)
    #[arg(long)]
    pub build: bool,

    /// Clean the build directory, then configure and build
    #[arg(long)]
    pub rebuild: bool,

    /// CMake source directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Build directory resolution: `anchored` or `relative`
    #[arg(long, value_name = "LAYOUT")]
    pub layout: Option<Layout>,

    /// Number of parallel make jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Config file (defaults to dt-configure.toml in the source directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print what would run without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Colorize output: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,
}

impl Cli {
    /// Merge flags over the config file. CLI > config > defaults.
    pub fn to_options(&self, source_dir: PathBuf, config: &Config) -> Options {
        let mut opts = Options::from_config(source_dir, config);

        if self.boost_lib_dir.is_some() {
            opts.boost_lib_dir = self.boost_lib_dir.clone();
        }
        if let Some(layout) = self.layout {
            opts.layout = layout;
        }
        if let Some(jobs) = self.jobs {
            opts.jobs = jobs;
        }
        opts.build = self.build;
        opts.rebuild = self.rebuild;
        opts.dry_run = self.dry_run;

        opts
    }
}
