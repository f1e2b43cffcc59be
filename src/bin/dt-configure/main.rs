//! dt-configure CLI - configure, build and run the dt test suite

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;
use dt_configure::ops::{configure, preflight};
use dt_configure::util::config::project_config_path;
use dt_configure::util::{Config, Shell, SystemRunner};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns the exit code of the last external command.
fn run() -> Result<i32> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("dt_configure=debug")
    } else {
        EnvFilter::new("dt_configure=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let source_dir = cli.source_dir.clone().unwrap_or_else(|| cwd.clone());

    // Explicit --config must exist; the implicit one is optional
    let config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => Config::load_or_default(&project_config_path(&cwd.join(&source_dir)))?,
    };

    let opts = cli.to_options(source_dir, &config);

    if !opts.dry_run {
        preflight(&opts, &shell);
    }

    let report = configure(&opts, &cwd, &mut SystemRunner, &shell)?;
    Ok(report.exit_code)
}
