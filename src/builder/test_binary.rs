//! Test executable invocation.

use std::path::{Path, PathBuf};

use crate::core::build_dir::BuildDir;
use crate::core::options::Options;
use crate::util::process::ProcessBuilder;

/// Build the command that runs the test executable inside `build_dir`.
///
/// The program path is absolute so it does not depend on how the platform
/// resolves a relative program against the child's working directory.
pub fn test_command(opts: &Options, build_dir: &BuildDir) -> ProcessBuilder {
    ProcessBuilder::new(build_dir.absolute().join(&opts.test_binary))
        .args(&opts.test_args)
        .cwd(build_dir.absolute())
}

/// The test executable as shown to the user (`./tests`).
pub fn display_name(opts: &Options) -> PathBuf {
    Path::new(".").join(&opts.test_binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_runs_binary_from_build_dir() {
        let tmp = TempDir::new().unwrap();
        let opts = Options::new(tmp.path());
        let build_dir = BuildDir::resolve(&opts, tmp.path());

        let cmd = test_command(&opts, &build_dir);
        assert_eq!(cmd.get_program(), build_dir.absolute().join("tests"));
        assert!(cmd.get_args().is_empty());
        assert_eq!(cmd.get_cwd(), Some(build_dir.absolute()));
        assert_eq!(display_name(&opts), PathBuf::from("./tests"));
    }

    #[test]
    fn test_args_are_forwarded() {
        let tmp = TempDir::new().unwrap();
        let mut opts = Options::new(tmp.path());
        opts.test_binary = "dt_tests".into();
        opts.test_args = vec!["--success".into()];
        let build_dir = BuildDir::resolve(&opts, tmp.path());

        let cmd = test_command(&opts, &build_dir);
        assert!(cmd.get_program().ends_with("dt_tests"));
        assert_eq!(cmd.get_args(), ["--success".to_string()]);
    }
}
