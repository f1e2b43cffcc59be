//! Parallel make invocation.

use crate::core::build_dir::BuildDir;
use crate::core::options::Options;
use crate::util::process::ProcessBuilder;

/// Build the `make -j <jobs>` command, run from inside `build_dir`.
pub fn build_command(opts: &Options, build_dir: &BuildDir) -> ProcessBuilder {
    ProcessBuilder::new(&opts.make)
        .arg("-j")
        .arg(opts.jobs.to_string())
        .cwd(build_dir.absolute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_build_command() {
        let tmp = TempDir::new().unwrap();
        let opts = Options::new(tmp.path());
        let build_dir = BuildDir::resolve(&opts, tmp.path());

        let cmd = build_command(&opts, &build_dir);
        assert_eq!(cmd.display_command(), "make -j 10");
        assert_eq!(cmd.get_cwd(), Some(build_dir.absolute()));
    }

    #[test]
    fn test_jobs_override() {
        let tmp = TempDir::new().unwrap();
        let mut opts = Options::new(tmp.path());
        opts.jobs = 2;
        opts.make = "gmake".into();
        let build_dir = BuildDir::resolve(&opts, tmp.path());

        assert_eq!(build_command(&opts, &build_dir).display_command(), "gmake -j 2");
    }
}
