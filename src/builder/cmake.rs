//! CMake configure invocation.

use crate::core::build_dir::BuildDir;
use crate::core::options::Options;
use crate::util::process::ProcessBuilder;

/// Generator passed with `-G`.
pub const GENERATOR: &str = "Unix Makefiles";

/// Build type. The test suite is always built with assertions and symbols.
pub const BUILD_TYPE: &str = "Debug";

/// Pinned C++ language standard.
pub const CXX_STANDARD: &str = "17";

/// Build the CMake configure command for `opts`, run from inside `build_dir`.
///
/// Argument order is fixed so the rendered command line is stable:
///
/// ```text
/// cmake -G "Unix Makefiles" -DCMAKE_BUILD_TYPE=Debug [-DBOOST_LIBRARY_DIRS=<dir>]
///       -DCMAKE_EXPORT_COMPILE_COMMANDS=1 -DCMAKE_CXX_STANDARD=17 [-D<extra>...] ../
/// ```
pub fn configure_command(opts: &Options, build_dir: &BuildDir) -> ProcessBuilder {
    let mut cmd = ProcessBuilder::new(&opts.cmake);

    // Generator
    cmd = cmd.arg("-G").arg(GENERATOR);

    // Build type
    cmd = cmd.arg(format!("-DCMAKE_BUILD_TYPE={}", BUILD_TYPE));

    // Custom Boost location
    if let Some(ref dir) = opts.boost_lib_dir {
        cmd = cmd.arg(format!("-DBOOST_LIBRARY_DIRS={}", dir));
    }

    // compile_commands.json for editors and clang tooling
    cmd = cmd.arg("-DCMAKE_EXPORT_COMPILE_COMMANDS=1");

    cmd = cmd.arg(format!("-DCMAKE_CXX_STANDARD={}", CXX_STANDARD));

    for define in &opts.defines {
        cmd = cmd.arg(format!("-D{}", define));
    }

    // Source directory, relative to the build directory
    cmd = cmd.arg(build_dir.source_arg());

    cmd.cwd(build_dir.absolute())
}
