//! Build directory resolution.

use std::path::{Path, PathBuf};

use crate::core::options::{Layout, Options, OptionsError};
use crate::util::fs::{normalize_path, relative_path};

/// Whether the build directory is already on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    Missing,
    Exists,
}

/// A resolved build directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDir {
    /// The path as the layout presents it (absolute or cwd-relative).
    path: PathBuf,
    /// The same location as an absolute path; commands run here.
    absolute: PathBuf,
    /// Absolute source directory.
    source: PathBuf,
}

impl BuildDir {
    /// Resolve the build directory for `opts`, with `cwd` as the invoking
    /// process's working directory.
    pub fn resolve(opts: &Options, cwd: &Path) -> BuildDir {
        let cwd = normalize_path(cwd);
        let source = normalize_path(&cwd.join(&opts.source_dir));

        let (path, absolute) = match opts.layout {
            Layout::Anchored => {
                let abs = source.join(&opts.build_dir);
                (abs.clone(), abs)
            }
            Layout::Relative => (opts.build_dir.clone(), cwd.join(&opts.build_dir)),
        };

        tracing::debug!(
            "build directory resolved to {} ({} layout)",
            absolute.display(),
            opts.layout
        );

        BuildDir {
            path,
            absolute,
            source,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Check the resolved location against the source tree and the disk.
    ///
    /// The build directory must not be the source directory or one of its
    /// ancestors, since a rebuild removes it recursively. An existing path
    /// must be a directory.
    pub fn check(&self) -> Result<(), OptionsError> {
        let absolute = normalize_path(&self.absolute);
        if self.source.starts_with(&absolute) {
            return Err(OptionsError::BuildDirContainsSource {
                build: self.absolute.clone(),
                source_dir: self.source.clone(),
            });
        }

        if self.absolute.exists() && !self.absolute.is_dir() {
            return Err(OptionsError::BuildDirNotADirectory(self.absolute.clone()));
        }

        Ok(())
    }

    /// Current on-disk state.
    pub fn state(&self) -> DirState {
        if self.absolute.exists() {
            DirState::Exists
        } else {
            DirState::Missing
        }
    }

    /// The source directory as seen from inside the build directory, with a
    /// trailing separator (`../` for the default layout).
    pub fn source_arg(&self) -> String {
        let rel = relative_path(&self.absolute, &self.source);
        let rel = rel.to_string_lossy();
        if rel.is_empty() {
            "./".to_string()
        } else if rel.ends_with('/') {
            rel.into_owned()
        } else {
            format!("{}/", rel)
        }
    }
}
