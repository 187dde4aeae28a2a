//! Host abstractions for locating the assembly file.
//!
//! Relative paths are resolved against the working directory of an [`Environment`], and the
//! resolved path is checked against a [`FileSystem`]. Both default to the real process and disk.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use crate::Result;

/// Existence checks against a file system
pub trait FileSystem {
    /// True if `path` names an existing file
    fn exists(&self, path: &Path) -> bool;
}

/// The context relative paths are resolved in
pub trait Environment {
    /// The current working directory
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be determined
    fn working_directory(&self) -> Result<PathBuf>;
}

/// The file system of the host
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicalFileSystem;

impl FileSystem for PhysicalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok_and(|metadata| metadata.is_file())
    }
}

/// The environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn working_directory(&self) -> Result<PathBuf> {
        Ok(std::env::current_dir()?)
    }
}

/// Make `path` absolute against the working directory of `environment`
///
/// `.` and `..` components are collapsed lexically, without touching the file system.
///
/// # Errors
/// Returns an error if `path` is relative and the working directory cannot be determined
pub fn resolve_path(path: &Path, environment: &impl Environment) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        environment.working_directory()?.join(path)
    };

    Ok(normalize(&absolute))
}

fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pops the root
                if !matches!(
                    result.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    result.pop();
                }
            }
            other => result.push(other.as_os_str()),
        }
    }

    result
}
