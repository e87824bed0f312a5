//! Path and file-operation helpers.

use bitflags::bitflags;
use bruin_core::error::PathError;
use bruin_core::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    /// Selects which entry kinds a recursive listing yields
    pub struct ListOptions: u8 {
        const FILES = 0b01;
        const DIRS = 0b10;
    }
}

/// Delete files, ignoring every failure.
///
/// Useful for cleanup paths where a missing or undeletable file is not
/// worth reporting.
pub fn unlink_quietly<I, P>(paths: I)
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        let _ = fs::remove_file(path.as_ref());
    }
}

/// Recursively delete a directory tree.
///
/// Deleting a path that does not exist is a no-op. Deleting something
/// that exists but is not a directory is `PathError::NotADirectory`.
pub fn remove_recursively(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    if !dir.is_dir() {
        return Err(PathError::NotADirectory(dir.to_path_buf()).into());
    }
    fs::remove_dir_all(dir)?;
    Ok(())
}

/// List a directory tree, returning paths relative to `dir`.
///
/// Each directory level is visited in sorted order; directories and/or
/// files are included according to `options`. Within one directory the
/// subdirectory and file names appear before the subdirectories'
/// contents.
///
/// # Arguments
///
/// * `dir` - The directory to walk.
/// * `options` - Which entry kinds to yield.
///
/// # Returns
///
/// The relative paths, or `PathError::NotADirectory` if `dir` is not a
/// directory.
pub fn list_recursively(dir: impl AsRef<Path>, options: ListOptions) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(PathError::NotADirectory(dir.to_path_buf()).into());
    }

    let mut result = Vec::new();
    walk(dir, Path::new(""), options, &mut result)?;
    Ok(result)
}

fn walk(base: &Path, relative: &Path, options: ListOptions, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut names = Vec::new();
    for entry in fs::read_dir(base.join(relative))? {
        let entry = entry?;
        names.push((entry.file_name(), entry.file_type()?.is_dir()));
    }
    names.sort();

    for (name, is_dir) in &names {
        let rel = relative.join(name);
        if *is_dir && options.contains(ListOptions::DIRS) {
            out.push(rel);
        } else if !is_dir && options.contains(ListOptions::FILES) {
            out.push(rel);
        }
    }
    for (name, is_dir) in &names {
        if *is_dir {
            walk(base, &relative.join(name), options, out)?;
        }
    }
    Ok(())
}

/// Copy files into a directory, keeping their file names.
///
/// # Arguments
///
/// * `files` - Source files to copy.
/// * `target_dir` - Destination directory.
/// * `create_target` - Create the destination (and parents) if missing.
///
/// # Returns
///
/// `PathError::NotADirectory` when the destination is missing (and not
/// created) or exists as a non-directory; `PathError::NotAFile` for a
/// source with no usable file name.
pub fn copy_to<I, P>(files: I, target_dir: impl AsRef<Path>, create_target: bool) -> Result<()>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let target_dir = target_dir.as_ref();
    if create_target && !target_dir.exists() {
        fs::create_dir_all(target_dir)?;
    }
    if !target_dir.is_dir() {
        return Err(PathError::NotADirectory(target_dir.to_path_buf()).into());
    }

    for file in files {
        let file = file.as_ref();
        let name = match file.file_name() {
            Some(name) => name,
            None => return Err(PathError::NotAFile(file.to_path_buf()).into()),
        };
        fs::copy(file, target_dir.join(name))?;
    }
    Ok(())
}

/// Create files or update their modification times.
///
/// Missing files are created empty; existing plain files get their
/// modification time set to `time` (or the current time). A path that
/// exists but is not a plain file is `PathError::NotAFile`.
pub fn touch<I, P>(paths: I, time: Option<SystemTime>) -> Result<()>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let when = time.unwrap_or_else(SystemTime::now);
    for path in paths {
        let path = path.as_ref();
        if path.exists() && !path.is_file() {
            return Err(PathError::NotAFile(path.to_path_buf()).into());
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        file.set_modified(when)?;
    }
    Ok(())
}

/// Split a path into all of its components.
///
/// A leading root directory becomes a leading empty string, so the
/// result of joining the pieces with the separator reproduces the
/// original path. Trailing separators are ignored.
///
/// # Examples
///
/// ```
/// use bruin_file::path_split;
///
/// assert_eq!(path_split("/a/b/c"), ["", "a", "b", "c"]);
/// assert_eq!(path_split("a/b"), ["a", "b"]);
/// ```
pub fn path_split(path: impl AsRef<Path>) -> Vec<String> {
    path.as_ref()
        .components()
        .map(|component| match component {
            Component::RootDir => String::new(),
            other => other.as_os_str().to_string_lossy().into_owned(),
        })
        .collect()
}

/// Convert a native path string to the universal `/`-separated form.
/// On POSIX systems this is the identity.
pub fn universal_path(path: &str) -> String {
    if cfg!(windows) {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}

/// Convert a universal `/`-separated path string to the native form.
/// On POSIX systems this is the identity.
pub fn native_path(path: &str) -> String {
    if cfg!(windows) {
        path.replace('/', "\\")
    } else {
        path.to_string()
    }
}
