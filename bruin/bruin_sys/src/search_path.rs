//! Executable lookup along a search path.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use bruin_file::fn_match;
use log::debug;

/// The character separating elements of a search path string.
///
/// `;` on Windows, `:` everywhere else.
pub fn path_separator() -> char {
    if cfg!(windows) {
        ';'
    } else {
        ':'
    }
}

/// Split a search path string into its directories.
///
/// Empty elements are dropped.
///
/// # Examples
///
/// ```
/// # #[cfg(unix)] {
/// use bruin_sys::path_elements;
/// use std::path::PathBuf;
///
/// let elements = path_elements("/usr/bin::/bin");
/// assert_eq!(elements, vec![PathBuf::from("/usr/bin"), PathBuf::from("/bin")]);
/// # }
/// ```
pub fn path_elements(path: &str) -> Vec<PathBuf> {
    path.split(path_separator())
        .filter(|element| !element.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Locate a command along a search path.
///
/// Searches the directories of `path` in order and returns the first
/// executable file whose name matches `name`. The name may contain the
/// shell wildcards `*`, `?` and `[...]`; wildcard matches within a
/// directory are tried in sorted name order. When `path` is `None`, the
/// `PATH` environment variable is searched.
///
/// Returns `None` if no matching executable exists.
///
/// # Examples
///
/// ```no_run
/// use bruin_sys::find_command;
///
/// if let Some(shell) = find_command("sh", None) {
///     println!("shell lives at {}", shell.display());
/// }
/// ```
pub fn find_command(name: &str, path: Option<&str>) -> Option<PathBuf> {
    let search_path = match path {
        Some(explicit) => explicit.to_string(),
        None => env::var("PATH").unwrap_or_default(),
    };
    let has_wildcards = name.contains(['*', '?', '[']);

    for dir in path_elements(&search_path) {
        if has_wildcards {
            if let Some(found) = match_in_directory(&dir, name) {
                debug!("found command {} at {}", name, found.display());
                return Some(found);
            }
        } else {
            let candidate = dir.join(name);
            if is_executable(&candidate) {
                debug!("found command {} at {}", name, candidate.display());
                return Some(candidate);
            }
        }
    }

    None
}

/// First executable in `dir` whose name matches `pattern`, in sorted
/// name order.
fn match_in_directory(dir: &Path, pattern: &str) -> Option<PathBuf> {
    let reader = match fs::read_dir(dir) {
        Ok(reader) => reader,
        Err(_) => return None,
    };

    let mut names: Vec<String> = reader
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| fn_match(pattern, name))
        .collect();
    names.sort();

    names
        .into_iter()
        .map(|name| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// Whether `path` names a file the current user could execute.
///
/// On Unix this checks the execute bits; elsewhere any regular file
/// qualifies.
fn is_executable(path: &Path) -> bool {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return false,
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_elements_splits_on_separator() {
        let joined = format!(
            "{}{}{}",
            "/usr/local/bin",
            path_separator(),
            "/usr/bin"
        );
        assert_eq!(
            path_elements(&joined),
            vec![PathBuf::from("/usr/local/bin"), PathBuf::from("/usr/bin")]
        );
    }

    #[test]
    fn test_path_elements_drops_empty_elements() {
        let joined = format!("{sep}/bin{sep}{sep}", sep = path_separator());
        assert_eq!(path_elements(&joined), vec![PathBuf::from("/bin")]);
    }

    #[cfg(unix)]
    mod unix {
        use super::super::*;
        use std::fs::File;
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        fn create_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
            let path = dir.join(name);
            let mut file = File::create(&path).unwrap();
            file.write_all(b"#!/bin/sh\n").unwrap();
            let mut permissions = file.metadata().unwrap().permissions();
            permissions.set_mode(mode);
            fs::set_permissions(&path, permissions).unwrap();
            path
        }

        #[test]
        fn test_find_command_finds_executable() {
            let dir = tempfile::tempdir().unwrap();
            let expected = create_file(dir.path(), "mytool", 0o755);

            let search = dir.path().display().to_string();
            assert_eq!(find_command("mytool", Some(&search)), Some(expected));
        }

        #[test]
        fn test_find_command_skips_non_executable() {
            let dir = tempfile::tempdir().unwrap();
            create_file(dir.path(), "mytool", 0o644);

            let search = dir.path().display().to_string();
            assert_eq!(find_command("mytool", Some(&search)), None);
        }

        #[test]
        fn test_find_command_searches_directories_in_order() {
            let first = tempfile::tempdir().unwrap();
            let second = tempfile::tempdir().unwrap();
            let expected = create_file(first.path(), "mytool", 0o755);
            create_file(second.path(), "mytool", 0o755);

            let search = format!(
                "{}{}{}",
                first.path().display(),
                path_separator(),
                second.path().display()
            );
            assert_eq!(find_command("mytool", Some(&search)), Some(expected));
        }

        #[test]
        fn test_find_command_with_wildcard() {
            let dir = tempfile::tempdir().unwrap();
            create_file(dir.path(), "tool-b", 0o755);
            let expected = create_file(dir.path(), "tool-a", 0o755);
            create_file(dir.path(), "unrelated", 0o755);

            let search = dir.path().display().to_string();
            assert_eq!(find_command("tool-*", Some(&search)), Some(expected));
        }

        #[test]
        fn test_find_command_missing_returns_none() {
            let dir = tempfile::tempdir().unwrap();
            let search = dir.path().display().to_string();
            assert_eq!(find_command("no-such-command", Some(&search)), None);
        }
    }
}
