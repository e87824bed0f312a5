//! Extended globbing.
//!
//! Shell-style wildcard matching for single path components, plus an
//! extended glob where the pattern component `**` matches any number of
//! intermediate directories.

use bruin_core::{PathError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Translate a shell wildcard pattern into an anchored regular
/// expression: `*` matches any run of characters, `?` one character,
/// `[...]` a character class (`!` negates, ranges allowed). An unclosed
/// `[` is taken literally.
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut result = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => result.push_str(".*"),
            '?' => result.push('.'),
            '[' => {
                let mut j = i;
                if j < chars.len() && chars[j] == '!' {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ']' {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    result.push_str(r"\[");
                } else {
                    let inner: String = chars[i..j].iter().collect();
                    result.push('[');
                    if let Some(rest) = inner.strip_prefix('!') {
                        result.push('^');
                        result.push_str(&rest.replace('\\', r"\\"));
                    } else {
                        result.push_str(&inner.replace('\\', r"\\"));
                    }
                    result.push(']');
                    i = j + 1;
                }
            }
            other => result.push_str(&regex::escape(&other.to_string())),
        }
    }

    result.push('$');
    result
}

/// Match one file name against a shell wildcard pattern.
///
/// A pattern whose character class cannot be compiled (such as a
/// reversed range) matches nothing.
///
/// # Examples
///
/// ```
/// use bruin_file::fn_match;
///
/// assert!(fn_match("*.rs", "glob.rs"));
/// assert!(fn_match("data-[0-9]?", "data-7x"));
/// assert!(!fn_match("*.rs", "glob.rs.bak"));
/// ```
pub fn fn_match(pattern: &str, name: &str) -> bool {
    match Regex::new(&translate(pattern)) {
        Ok(re) => re.is_match(name),
        Err(_) => false,
    }
}

/// Extended glob.
///
/// The pattern is split on `/`. The special component `**` matches the
/// current directory and every descendant directory; other components
/// match directory entries with shell wildcards, where a leading `.` in
/// an entry name is only matched by a pattern written with a leading
/// `.`. Returned paths are `directory` joined with the matched
/// components, in sorted traversal order. Unreadable or missing
/// directories contribute no matches.
///
/// # Arguments
///
/// * `pattern` - A `/`-separated wildcard pattern.
/// * `directory` - The directory the pattern is anchored at.
///
/// # Errors
///
/// `PathError::InvalidPattern` if a pattern component cannot be
/// compiled, such as a character class with a reversed range.
///
/// # Examples
///
/// A pattern like `src/**/*.rs` finds Rust sources at any depth below
/// `src`, and `**` alone lists every directory in the tree.
pub fn eglob(pattern: &str, directory: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let pieces: Vec<&str> = pattern.split('/').filter(|p| !p.is_empty()).collect();
    for piece in &pieces {
        if *piece != "**" && Regex::new(&translate(piece)).is_err() {
            return Err(PathError::InvalidPattern(pattern.to_string()).into());
        }
    }

    let mut result = Vec::new();
    if !pieces.is_empty() {
        find_matches(&pieces, directory.as_ref(), &mut result);
    }
    Ok(result)
}

fn find_matches(pieces: &[&str], directory: &Path, out: &mut Vec<PathBuf>) {
    let piece = pieces[0];
    let last = pieces.len() == 1;

    if piece == "**" {
        let mut roots = Vec::new();
        collect_dirs(directory, &mut roots);
        for root in roots {
            if last {
                out.push(root);
            } else {
                find_matches(&pieces[1..], &root, out);
            }
        }
        return;
    }

    for name in matching_names(directory, piece) {
        let path = directory.join(&name);
        if last {
            out.push(path);
        } else if path.is_dir() {
            find_matches(&pieces[1..], &path, out);
        }
    }
}

/// The directory itself followed by every descendant directory,
/// depth-first with sorted siblings.
fn collect_dirs(directory: &Path, out: &mut Vec<PathBuf>) {
    if !directory.is_dir() {
        return;
    }
    out.push(directory.to_path_buf());

    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    let mut subdirs: Vec<PathBuf> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .collect();
    subdirs.sort();
    for subdir in subdirs {
        collect_dirs(&subdir, out);
    }
}

/// Sorted entry names of `directory` matching `piece`. Dot files are
/// hidden from patterns that do not themselves start with a dot.
fn matching_names(directory: &Path, piece: &str) -> Vec<String> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut names: Vec<String> = entries
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| !(name.starts_with('.') && !piece.starts_with('.')))
        .filter(|name| fn_match(piece, name))
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn make_tree(root: &Path) {
        fs::create_dir_all(root.join("src/inner")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        File::create(root.join("src/lib.rs")).unwrap();
        File::create(root.join("src/main.rs")).unwrap();
        File::create(root.join("src/inner/util.rs")).unwrap();
        File::create(root.join("src/notes.txt")).unwrap();
        File::create(root.join("docs/guide.md")).unwrap();
        File::create(root.join(".hidden.rs")).unwrap();
    }

    #[test]
    fn test_fn_match_star_and_question() {
        assert!(fn_match("*", "anything"));
        assert!(fn_match("*.rs", "glob.rs"));
        assert!(!fn_match("*.rs", "glob.rs.bak"));
        assert!(fn_match("gl?b.rs", "glob.rs"));
        assert!(!fn_match("gl?b.rs", "glob.rs "));
    }

    #[test]
    fn test_fn_match_character_classes() {
        assert!(fn_match("data-[0-9]", "data-7"));
        assert!(!fn_match("data-[0-9]", "data-x"));
        assert!(fn_match("data-[!0-9]", "data-x"));
        assert!(!fn_match("data-[!0-9]", "data-7"));
    }

    #[test]
    fn test_fn_match_literal_special_characters() {
        assert!(fn_match("a+b", "a+b"));
        assert!(!fn_match("a+b", "aab"));
        // Unclosed class is a literal bracket
        assert!(fn_match("a[b", "a[b"));
    }

    #[test]
    fn test_eglob_single_level() {
        let dir = tempfile::tempdir().unwrap();
        make_tree(dir.path());

        let matches = eglob("src/*.rs", dir.path()).unwrap();
        let expected = vec![
            dir.path().join("src/lib.rs"),
            dir.path().join("src/main.rs"),
        ];
        assert_eq!(matches, expected);
    }

    #[test]
    fn test_eglob_double_star_then_pattern() {
        let dir = tempfile::tempdir().unwrap();
        make_tree(dir.path());

        let matches = eglob("**/*.rs", dir.path()).unwrap();
        let expected = vec![
            dir.path().join("src/lib.rs"),
            dir.path().join("src/main.rs"),
            dir.path().join("src/inner/util.rs"),
        ];
        assert_eq!(matches, expected);
    }

    #[test]
    fn test_eglob_trailing_double_star_lists_directories() {
        let dir = tempfile::tempdir().unwrap();
        make_tree(dir.path());

        let matches = eglob("**", dir.path()).unwrap();
        let expected = vec![
            dir.path().to_path_buf(),
            dir.path().join("docs"),
            dir.path().join("src"),
            dir.path().join("src/inner"),
        ];
        assert_eq!(matches, expected);
    }

    #[test]
    fn test_eglob_hides_dot_files_from_wildcards() {
        let dir = tempfile::tempdir().unwrap();
        make_tree(dir.path());

        let matches = eglob("*.rs", dir.path()).unwrap();
        assert!(matches.is_empty());

        let dotted = eglob(".*.rs", dir.path()).unwrap();
        assert_eq!(dotted, vec![dir.path().join(".hidden.rs")]);
    }

    #[test]
    fn test_eglob_missing_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let matches = eglob("*.rs", dir.path().join("nope")).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_eglob_rejects_reversed_range() {
        let dir = tempfile::tempdir().unwrap();
        let err = eglob("data-[z-a]", dir.path()).unwrap_err();
        assert!(matches!(
            err,
            bruin_core::Error::Path(PathError::InvalidPattern(_))
        ));
    }
}
