//! Textual `%include` preprocessing.
//!
//! An [`Includer`] reads a text file, recursively splicing in the
//! contents of files named by include directives. A directive is a line
//! beginning
//!
//! ```text
//! %include "path"
//! ```
//!
//! where `path` may be absolute or relative to the directory of the
//! file containing the directive. The fully expanded text is built at
//! construction time and can be read back as a string, line by line, or
//! through [`std::io::Read`].

use bruin_core::error::IncludeError;
use bruin_core::Result;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Maximum include nesting depth used by the plain constructors.
pub const DEFAULT_MAX_NESTING: usize = 100;

static INCLUDE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^%include\s+"([^"]+)""#).unwrap());

/// A text source with every `%include` directive expanded.
#[derive(Debug, Clone)]
pub struct Includer {
    text: String,
    position: usize,
}

impl Includer {
    /// Expand `path` with the default nesting limit.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path_with_max_nesting(path, DEFAULT_MAX_NESTING)
    }

    /// Expand `path`, allowing at most `max_nesting` levels of includes.
    pub fn from_path_with_max_nesting(
        path: impl AsRef<Path>,
        max_nesting: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = open_target(path)?;
        let mut text = String::new();
        expand(
            BufReader::new(file),
            path.parent(),
            0,
            max_nesting,
            &mut text,
        )?;
        Ok(Self { text, position: 0 })
    }

    /// Expand an in-memory or already-open source.
    ///
    /// `base_dir` anchors relative include paths; when `None`, they
    /// resolve against the current directory.
    pub fn from_reader(reader: impl BufRead, base_dir: Option<&Path>) -> Result<Self> {
        let mut text = String::new();
        expand(reader, base_dir, 0, DEFAULT_MAX_NESTING, &mut text)?;
        Ok(Self { text, position: 0 })
    }

    /// The expanded text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The expanded text, line by line.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.text.lines()
    }

    /// Consume the includer, returning the expanded text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl Read for Includer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.text.as_bytes()[self.position..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }
}

/// Expand `path` and write the result to a named temporary file.
///
/// The file is deleted when the returned handle drops, so callers that
/// hand the path to another process must keep the handle alive.
pub fn preprocess(path: impl AsRef<Path>) -> Result<NamedTempFile> {
    let includer = Includer::from_path(path)?;
    let mut output = tempfile::Builder::new()
        .prefix("inc")
        .suffix(".txt")
        .tempfile()?;
    output.write_all(includer.as_str().as_bytes())?;
    output.flush()?;
    Ok(output)
}

fn open_target(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| {
        IncludeError::CannotOpen {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

fn expand(
    reader: impl BufRead,
    base_dir: Option<&Path>,
    depth: usize,
    max_nesting: usize,
    out: &mut String,
) -> Result<()> {
    for line in reader.lines() {
        let line = line?;
        let captures = match INCLUDE_LINE.captures(&line) {
            Some(captures) => captures,
            None => {
                out.push_str(&line);
                out.push('\n');
                continue;
            }
        };

        if depth >= max_nesting {
            return Err(IncludeError::MaxNestingExceeded(max_nesting).into());
        }

        let target = resolve_target(&captures[1], base_dir);
        debug!("expanding include of {:?}", target);
        let file = open_target(&target)?;
        expand(
            BufReader::new(file),
            target.parent(),
            depth + 1,
            max_nesting,
            out,
        )?;
    }
    Ok(())
}

/// Resolve an include path: absolute paths stand; relative paths are
/// anchored at the directory of the file containing the directive.
fn resolve_target(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let raw = Path::new(raw);
    if raw.is_absolute() {
        return raw.to_path_buf();
    }
    match base_dir {
        Some(base) => base.join(raw),
        None => raw.to_path_buf(),
    }
}
