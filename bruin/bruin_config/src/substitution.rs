//! Variable substitution in option values.
//!
//! Values may embed `${option}` and `${section:option}` references,
//! which are replaced when the value is retrieved. A reference may
//! carry a fallback, `${section:option?fallback}`, used when the target
//! cannot be resolved. `$$` produces a literal dollar sign, and text
//! that merely looks like a reference is left alone.
//!
//! Two pseudo-sections are reserved. `${env:NAME}` reads the `NAME`
//! environment variable, treating unset and empty as missing.
//! `${program:cwd}`, `${program:name}` and `${program:now}` expand to
//! the working directory, the program's base name, and the current
//! local time.

use std::env;
use std::path::PathBuf;

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

use bruin_core::{ConfigError, Error, Result};

use crate::config::Configuration;

/// Substitution recurses at most this deep before giving up and
/// returning the text unexpanded, which keeps mutually recursive
/// references from looping forever.
pub(crate) const MAX_SUBSTITUTION_DEPTH: usize = 32;

/// Pseudo-section for environment variables.
pub(crate) const ENV_SECTION: &str = "env";

/// Pseudo-section for values describing the running program.
pub(crate) const PROGRAM_SECTION: &str = "program";

/// Matches a variable reference at the start of the input: an optional
/// section qualifier, an option name, and an optional `?fallback`, all
/// inside `${}`. Section names may contain dots; option names may not.
static VARIABLE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\$\{(?:([_.a-zA-Z][_.a-zA-Z0-9]+):)?([_a-zA-Z][_a-zA-Z0-9]+)(?:\?([^}]*))?\}",
    )
    .unwrap()
});

struct Reference<'a> {
    section: Option<&'a str>,
    option: &'a str,
    default: Option<&'a str>,
}

/// Expand every variable reference in `raw`, which is the value of
/// `option` within `section`.
pub(crate) fn expand(
    config: &Configuration,
    section: &str,
    option: &str,
    raw: &str,
) -> Result<String> {
    expand_at_depth(config, section, option, raw, 0)
}

fn expand_at_depth(
    config: &Configuration,
    section: &str,
    option: &str,
    raw: &str,
    depth: usize,
) -> Result<String> {
    if depth >= MAX_SUBSTITUTION_DEPTH {
        return Ok(raw.to_string());
    }

    let mut result = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(dollar) = rest.find('$') {
        result.push_str(&rest[..dollar]);
        let tail = &rest[dollar..];

        if tail.starts_with("$$") {
            result.push('$');
            rest = &tail[2..];
        } else if let Some((length, reference)) = leading_reference(tail) {
            match resolve(config, section, &reference, depth)? {
                Some(value) => result.push_str(&value),
                None => match reference.default {
                    Some(default) => result.push_str(default),
                    None if config.strict_substitution() => {
                        return Err(Error::Config(ConfigError::NoVariable {
                            section: section.to_string(),
                            option: option.to_string(),
                            reference: tail[2..length - 1].to_string(),
                        }));
                    }
                    None => {}
                },
            }
            rest = &tail[length..];
        } else {
            result.push('$');
            rest = &tail[1..];
        }
    }

    result.push_str(rest);
    Ok(result)
}

fn leading_reference(text: &str) -> Option<(usize, Reference<'_>)> {
    let captures = VARIABLE_REF.captures(text)?;
    let whole = captures.get(0)?;
    let option = captures.get(2)?;

    // An empty fallback, "${name?}", counts as no fallback at all.
    let default = captures
        .get(3)
        .map(|m| m.as_str())
        .filter(|text| !text.is_empty());

    let reference = Reference {
        section: captures.get(1).map(|m| m.as_str()),
        option: option.as_str(),
        default,
    };
    Some((whole.end(), reference))
}

/// Resolve a reference to its replacement text, or `None` if the target
/// is missing. Configuration targets are themselves expanded before
/// use, in their own section's context.
fn resolve(
    config: &Configuration,
    current_section: &str,
    reference: &Reference<'_>,
    depth: usize,
) -> Result<Option<String>> {
    let target_section = reference.section.unwrap_or(current_section);

    match target_section {
        ENV_SECTION => Ok(environment_value(reference.option)),
        PROGRAM_SECTION => program_value(reference.option),
        _ => match config.raw_value(target_section, reference.option) {
            Some(raw) => Ok(Some(expand_at_depth(
                config,
                target_section,
                reference.option,
                raw,
                depth + 1,
            )?)),
            None => Ok(None),
        },
    }
}

/// An unset or empty environment variable counts as missing.
fn environment_value(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn program_value(name: &str) -> Result<Option<String>> {
    match name {
        "cwd" => Ok(Some(env::current_dir()?.display().to_string())),
        "name" => Ok(program_name()),
        "now" => Ok(Some(Local::now().format("%Y-%m-%d %H:%M:%S").to_string())),
        _ => Ok(None),
    }
}

fn program_name() -> Option<String> {
    let first = env::args().next()?;
    let path = PathBuf::from(first);
    let name = path.file_name()?;
    Some(name.to_string_lossy().into_owned())
}
