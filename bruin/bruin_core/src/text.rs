//! Text helpers.
//!
//! Small string utilities: boolean parsing with the usual spellings,
//! and margin stripping for indented multi-line literals.

use crate::error::ConversionError;

/// Convert a string to a boolean.
///
/// Accepts `true`/`t`/`yes`/`y`/`on`/`1` and
/// `false`/`f`/`no`/`n`/`off`/`0`, case-insensitive. Anything else,
/// including surrounding whitespace, is `ConversionError::InvalidBoolean`.
///
/// # Examples
///
/// ```
/// use bruin_core::text::str_to_bool;
///
/// assert_eq!(str_to_bool("Yes").unwrap(), true);
/// assert_eq!(str_to_bool("off").unwrap(), false);
/// assert!(str_to_bool("sideways").is_err());
/// ```
pub fn str_to_bool(s: &str) -> Result<bool, ConversionError> {
    match s.to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(ConversionError::InvalidBoolean(s.to_string())),
    }
}

/// Strip leading whitespace and a `|` margin marker from every line.
///
/// Each line is left-trimmed; if the remainder starts with `|`, that
/// one character is removed. Lines without a marker keep their trimmed
/// text, and a trailing newline survives as a trailing newline.
///
/// # Examples
///
/// ```
/// use bruin_core::text::strip_margin;
///
/// let text = "|first
///             |second";
/// assert_eq!(strip_margin(text), "first\nsecond");
/// ```
pub fn strip_margin(s: &str) -> String {
    s.split('\n')
        .map(|line| {
            let stripped = line.trim_start();
            stripped.strip_prefix('|').unwrap_or(stripped)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
