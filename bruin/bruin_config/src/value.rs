//! Typed conversion of configuration values.

use std::path::PathBuf;

use bruin_core::text::str_to_bool;

/// Conversion from a raw configuration string to a typed value.
///
/// [`Configuration::get_as`](crate::Configuration::get_as) resolves an
/// option, substitutes its variables, and then hands the result to this
/// trait. A failed conversion surfaces as
/// [`ConfigError::InvalidValue`](bruin_core::ConfigError::InvalidValue)
/// carrying [`EXPECTED`](FromConfigValue::EXPECTED).
///
/// # Examples
///
/// ```
/// use bruin_config::FromConfigValue;
///
/// assert_eq!(i64::from_config_value("42"), Some(42));
/// assert_eq!(bool::from_config_value("yes"), Some(true));
/// assert_eq!(i64::from_config_value("forty-two"), None);
/// ```
pub trait FromConfigValue: Sized {
    /// Human-readable name of this type, used in error messages.
    const EXPECTED: &'static str;

    /// Parse a raw configuration value.
    ///
    /// Returns `None` when the value cannot be interpreted as this
    /// type.
    fn from_config_value(raw: &str) -> Option<Self>;
}

/// Booleans accept the vocabulary of
/// [`str_to_bool`](bruin_core::text::str_to_bool), ignoring surrounding
/// whitespace.
impl FromConfigValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_config_value(raw: &str) -> Option<Self> {
        str_to_bool(raw.trim()).ok()
    }
}

impl FromConfigValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_config_value(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FromConfigValue for u64 {
    const EXPECTED: &'static str = "unsigned integer";

    fn from_config_value(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FromConfigValue for f64 {
    const EXPECTED: &'static str = "floating-point number";

    fn from_config_value(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

/// Strings convert as-is, whitespace included.
impl FromConfigValue for String {
    const EXPECTED: &'static str = "string";

    fn from_config_value(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl FromConfigValue for PathBuf {
    const EXPECTED: &'static str = "path";

    fn from_config_value(raw: &str) -> Option<Self> {
        Some(PathBuf::from(raw))
    }
}

/// Word lists split on runs of whitespace. For other separators, use
/// [`Configuration::get_list`](crate::Configuration::get_list).
impl FromConfigValue for Vec<String> {
    const EXPECTED: &'static str = "word list";

    fn from_config_value(raw: &str) -> Option<Self> {
        Some(raw.split_whitespace().map(str::to_string).collect())
    }
}
