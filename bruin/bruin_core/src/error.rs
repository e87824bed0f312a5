//! Error types for the Bruin utility library.
//!
//! This module defines the error hierarchy shared by every Bruin crate.
//! The errors are organized by subsystem, with each subsystem having its
//! own error type.
//!
//! The root error type, `Error`, can wrap any of the subsystem-specific
//! errors, allowing for uniform error handling at the top level.

use crate::version::{Version, VersionParseError};
use std::path::PathBuf;
use thiserror::Error;

/// Root error type for the Bruin library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration parsing and lookup errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Include-preprocessing errors
    #[error("Include error: {0}")]
    Include(#[from] IncludeError),

    /// Path and file-operation errors
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// File-locking errors
    #[error("Lock error: {0}")]
    Lock(#[from] LockError),

    /// Version parsing and comparison errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Value conversion errors
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// General runtime errors
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to configuration parsing and lookup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Section with the given name does not exist
    #[error("No such section: [{0}]")]
    NoSection(String),

    /// Option does not exist (or holds only whitespace) in the section
    #[error("No option {option:?} in section [{section}]")]
    NoOption {
        /// Section that was searched
        section: String,

        /// Option that was requested
        option: String,
    },

    /// Section was added twice
    #[error("Section already exists: [{0}]")]
    DuplicateSection(String),

    /// A variable reference could not be resolved in strict mode
    #[error("Cannot resolve ${{{reference}}} for option {option:?} in section [{section}]")]
    NoVariable {
        /// Section containing the unresolvable option
        section: String,

        /// Option whose value contains the reference
        option: String,

        /// The reference text, without the `${}` delimiters
        reference: String,
    },

    /// Input text could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// One-based line number within the preprocessed input
        line: usize,

        /// Description of the problem
        message: String,
    },

    /// Option value could not be converted to the requested type
    #[error("Option {option:?} in section [{section}] has value {value:?}, expected {expected}")]
    InvalidValue {
        /// Section containing the option
        section: String,

        /// Option whose value failed to convert
        option: String,

        /// The raw value
        value: String,

        /// Human-readable name of the expected type
        expected: &'static str,
    },
}

/// Errors related to `%include` preprocessing.
#[derive(Debug, Error)]
pub enum IncludeError {
    /// Include target could not be opened
    #[error("Cannot open include file {path:?}: {source}")]
    CannotOpen {
        /// The path as resolved from the include directive
        path: PathBuf,

        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Includes are nested deeper than the configured maximum
    #[error("Exceeded maximum include nesting depth of {0}")]
    MaxNestingExceeded(usize),
}

/// Errors related to path and file operations.
#[derive(Debug, Error)]
pub enum PathError {
    /// A directory was required
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    /// A plain file was required
    #[error("Not a plain file: {0:?}")]
    NotAFile(PathBuf),

    /// A glob pattern could not be compiled
    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(String),
}

/// Errors related to advisory file locking.
#[derive(Debug, Error)]
pub enum LockError {
    /// Lock is held elsewhere and the caller asked not to wait
    #[error("File is locked by another process")]
    WouldBlock,
}

/// Errors related to version handling.
#[derive(Debug, Error)]
pub enum VersionError {
    /// Version string could not be parsed
    #[error("{0}")]
    Parse(#[from] VersionParseError),

    /// Version is older than a required minimum
    #[error("Version {current} is older than the required minimum {required}")]
    TooOld {
        /// The minimum acceptable version
        required: Version,

        /// The version that was checked
        current: Version,
    },

    /// Version component does not fit the packed representation
    #[error("Version component {field} is {value}, packed form holds at most 255")]
    FieldTooLarge {
        /// Which component overflowed
        field: &'static str,

        /// The offending value
        value: u64,
    },
}

/// Errors related to value conversions.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// String is not a recognized boolean spelling
    #[error("Not a recognized boolean value: {0:?}")]
    InvalidBoolean(String),

    /// Byte input was not valid UTF-8
    #[error("Input is not valid UTF-8")]
    InvalidUtf8,
}

/// Errors related to logging setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global logger was already installed
    #[error("Logging initialization failed: {0}")]
    InitFailed(String),

    /// String does not name a log level
    #[error("Unknown log level: {0:?}")]
    InvalidLevel(String),
}

/// Result type used throughout the Bruin library.
pub type Result<T> = std::result::Result<T, Error>;
