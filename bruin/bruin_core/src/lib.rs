//! # Bruin Core
//!
//! `bruin_core` provides the shared building blocks for the Bruin utility
//! library: the error hierarchy, the logging model, and a handful of small
//! general-purpose helpers used by the other Bruin crates.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all Bruin components
//! - **logging**: Log levels, structured records, and a wrapping stream logger
//! - **text**: Boolean parsing and margin stripping
//! - **bits**: Bit-counting utilities
//! - **readonly**: Compile-time read-only wrapper
//! - **version**: Semantic versions with a packed integer form

pub mod bits;
pub mod error;
pub mod logging;
pub mod readonly;
pub mod text;
pub mod version;

// Re-export key types for convenience
pub use error::{
    ConfigError, ConversionError, Error, IncludeError, LockError, LoggingError, PathError,
    Result, VersionError,
};
pub use logging::{LogLevel, LogRecord, WrappingFormatter};
pub use readonly::ReadOnly;
pub use version::{ensure_version, Version, VersionParseError};
