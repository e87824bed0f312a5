//! # Bruin Config
//!
//! An INI-style configuration reader, extended with two features the
//! plain format lacks:
//!
//! - **Includes.** A line of the form `%include "path"` pulls another
//!   file into place before parsing, to any nesting depth.
//! - **Variable substitution.** Option values may reference other
//!   options as `${option}` or `${section:option}`, with optional
//!   `?fallback` defaults, plus the `env` and `program` pseudo-sections
//!   for environment variables and facts about the running process.
//!
//! Sections and options keep their file order, repeated reads merge
//! rather than replace, and typed accessors convert values on the way
//! out.
//!
//! ```
//! use bruin_config::Configuration;
//!
//! # fn main() -> bruin_core::Result<()> {
//! let mut config = Configuration::new();
//! config.read_str(
//!     "[paths]\n\
//!      home = /opt/app\n\
//!      logs = ${home}/log\n",
//! )?;
//!
//! assert_eq!(config.get("paths", "logs")?, "/opt/app/log");
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - `config`: the [`Configuration`] store and its accessors
//! - `value`: the [`FromConfigValue`] conversion trait
//! - `parser`: the line parser (internal)
//! - `substitution`: variable expansion (internal)

mod parser;
mod substitution;

pub mod config;
pub mod value;

pub use config::{preprocess, Configuration, DEFAULT_SECTION};
pub use value::FromConfigValue;
