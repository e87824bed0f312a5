//! # Bruin File
//!
//! `bruin_file` provides file and path utilities for the Bruin utility
//! library: best-effort and recursive deletion, recursive listing,
//! copying and touching, path decomposition, shell-style and extended
//! globbing, and a textual `%include` preprocessor.
//!
//! ## Crate Structure
//!
//! - **paths**: Deletion, listing, copying, touching, and path helpers
//! - **glob**: `fn_match` wildcard matching and the `**` extended glob
//! - **includer**: `%include` expansion with a nesting limit

pub mod glob;
pub mod includer;
pub mod paths;

// Re-export key items for convenience
pub use glob::{eglob, fn_match};
pub use includer::{Includer, DEFAULT_MAX_NESTING};
pub use paths::{
    copy_to, list_recursively, native_path, path_split, remove_recursively, touch,
    universal_path, unlink_quietly, ListOptions,
};
