//! # Bruin IO
//!
//! Stream helpers for the Bruin utility crates: writers that flush or
//! fan out, a character reader with pushback for lookahead parsing, and
//! advisory file locking.
//!
//! ## Crate Structure
//!
//! - `write`: `AutoFlushWriter` and `MultiWriter`
//! - `pushback`: `PushbackReader` with line and character reads
//! - `lock`: `FileLock` and the `with_locked_file` helper

pub mod lock;
pub mod pushback;
pub mod write;

pub use lock::{with_locked_file, FileLock};
pub use pushback::PushbackReader;
pub use write::{AutoFlushWriter, MultiWriter};
