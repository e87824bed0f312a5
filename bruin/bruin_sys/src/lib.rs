//! # Bruin Sys
//!
//! Small operating-system helpers: locating executables along a search
//! path and scoped working-directory changes.
//!
//! ## Crate Structure
//!
//! - `search_path`: `find_command` and search path parsing
//! - `cwd`: the `WorkingDirectory` guard and `with_working_directory`

pub mod cwd;
pub mod search_path;

pub use cwd::{with_working_directory, WorkingDirectory};
pub use search_path::{find_command, path_elements, path_separator};
