//! Scoped working-directory changes.

use std::env;
use std::path::{Path, PathBuf};

use bruin_core::Result;
use log::warn;

/// Guard that changes the process working directory and restores the
/// previous one when dropped.
///
/// The working directory is process-global state, so code holding a
/// guard must not assume other threads see the old directory.
///
/// # Examples
///
/// ```no_run
/// use bruin_sys::WorkingDirectory;
///
/// # fn main() -> bruin_core::Result<()> {
/// {
///     let _guard = WorkingDirectory::change("/tmp")?;
///     // paths here resolve relative to /tmp
/// }
/// // previous directory restored
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WorkingDirectory {
    previous: PathBuf,
}

impl WorkingDirectory {
    /// Change to `target`, remembering the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined
    /// or `target` cannot be entered.
    pub fn change<P: AsRef<Path>>(target: P) -> Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(target.as_ref())?;
        Ok(Self { previous })
    }

    /// The directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDirectory {
    fn drop(&mut self) {
        if let Err(error) = env::set_current_dir(&self.previous) {
            warn!(
                "failed to restore working directory {}: {}",
                self.previous.display(),
                error
            );
        }
    }
}

/// Run `operation` with the working directory set to `dir`, restoring
/// the previous directory afterwards.
pub fn with_working_directory<P, T, F>(dir: P, operation: F) -> Result<T>
where
    P: AsRef<Path>,
    F: FnOnce() -> Result<T>,
{
    let _guard = WorkingDirectory::change(dir)?;
    operation()
}
