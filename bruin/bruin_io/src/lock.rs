//! Advisory file locking.

use std::fs::{File, TryLockError};

use bruin_core::{Error, LockError, Result};

/// Advisory lock on an open file.
///
/// Wraps the platform lock held by the file handle and tracks whether
/// this value currently holds it, so the lock is released exactly once
/// even if [`release`](FileLock::release) is never called. Locks are
/// advisory: they coordinate cooperating processes and do not stop an
/// uncooperative one from touching the file.
///
/// # Examples
///
/// ```no_run
/// use bruin_io::FileLock;
/// use std::fs::File;
///
/// # fn main() -> bruin_core::Result<()> {
/// let file = File::create("queue.dat")?;
/// let mut lock = FileLock::new(&file);
/// lock.acquire()?;
/// // exclusive access here
/// lock.release()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileLock<'a> {
    file: &'a File,
    held: bool,
}

impl<'a> FileLock<'a> {
    /// Create an unheld lock for `file`.
    pub fn new(file: &'a File) -> Self {
        Self { file, held: false }
    }

    /// Acquire the lock exclusively, blocking until it is free.
    ///
    /// Acquiring a lock that is already held is a no-op.
    pub fn acquire(&mut self) -> Result<()> {
        if !self.held {
            self.file.lock()?;
            self.held = true;
        }
        Ok(())
    }

    /// Acquire the lock in shared mode, blocking until no writer holds
    /// it. Multiple shared holders may coexist.
    pub fn acquire_shared(&mut self) -> Result<()> {
        if !self.held {
            self.file.lock_shared()?;
            self.held = true;
        }
        Ok(())
    }

    /// Acquire the lock exclusively without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::WouldBlock`] if another holder has the lock.
    pub fn try_acquire(&mut self) -> Result<()> {
        if self.held {
            return Ok(());
        }
        match self.file.try_lock() {
            Ok(()) => {
                self.held = true;
                Ok(())
            }
            Err(TryLockError::WouldBlock) => Err(Error::Lock(LockError::WouldBlock)),
            Err(TryLockError::Error(source)) => Err(source.into()),
        }
    }

    /// Acquire the lock in shared mode without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::WouldBlock`] if a writer has the lock.
    pub fn try_acquire_shared(&mut self) -> Result<()> {
        if self.held {
            return Ok(());
        }
        match self.file.try_lock_shared() {
            Ok(()) => {
                self.held = true;
                Ok(())
            }
            Err(TryLockError::WouldBlock) => Err(Error::Lock(LockError::WouldBlock)),
            Err(TryLockError::Error(source)) => Err(source.into()),
        }
    }

    /// Release the lock. Releasing an unheld lock is a no-op.
    pub fn release(&mut self) -> Result<()> {
        if self.held {
            self.file.unlock()?;
            self.held = false;
        }
        Ok(())
    }

    /// Whether this value currently holds the lock.
    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl Drop for FileLock<'_> {
    fn drop(&mut self) {
        if self.held {
            let _ = self.file.unlock();
        }
    }
}

/// Run `operation` while holding an exclusive lock on `file`.
///
/// The lock is released before the result is returned, whether the
/// operation succeeds or fails.
pub fn with_locked_file<T, F>(file: &File, operation: F) -> Result<T>
where
    F: FnOnce(&File) -> Result<T>,
{
    let mut lock = FileLock::new(file);
    lock.acquire()?;
    let outcome = operation(file);
    let released = lock.release();
    let value = outcome?;
    released?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::path::Path;

    fn open_pair(path: &Path) -> (File, File) {
        let first = File::create(path).unwrap();
        let second = OpenOptions::new().read(true).open(path).unwrap();
        (first, second)
    }

    #[test]
    fn test_try_acquire_conflicts_with_exclusive_holder() {
        let dir = tempfile::tempdir().unwrap();
        let (first, second) = open_pair(&dir.path().join("lockfile"));

        let mut holder = FileLock::new(&first);
        holder.acquire().unwrap();
        assert!(holder.is_held());

        let mut contender = FileLock::new(&second);
        assert!(matches!(
            contender.try_acquire(),
            Err(Error::Lock(LockError::WouldBlock))
        ));

        holder.release().unwrap();
        contender.try_acquire().unwrap();
        assert!(contender.is_held());
    }

    #[test]
    fn test_drop_releases_lock() {
        let dir = tempfile::tempdir().unwrap();
        let (first, second) = open_pair(&dir.path().join("lockfile"));

        {
            let mut holder = FileLock::new(&first);
            holder.acquire().unwrap();
        }

        let mut contender = FileLock::new(&second);
        contender.try_acquire().unwrap();
    }

    #[test]
    fn test_shared_holders_coexist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockfile");
        let (first, second) = open_pair(&path);
        let third = OpenOptions::new().read(true).open(&path).unwrap();

        let mut reader_one = FileLock::new(&first);
        let mut reader_two = FileLock::new(&second);
        reader_one.acquire_shared().unwrap();
        reader_two.try_acquire_shared().unwrap();

        let mut writer = FileLock::new(&third);
        assert!(matches!(
            writer.try_acquire(),
            Err(Error::Lock(LockError::WouldBlock))
        ));

        reader_one.release().unwrap();
        reader_two.release().unwrap();
        writer.try_acquire().unwrap();
    }

    #[test]
    fn test_release_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::create(dir.path().join("lockfile")).unwrap();

        let mut lock = FileLock::new(&file);
        lock.acquire().unwrap();
        lock.release().unwrap();
        lock.release().unwrap();
        assert!(!lock.is_held());
    }

    #[test]
    fn test_acquire_twice_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::create(dir.path().join("lockfile")).unwrap();

        let mut lock = FileLock::new(&file);
        lock.acquire().unwrap();
        lock.acquire().unwrap();
        assert!(lock.is_held());
        lock.release().unwrap();
    }

    #[test]
    fn test_with_locked_file_returns_value_and_releases() {
        let dir = tempfile::tempdir().unwrap();
        let (first, second) = open_pair(&dir.path().join("lockfile"));

        let value = with_locked_file(&first, |_| Ok(21 * 2)).unwrap();
        assert_eq!(value, 42);

        let mut contender = FileLock::new(&second);
        contender.try_acquire().unwrap();
    }

    #[test]
    fn test_with_locked_file_releases_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let (first, second) = open_pair(&dir.path().join("lockfile"));

        let result: Result<()> = with_locked_file(&first, |_| {
            Err(Error::Runtime("operation failed".to_string()))
        });
        assert!(result.is_err());

        let mut contender = FileLock::new(&second);
        contender.try_acquire().unwrap();
    }
}
