//! Read-only wrapper.

use std::ops::Deref;

/// Wrapper that exposes a value immutably.
///
/// `ReadOnly` owns its value and hands out shared references through
/// [`Deref`], but provides no mutable access. Handing a
/// `&ReadOnly<T>` to a caller guarantees at compile time that the
/// caller cannot modify the value, even if `T` has interior setters
/// behind `&mut self`.
///
/// # Examples
///
/// ```
/// use bruin_core::readonly::ReadOnly;
///
/// let frozen = ReadOnly::new(vec![1, 2, 3]);
/// assert_eq!(frozen.len(), 3);
/// let inner = frozen.into_inner();
/// assert_eq!(inner, vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOnly<T> {
    inner: T,
}

impl<T> ReadOnly<T> {
    /// Wrap a value.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped value.
    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Unwrap, returning the value and giving up the protection.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> Deref for ReadOnly<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> AsRef<T> for ReadOnly<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}

impl<T> From<T> for ReadOnly<T> {
    fn from(inner: T) -> Self {
        Self::new(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Settings {
        retries: u32,
    }

    #[test]
    fn test_read_access() {
        let frozen = ReadOnly::new(Settings { retries: 3 });
        assert_eq!(frozen.retries, 3);
        assert_eq!(frozen.get().retries, 3);
        assert_eq!(frozen.as_ref().retries, 3);
    }

    #[test]
    fn test_into_inner() {
        let frozen = ReadOnly::new(Settings { retries: 3 });
        let settings = frozen.into_inner();
        assert_eq!(settings, Settings { retries: 3 });
    }

    #[test]
    fn test_from_value() {
        let frozen: ReadOnly<u32> = 7.into();
        assert_eq!(*frozen, 7);
    }
}
