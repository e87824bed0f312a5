//! Writer wrappers.

use std::io::{self, Write};

/// Writer that flushes after every write.
///
/// Useful for interleaved output such as progress lines, where buffering
/// would reorder or delay what the user sees.
///
/// # Examples
///
/// ```
/// use bruin_io::AutoFlushWriter;
/// use std::io::Write;
///
/// let mut out = AutoFlushWriter::new(Vec::new());
/// out.write_all(b"now").unwrap();
/// assert_eq!(out.get_ref(), b"now");
/// ```
#[derive(Debug)]
pub struct AutoFlushWriter<W: Write> {
    inner: W,
}

impl<W: Write> AutoFlushWriter<W> {
    /// Wrap a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Borrow the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Borrow the underlying writer mutably.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwrap, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for AutoFlushWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.inner.flush()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writer that fans every write out to a set of sinks.
///
/// A write reports success only after the full buffer reaches every
/// sink, so partial writes to individual sinks are retried internally
/// via `write_all`.
#[derive(Default)]
pub struct MultiWriter {
    sinks: Vec<Box<dyn Write>>,
}

impl MultiWriter {
    /// Create a fan-out writer with no sinks.
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Create a fan-out writer over the given sinks.
    pub fn with_sinks(sinks: Vec<Box<dyn Write>>) -> Self {
        Self { sinks }
    }

    /// Add a sink.
    pub fn add(&mut self, sink: impl Write + 'static) -> &mut Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Number of sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether there are no sinks.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Write for MultiWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for sink in &mut self.sinks {
            sink.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}
