//! Character reader with pushback.

use std::collections::VecDeque;
use std::io::Read;

use bruin_core::{ConversionError, Error, Result};

/// Character-oriented reader that supports pushing data back onto the
/// stream.
///
/// Pushed-back text is read again before anything that was left in the
/// original input, which makes simple lookahead parsers easy to write:
/// read a chunk, inspect it, and push it back if it belongs to the next
/// stage.
///
/// The whole input is decoded up front, so this type suits configuration
/// files and other small inputs rather than bulk streams.
///
/// # Examples
///
/// ```
/// use bruin_io::PushbackReader;
///
/// let mut reader = PushbackReader::from_str("hello\n");
/// let line = reader.read_line();
/// assert_eq!(line, "hello\n");
///
/// reader.push_back(&line);
/// assert_eq!(reader.read_line(), "hello\n");
/// ```
#[derive(Debug, Clone)]
pub struct PushbackReader {
    chars: VecDeque<char>,
}

impl PushbackReader {
    /// Create a reader over a string.
    pub fn from_str(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    /// Create a reader by draining `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the input is not valid
    /// UTF-8.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text =
            String::from_utf8(bytes).map_err(|_| Error::Conversion(ConversionError::InvalidUtf8))?;
        Ok(Self::from_str(&text))
    }

    /// Push `text` back onto the stream.
    ///
    /// The pushed text is returned by subsequent reads before any
    /// remaining input, in the order it appears in `text`.
    pub fn push_back(&mut self, text: &str) {
        for ch in text.chars().rev() {
            self.chars.push_front(ch);
        }
    }

    /// Read up to `count` characters.
    ///
    /// Returns fewer than `count` characters only when the stream runs
    /// out, and an empty string at end of input.
    pub fn read_chars(&mut self, count: usize) -> String {
        let take = count.min(self.chars.len());
        self.chars.drain(..take).collect()
    }

    /// Read everything left on the stream.
    pub fn read_remaining(&mut self) -> String {
        self.chars.drain(..).collect()
    }

    /// Read one line, including its trailing newline.
    ///
    /// The final line of input may lack a newline. Returns an empty
    /// string at end of input.
    pub fn read_line(&mut self) -> String {
        let mut line = String::new();
        while let Some(ch) = self.chars.pop_front() {
            line.push(ch);
            if ch == '\n' {
                break;
            }
        }
        line
    }

    /// Number of characters left, counting pushed-back text.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the stream is exhausted.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Iterates over the remaining lines, `read_line` at a time.
impl Iterator for PushbackReader {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.read_line())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_and_push_back_line() {
        let mut reader = PushbackReader::from_str("abc\ndef\nghi\n");

        let line = reader.read_line();
        assert_eq!(line, "abc\n");

        reader.push_back(&line);
        assert_eq!(reader.read_line(), "abc\n");

        assert_eq!(reader.read_chars(1), "d");
        assert_eq!(reader.read_line(), "ef\n");
        assert_eq!(reader.read_remaining(), "ghi\n");
        assert_eq!(reader.read_line(), "");

        reader.push_back("foobar");
        assert_eq!(reader.read_line(), "foobar");
    }

    #[test]
    fn test_read_chars_past_end() {
        let mut reader = PushbackReader::from_str("xy");
        assert_eq!(reader.read_chars(10), "xy");
        assert_eq!(reader.read_chars(10), "");
    }

    #[test]
    fn test_push_back_preserves_order() {
        let mut reader = PushbackReader::from_str("tail");
        reader.push_back("head ");
        assert_eq!(reader.read_remaining(), "head tail");
    }

    #[test]
    fn test_final_line_without_newline() {
        let mut reader = PushbackReader::from_str("one\ntwo");
        assert_eq!(reader.read_line(), "one\n");
        assert_eq!(reader.read_line(), "two");
        assert_eq!(reader.read_line(), "");
    }

    #[test]
    fn test_line_iteration() {
        let reader = PushbackReader::from_str("a\nb\nc");
        let lines: Vec<String> = reader.collect();
        assert_eq!(lines, vec!["a\n", "b\n", "c"]);
    }

    #[test]
    fn test_from_reader_rejects_invalid_utf8() {
        let bytes: &[u8] = &[0x66, 0x6f, 0xff];
        let result = PushbackReader::from_reader(bytes);
        assert!(matches!(
            result,
            Err(Error::Conversion(ConversionError::InvalidUtf8))
        ));
    }

    #[test]
    fn test_from_reader_reads_everything() {
        let bytes: &[u8] = b"first\nsecond\n";
        let mut reader = PushbackReader::from_reader(bytes).unwrap();
        assert_eq!(reader.len(), 13);
        assert_eq!(reader.read_remaining(), "first\nsecond\n");
    }
}
