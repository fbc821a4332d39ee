//! Fixed-capacity text line
//!
//! Status lines are formatted into a stack buffer before being drawn. Text
//! that does not fit is truncated rather than rejected.

use core::fmt;

use heapless::String;

/// Text buffer holding at most `N` bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLine<const N: usize> {
    text: String<N>,
}

impl<const N: usize> TextLine<N> {
    /// Create an empty line
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Create a line from text, truncating if too long
    pub fn from_str_truncated(text: &str) -> Self {
        let mut line = Self::new();
        line.push_truncated(text);
        line
    }

    /// Create a line from format arguments, truncating if too long
    pub fn from_fmt(args: fmt::Arguments<'_>) -> Self {
        let mut line = Self::new();
        // `write_str` below never fails, it truncates
        let _ = fmt::Write::write_fmt(&mut line, args);
        line
    }

    /// Replace the content of the line
    pub fn set(&mut self, text: &str) {
        self.text.clear();
        self.push_truncated(text);
    }

    /// Clear the line
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Get the line content
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Number of bytes in the line
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check if the line is at capacity
    pub fn is_full(&self) -> bool {
        self.text.len() == N
    }

    /// Append as much of `text` as fits, never splitting a character
    fn push_truncated(&mut self, text: &str) {
        let room = N - self.text.len();
        let mut end = text.len().min(room);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let _ = self.text.push_str(&text[..end]);
    }
}

impl<const N: usize> fmt::Write for TextLine<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_truncated(s);
        Ok(())
    }
}

impl<const N: usize> fmt::Display for TextLine<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for TextLine<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.as_str());
    }
}
