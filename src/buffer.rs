//! Fixed-capacity text storage backing one line slot.

/// Capacity of every line buffer in bytes
pub const BUFFER_SIZE: usize = 44;

/// Zero-filled, fixed-capacity UTF-8 buffer.
///
/// Bytes past the current text are always zero, so a shorter write never
/// leaves the tail of a previous, longer string behind.
#[derive(Clone, PartialEq, Eq)]
pub struct TextBuffer {
    bytes: [u8; BUFFER_SIZE],
    len: usize,
}

impl TextBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; BUFFER_SIZE],
            len: 0,
        }
    }

    /// Replace the contents with `text`, truncated to capacity.
    ///
    /// Truncation backs off to the previous character boundary so the buffer
    /// always holds valid UTF-8. Returns the text actually stored.
    pub fn write(&mut self, text: &str) -> &str {
        let stored = truncate(text);
        self.bytes = [0; BUFFER_SIZE];
        self.bytes[..stored.len()].copy_from_slice(stored.as_bytes());
        self.len = stored.len();
        self.as_str()
    }

    pub fn as_str(&self) -> &str {
        // Only whole `&str` prefixes are ever copied in
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    /// The full backing storage, including the zeroed tail.
    pub fn raw(&self) -> &[u8; BUFFER_SIZE] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TextBuffer").field(&self.as_str()).finish()
    }
}

/// Longest prefix of `text` that fits a line buffer.
pub fn truncate(text: &str) -> &str {
    if text.len() <= BUFFER_SIZE {
        return text;
    }
    let mut end = BUFFER_SIZE;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
