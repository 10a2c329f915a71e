/// A single-line edit buffer with a byte-offset cursor.
///
/// All TUI inputs (search, form fields, chat) are one line, so newlines
/// and carriage returns are rejected on insert.
#[derive(Debug, Clone, Default)]
pub(crate) struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub(crate) fn set<T: Into<String>>(&mut self, value: T) {
        self.text = value.into();
        self.cursor = self.text.len();
    }

    /// Take the contents, leaving the buffer empty.
    pub(crate) fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub(crate) fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        let mut buf = [0u8; 4];
        let encoded = ch.encode_utf8(&mut buf);
        self.text.insert_str(self.cursor, encoded);
        self.cursor += encoded.len();
    }

    pub(crate) fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.text.drain(idx..self.cursor);
            self.cursor = idx;
        }
    }

    pub(crate) fn delete_char(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        if let Some((idx, ch)) = self.text[self.cursor..].char_indices().next() {
            let end = self.cursor + idx + ch.len_utf8();
            self.text.drain(self.cursor..end);
        }
    }

    pub(crate) fn move_left(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub(crate) fn move_right(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        if let Some((idx, ch)) = self.text[self.cursor..].char_indices().next() {
            self.cursor += idx + ch.len_utf8();
        }
    }

    pub(crate) fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Character column of the cursor, for placing the terminal cursor.
    pub(crate) fn cursor_col(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn insert_and_delete_at_cursor() {
        let mut buffer = TextBuffer::new();
        for ch in "milk".chars() {
            buffer.insert_char(ch);
        }
        buffer.move_left();
        buffer.move_left();
        buffer.insert_char('n');
        assert_eq!(buffer.as_str(), "minlk");

        buffer.delete_char();
        assert_eq!(buffer.as_str(), "mink");
        buffer.backspace();
        assert_eq!(buffer.as_str(), "mik");
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut buffer = TextBuffer::new();
        buffer.set("héllo");
        assert_eq!(buffer.cursor_col(), 5);
        buffer.move_home();
        buffer.move_right();
        buffer.move_right();
        buffer.backspace();
        assert_eq!(buffer.as_str(), "hllo");
    }

    #[test]
    fn rejects_newlines() {
        let mut buffer = TextBuffer::new();
        buffer.insert_char('a');
        buffer.insert_char('\n');
        buffer.insert_char('b');
        assert_eq!(buffer.as_str(), "ab");
    }

    #[test]
    fn take_resets_the_buffer() {
        let mut buffer = TextBuffer::new();
        buffer.set("hello");
        assert_eq!(buffer.take(), "hello");
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor_col(), 0);
    }
}
