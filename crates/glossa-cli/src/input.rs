//! Multi-line input box state.
//!
//! The cursor is a char index, never a byte index, so CJK and other multi-byte
//! text can be edited safely.

#[derive(Debug, Default, Clone)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index(self.cursor);
        self.text.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Start of the current line.
    pub fn move_home(&mut self) {
        let (row, _) = self.cursor_row_col();
        self.cursor = self.line_start(row);
    }

    /// End of the current line.
    pub fn move_end(&mut self) {
        let (row, _) = self.cursor_row_col();
        let line_len = self
            .text
            .split('\n')
            .nth(row)
            .map(|l| l.chars().count())
            .unwrap_or(0);
        self.cursor = self.line_start(row) + line_len;
    }

    fn line_start(&self, row: usize) -> usize {
        self.text
            .split('\n')
            .take(row)
            .map(|l| l.chars().count() + 1)
            .sum()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_count();
    }

    /// Line and char column of the cursor.
    pub fn cursor_row_col(&self) -> (usize, usize) {
        let mut row = 0;
        let mut col = 0;
        for c in self.text.chars().take(self.cursor) {
            if c == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (row, col)
    }

    /// The text of the cursor's line up to the cursor, for width measurement.
    pub fn text_before_cursor_on_line(&self) -> &str {
        let end = self.byte_index(self.cursor);
        let before = &self.text[..end];
        match before.rfind('\n') {
            Some(i) => &before[i + 1..],
            None => before,
        }
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }
}

/// Previously sent inputs, recalled with Up/Down.
#[derive(Debug, Default, Clone)]
pub struct InputHistory {
    entries: Vec<String>,
    pos: Option<usize>,
}

impl InputHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, input: String) {
        if self.entries.last() != Some(&input) {
            self.entries.push(input);
        }
        self.pos = None;
    }

    /// Step back in history. Returns the entry to show.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let pos = match self.pos {
            None => self.entries.len() - 1,
            Some(0) => 0,
            Some(p) => p - 1,
        };
        self.pos = Some(pos);
        self.entries.get(pos).map(String::as_str)
    }

    /// Step forward. `Some("")` once past the newest entry.
    pub fn newer(&mut self) -> Option<&str> {
        let pos = self.pos?;
        if pos + 1 < self.entries.len() {
            self.pos = Some(pos + 1);
            self.entries.get(pos + 1).map(String::as_str)
        } else {
            self.pos = None;
            Some("")
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
