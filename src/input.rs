/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// A text input field with a character-indexed cursor.
///
/// The field grows with its content up to three visual rows and scrolls
/// internally beyond that. Wrapping is plain character wrapping at the given
/// width; each logical line reserves one extra row when it is an exact
/// multiple of the width so the cursor always has a cell to sit on.
#[derive(Debug, Clone, Default)]
pub struct InputBox {
    content: String,
    cursor: usize,
    scroll: u16,
}

const MAX_VISIBLE_ROWS: u16 = 3;

impl InputBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.content, self.cursor);
        self.content.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.content, self.cursor);
            self.content.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        let char_count = self.content.chars().count();
        if self.cursor < char_count {
            let byte_pos = char_to_byte_index(&self.content, self.cursor);
            self.content.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let char_count = self.content.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.chars().count();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Content split into visual rows at the given width
    pub fn wrapped_rows(&self, width: u16) -> Vec<String> {
        let width = width.max(1) as usize;
        let mut rows = Vec::new();
        for line in self.content.split('\n') {
            let chars: Vec<char> = line.chars().collect();
            let row_count = chars.len() / width + 1;
            for r in 0..row_count {
                let start = r * width;
                let end = ((r + 1) * width).min(chars.len());
                rows.push(chars[start..end].iter().collect());
            }
        }
        rows
    }

    pub fn total_rows(&self, width: u16) -> u16 {
        let width = width.max(1) as usize;
        self.content
            .split('\n')
            .map(|line| (line.chars().count() / width + 1) as u16)
            .sum()
    }

    /// Visual height of the field, clamped to three rows
    pub fn visible_height(&self, width: u16) -> u16 {
        self.total_rows(width).min(MAX_VISIBLE_ROWS)
    }

    /// Visual row and column of the cursor at the given width
    pub fn cursor_row_col(&self, width: u16) -> (u16, u16) {
        let width = width.max(1) as usize;
        let mut remaining = self.cursor;
        let mut row = 0usize;
        for line in self.content.split('\n') {
            let len = line.chars().count();
            if remaining <= len {
                return ((row + remaining / width) as u16, (remaining % width) as u16);
            }
            row += len / width + 1;
            remaining -= len + 1;
        }
        (row as u16, 0)
    }

    /// Adjust the internal scroll so the cursor row stays visible
    pub fn scroll_to_cursor(&mut self, width: u16) {
        let height = self.visible_height(width);
        let (row, _) = self.cursor_row_col(width);
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + height {
            self.scroll = row + 1 - height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor() {
        let mut input = InputBox::new();
        for c in "héllo".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.content(), "héllo");
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn test_insert_mid_string() {
        let mut input = InputBox::new();
        for c in "ac".chars() {
            input.insert_char(c);
        }
        input.move_left();
        input.insert_char('b');
        assert_eq!(input.content(), "abc");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_backspace_utf8() {
        let mut input = InputBox::new();
        for c in "日本語".chars() {
            input.insert_char(c);
        }
        input.backspace();
        assert_eq!(input.content(), "日本");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut input = InputBox::new();
        for c in "abc".chars() {
            input.insert_char(c);
        }
        input.move_home();
        input.delete();
        assert_eq!(input.content(), "bc");
        assert_eq!(input.cursor(), 0);

        input.move_end();
        input.delete();
        assert_eq!(input.content(), "bc");
    }

    #[test]
    fn test_newline_rows() {
        let mut input = InputBox::new();
        for c in "ab".chars() {
            input.insert_char(c);
        }
        input.insert_newline();
        for c in "cd".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.wrapped_rows(10), vec!["ab", "cd"]);
        assert_eq!(input.total_rows(10), 2);
    }

    #[test]
    fn test_height_clamps_to_three_rows() {
        let mut input = InputBox::new();
        assert_eq!(input.visible_height(10), 1);

        for c in "a".repeat(55).chars() {
            input.insert_char(c);
        }
        assert_eq!(input.total_rows(10), 6);
        assert_eq!(input.visible_height(10), 3);
    }

    #[test]
    fn test_cursor_row_col_wrapping() {
        let mut input = InputBox::new();
        for c in "abcdef".chars() {
            input.insert_char(c);
        }
        // width 3: rows are "abc", "def" plus the spill row for the cursor
        assert_eq!(input.wrapped_rows(3), vec!["abc", "def", ""]);
        assert_eq!(input.cursor_row_col(3), (2, 0));

        input.move_left();
        input.move_left();
        assert_eq!(input.cursor_row_col(3), (1, 1));
    }

    #[test]
    fn test_cursor_row_col_across_newlines() {
        let mut input = InputBox::new();
        for c in "ab".chars() {
            input.insert_char(c);
        }
        input.insert_newline();
        for c in "cd".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.cursor_row_col(10), (1, 2));

        input.move_home();
        assert_eq!(input.cursor_row_col(10), (0, 0));

        // Just past the newline, start of the second logical line
        input.move_right();
        input.move_right();
        input.move_right();
        assert_eq!(input.cursor_row_col(10), (1, 0));
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut input = InputBox::new();
        for c in "a".repeat(15).chars() {
            input.insert_char(c);
        }
        // width 3: cursor on row 5 of 6, window is 3 rows
        input.scroll_to_cursor(3);
        assert_eq!(input.scroll(), 3);

        input.move_home();
        input.scroll_to_cursor(3);
        assert_eq!(input.scroll(), 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut input = InputBox::new();
        for c in "some\ntext".chars() {
            input.insert_char(c);
        }
        input.scroll_to_cursor(2);
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
        assert_eq!(input.scroll(), 0);
        assert_eq!(input.visible_height(10), 1);
    }
}
