use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a text input key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Text or cursor changed
    Edited,
    /// Enter pressed
    Submit,
    /// Esc pressed
    Cancel,
    /// Key was not handled
    Ignored,
}

/// Single-line text buffer with a character-indexed cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Take the contents, leaving the field empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn remove_range(&mut self, from: usize, to: usize) {
        let start = self.byte_index(from);
        let end = self.byte_index(to);
        self.value.replace_range(start..end, "");
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.remove_range(self.cursor - 1, self.cursor);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.char_count() {
                    self.remove_range(self.cursor, self.cursor + 1);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.char_count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_count(),
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.char_count(),
            KeyCode::Char('u') if ctrl => {
                // Clear line before cursor
                self.remove_range(0, self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char('k') if ctrl => {
                // Clear line after cursor
                self.remove_range(self.cursor, self.char_count());
            }
            KeyCode::Char('w') if ctrl => {
                // Delete word before cursor
                let before: Vec<char> = self.value.chars().take(self.cursor).collect();
                let mut start = before.len();
                while start > 0 && before[start - 1] == ' ' {
                    start -= 1;
                }
                while start > 0 && before[start - 1] != ' ' {
                    start -= 1;
                }
                self.remove_range(start, self.cursor);
                self.cursor = start;
            }
            KeyCode::Char(_) if ctrl => return InputResult::Ignored,
            KeyCode::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
            }
            _ => return InputResult::Ignored,
        }
        InputResult::Edited
    }
}
