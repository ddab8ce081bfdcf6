use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    /// Cursor moved or the key was ignored.
    Continue,
    /// The text itself changed.
    Edited,
    Submit,
    Cancel,
}

/// Single-line editable text with a char-indexed cursor.
#[derive(Clone, Debug, Default)]
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    /// When cursor is at end of text, cursor_char is None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
            None => (&self.text, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,

            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor < self.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.remove_char_at(self.cursor - 1);
                    self.cursor -= 1;
                    return InputResult::Edited;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.len() {
                    self.remove_char_at(self.cursor);
                    return InputResult::Edited;
                }
            }
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.len(),
            KeyCode::Char('u') if ctrl => {
                if !self.text.is_empty() {
                    self.clear();
                    return InputResult::Edited;
                }
            }
            KeyCode::Char('w') if ctrl => {
                if self.delete_word_back() {
                    return InputResult::Edited;
                }
            }
            KeyCode::Char(ch) if !ctrl => {
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.insert(byte_offset, ch);
                self.cursor += 1;
                return InputResult::Edited;
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn remove_char_at(&mut self, char_idx: usize) {
        let byte_offset = self.char_to_byte(char_idx);
        if let Some(ch) = self.text[byte_offset..].chars().next() {
            self.text
                .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
        }
    }

    /// Delete word before cursor (unix-word-rubout: skip whitespace, then non-whitespace).
    fn delete_word_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;

        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }

        let start_byte = self.char_to_byte(pos);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = pos;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(input: &mut LineInput, s: &str) {
        for ch in s.chars() {
            input.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn typing_reports_edits() {
        let mut input = LineInput::default();
        assert_eq!(input.handle(key(KeyCode::Char('s'))), InputResult::Edited);
        type_str(&mut input, "top");
        assert_eq!(input.value(), "stop");
    }

    #[test]
    fn cursor_moves_are_not_edits() {
        let mut input = LineInput::new("yield");
        assert_eq!(input.handle(key(KeyCode::Left)), InputResult::Continue);
        assert_eq!(input.handle(key(KeyCode::Home)), InputResult::Continue);
        assert_eq!(input.handle(ctrl('e')), InputResult::Continue);
        assert_eq!(input.value(), "yield");
    }

    #[test]
    fn insert_in_middle() {
        let mut input = LineInput::new("sgn");
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Char('i')));
        assert_eq!(input.value(), "sign");
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut input = LineInput::new("ab");
        input.handle(key(KeyCode::Home));
        assert_eq!(input.handle(key(KeyCode::Backspace)), InputResult::Continue);
        assert_eq!(input.value(), "ab");
    }

    #[test]
    fn delete_removes_char_under_cursor() {
        let mut input = LineInput::new("lane");
        input.handle(key(KeyCode::Home));
        assert_eq!(input.handle(key(KeyCode::Delete)), InputResult::Edited);
        assert_eq!(input.value(), "ane");
        input.handle(key(KeyCode::End));
        assert_eq!(input.handle(key(KeyCode::Delete)), InputResult::Continue);
    }

    #[test]
    fn multibyte_chars_edit_cleanly() {
        let mut input = LineInput::new("café");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "caf");
        type_str(&mut input, "é au lait");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Right));
        input.handle(key(KeyCode::Right));
        input.handle(key(KeyCode::Right));
        let (before, at, after) = input.render_parts();
        assert_eq!(before, "caf");
        assert_eq!(at, Some('é'));
        assert_eq!(after, " au lait");
    }

    #[test]
    fn render_parts_at_end() {
        let input = LineInput::new("speed");
        assert_eq!(input.render_parts(), ("speed", None, ""));
    }

    #[test]
    fn ctrl_u_clears_and_ctrl_w_deletes_word() {
        let mut input = LineInput::new("school zone  ");
        assert_eq!(input.handle(ctrl('w')), InputResult::Edited);
        assert_eq!(input.value(), "school ");
        assert_eq!(input.handle(ctrl('u')), InputResult::Edited);
        assert_eq!(input.value(), "");
        assert_eq!(input.handle(ctrl('u')), InputResult::Continue);
        assert_eq!(input.handle(ctrl('w')), InputResult::Continue);
    }

    #[test]
    fn enter_and_esc() {
        let mut input = LineInput::new("x");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(input.value(), "x");
    }
}
