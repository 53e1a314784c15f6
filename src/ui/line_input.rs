use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Longest answer anyone needs: 999 × 999 has six digits.
pub const MAX_ANSWER_LEN: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
    /// The key was not for the input field.
    Ignored,
}

/// Numeric answer field. Only digits and a leading minus sign get in;
/// everything else is left for the screen's own shortcuts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerInput {
    text: String,
}

impl AnswerInput {
    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Returns the typed text and empties the field.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    fn push(&mut self, ch: char) -> bool {
        let accepted = ch.is_ascii_digit() || (ch == '-' && self.text.is_empty());
        if accepted && self.text.len() < MAX_ANSWER_LEN {
            self.text.push(ch);
            true
        } else {
            false
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Enter => InputResult::Submit,
            KeyCode::Esc => InputResult::Cancel,
            KeyCode::Backspace => {
                self.text.pop();
                InputResult::Continue
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
                InputResult::Continue
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.push(ch) {
                    InputResult::Continue
                } else {
                    InputResult::Ignored
                }
            }
            _ => InputResult::Ignored,
        }
    }
}
