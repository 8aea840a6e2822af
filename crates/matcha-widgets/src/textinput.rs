//! Single-line text input with horizontal scrolling, word-wise editing,
//! and multiple echo modes (normal, password, hidden).

use matcha_core::key::{Key, KeyEvent};

const REVERSE_ON: &str = "\x1b[7m";
const REVERSE_OFF: &str = "\x1b[27m";

/// Controls how input text is displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EchoMode {
    /// Display characters as typed.
    #[default]
    Normal,
    /// Display each character as the given mask character.
    Password(char),
    /// Display nothing.
    Hidden,
}

/// Configuration for a [`TextInput`], consumed by [`TextInput::new`].
#[derive(Debug, Clone)]
pub struct TextInputConfig {
    /// Text shown while the input is empty and unfocused.
    pub placeholder: String,
    /// Prompt string rendered before the input.
    pub prompt: String,
    /// Maximum number of characters accepted, if any.
    pub char_limit: Option<usize>,
    /// How typed characters are echoed.
    pub echo_mode: EchoMode,
    /// Visible width of the editing window in characters. Zero disables
    /// horizontal scrolling.
    pub width: usize,
}

impl Default for TextInputConfig {
    fn default() -> Self {
        Self {
            placeholder: String::new(),
            prompt: "> ".into(),
            char_limit: None,
            echo_mode: EchoMode::default(),
            width: 0,
        }
    }
}

/// A single-line text input.
///
/// The input is a pure value: `update` consumes it and returns the edited
/// input. Submission is the parent's concern; watch for
/// [`Key::Enter`](matcha_core::Key::Enter) before forwarding.
///
/// # Example
///
/// ```ignore
/// let mut input = TextInput::new(TextInputConfig {
///     placeholder: "Type here...".into(),
///     char_limit: Some(80),
///     ..TextInputConfig::default()
/// });
/// input.focus();
///
/// // In the parent's update:
/// // self.input = self.input.update(&key);
///
/// // In the parent's view:
/// // output.push_str(&self.input.view());
/// ```
#[derive(Debug, Clone)]
pub struct TextInput {
    config: TextInputConfig,
    value: Vec<char>,
    cursor: usize,
    offset: usize,
    focus: bool,
}

impl TextInput {
    pub fn new(config: TextInputConfig) -> Self {
        Self {
            config,
            value: Vec::new(),
            cursor: 0,
            offset: 0,
            focus: false,
        }
    }

    /// Give this input keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// Whether the input currently has focus.
    pub fn focused(&self) -> bool {
        self.focus
    }

    /// Get the current input value as a String.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Programmatically set the input value and move the cursor to the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().collect();
        if let Some(limit) = self.config.char_limit {
            self.value.truncate(limit);
        }
        self.cursor = self.value.len();
        self.scroll();
    }

    /// Clear the input value and reset the cursor.
    pub fn reset(&mut self) {
        self.value.clear();
        self.cursor = 0;
        self.offset = 0;
    }

    /// Return the current cursor position (character index).
    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Whether the input value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Return the number of characters in the input value.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Process one key event, returning the edited input.
    ///
    /// Unfocused inputs ignore keys. Enter is deliberately not handled
    /// here.
    pub fn update(mut self, key: &KeyEvent) -> Self {
        if !self.focus {
            return self;
        }

        if key.alt {
            match &key.key {
                Key::Backspace => self.delete_word_backward(),
                Key::Left => self.move_word_left(),
                Key::Right => self.move_word_right(),
                Key::Runes(s) if s == "d" => self.delete_word_forward(),
                _ => {}
            }
            self.scroll();
            return self;
        }

        match &key.key {
            Key::Runes(s) => {
                for c in s.chars() {
                    self.insert_char(c);
                }
            }
            Key::Backspace => self.delete_char_backward(),
            Key::Delete => self.delete_char_forward(),
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(self.value.len()),
            Key::CtrlLeft => self.move_word_left(),
            Key::CtrlRight => self.move_word_right(),
            Key::Home | Key::Ctrl('a') => self.cursor = 0,
            Key::End | Key::Ctrl('e') => self.cursor = self.value.len(),
            Key::Ctrl('w') => self.delete_word_backward(),
            Key::Ctrl('u') => {
                self.value.drain(..self.cursor);
                self.cursor = 0;
            }
            Key::Ctrl('k') => self.value.truncate(self.cursor),
            _ => {}
        }
        self.scroll();
        self
    }

    /// Insert pasted text at the cursor, honoring the char limit. Newlines
    /// are stripped since the input is single-line.
    pub fn paste(mut self, text: &str) -> Self {
        for c in text.chars().filter(|c| *c != '\r' && *c != '\n') {
            self.insert_char(c);
        }
        self.scroll();
        self
    }

    fn insert_char(&mut self, c: char) {
        if let Some(limit) = self.config.char_limit {
            if self.value.len() >= limit {
                return;
            }
        }
        self.value.insert(self.cursor, c);
        self.cursor += 1;
    }

    fn delete_char_backward(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.value.remove(self.cursor);
        }
    }

    fn delete_char_forward(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    fn delete_word_backward(&mut self) {
        while self.cursor > 0 && self.value[self.cursor - 1] == ' ' {
            self.cursor -= 1;
            self.value.remove(self.cursor);
        }
        while self.cursor > 0 && self.value[self.cursor - 1] != ' ' {
            self.cursor -= 1;
            self.value.remove(self.cursor);
        }
    }

    fn delete_word_forward(&mut self) {
        while self.cursor < self.value.len() && !self.value[self.cursor].is_alphanumeric() {
            self.value.remove(self.cursor);
        }
        while self.cursor < self.value.len() && self.value[self.cursor].is_alphanumeric() {
            self.value.remove(self.cursor);
        }
    }

    fn move_word_left(&mut self) {
        while self.cursor > 0 && !self.value[self.cursor - 1].is_alphanumeric() {
            self.cursor -= 1;
        }
        while self.cursor > 0 && self.value[self.cursor - 1].is_alphanumeric() {
            self.cursor -= 1;
        }
    }

    fn move_word_right(&mut self) {
        let len = self.value.len();
        while self.cursor < len && self.value[self.cursor].is_alphanumeric() {
            self.cursor += 1;
        }
        while self.cursor < len && !self.value[self.cursor].is_alphanumeric() {
            self.cursor += 1;
        }
    }

    /// Keep the cursor inside the visible window.
    fn scroll(&mut self) {
        let width = self.config.width;
        if width == 0 {
            self.offset = 0;
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + width {
            self.offset = self.cursor + 1 - width;
        }
    }

    fn display_value(&self) -> Vec<char> {
        match self.config.echo_mode {
            EchoMode::Normal => self.value.clone(),
            EchoMode::Password(mask) => vec![mask; self.value.len()],
            EchoMode::Hidden => Vec::new(),
        }
    }

    /// Render the input as a single line.
    pub fn view(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.config.prompt);

        if self.value.is_empty() && !self.focus {
            out.push_str(&self.config.placeholder);
            return out;
        }

        let display = self.display_value();
        let end = if self.config.width == 0 {
            display.len()
        } else {
            (self.offset + self.config.width).min(display.len())
        };
        let offset = self.offset.min(display.len());
        let visible = &display[offset..end];

        if !self.focus {
            out.extend(visible.iter());
            return out;
        }

        // Reverse-video cursor: the character under the cursor, or a
        // trailing space when the cursor sits at the end.
        let cursor_in_visible = self.cursor.saturating_sub(offset);
        for (i, c) in visible.iter().enumerate() {
            if i == cursor_in_visible {
                out.push_str(REVERSE_ON);
                out.push(*c);
                out.push_str(REVERSE_OFF);
            } else {
                out.push(*c);
            }
        }
        if cursor_in_visible >= visible.len() {
            out.push_str(REVERSE_ON);
            out.push(' ');
            out.push_str(REVERSE_OFF);
        }
        out
    }
}
