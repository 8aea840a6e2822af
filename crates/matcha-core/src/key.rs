use std::fmt;

/// A decoded keyboard key.
///
/// Keys are either a named special key (arrows, function keys, control
/// combinations, editing keys) or [`Key::Runes`] carrying the text the user
/// typed. Modifier state that changes the escape sequence a terminal sends
/// (shift/ctrl on arrows, ctrl on letters) is part of the key itself; the alt
/// modifier lives on [`KeyEvent`] because terminals encode it as a prefix
/// byte around an otherwise ordinary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// One or more printable characters, exactly as typed.
    Runes(String),
    Enter,
    Tab,
    ShiftTab,
    Backspace,
    Delete,
    Insert,
    Escape,
    Up,
    Down,
    Left,
    Right,
    ShiftUp,
    ShiftDown,
    ShiftLeft,
    ShiftRight,
    CtrlUp,
    CtrlDown,
    CtrlLeft,
    CtrlRight,
    Home,
    End,
    PageUp,
    PageDown,
    /// Function key `F1`..=`F20`.
    F(u8),
    /// A control-key chord such as ctrl+c. The payload is the lowercase
    /// letter, or one of `@ \ ] ^ _` for the control bytes past `ctrl+z`.
    Ctrl(char),
}

impl Key {
    /// Build a [`Key::Runes`] from a single character.
    pub fn rune(c: char) -> Self {
        Key::Runes(c.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Runes(s) => write!(f, "{s}"),
            Key::Enter => write!(f, "enter"),
            Key::Tab => write!(f, "tab"),
            Key::ShiftTab => write!(f, "shift+tab"),
            Key::Backspace => write!(f, "backspace"),
            Key::Delete => write!(f, "delete"),
            Key::Insert => write!(f, "insert"),
            Key::Escape => write!(f, "esc"),
            Key::Up => write!(f, "up"),
            Key::Down => write!(f, "down"),
            Key::Left => write!(f, "left"),
            Key::Right => write!(f, "right"),
            Key::ShiftUp => write!(f, "shift+up"),
            Key::ShiftDown => write!(f, "shift+down"),
            Key::ShiftLeft => write!(f, "shift+left"),
            Key::ShiftRight => write!(f, "shift+right"),
            Key::CtrlUp => write!(f, "ctrl+up"),
            Key::CtrlDown => write!(f, "ctrl+down"),
            Key::CtrlLeft => write!(f, "ctrl+left"),
            Key::CtrlRight => write!(f, "ctrl+right"),
            Key::Home => write!(f, "home"),
            Key::End => write!(f, "end"),
            Key::PageUp => write!(f, "pgup"),
            Key::PageDown => write!(f, "pgdown"),
            Key::F(n) => write!(f, "f{n}"),
            Key::Ctrl(c) => write!(f, "ctrl+{c}"),
        }
    }
}

/// A keyboard event: a [`Key`] plus the alt-modifier flag and a paste flag.
///
/// `alt` is set when the key arrived wrapped in an ESC prefix (the way
/// terminals report the alt/meta modifier). `paste` marks rune events that
/// carry pasted rather than typed text, so widgets can skip keymap handling
/// for them.
///
/// # Example
///
/// ```rust,ignore
/// use matcha_core::{Key, KeyEvent, Message};
///
/// fn update(msg: Message<Msg>) {
///     if let Message::Key(KeyEvent { key: Key::Ctrl('c'), .. }) = msg {
///         // ...
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub alt: bool,
    pub paste: bool,
}

impl KeyEvent {
    /// An event for `key` with no modifiers.
    pub fn new(key: Key) -> Self {
        KeyEvent {
            key,
            alt: false,
            paste: false,
        }
    }

    /// A plain character keypress.
    pub fn rune(c: char) -> Self {
        KeyEvent::new(Key::rune(c))
    }

    /// `key` with the alt flag set.
    pub fn alt(key: Key) -> Self {
        KeyEvent {
            key,
            alt: true,
            paste: false,
        }
    }

    /// Pasted text represented as a rune event with the paste flag set.
    ///
    /// Useful for feeding a [`Message::Paste`](crate::Message::Paste) payload
    /// into a text-editing widget.
    pub fn paste(text: impl Into<String>) -> Self {
        KeyEvent {
            key: Key::Runes(text.into()),
            alt: false,
            paste: true,
        }
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        KeyEvent::new(key)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alt {
            write!(f, "alt+{}", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_named_keys() {
        assert_eq!(Key::Enter.to_string(), "enter");
        assert_eq!(Key::ShiftTab.to_string(), "shift+tab");
        assert_eq!(Key::F(12).to_string(), "f12");
        assert_eq!(Key::Ctrl('c').to_string(), "ctrl+c");
        assert_eq!(Key::rune('q').to_string(), "q");
    }

    #[test]
    fn display_alt_prefix() {
        assert_eq!(KeyEvent::alt(Key::Enter).to_string(), "alt+enter");
        assert_eq!(KeyEvent::alt(Key::rune('x')).to_string(), "alt+x");
        assert_eq!(KeyEvent::rune('x').to_string(), "x");
    }

    #[test]
    fn paste_event_sets_flag() {
        let ev = KeyEvent::paste("hello");
        assert!(ev.paste);
        assert!(!ev.alt);
        assert_eq!(ev.key, Key::Runes("hello".into()));
    }
}
