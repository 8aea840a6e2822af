use crate::key::KeyEvent;
use crate::mouse::MouseEvent;

/// A structured event produced by the input decoder.
///
/// `InputEvent` is the decoder's half of the input pipeline: the runtime's
/// reader task feeds terminal bytes into a [`Decoder`](crate::Decoder) and
/// forwards each resulting `InputEvent` into the program's message stream,
/// where it becomes the matching [`Message`](crate::Message) variant.
///
/// `Unknown` carries the raw bytes of any sequence the decoder could not
/// map. Input is never silently dropped; an application that cares can log
/// or inspect the bytes from
/// [`Message::UnknownSequence`](crate::Message::UnknownSequence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Bracketed-paste content, delivered as one event.
    Paste(String),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
    /// An escape sequence the decoder does not understand, raw bytes included.
    Unknown(Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;

    #[test]
    fn unknown_preserves_bytes() {
        let ev = InputEvent::Unknown(vec![0x1b, b'[', b'9', b'z']);
        assert_eq!(ev, InputEvent::Unknown(b"\x1b[9z".to_vec()));
    }

    #[test]
    fn key_event_round_trip() {
        let ev = InputEvent::Key(KeyEvent::new(Key::Enter));
        assert_eq!(ev, InputEvent::Key(Key::Enter.into()));
    }
}
