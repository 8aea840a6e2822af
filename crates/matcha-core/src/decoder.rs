use crate::event::InputEvent;
use crate::key::{Key, KeyEvent};
use crate::mouse::{MouseAction, MouseButton, MouseEvent};

/// Longest CSI parameter run we accumulate before giving up on a sequence.
const CSI_LIMIT: usize = 64;

/// Bracketed pastes larger than this are flushed early instead of buffering
/// without bound (a guard against a lost `ESC[201~` end marker).
const PASTE_LIMIT: usize = 4 * 1024 * 1024;

const PASTE_END: &[u8; 6] = b"\x1b[201~";

#[derive(Debug)]
enum State {
    Ground,
    /// ESC seen; the next byte decides between a sequence and an alt-chord.
    Escape,
    /// Inside `ESC [`, accumulating parameter/intermediate bytes.
    Csi(Vec<u8>),
    /// Inside `ESC O` (SS3), awaiting the final byte.
    Ss3,
    /// Assembling a multi-byte UTF-8 scalar.
    Utf8 {
        bytes: Vec<u8>,
        need: usize,
        alt: bool,
    },
    /// Inside `ESC [ M`, collecting the three X10 payload bytes.
    LegacyMouse { bytes: [u8; 3], len: usize },
    /// Inside a bracketed paste; `marker` counts matched end-marker bytes.
    Paste { content: Vec<u8>, marker: usize },
}

/// Stateful byte-stream decoder turning raw terminal input into
/// [`InputEvent`]s.
///
/// One decoder instance serves one byte stream. Feed it a byte at a time
/// with [`feed`](Decoder::feed); whenever a full key, mouse report, paste,
/// or focus sequence has been assembled the event is returned. The decoder
/// is agnostic to read boundaries: feeding a sequence byte-by-byte and
/// feeding it in one slice produce identical events.
///
/// Anything that looks like an escape sequence but cannot be mapped is
/// surfaced as [`InputEvent::Unknown`] carrying the original bytes, so no
/// input is ever silently discarded.
///
/// # Example
///
/// ```rust,ignore
/// use matcha_core::{Decoder, InputEvent};
///
/// let mut decoder = Decoder::new();
/// let mut events = Vec::new();
/// for byte in read_chunk() {
///     events.extend(decoder.feed(byte));
/// }
/// ```
#[derive(Debug)]
pub struct Decoder {
    state: State,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            state: State::Ground,
        }
    }

    /// Feed one byte; returns a completed event if this byte finished one.
    pub fn feed(&mut self, byte: u8) -> Option<InputEvent> {
        match std::mem::replace(&mut self.state, State::Ground) {
            State::Ground => self.ground(byte, false),
            State::Escape => self.escape(byte),
            State::Csi(buf) => self.csi(buf, byte),
            State::Ss3 => self.ss3(byte),
            State::Utf8 { bytes, need, alt } => self.utf8(bytes, need, alt, byte),
            State::LegacyMouse { bytes, len } => self.legacy_mouse(bytes, len, byte),
            State::Paste { content, marker } => self.paste(content, marker, byte),
        }
    }

    /// Feed a whole slice, collecting every completed event.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Vec<InputEvent> {
        bytes.iter().filter_map(|&b| self.feed(b)).collect()
    }

    /// True when the last byte fed was a lone ESC still waiting for a
    /// follow-up. The reader uses this to arm its escape-disambiguation
    /// timeout.
    pub fn is_escape_pending(&self) -> bool {
        matches!(self.state, State::Escape)
    }

    /// Resolve a pending lone ESC as the escape key. No-op in any other
    /// state (a partially received sequence keeps waiting for bytes).
    pub fn flush_escape(&mut self) -> Option<InputEvent> {
        if self.is_escape_pending() {
            self.state = State::Ground;
            Some(InputEvent::Key(KeyEvent::new(Key::Escape)))
        } else {
            None
        }
    }

    /// Resolve whatever is pending at end of input: a lone ESC becomes the
    /// escape key, partial sequences become [`InputEvent::Unknown`], and a
    /// paste missing its end marker is emitted with what arrived.
    pub fn flush(&mut self) -> Option<InputEvent> {
        match std::mem::replace(&mut self.state, State::Ground) {
            State::Ground => None,
            State::Escape => Some(InputEvent::Key(KeyEvent::new(Key::Escape))),
            State::Csi(buf) => Some(unknown_csi(&buf, None)),
            State::Ss3 => Some(InputEvent::Unknown(vec![0x1b, b'O'])),
            State::Utf8 { bytes, .. } => Some(InputEvent::Unknown(bytes)),
            State::LegacyMouse { bytes, len } => {
                let mut raw = vec![0x1b, b'[', b'M'];
                raw.extend_from_slice(&bytes[..len]);
                Some(InputEvent::Unknown(raw))
            }
            State::Paste {
                mut content,
                marker,
            } => {
                content.extend_from_slice(&PASTE_END[..marker]);
                Some(paste_event(content))
            }
        }
    }

    fn ground(&mut self, byte: u8, alt: bool) -> Option<InputEvent> {
        let key = match byte {
            0x1b => {
                self.state = State::Escape;
                return None;
            }
            0x0d => Key::Enter,
            0x09 => Key::Tab,
            // Both the BS control byte and DEL: terminals disagree on which
            // one the backspace key sends.
            0x08 | 0x7f => Key::Backspace,
            0x00 => Key::Ctrl('@'),
            0x01..=0x1a => Key::Ctrl((b'a' + byte - 1) as char),
            0x1c => Key::Ctrl('\\'),
            0x1d => Key::Ctrl(']'),
            0x1e => Key::Ctrl('^'),
            0x1f => Key::Ctrl('_'),
            0x20..=0x7e => Key::rune(byte as char),
            _ => match utf8_len(byte) {
                Some(need) => {
                    self.state = State::Utf8 {
                        bytes: vec![byte],
                        need,
                        alt,
                    };
                    return None;
                }
                None => return Some(InputEvent::Unknown(vec![byte])),
            },
        };
        Some(InputEvent::Key(KeyEvent {
            key,
            alt,
            paste: false,
        }))
    }

    fn escape(&mut self, byte: u8) -> Option<InputEvent> {
        match byte {
            b'[' => {
                self.state = State::Csi(Vec::new());
                None
            }
            b'O' => {
                self.state = State::Ss3;
                None
            }
            // ESC ESC: resolve the first, keep waiting on the second.
            0x1b => {
                self.state = State::Escape;
                Some(InputEvent::Key(KeyEvent::new(Key::Escape)))
            }
            _ => self.ground(byte, true),
        }
    }

    fn csi(&mut self, mut buf: Vec<u8>, byte: u8) -> Option<InputEvent> {
        match byte {
            0x1b => {
                // Interrupted by a new escape; surface what we had.
                self.state = State::Escape;
                Some(unknown_csi(&buf, None))
            }
            0x20..=0x3f => {
                buf.push(byte);
                if buf.len() > CSI_LIMIT {
                    Some(unknown_csi(&buf, None))
                } else {
                    self.state = State::Csi(buf);
                    None
                }
            }
            0x40..=0x7e => {
                if byte == b'M' && buf.is_empty() {
                    // X10 mouse: three payload bytes follow.
                    self.state = State::LegacyMouse {
                        bytes: [0; 3],
                        len: 0,
                    };
                    return None;
                }
                if byte == b'~' && buf == b"200" {
                    self.state = State::Paste {
                        content: Vec::new(),
                        marker: 0,
                    };
                    return None;
                }
                Some(csi_dispatch(&buf, byte))
            }
            _ => Some(unknown_csi(&buf, Some(byte))),
        }
    }

    fn ss3(&mut self, byte: u8) -> Option<InputEvent> {
        let key = match byte {
            0x1b => {
                self.state = State::Escape;
                return Some(InputEvent::Unknown(vec![0x1b, b'O']));
            }
            b'P' => Key::F(1),
            b'Q' => Key::F(2),
            b'R' => Key::F(3),
            b'S' => Key::F(4),
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            b'D' => Key::Left,
            b'H' => Key::Home,
            b'F' => Key::End,
            b'M' => Key::Enter,
            _ => return Some(InputEvent::Unknown(vec![0x1b, b'O', byte])),
        };
        Some(InputEvent::Key(KeyEvent::new(key)))
    }

    fn utf8(&mut self, mut bytes: Vec<u8>, need: usize, alt: bool, byte: u8) -> Option<InputEvent> {
        if byte & 0xc0 != 0x80 {
            // Not a continuation byte; the scalar will never complete.
            if byte == 0x1b {
                self.state = State::Escape;
                return Some(InputEvent::Unknown(bytes));
            }
            bytes.push(byte);
            return Some(InputEvent::Unknown(bytes));
        }
        bytes.push(byte);
        if bytes.len() < need {
            self.state = State::Utf8 { bytes, need, alt };
            return None;
        }
        match String::from_utf8(bytes) {
            Ok(s) => Some(InputEvent::Key(KeyEvent {
                key: Key::Runes(s),
                alt,
                paste: false,
            })),
            Err(err) => Some(InputEvent::Unknown(err.into_bytes())),
        }
    }

    fn legacy_mouse(&mut self, mut bytes: [u8; 3], mut len: usize, byte: u8) -> Option<InputEvent> {
        bytes[len] = byte;
        len += 1;
        if len < 3 {
            self.state = State::LegacyMouse { bytes, len };
            return None;
        }
        Some(InputEvent::Mouse(decode_x10(bytes)))
    }

    fn paste(&mut self, mut content: Vec<u8>, mut marker: usize, byte: u8) -> Option<InputEvent> {
        if byte == PASTE_END[marker] {
            marker += 1;
            if marker == PASTE_END.len() {
                return Some(paste_event(content));
            }
        } else {
            // The partial marker match was literal paste content after all.
            content.extend_from_slice(&PASTE_END[..marker]);
            if byte == PASTE_END[0] {
                marker = 1;
            } else {
                content.push(byte);
                marker = 0;
            }
        }
        if content.len() > PASTE_LIMIT {
            self.state = State::Ground;
            return Some(paste_event(content));
        }
        self.state = State::Paste { content, marker };
        None
    }
}

fn paste_event(content: Vec<u8>) -> InputEvent {
    InputEvent::Paste(String::from_utf8_lossy(&content).into_owned())
}

fn unknown_csi(buf: &[u8], trailing: Option<u8>) -> InputEvent {
    let mut raw = vec![0x1b, b'['];
    raw.extend_from_slice(buf);
    if let Some(b) = trailing {
        raw.push(b);
    }
    InputEvent::Unknown(raw)
}

/// Expected continuation count for a UTF-8 lead byte, total length included.
fn utf8_len(byte: u8) -> Option<usize> {
    match byte {
        0xc0..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf7 => Some(4),
        _ => None,
    }
}

/// xterm modifier parameter: value minus one is a bitfield.
fn modifier_bits(param: u16) -> (bool, bool, bool) {
    let bits = param.saturating_sub(1);
    (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0)
}

fn parse_params(buf: &[u8]) -> Option<Vec<u16>> {
    if buf.is_empty() {
        return Some(Vec::new());
    }
    let text = std::str::from_utf8(buf).ok()?;
    let mut params = Vec::new();
    for part in text.split(';') {
        if part.is_empty() {
            params.push(0);
        } else {
            params.push(part.parse().ok()?);
        }
    }
    Some(params)
}

/// Map a completed CSI sequence to an event. Unrecognized combinations
/// (including recognized finals with unexpected parameters) yield
/// [`InputEvent::Unknown`] with the raw bytes.
fn csi_dispatch(buf: &[u8], final_byte: u8) -> InputEvent {
    if final_byte == b'M' || final_byte == b'm' {
        if let Some(rest) = buf.strip_prefix(b"<") {
            return match decode_sgr(rest, final_byte == b'm') {
                Some(ev) => InputEvent::Mouse(ev),
                None => unknown_csi(buf, Some(final_byte)),
            };
        }
        return unknown_csi(buf, Some(final_byte));
    }

    let params = match parse_params(buf) {
        Some(p) => p,
        None => return unknown_csi(buf, Some(final_byte)),
    };

    match final_byte {
        b'A' | b'B' | b'C' | b'D' | b'H' | b'F' | b'P' | b'Q' | b'R' | b'S' => {
            // Plain, or "1;N" with N encoding the modifiers.
            let mods = match params.as_slice() {
                [] => 1,
                [1, m] => *m,
                _ => return unknown_csi(buf, Some(final_byte)),
            };
            let (shift, alt, ctrl) = modifier_bits(mods);
            let key = match final_byte {
                b'A' => arrow(Key::Up, Key::ShiftUp, Key::CtrlUp, shift, ctrl),
                b'B' => arrow(Key::Down, Key::ShiftDown, Key::CtrlDown, shift, ctrl),
                b'C' => arrow(Key::Right, Key::ShiftRight, Key::CtrlRight, shift, ctrl),
                b'D' => arrow(Key::Left, Key::ShiftLeft, Key::CtrlLeft, shift, ctrl),
                b'H' => Key::Home,
                b'F' => Key::End,
                b'P' => Key::F(1),
                b'Q' => Key::F(2),
                b'R' => Key::F(3),
                _ => Key::F(4),
            };
            InputEvent::Key(KeyEvent {
                key,
                alt,
                paste: false,
            })
        }
        b'Z' if params.is_empty() => InputEvent::Key(KeyEvent::new(Key::ShiftTab)),
        b'I' if params.is_empty() => InputEvent::FocusGained,
        b'O' if params.is_empty() => InputEvent::FocusLost,
        b'~' => {
            let (code, mods) = match params.as_slice() {
                [c] => (*c, 1),
                [c, m] => (*c, *m),
                _ => return unknown_csi(buf, Some(final_byte)),
            };
            let key = match code {
                1 | 7 => Key::Home,
                2 => Key::Insert,
                3 => Key::Delete,
                4 | 8 => Key::End,
                5 => Key::PageUp,
                6 => Key::PageDown,
                11..=15 => Key::F((code - 10) as u8),
                17..=21 => Key::F((code - 11) as u8),
                23 | 24 => Key::F((code - 12) as u8),
                25 | 26 => Key::F((code - 12) as u8),
                28 | 29 => Key::F((code - 13) as u8),
                31..=34 => Key::F((code - 14) as u8),
                _ => return unknown_csi(buf, Some(final_byte)),
            };
            let (_, alt, _) = modifier_bits(mods);
            InputEvent::Key(KeyEvent {
                key,
                alt,
                paste: false,
            })
        }
        _ => unknown_csi(buf, Some(final_byte)),
    }
}

fn arrow(plain: Key, shifted: Key, ctrled: Key, shift: bool, ctrl: bool) -> Key {
    if ctrl {
        ctrled
    } else if shift {
        shifted
    } else {
        plain
    }
}

/// SGR payload after the `<`: `button;x;y` with 1-based coordinates.
fn decode_sgr(buf: &[u8], release: bool) -> Option<MouseEvent> {
    let params = parse_params(buf)?;
    let [cb, x, y] = params.as_slice() else {
        return None;
    };
    let (button, motion, shift, alt, ctrl) = decode_button_bits(*cb);
    let action = if release {
        MouseAction::Release
    } else if motion {
        MouseAction::Motion
    } else {
        MouseAction::Press
    };
    Some(MouseEvent {
        x: x.saturating_sub(1),
        y: y.saturating_sub(1),
        action,
        button,
        shift,
        alt,
        ctrl,
    })
}

/// X10 payload: three bytes, each offset by 32; coordinates 1-based.
fn decode_x10(bytes: [u8; 3]) -> MouseEvent {
    let cb = u16::from(bytes[0].saturating_sub(32));
    let (button, motion, shift, alt, ctrl) = decode_button_bits(cb);
    // A release is encoded as "button 3" rather than a distinct final
    // byte; the same low bits with the motion flag set are a buttonless
    // hover, not a release.
    let (button, action) = if !motion && cb & 0x40 == 0 && cb & 0b11 == 0b11 {
        (MouseButton::None, MouseAction::Release)
    } else if motion {
        (button, MouseAction::Motion)
    } else {
        (button, MouseAction::Press)
    };
    MouseEvent {
        x: u16::from(bytes[1].saturating_sub(33)),
        y: u16::from(bytes[2].saturating_sub(33)),
        action,
        button,
        shift,
        alt,
        ctrl,
    }
}

fn decode_button_bits(cb: u16) -> (MouseButton, bool, bool, bool, bool) {
    let motion = cb & 0x20 != 0;
    let button = if cb & 0x40 != 0 {
        match cb & 0b11 {
            0 => MouseButton::WheelUp,
            1 => MouseButton::WheelDown,
            2 => MouseButton::WheelLeft,
            _ => MouseButton::WheelRight,
        }
    } else if cb & 0x80 != 0 {
        MouseButton::Extra((cb & 0b11) as u8)
    } else {
        match cb & 0b11 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::None,
        }
    };
    (button, motion, cb & 4 != 0, cb & 8 != 0, cb & 16 != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> Vec<InputEvent> {
        let mut decoder = Decoder::new();
        let mut events = decoder.feed_bytes(bytes);
        events.extend(decoder.flush());
        events
    }

    fn decode_one(bytes: &[u8]) -> InputEvent {
        let events = decode_all(bytes);
        assert_eq!(events.len(), 1, "expected one event from {bytes:?}, got {events:?}");
        events.into_iter().next().unwrap()
    }

    fn key(k: Key) -> InputEvent {
        InputEvent::Key(KeyEvent::new(k))
    }

    #[test]
    fn plain_ascii() {
        assert_eq!(decode_one(b"a"), key(Key::rune('a')));
        assert_eq!(decode_one(b" "), key(Key::rune(' ')));
        assert_eq!(decode_one(b"Z"), key(Key::rune('Z')));
    }

    #[test]
    fn control_bytes() {
        assert_eq!(decode_one(&[0x03]), key(Key::Ctrl('c')));
        assert_eq!(decode_one(&[0x01]), key(Key::Ctrl('a')));
        assert_eq!(decode_one(&[0x1a]), key(Key::Ctrl('z')));
        assert_eq!(decode_one(&[0x00]), key(Key::Ctrl('@')));
        assert_eq!(decode_one(&[0x1f]), key(Key::Ctrl('_')));
        assert_eq!(decode_one(&[0x0d]), key(Key::Enter));
        assert_eq!(decode_one(&[0x09]), key(Key::Tab));
        assert_eq!(decode_one(&[0x08]), key(Key::Backspace));
        assert_eq!(decode_one(&[0x7f]), key(Key::Backspace));
    }

    #[test]
    fn utf8_runes() {
        assert_eq!(decode_one("é".as_bytes()), key(Key::Runes("é".into())));
        assert_eq!(decode_one("日".as_bytes()), key(Key::Runes("日".into())));
        assert_eq!(decode_one("🎉".as_bytes()), key(Key::Runes("🎉".into())));
    }

    #[test]
    fn invalid_utf8_surfaces_as_unknown() {
        // Lead byte followed by a non-continuation byte.
        assert_eq!(
            decode_one(&[0xc3, b'x']),
            InputEvent::Unknown(vec![0xc3, b'x'])
        );
        // Invalid lead byte on its own.
        assert_eq!(decode_one(&[0xff]), InputEvent::Unknown(vec![0xff]));
    }

    #[test]
    fn csi_arrows_and_modifiers() {
        assert_eq!(decode_one(b"\x1b[A"), key(Key::Up));
        assert_eq!(decode_one(b"\x1b[B"), key(Key::Down));
        assert_eq!(decode_one(b"\x1b[C"), key(Key::Right));
        assert_eq!(decode_one(b"\x1b[D"), key(Key::Left));
        assert_eq!(decode_one(b"\x1b[1;2A"), key(Key::ShiftUp));
        assert_eq!(decode_one(b"\x1b[1;5C"), key(Key::CtrlRight));
        // Ctrl wins when both ctrl and shift bits are present.
        assert_eq!(decode_one(b"\x1b[1;6D"), key(Key::CtrlLeft));
        assert_eq!(
            decode_one(b"\x1b[1;3B"),
            InputEvent::Key(KeyEvent::alt(Key::Down))
        );
    }

    #[test]
    fn csi_named_keys() {
        assert_eq!(decode_one(b"\x1b[H"), key(Key::Home));
        assert_eq!(decode_one(b"\x1b[F"), key(Key::End));
        assert_eq!(decode_one(b"\x1b[Z"), key(Key::ShiftTab));
        assert_eq!(decode_one(b"\x1b[2~"), key(Key::Insert));
        assert_eq!(decode_one(b"\x1b[3~"), key(Key::Delete));
        assert_eq!(decode_one(b"\x1b[5~"), key(Key::PageUp));
        assert_eq!(decode_one(b"\x1b[6~"), key(Key::PageDown));
        assert_eq!(decode_one(b"\x1b[1~"), key(Key::Home));
        assert_eq!(decode_one(b"\x1b[4~"), key(Key::End));
    }

    #[test]
    fn function_keys() {
        assert_eq!(decode_one(b"\x1bOP"), key(Key::F(1)));
        assert_eq!(decode_one(b"\x1bOS"), key(Key::F(4)));
        assert_eq!(decode_one(b"\x1b[11~"), key(Key::F(1)));
        assert_eq!(decode_one(b"\x1b[15~"), key(Key::F(5)));
        assert_eq!(decode_one(b"\x1b[17~"), key(Key::F(6)));
        assert_eq!(decode_one(b"\x1b[21~"), key(Key::F(10)));
        assert_eq!(decode_one(b"\x1b[23~"), key(Key::F(11)));
        assert_eq!(decode_one(b"\x1b[24~"), key(Key::F(12)));
        assert_eq!(decode_one(b"\x1b[34~"), key(Key::F(20)));
        assert_eq!(decode_one(b"\x1b[1;2P"), key(Key::F(1)));
    }

    #[test]
    fn ss3_arrows_and_keypad() {
        assert_eq!(decode_one(b"\x1bOA"), key(Key::Up));
        assert_eq!(decode_one(b"\x1bOH"), key(Key::Home));
        assert_eq!(decode_one(b"\x1bOM"), key(Key::Enter));
    }

    #[test]
    fn alt_chords() {
        assert_eq!(
            decode_one(b"\x1bx"),
            InputEvent::Key(KeyEvent::alt(Key::rune('x')))
        );
        assert_eq!(
            decode_one(b"\x1b\x0d"),
            InputEvent::Key(KeyEvent::alt(Key::Enter))
        );
        assert_eq!(
            decode_one(b"\x1b\x7f"),
            InputEvent::Key(KeyEvent::alt(Key::Backspace))
        );
        assert_eq!(
            decode_one(&[0x1b, 0x03]),
            InputEvent::Key(KeyEvent::alt(Key::Ctrl('c')))
        );
        // Alt + multi-byte rune.
        let mut bytes = vec![0x1b];
        bytes.extend_from_slice("é".as_bytes());
        assert_eq!(
            decode_one(&bytes),
            InputEvent::Key(KeyEvent {
                key: Key::Runes("é".into()),
                alt: true,
                paste: false,
            })
        );
    }

    #[test]
    fn double_escape() {
        let events = decode_all(&[0x1b, 0x1b]);
        assert_eq!(events, vec![key(Key::Escape), key(Key::Escape)]);
    }

    #[test]
    fn lone_escape_flushes_to_escape_key() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x1b), None);
        assert!(decoder.is_escape_pending());
        assert_eq!(decoder.flush_escape(), Some(key(Key::Escape)));
        assert!(!decoder.is_escape_pending());
        assert_eq!(decoder.flush_escape(), None);
    }

    #[test]
    fn flush_escape_leaves_partial_csi_waiting() {
        let mut decoder = Decoder::new();
        for &b in b"\x1b[1;" {
            assert_eq!(decoder.feed(b), None);
        }
        assert!(!decoder.is_escape_pending());
        assert_eq!(decoder.flush_escape(), None);
        // The sequence still completes afterwards.
        assert_eq!(decoder.feed(b'5'), None);
        assert_eq!(decoder.feed(b'A'), Some(key(Key::CtrlUp)));
    }

    #[test]
    fn unmapped_csi_keeps_raw_bytes() {
        assert_eq!(
            decode_one(b"\x1b[999Z"),
            InputEvent::Unknown(b"\x1b[999Z".to_vec())
        );
        assert_eq!(
            decode_one(b"\x1b[99~"),
            InputEvent::Unknown(b"\x1b[99~".to_vec())
        );
        assert_eq!(
            decode_one(b"\x1b[?1049h"),
            InputEvent::Unknown(b"\x1b[?1049h".to_vec())
        );
    }

    #[test]
    fn interrupted_csi_surfaces_as_unknown() {
        // BEL in the middle of a sequence.
        assert_eq!(
            decode_one(&[0x1b, b'[', b'1', b';', 0x07]),
            InputEvent::Unknown(vec![0x1b, b'[', b'1', b';', 0x07])
        );
        // A fresh ESC aborts the pending sequence and starts over.
        let events = decode_all(b"\x1b[1;\x1b[A");
        assert_eq!(
            events,
            vec![InputEvent::Unknown(b"\x1b[1;".to_vec()), key(Key::Up)]
        );
    }

    #[test]
    fn oversized_csi_gives_up() {
        let mut bytes = b"\x1b[".to_vec();
        bytes.extend(std::iter::repeat(b'1').take(CSI_LIMIT + 1));
        let events = decode_all(&bytes);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], InputEvent::Unknown(_)));
    }

    #[test]
    fn sgr_mouse_events() {
        assert_eq!(
            decode_one(b"\x1b[<0;10;20M"),
            InputEvent::Mouse(MouseEvent {
                x: 9,
                y: 19,
                action: MouseAction::Press,
                button: MouseButton::Left,
                shift: false,
                alt: false,
                ctrl: false,
            })
        );
        assert_eq!(
            decode_one(b"\x1b[<2;1;1m"),
            InputEvent::Mouse(MouseEvent {
                x: 0,
                y: 0,
                action: MouseAction::Release,
                button: MouseButton::Right,
                shift: false,
                alt: false,
                ctrl: false,
            })
        );
        assert_eq!(
            decode_one(b"\x1b[<64;5;6M"),
            InputEvent::Mouse(MouseEvent {
                x: 4,
                y: 5,
                action: MouseAction::Press,
                button: MouseButton::WheelUp,
                shift: false,
                alt: false,
                ctrl: false,
            })
        );
        // Motion bit set, no button held.
        assert_eq!(
            decode_one(b"\x1b[<35;3;4M"),
            InputEvent::Mouse(MouseEvent {
                x: 2,
                y: 3,
                action: MouseAction::Motion,
                button: MouseButton::None,
                shift: false,
                alt: false,
                ctrl: false,
            })
        );
        // Ctrl+shift modifiers on a press.
        assert_eq!(
            decode_one(b"\x1b[<20;2;2M"),
            InputEvent::Mouse(MouseEvent {
                x: 1,
                y: 1,
                action: MouseAction::Press,
                button: MouseButton::Left,
                shift: true,
                alt: false,
                ctrl: true,
            })
        );
    }

    #[test]
    fn x10_mouse_events() {
        // Button byte 32 = left press; coordinates are offset by 32 and
        // 1-based on the wire.
        assert_eq!(
            decode_one(&[0x1b, b'[', b'M', 32, 43, 53]),
            InputEvent::Mouse(MouseEvent {
                x: 10,
                y: 20,
                action: MouseAction::Press,
                button: MouseButton::Left,
                shift: false,
                alt: false,
                ctrl: false,
            })
        );
        // Button bits 3 = release, button unknown in this protocol.
        assert_eq!(
            decode_one(&[0x1b, b'[', b'M', 35, 33, 33]),
            InputEvent::Mouse(MouseEvent {
                x: 0,
                y: 0,
                action: MouseAction::Release,
                button: MouseButton::None,
                shift: false,
                alt: false,
                ctrl: false,
            })
        );
        // Wheel up: 64 + 32 on the wire.
        assert_eq!(
            decode_one(&[0x1b, b'[', b'M', 96, 34, 34]),
            InputEvent::Mouse(MouseEvent {
                x: 1,
                y: 1,
                action: MouseAction::Press,
                button: MouseButton::WheelUp,
                shift: false,
                alt: false,
                ctrl: false,
            })
        );
    }

    #[test]
    fn x10_motion_reports() {
        // Motion flag plus button bits 3: a buttonless hover (what an
        // all-motion terminal emits on every move), not a release.
        assert_eq!(
            decode_one(&[0x1b, b'[', b'M', 67, 33, 34]),
            InputEvent::Mouse(MouseEvent {
                x: 0,
                y: 1,
                action: MouseAction::Motion,
                button: MouseButton::None,
                shift: false,
                alt: false,
                ctrl: false,
            })
        );
        // Motion with the left button held: a drag.
        assert_eq!(
            decode_one(&[0x1b, b'[', b'M', 64, 40, 50]),
            InputEvent::Mouse(MouseEvent {
                x: 7,
                y: 17,
                action: MouseAction::Motion,
                button: MouseButton::Left,
                shift: false,
                alt: false,
                ctrl: false,
            })
        );
    }

    #[test]
    fn focus_reports() {
        assert_eq!(decode_one(b"\x1b[I"), InputEvent::FocusGained);
        assert_eq!(decode_one(b"\x1b[O"), InputEvent::FocusLost);
    }

    #[test]
    fn bracketed_paste_is_one_event() {
        let events = decode_all(b"\x1b[200~hello world\x1b[201~");
        assert_eq!(events, vec![InputEvent::Paste("hello world".into())]);
    }

    #[test]
    fn paste_contains_escape_like_bytes() {
        // A partial end-marker inside the paste stays literal.
        let events = decode_all(b"\x1b[200~a\x1b[201x\x1b[201~");
        assert_eq!(events, vec![InputEvent::Paste("a\x1b[201x".into())]);
        // Keys inside a paste are not interpreted.
        let events = decode_all(b"\x1b[200~\x1b[A\x1b[201~");
        assert_eq!(events, vec![InputEvent::Paste("\x1b[A".into())]);
    }

    #[test]
    fn unterminated_paste_flushes_content() {
        let mut decoder = Decoder::new();
        assert!(decoder.feed_bytes(b"\x1b[200~abc").is_empty());
        assert_eq!(decoder.flush(), Some(InputEvent::Paste("abc".into())));
    }

    #[test]
    fn byte_at_a_time_matches_chunked() {
        let corpus: &[&[u8]] = &[
            b"a",
            "é".as_bytes(),
            "🎉".as_bytes(),
            &[0x03],
            b"\x1b[A",
            b"\x1b[1;5C",
            b"\x1b[3~",
            b"\x1b[24~",
            b"\x1bOP",
            b"\x1bq",
            b"\x1b[<0;10;20M",
            b"\x1b[<64;5;6M",
            &[0x1b, b'[', b'M', 32, 43, 53],
            b"\x1b[200~hi there\x1b[201~",
            b"\x1b[I",
            b"\x1b[999Z",
        ];
        for bytes in corpus {
            let mut chunked = Decoder::new();
            let mut one_at_a_time = Decoder::new();
            let a = chunked.feed_bytes(bytes);
            let mut b = Vec::new();
            for &byte in *bytes {
                b.extend(one_at_a_time.feed(byte));
            }
            assert_eq!(a, b, "divergence decoding {bytes:?}");
        }
    }

    #[test]
    fn mixed_stream_preserves_order() {
        let events = decode_all(b"ab\x1b[A\x03");
        assert_eq!(
            events,
            vec![
                key(Key::rune('a')),
                key(Key::rune('b')),
                key(Key::Up),
                key(Key::Ctrl('c')),
            ]
        );
    }
}
