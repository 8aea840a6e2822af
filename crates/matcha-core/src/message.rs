use std::time::Instant;

use crate::event::InputEvent;
use crate::key::KeyEvent;
use crate::mouse::MouseEvent;

/// The message union delivered to [`Model::update`](crate::Model::update).
///
/// Every event that can drive a state transition is a variant of this enum:
/// the built-in terminal and lifecycle events, plus `Custom` carrying the
/// application's own message type `C`. The union is closed so `update` can
/// match exhaustively; there is no dynamic dispatch or downcasting anywhere
/// in the pipeline.
///
/// Messages are immutable values. For terminal-derived events the runtime
/// guarantees delivery in source order.
///
/// # Example
///
/// ```rust,ignore
/// use matcha_core::{Command, Key, KeyEvent, Message, Model};
///
/// fn update(model: App, msg: Message<Msg>) -> (App, Command<Msg>) {
///     match msg {
///         Message::Key(KeyEvent { key: Key::Runes(ref r), .. }) if r == "q" => {
///             (model, Command::quit())
///         }
///         Message::Custom(Msg::Loaded(data)) => (model.with_data(data), Command::none()),
///         _ => (model, Command::none()),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Message<C> {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event (only delivered while a mouse mode is enabled).
    Mouse(MouseEvent),
    /// The terminal was resized. Also delivered once at startup with the
    /// initial size, and on request via
    /// [`Command::window_size`](crate::Command::window_size).
    Resize { width: u16, height: u16 },
    /// Bracketed-paste text, delivered as a single message.
    Paste(String),
    /// The terminal window gained focus (requires focus reporting).
    Focus,
    /// The terminal window lost focus (requires focus reporting).
    Blur,
    /// Ask the runtime to shut down gracefully.
    Quit,
    /// Ask the runtime to suspend the process (ctrl+z / SIGTSTP).
    Suspend,
    /// The process resumed after a suspension (SIGCONT).
    Resume,
    /// SIGINT / ctrl+c arrived. Treated like [`Message::Quit`] unless the
    /// program's filter remaps it.
    Interrupt,
    /// A [`Command::tick`](crate::Command::tick) delay elapsed; carries the
    /// completion instant.
    Tick(Instant),
    /// Input bytes the decoder could not map to any known sequence.
    UnknownSequence(Vec<u8>),
    /// The application's own message type.
    Custom(C),
}

impl<C> Message<C> {
    /// Rewrap the custom payload through `f`, leaving built-ins untouched.
    ///
    /// This is what lets a parent model lift a child component's messages
    /// into its own message type.
    pub fn map<D>(self, f: impl FnOnce(C) -> D) -> Message<D> {
        match self {
            Message::Key(k) => Message::Key(k),
            Message::Mouse(m) => Message::Mouse(m),
            Message::Resize { width, height } => Message::Resize { width, height },
            Message::Paste(s) => Message::Paste(s),
            Message::Focus => Message::Focus,
            Message::Blur => Message::Blur,
            Message::Quit => Message::Quit,
            Message::Suspend => Message::Suspend,
            Message::Resume => Message::Resume,
            Message::Interrupt => Message::Interrupt,
            Message::Tick(t) => Message::Tick(t),
            Message::UnknownSequence(b) => Message::UnknownSequence(b),
            Message::Custom(c) => Message::Custom(f(c)),
        }
    }
}

impl<C> From<InputEvent> for Message<C> {
    fn from(event: InputEvent) -> Self {
        match event {
            InputEvent::Key(k) => Message::Key(k),
            InputEvent::Mouse(m) => Message::Mouse(m),
            InputEvent::Paste(s) => Message::Paste(s),
            InputEvent::FocusGained => Message::Focus,
            InputEvent::FocusLost => Message::Blur,
            InputEvent::Unknown(bytes) => Message::UnknownSequence(bytes),
        }
    }
}
