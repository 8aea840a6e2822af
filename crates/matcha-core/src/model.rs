use crate::command::Command;
use crate::message::Message;

/// The top-level application trait, following the [Elm Architecture].
///
/// Every matcha application implements `Model`. The runtime drives a
/// continuous **init -> update -> view** cycle:
///
/// 1. [`init`](Model::init) creates the initial state and may return a
///    [`Command`] for early side effects (e.g. fetching data).
/// 2. [`view`](Model::view) renders the current state to a string; the
///    runtime diffs it against the previous frame and writes the difference.
/// 3. Events arrive as [`Message`]s: decoded terminal input, lifecycle
///    notifications, and the application's own `Custom` values.
/// 4. [`update`](Model::update) consumes the model and a message and returns
///    the next model plus an optional command for further work.
/// 5. Steps 2--4 repeat until the program exits.
///
/// The model is a value, not a place: `update` takes `self` and returns the
/// replacement. The runtime holds exactly one live model at a time and never
/// inspects it beyond calling these methods.
///
/// # Example
///
/// ```rust,ignore
/// use matcha_core::{Command, Key, KeyEvent, Message, Model};
///
/// struct Counter {
///     count: i64,
/// }
///
/// #[derive(Debug)]
/// enum Msg {}
///
/// impl Model for Counter {
///     type Custom = Msg;
///     type Flags = ();
///
///     fn init(_flags: ()) -> (Self, Command<Msg>) {
///         (Counter { count: 0 }, Command::none())
///     }
///
///     fn update(self, msg: Message<Msg>) -> (Self, Command<Msg>) {
///         match msg {
///             Message::Key(KeyEvent { key: Key::Up, .. }) => {
///                 (Counter { count: self.count + 1 }, Command::none())
///             }
///             Message::Key(KeyEvent { key: Key::Runes(ref r), .. }) if r == "q" => {
///                 (self, Command::quit())
///             }
///             _ => (self, Command::none()),
///         }
///     }
///
///     fn view(&self) -> String {
///         format!("count: {}\n(up to increment, q to quit)", self.count)
///     }
/// }
/// ```
///
/// [Elm Architecture]: https://guide.elm-lang.org/architecture/
pub trait Model: Sized + Send + 'static {
    /// The application's own message type, carried in
    /// [`Message::Custom`](crate::Message::Custom).
    ///
    /// Messages of this type come from [`Command::custom`],
    /// [`Command::perform`], and the other command constructors; everything
    /// else arrives as the built-in [`Message`] variants.
    type Custom: Send + 'static;

    /// Initialization data passed to [`Model::init`].
    ///
    /// Use `()` when no startup data is needed. Applications that require
    /// configuration define a struct carrying the relevant fields and pass
    /// it when constructing a [`Program`](crate::runtime::Program).
    type Flags: Send + 'static;

    /// Create the initial model and an optional startup command.
    ///
    /// Called once, after the terminal has been acquired. Return
    /// [`Command::none`] if no startup side effects are needed.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Custom>);

    /// Consume a message and produce the next model plus a command.
    ///
    /// This is the heart of the application: match on the message, build the
    /// successor state, and describe any side effects as a [`Command`]. The
    /// runtime invokes `update` strictly sequentially, in message arrival
    /// order, no matter how many concurrent producers feed the stream.
    fn update(self, msg: Message<Self::Custom>) -> (Self, Command<Self::Custom>);

    /// Render the current state as the text to display.
    ///
    /// A pure function of `&self`. The returned string is split on newlines
    /// and becomes the frame; the runtime writes only the lines that changed
    /// since the previous frame.
    fn view(&self) -> String;
}
