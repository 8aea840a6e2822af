use crate::command::{Command, CommandInner};
use crate::key::{Key, KeyEvent};
use crate::message::Message;
use crate::model::Model;

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// `TestProgram` lets you exercise every part of the init/update/view cycle
/// in a plain `#[test]` function -- no tokio runtime or TTY required.
/// Immediate commands (e.g. [`Command::message`]) are collected and can be
/// flushed with [`drain_messages`](TestProgram::drain_messages); async
/// commands and terminal commands are silently ignored.
///
/// # Example
///
/// ```rust,ignore
/// use matcha_core::testing::TestProgram;
///
/// let mut prog = TestProgram::<Counter>::new(0);   // calls Counter::init(0)
/// prog.send_custom(CounterMsg::Increment);         // triggers update
/// prog.send_custom(CounterMsg::Increment);
/// assert_eq!(prog.model().count, 2);               // inspect state
/// assert!(prog.view().contains("Count: 2"));       // inspect output
/// ```
pub struct TestProgram<M: Model> {
    model: Option<M>,
    pending_messages: Vec<Message<M::Custom>>,
    quit_requested: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    ///
    /// Any immediate commands produced by `init` (e.g. [`Command::message`])
    /// are collected into the pending-message queue.  Call
    /// [`drain_messages`](TestProgram::drain_messages) to process them.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model: Some(model),
            pending_messages: Vec::new(),
            quit_requested: false,
        };
        program.collect_sync_messages(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle.
    ///
    /// The message is passed to [`Model::update`] immediately.  Any
    /// immediate commands returned by `update` are enqueued; call
    /// [`drain_messages`](TestProgram::drain_messages) to flush them.
    /// [`Message::Quit`] and [`Message::Interrupt`] are intercepted the way
    /// the real runtime intercepts them: they set the quit flag instead of
    /// reaching `update`.
    pub fn send(&mut self, msg: Message<M::Custom>) {
        if matches!(msg, Message::Quit | Message::Interrupt) {
            self.quit_requested = true;
            return;
        }
        let Some(model) = self.model.take() else {
            return;
        };
        let (model, cmd) = model.update(msg);
        self.model = Some(model);
        self.collect_sync_messages(cmd);
    }

    /// Send an application message wrapped in [`Message::Custom`].
    pub fn send_custom(&mut self, msg: M::Custom) {
        self.send(Message::Custom(msg));
    }

    /// Send a key press wrapped in [`Message::Key`].
    pub fn send_key(&mut self, key: Key) {
        self.send(Message::Key(KeyEvent::from(key)));
    }

    /// Process all pending messages produced by [`Command::message`].
    ///
    /// Repeatedly drains the pending queue, calling [`Model::update`] for
    /// each message, until no new immediate messages are generated.  This is
    /// useful for command-chaining scenarios where one update produces a
    /// message that triggers another update.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                self.send(msg);
            }
        }
    }

    /// Whether a processed command or message has requested quit.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        self.model.as_ref().expect("model present between updates")
    }

    /// Get a mutable reference to the model for direct test setup.
    ///
    /// This bypasses the normal message-driven update cycle, which can be
    /// useful for arranging test state before sending messages.
    pub fn model_mut(&mut self) -> &mut M {
        self.model.as_mut().expect("model present between updates")
    }

    /// Render the model and return the frame as the model produced it.
    pub fn view(&self) -> String {
        self.model().view()
    }

    fn collect_sync_messages(&mut self, cmd: Command<M::Custom>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(Message::Quit | Message::Interrupt) => {
                self.quit_requested = true;
            }
            CommandInner::Message(msg) => {
                self.pending_messages.push(msg);
            }
            CommandInner::Batch(cmds) | CommandInner::Sequence(cmds) => {
                for cmd in cmds {
                    self.collect_sync_messages(cmd);
                }
            }
            // Async commands can't be executed synchronously in tests
            CommandInner::Future(_) => {}
            CommandInner::Terminal(_) => {}
            CommandInner::Exec { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A minimal counter model for testing
    struct Counter {
        count: i64,
    }

    #[derive(Debug)]
    enum CounterMsg {
        Increment,
        Decrement,
        Reset,
        Close,
    }

    impl Model for Counter {
        type Custom = CounterMsg;
        type Flags = i64;

        fn init(initial: i64) -> (Self, Command<CounterMsg>) {
            (Counter { count: initial }, Command::none())
        }

        fn update(mut self, msg: Message<CounterMsg>) -> (Self, Command<CounterMsg>) {
            match msg {
                Message::Custom(CounterMsg::Increment) => self.count += 1,
                Message::Custom(CounterMsg::Decrement) => self.count -= 1,
                Message::Custom(CounterMsg::Reset) => self.count = 0,
                Message::Custom(CounterMsg::Close) => return (self, Command::quit()),
                _ => {}
            }
            (self, Command::none())
        }

        fn view(&self) -> String {
            format!("Count: {}", self.count)
        }
    }

    #[test]
    fn test_program_init() {
        let prog = TestProgram::<Counter>::new(0);
        assert_eq!(prog.model().count, 0);
    }

    #[test]
    fn test_program_init_with_flags() {
        let prog = TestProgram::<Counter>::new(42);
        assert_eq!(prog.model().count, 42);
    }

    #[test]
    fn test_program_send_multiple() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send_custom(CounterMsg::Increment);
        prog.send_custom(CounterMsg::Increment);
        prog.send_custom(CounterMsg::Increment);
        prog.send_custom(CounterMsg::Decrement);
        assert_eq!(prog.model().count, 2);
    }

    #[test]
    fn test_program_reset() {
        let mut prog = TestProgram::<Counter>::new(10);
        prog.send_custom(CounterMsg::Increment);
        prog.send_custom(CounterMsg::Reset);
        assert_eq!(prog.model().count, 0);
    }

    #[test]
    fn test_program_view() {
        let mut prog = TestProgram::<Counter>::new(0);
        assert!(prog.view().contains("Count: 0"));
        prog.send_custom(CounterMsg::Increment);
        assert!(prog.view().contains("Count: 1"));
    }

    #[test]
    fn quit_command_sets_the_flag_without_reaching_update() {
        let mut prog = TestProgram::<Counter>::new(5);
        prog.send_custom(CounterMsg::Close);
        assert!(prog.quit_requested());
        assert_eq!(prog.model().count, 5);
    }

    // A model that records every key it sees
    struct KeyLog {
        keys: Vec<String>,
    }

    impl Model for KeyLog {
        type Custom = ();
        type Flags = ();

        fn init(_: ()) -> (Self, Command<()>) {
            (KeyLog { keys: Vec::new() }, Command::none())
        }

        fn update(mut self, msg: Message<()>) -> (Self, Command<()>) {
            if let Message::Key(key) = msg {
                self.keys.push(key.to_string());
            }
            (self, Command::none())
        }

        fn view(&self) -> String {
            self.keys.join(" ")
        }
    }

    #[test]
    fn send_key_wraps_into_a_key_message() {
        let mut prog = TestProgram::<KeyLog>::new(());
        prog.send_key(Key::rune('a'));
        prog.send_key(Key::Enter);
        assert_eq!(prog.model().keys, vec!["a", "enter"]);
    }

    // Test a model that uses Command::custom for chaining
    struct ChainModel {
        steps: Vec<String>,
    }

    #[derive(Debug)]
    enum ChainMsg {
        Start,
        Step(String),
    }

    impl Model for ChainModel {
        type Custom = ChainMsg;
        type Flags = ();

        fn init(_: ()) -> (Self, Command<ChainMsg>) {
            (ChainModel { steps: vec![] }, Command::none())
        }

        fn update(mut self, msg: Message<ChainMsg>) -> (Self, Command<ChainMsg>) {
            match msg {
                Message::Custom(ChainMsg::Start) => {
                    self.steps.push("started".into());
                    (self, Command::custom(ChainMsg::Step("auto".into())))
                }
                Message::Custom(ChainMsg::Step(s)) => {
                    self.steps.push(s);
                    (self, Command::none())
                }
                _ => (self, Command::none()),
            }
        }

        fn view(&self) -> String {
            self.steps.join(", ")
        }
    }

    #[test]
    fn test_command_message_chaining() {
        let mut prog = TestProgram::<ChainModel>::new(());
        prog.send_custom(ChainMsg::Start);
        // The Command::custom should have queued ChainMsg::Step
        prog.drain_messages();
        assert_eq!(prog.model().steps, vec!["started", "auto"]);
    }
}
