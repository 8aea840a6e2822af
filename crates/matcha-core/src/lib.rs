//! Core runtime for the **matcha** TUI framework.
//!
//! `matcha-core` provides the traits, types, and runtime that power every
//! matcha application.  The design follows the [Elm Architecture]: your
//! program is expressed as a pure **init -> update -> view** cycle, with
//! side effects pushed to the edges through [`Command`]s.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view) |
//! | [`Message`] | Closed union of everything the runtime can deliver, with a [`Custom`](Message::Custom) slot for application messages |
//! | [`Command`] | Describes a side effect to be executed by the runtime |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the event loop |
//! | [`ProgramHandle`] | Cloneable handle for injecting messages or killing a running program |
//! | [`Decoder`] | Incremental terminal input parser (bytes in, events out) |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for unit-testing a [`Model`] without a terminal |
//!
//! # Architecture
//!
//! 1. **init** -- [`Model::init`] creates the initial state and may return a
//!    [`Command`] to kick off early work.
//! 2. **view** -- The runtime calls [`Model::view`] to produce the frame as
//!    a string; a diff renderer rewrites only the lines that changed.
//! 3. **event** -- Raw terminal bytes are decoded into key, mouse, paste,
//!    and focus events; resize and lifecycle notifications arrive the same
//!    way. Everything is delivered as a [`Message`].
//! 4. **update** -- [`Model::update`] consumes the model and a message and
//!    returns the next model, optionally with a [`Command`] for further
//!    side effects.
//! 5. **repeat** -- Steps 2-4 repeat until the program quits.
//!
//! # Quick example
//!
//! ```ignore
//! use matcha_core::{Command, Key, Message, Model};
//!
//! struct Counter { count: i32 }
//!
//! enum Msg { Increment, Decrement }
//!
//! impl Model for Counter {
//!     type Custom = Msg;
//!     type Flags = ();
//!
//!     fn init(_flags: ()) -> (Self, Command<Msg>) {
//!         (Counter { count: 0 }, Command::none())
//!     }
//!
//!     fn update(mut self, msg: Message<Msg>) -> (Self, Command<Msg>) {
//!         match msg {
//!             Message::Custom(Msg::Increment) => self.count += 1,
//!             Message::Custom(Msg::Decrement) => self.count -= 1,
//!             Message::Key(key) if key.key == Key::rune('q') => {
//!                 return (self, Command::quit());
//!             }
//!             _ => {}
//!         }
//!         (self, Command::none())
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("Count: {}\n", self.count)
//!     }
//! }
//! ```
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod decoder;
pub mod event;
mod executor;
pub mod key;
pub mod message;
pub mod model;
pub mod mouse;
mod renderer;
pub mod runtime;
#[cfg(unix)]
mod signals;
pub mod terminal;
pub mod testing;

pub use command::{Command, ExecCommand, MouseMode, TerminalCommand};
pub use decoder::Decoder;
pub use event::InputEvent;
pub use key::{Key, KeyEvent};
pub use message::Message;
pub use model::Model;
pub use mouse::{MouseAction, MouseButton, MouseEvent};
pub use runtime::{log_to_file, Program, ProgramError, ProgramHandle, ProgramOptions};
pub use terminal::{Input, Output};

/// Run a matcha application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags).run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options).run().await
}
