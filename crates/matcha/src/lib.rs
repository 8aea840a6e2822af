//! **matcha** -- a Bubble Tea-flavored terminal UI runtime.
//!
//! This is the umbrella crate that re-exports everything you need to build a
//! matcha application from a single dependency:
//!
//! ```toml
//! [dependencies]
//! matcha = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`matcha_core`] are available at the crate root
//!   ([`Model`], [`Message`], [`Command`], [`Program`], [`run`], [`run_with`],
//!   etc.).
//! * The [`widgets`] module re-exports everything from [`matcha_widgets`]
//!   (text inputs, lists, tables, spinners, and more).
//! * [`tokio`] is re-exported so downstream crates can use the runtime macro
//!   without depending on it directly.
//!
//! # Quick start
//!
//! ```ignore
//! use matcha::{Command, Message, Model};
//!
//! struct Hello;
//!
//! #[derive(Debug)]
//! enum Msg {}
//!
//! impl Model for Hello {
//!     type Custom = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         (Hello, Command::none())
//!     }
//!
//!     fn update(self, msg: Message<Msg>) -> (Self, Command<Msg>) {
//!         match msg {
//!             Message::Key(_) => (self, Command::quit()),
//!             _ => (self, Command::none()),
//!         }
//!     }
//!
//!     fn view(&self) -> String {
//!         "Hello! Press any key to exit.".to_string()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     matcha::run::<Hello>(()).await.unwrap();
//! }
//! ```

pub use matcha_core::*;
pub mod widgets {
    pub use matcha_widgets::*;
}

// Downstream crates need the runtime macro without naming tokio themselves.
pub use tokio;
