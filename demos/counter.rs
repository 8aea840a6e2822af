//! # Counter Example
//!
//! A minimal counter app demonstrating the core matcha architecture:
//! - Implementing the [`Model`] trait with `init`, `update`, and `view`
//! - Matching on [`Message::Key`] to map keys to state changes
//! - Using `Command::none()` and `Command::quit()`
//!
//! Run with: `cargo run --example counter`

use matcha::{Command, Key, Message, Model};

/// A minimal counter app that validates the core loop.
struct Counter {
    count: i64,
}

#[derive(Debug)]
enum Msg {}

impl Model for Counter {
    type Custom = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        (Counter { count: 0 }, Command::none())
    }

    // Each arm mutates state and falls through to Command::none(); the quit
    // keys return early with Command::quit() to exit the event loop.
    fn update(mut self, msg: Message<Msg>) -> (Self, Command<Msg>) {
        if let Message::Key(key) = &msg {
            match &key.key {
                Key::Up => self.count += 1,
                Key::Down => self.count -= 1,
                Key::Runes(r) if r == "k" => self.count += 1,
                Key::Runes(r) if r == "j" => self.count -= 1,
                Key::Runes(r) if r == "r" => self.count = 0,
                Key::Runes(r) if r == "q" => return (self, Command::quit()),
                Key::Escape | Key::Ctrl('c') => return (self, Command::quit()),
                _ => {}
            }
        }
        (self, Command::none())
    }

    fn view(&self) -> String {
        format!(
            "Count: {}\n\n↑/k inc  ↓/j dec  r reset  q quit",
            self.count
        )
    }
}

#[matcha::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let model = matcha::run::<Counter>(()).await?;
    println!("Final count: {}", model.count);
    Ok(())
}
