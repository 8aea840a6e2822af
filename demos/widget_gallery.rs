//! # Widget Gallery Example
//!
//! A tabbed tour of the widget set:
//! - Routing keys to whichever pane the tab strip has active
//! - Embedding widget state in the model and splicing `view()` strings
//! - Driving a [`Spinner`] tick chain with `Command::map`
//! - Rendering the help footer from [`Binding`]s
//!
//! Run with: `cargo run --example widget_gallery`

use matcha::widgets::keybinding::{Binding, Help};
use matcha::widgets::list::{List, ListConfig};
use matcha::widgets::progress::{Progress, ProgressConfig};
use matcha::widgets::spinner::{Spinner, SpinnerConfig, SpinnerMsg};
use matcha::widgets::tabs::{Tabs, TabsConfig};
use matcha::widgets::textinput::{TextInput, TextInputConfig};
use matcha::{Command, Key, KeyEvent, Message, Model};

struct Keymap {
    switch: Binding,
    quit: Binding,
}

struct Gallery {
    tabs: Tabs,
    input: TextInput,
    list: List<&'static str>,
    progress: Progress,
    spinner: Spinner,
    keymap: Keymap,
    help: Help,
}

#[derive(Debug)]
enum Msg {
    Spinner(SpinnerMsg),
}

impl Model for Gallery {
    type Custom = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let mut input = TextInput::new(TextInputConfig {
            placeholder: "Type something...".into(),
            width: 32,
            ..TextInputConfig::default()
        });
        input.focus();

        let mut list = List::new(
            vec![
                "Apple",
                "Banana",
                "Cherry",
                "Dragonfruit",
                "Elderberry",
                "Fig",
                "Grape",
            ],
            ListConfig {
                title: "Fruit".into(),
                height: 5,
                ..ListConfig::default()
            },
        );
        list.focus();

        let spinner = Spinner::new(SpinnerConfig {
            label: "background work".into(),
            ..SpinnerConfig::default()
        });
        let tick = spinner.tick().map(Msg::Spinner);

        let gallery = Gallery {
            tabs: Tabs::new(
                vec!["Input".into(), "List".into(), "Progress".into()],
                TabsConfig::default(),
            ),
            input,
            list,
            progress: Progress::new(ProgressConfig {
                width: 30,
                ..ProgressConfig::default()
            }),
            spinner,
            keymap: Keymap {
                switch: Binding::new(vec![Key::Tab], "tab", "switch pane"),
                quit: Binding::new(vec![Key::Escape, Key::Ctrl('c')], "esc", "quit"),
            },
            help: Help::default(),
        };
        (gallery, tick)
    }

    fn update(mut self, msg: Message<Msg>) -> (Self, Command<Msg>) {
        match msg {
            // Route ticks back to the spinner and re-arm the chain.
            Message::Custom(Msg::Spinner(tick)) => {
                let (spinner, cmd) = self.spinner.update(tick);
                self.spinner = spinner;
                (self, cmd.map(Msg::Spinner))
            }
            Message::Key(key) => self.handle_key(key),
            _ => (self, Command::none()),
        }
    }

    fn view(&self) -> String {
        let pane = match self.tabs.selected() {
            0 => self.input.view(),
            1 => self.list.view(),
            _ => format!(
                "{}\n{}\n\n←/→ adjust",
                self.progress.view(),
                self.spinner.view()
            ),
        };
        format!(
            "{}\n\n{}\n\n{}",
            self.tabs.view(),
            pane,
            self.help.short(&[&self.keymap.switch, &self.keymap.quit])
        )
    }
}

impl Gallery {
    fn handle_key(mut self, key: KeyEvent) -> (Self, Command<Msg>) {
        // The filter prompt owns the keys while it is open; esc there drops
        // the filter rather than quitting.
        if self.tabs.selected() == 1 && self.list.is_filtering() {
            self.list = self.list.update(&key);
            return (self, Command::none());
        }
        if self.keymap.quit.matches(&key) {
            return (self, Command::quit());
        }
        if self.keymap.switch.matches(&key) {
            self.tabs.next();
            return (self, Command::none());
        }
        if key.key == Key::ShiftTab {
            self.tabs.prev();
            return (self, Command::none());
        }
        match self.tabs.selected() {
            0 => self.input = self.input.update(&key),
            1 => self.list = self.list.update(&key),
            _ => match key.key {
                Key::Left => self.progress.decr(0.1),
                Key::Right => self.progress.incr(0.1),
                _ => {}
            },
        }
        (self, Command::none())
    }
}

#[matcha::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let model = matcha::run::<Gallery>(()).await?;
    println!("You typed: {:?}", model.input.value());
    Ok(())
}
