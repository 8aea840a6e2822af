//! Animated loading spinner with multiple built-in frame sets.
//!
//! The spinner drives itself with a tick command chain: every accepted
//! tick advances the frame and schedules the next tick. Ticks carry the
//! spinner's id and a generation tag, so ticks from a replaced or stopped
//! spinner are recognized as stale and dropped instead of double-stepping
//! the animation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use matcha_core::command::Command;

/// Built-in spinner frame sets.
pub mod frames {
    /// Braille dot spinner cycling through ten positions.
    pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    /// Classic ASCII line spinner: |, /, -, \.
    pub const LINE: &[&str] = &["|", "/", "-", "\\"];
    /// Compact braille dot spinner with six frames.
    pub const MINI_DOT: &[&str] = &["⠋", "⠙", "⠸", "⠴", "⠦", "⠇"];
    /// Braille pattern that appears to jump up and down.
    pub const JUMP: &[&str] = &["⢄", "⢂", "⢁", "⡁", "⡈", "⡐", "⡠"];
    /// Block characters that pulse between solid and transparent.
    pub const PULSE: &[&str] = &["█", "▓", "▒", "░", "▒", "▓"];
    /// Three-dot pattern with a moving filled dot.
    pub const POINTS: &[&str] = &["∙∙∙", "●∙∙", "∙●∙", "∙∙●"];
    /// Rotating globe emoji sequence.
    pub const GLOBE: &[&str] = &["🌍", "🌎", "🌏"];
    /// Moon phase emoji sequence cycling through all phases.
    pub const MOON: &[&str] = &["🌑", "🌒", "🌓", "🌔", "🌕", "🌖", "🌗", "🌘"];
    /// Meter-style bar that fills and empties.
    pub const METER: &[&str] = &["▱▱▱", "▰▱▱", "▰▰▱", "▰▰▰", "▰▰▱", "▰▱▱"];
    /// Growing ellipsis from empty to three dots.
    pub const ELLIPSIS: &[&str] = &["", ".", "..", "..."];
}

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// Configuration for a [`Spinner`], consumed by [`Spinner::new`].
#[derive(Debug, Clone)]
pub struct SpinnerConfig {
    /// The frame set to cycle through (e.g. [`frames::LINE`]).
    pub frames: &'static [&'static str],
    /// Duration between frame advances.
    pub interval: Duration,
    /// Label text displayed after the spinner frame.
    pub label: String,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            frames: frames::DOTS,
            interval: Duration::from_millis(100),
            label: String::new(),
        }
    }
}

/// A tick addressed to one spinner generation. Route it back to
/// [`Spinner::update`]; the spinner decides whether it is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinnerMsg {
    id: usize,
    tag: usize,
}

/// An animated spinner.
///
/// # Example
///
/// ```ignore
/// // In init: start the tick chain.
/// let spinner = Spinner::new(SpinnerConfig::default());
/// let cmd = spinner.tick().map(Msg::Spinner);
///
/// // In update: route ticks back and forward the follow-up command.
/// Message::Custom(Msg::Spinner(tick)) => {
///     let (spinner, cmd) = self.spinner.update(tick);
///     self.spinner = spinner;
///     (self, cmd.map(Msg::Spinner))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Spinner {
    config: SpinnerConfig,
    frame_index: usize,
    id: usize,
    tag: usize,
}

impl Spinner {
    pub fn new(config: SpinnerConfig) -> Self {
        Self {
            config,
            frame_index: 0,
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            tag: 0,
        }
    }

    /// The command that schedules this spinner's next frame advance.
    pub fn tick(&self) -> Command<SpinnerMsg> {
        let msg = SpinnerMsg {
            id: self.id,
            tag: self.tag,
        };
        Command::tick_with(self.config.interval, move |_| msg)
    }

    /// Process a tick. A current tick advances the frame and returns the
    /// follow-up tick command; a stale tick (older generation, or another
    /// spinner's) returns the spinner unchanged with no command.
    pub fn update(mut self, msg: SpinnerMsg) -> (Self, Command<SpinnerMsg>) {
        if msg.id != self.id || msg.tag != self.tag {
            return (self, Command::none());
        }
        if !self.config.frames.is_empty() {
            self.frame_index = (self.frame_index + 1) % self.config.frames.len();
        }
        self.tag = self.tag.wrapping_add(1);
        let next = self.tick();
        (self, next)
    }

    /// Invalidate any in-flight tick, stopping the animation chain.
    pub fn stop(&mut self) {
        self.tag = self.tag.wrapping_add(1);
    }

    /// The current frame glyph.
    pub fn frame(&self) -> &'static str {
        self.config
            .frames
            .get(self.frame_index)
            .copied()
            .unwrap_or("")
    }

    /// Render the spinner frame, followed by the label if one is set.
    pub fn view(&self) -> String {
        if self.config.label.is_empty() {
            self.frame().to_string()
        } else {
            format!("{} {}", self.frame(), self.config.label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_tick_advances_the_frame_and_reschedules() {
        let spinner = Spinner::new(SpinnerConfig {
            frames: frames::LINE,
            ..SpinnerConfig::default()
        });
        let msg = SpinnerMsg {
            id: spinner.id,
            tag: spinner.tag,
        };
        let (spinner, cmd) = spinner.update(msg);
        assert_eq!(spinner.frame(), "/");
        assert!(!cmd.is_none());
    }

    #[test]
    fn stale_tag_is_ignored() {
        let spinner = Spinner::new(SpinnerConfig {
            frames: frames::LINE,
            ..SpinnerConfig::default()
        });
        let stale = SpinnerMsg {
            id: spinner.id,
            tag: spinner.tag.wrapping_add(7),
        };
        let (spinner, cmd) = spinner.update(stale);
        assert_eq!(spinner.frame(), "|");
        assert!(cmd.is_none());
    }

    #[test]
    fn another_spinners_tick_is_ignored() {
        let a = Spinner::new(SpinnerConfig::default());
        let b = Spinner::new(SpinnerConfig::default());
        let msg = SpinnerMsg { id: a.id, tag: 0 };
        let (b, cmd) = b.update(msg);
        assert_eq!(b.frame_index, 0);
        assert!(cmd.is_none());
    }

    #[test]
    fn stop_breaks_the_chain() {
        let mut spinner = Spinner::new(SpinnerConfig {
            frames: frames::LINE,
            ..SpinnerConfig::default()
        });
        let in_flight = SpinnerMsg {
            id: spinner.id,
            tag: spinner.tag,
        };
        spinner.stop();
        let (spinner, cmd) = spinner.update(in_flight);
        assert_eq!(spinner.frame(), "|");
        assert!(cmd.is_none());
    }

    #[test]
    fn frames_wrap_around() {
        let mut spinner = Spinner::new(SpinnerConfig {
            frames: frames::LINE,
            ..SpinnerConfig::default()
        });
        for _ in 0..4 {
            let msg = SpinnerMsg {
                id: spinner.id,
                tag: spinner.tag,
            };
            let (next, _) = spinner.update(msg);
            spinner = next;
        }
        assert_eq!(spinner.frame(), "|");
    }

    #[test]
    fn view_appends_the_label() {
        let spinner = Spinner::new(SpinnerConfig {
            frames: frames::LINE,
            label: "loading".into(),
            ..SpinnerConfig::default()
        });
        assert_eq!(spinner.view(), "| loading");
    }
}
