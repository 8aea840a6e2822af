//! Yes/no confirmation prompt.

use matcha_core::{Key, KeyEvent};

const REVERSE_ON: &str = "\x1b[7m";
const REVERSE_OFF: &str = "\x1b[27m";

/// Initial prompt settings, consumed by [`Confirm::new`].
#[derive(Debug, Clone)]
pub struct ConfirmConfig {
    /// Question rendered above the choices.
    pub prompt: String,
    pub yes_label: String,
    pub no_label: String,
    /// Which choice starts highlighted.
    pub default_yes: bool,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        ConfirmConfig {
            prompt: "Are you sure?".to_string(),
            yes_label: "Yes".to_string(),
            no_label: "No".to_string(),
            default_yes: true,
        }
    }
}

/// A two-choice prompt that settles on a decision.
///
/// Left/right (or `h`/`l`, or tab) move between the choices, enter accepts
/// the highlighted one. `y` and `n` answer directly; esc answers no. Once
/// decided the prompt ignores further keys until [`reset`](Confirm::reset).
///
/// ```rust,ignore
/// if self.confirm.decision() == Some(true) {
///     // do the dangerous thing
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Confirm {
    config: ConfirmConfig,
    yes_selected: bool,
    decision: Option<bool>,
    focus: bool,
}

impl Confirm {
    pub fn new(config: ConfirmConfig) -> Self {
        let yes_selected = config.default_yes;
        Confirm {
            config,
            yes_selected,
            decision: None,
            focus: false,
        }
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    pub fn focused(&self) -> bool {
        self.focus
    }

    /// The settled answer, once enter, `y`, `n`, or esc has been pressed.
    pub fn decision(&self) -> Option<bool> {
        self.decision
    }

    pub fn is_decided(&self) -> bool {
        self.decision.is_some()
    }

    /// Clear the decision and restore the default highlight.
    pub fn reset(&mut self) {
        self.decision = None;
        self.yes_selected = self.config.default_yes;
    }

    pub fn update(mut self, key: &KeyEvent) -> Self {
        if !self.focus || self.decision.is_some() {
            return self;
        }
        match &key.key {
            Key::Left | Key::Right | Key::Tab => self.yes_selected = !self.yes_selected,
            Key::Enter => self.decision = Some(self.yes_selected),
            Key::Escape => {
                self.yes_selected = false;
                self.decision = Some(false);
            }
            Key::Runes(s) if s == "h" || s == "l" => self.yes_selected = !self.yes_selected,
            Key::Runes(s) if s == "y" || s == "Y" => {
                self.yes_selected = true;
                self.decision = Some(true);
            }
            Key::Runes(s) if s == "n" || s == "N" => {
                self.yes_selected = false;
                self.decision = Some(false);
            }
            _ => {}
        }
        self
    }

    pub fn view(&self) -> String {
        let yes = if self.yes_selected {
            format!("{REVERSE_ON}{}{REVERSE_OFF}", self.config.yes_label)
        } else {
            self.config.yes_label.clone()
        };
        let no = if self.yes_selected {
            self.config.no_label.clone()
        } else {
            format!("{REVERSE_ON}{}{REVERSE_OFF}", self.config.no_label)
        };
        format!("{}\n  {yes}   {no}", self.config.prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(default_yes: bool) -> Confirm {
        let mut c = Confirm::new(ConfirmConfig {
            prompt: "Delete everything?".to_string(),
            default_yes,
            ..Default::default()
        });
        c.focus();
        c
    }

    fn key(k: Key) -> KeyEvent {
        KeyEvent::new(k)
    }

    #[test]
    fn enter_accepts_the_default() {
        let mut c = prompt(true);
        c = c.update(&key(Key::Enter));
        assert_eq!(c.decision(), Some(true));

        let mut c = prompt(false);
        c = c.update(&key(Key::Enter));
        assert_eq!(c.decision(), Some(false));
    }

    #[test]
    fn arrows_toggle_the_highlight() {
        let mut c = prompt(true);
        c = c.update(&key(Key::Right));
        c = c.update(&key(Key::Enter));
        assert_eq!(c.decision(), Some(false));
    }

    #[test]
    fn shortcut_keys_answer_directly() {
        let mut c = prompt(false);
        c = c.update(&KeyEvent::rune('y'));
        assert_eq!(c.decision(), Some(true));

        let mut c = prompt(true);
        c = c.update(&KeyEvent::rune('n'));
        assert_eq!(c.decision(), Some(false));
    }

    #[test]
    fn esc_answers_no() {
        let mut c = prompt(true);
        c = c.update(&key(Key::Escape));
        assert_eq!(c.decision(), Some(false));
    }

    #[test]
    fn a_decided_prompt_ignores_keys() {
        let mut c = prompt(true);
        c = c.update(&KeyEvent::rune('n'));
        c = c.update(&KeyEvent::rune('y'));
        assert_eq!(c.decision(), Some(false));
    }

    #[test]
    fn reset_reopens_the_prompt() {
        let mut c = prompt(true);
        c = c.update(&KeyEvent::rune('n'));
        c.reset();
        assert_eq!(c.decision(), None);
        c = c.update(&key(Key::Enter));
        assert_eq!(c.decision(), Some(true));
    }

    #[test]
    fn view_highlights_the_selected_choice() {
        let c = prompt(true);
        let view = c.view();
        assert!(view.starts_with("Delete everything?"));
        assert!(view.contains(&format!("{REVERSE_ON}Yes{REVERSE_OFF}")));
        assert!(!view.contains(&format!("{REVERSE_ON}No{REVERSE_OFF}")));
    }

    #[test]
    fn unfocused_prompt_ignores_keys() {
        let mut c = prompt(true);
        c.blur();
        c = c.update(&key(Key::Enter));
        assert_eq!(c.decision(), None);
    }
}
