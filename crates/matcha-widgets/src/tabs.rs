//! Horizontal tab strip for switching between views.

use matcha_core::{Key, KeyEvent};
use unicode_width::UnicodeWidthStr;

const REVERSE_ON: &str = "\x1b[7m";
const REVERSE_OFF: &str = "\x1b[27m";

/// Initial tab strip settings, consumed by [`Tabs::new`].
#[derive(Debug, Clone)]
pub struct TabsConfig {
    /// Text between tab labels.
    pub divider: String,
    /// Render a rule under the labels.
    pub underline: bool,
}

impl Default for TabsConfig {
    fn default() -> Self {
        TabsConfig {
            divider: " | ".to_string(),
            underline: true,
        }
    }
}

/// A row of labeled tabs tracking the active index.
///
/// Left/right (or `h`/`l`) and tab/shift-tab move between tabs, wrapping at
/// the ends. Digits jump straight to a tab, one-based. The active label
/// renders reverse-video.
pub struct Tabs {
    config: TabsConfig,
    titles: Vec<String>,
    selected: usize,
    focus: bool,
}

impl Tabs {
    pub fn new(titles: Vec<String>, config: TabsConfig) -> Self {
        Tabs {
            config,
            titles,
            selected: 0,
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

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Index of the active tab.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Activate the tab at `index`. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.titles.len() {
            self.selected = index;
        }
    }

    /// Activate the next tab, wrapping past the last.
    pub fn next(&mut self) {
        if !self.titles.is_empty() {
            self.selected = (self.selected + 1) % self.titles.len();
        }
    }

    /// Activate the previous tab, wrapping past the first.
    pub fn prev(&mut self) {
        if !self.titles.is_empty() {
            self.selected = (self.selected + self.titles.len() - 1) % self.titles.len();
        }
    }

    pub fn update(mut self, key: &KeyEvent) -> Self {
        if !self.focus {
            return self;
        }
        match &key.key {
            Key::Left | Key::ShiftTab => self.prev(),
            Key::Right | Key::Tab => self.next(),
            Key::Runes(s) if s == "h" => self.prev(),
            Key::Runes(s) if s == "l" => self.next(),
            Key::Runes(s) => {
                if let Some(d) = s.chars().next().and_then(|c| c.to_digit(10)) {
                    let d = d as usize;
                    if d > 0 && d <= self.titles.len() {
                        self.selected = d - 1;
                    }
                }
            }
            _ => {}
        }
        self
    }

    pub fn view(&self) -> String {
        let mut line = String::new();
        let mut width = 0;
        for (i, title) in self.titles.iter().enumerate() {
            if i > 0 {
                line.push_str(&self.config.divider);
                width += self.config.divider.width();
            }
            if i == self.selected {
                line.push_str(REVERSE_ON);
                line.push_str(title);
                line.push_str(REVERSE_OFF);
            } else {
                line.push_str(title);
            }
            width += title.width();
        }
        if self.config.underline {
            format!("{line}\n{}", "─".repeat(width))
        } else {
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> Tabs {
        let mut t = Tabs::new(
            vec!["One".to_string(), "Two".to_string(), "Three".to_string()],
            TabsConfig::default(),
        );
        t.focus();
        t
    }

    fn key(k: Key) -> KeyEvent {
        KeyEvent::new(k)
    }

    #[test]
    fn arrows_cycle_with_wrapping() {
        let mut t = strip();
        t = t.update(&key(Key::Left));
        assert_eq!(t.selected(), 2);
        t = t.update(&key(Key::Right));
        t = t.update(&KeyEvent::rune('l'));
        assert_eq!(t.selected(), 1);
        t = t.update(&KeyEvent::rune('h'));
        assert_eq!(t.selected(), 0);
    }

    #[test]
    fn tab_and_shift_tab_cycle() {
        let mut t = strip();
        t = t.update(&key(Key::Tab));
        assert_eq!(t.selected(), 1);
        t = t.update(&key(Key::ShiftTab));
        assert_eq!(t.selected(), 0);
    }

    #[test]
    fn digits_jump_one_based() {
        let mut t = strip();
        t = t.update(&KeyEvent::rune('3'));
        assert_eq!(t.selected(), 2);
        t = t.update(&KeyEvent::rune('9'));
        assert_eq!(t.selected(), 2);
        t = t.update(&KeyEvent::rune('0'));
        assert_eq!(t.selected(), 2);
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut t = strip();
        t.select(1);
        assert_eq!(t.selected(), 1);
        t.select(7);
        assert_eq!(t.selected(), 1);
    }

    #[test]
    fn unfocused_strip_ignores_keys() {
        let mut t = strip();
        t.blur();
        t = t.update(&key(Key::Right));
        assert_eq!(t.selected(), 0);
    }

    #[test]
    fn view_marks_the_active_tab() {
        let t = strip();
        let view = t.view();
        assert!(view.contains(&format!("{REVERSE_ON}One{REVERSE_OFF}")));
        assert!(view.contains(" | Two | Three"));
    }

    #[test]
    fn underline_matches_the_label_width() {
        let t = strip();
        let view = t.view();
        let rule = view.split('\n').nth(1).unwrap();
        // "One | Two | Three" is 17 cells wide.
        assert_eq!(rule.chars().count(), 17);
    }

    #[test]
    fn empty_strip_is_harmless() {
        let mut t = Tabs::new(Vec::new(), TabsConfig::default());
        t.focus();
        t = t.update(&key(Key::Right));
        assert_eq!(t.selected(), 0);
        assert_eq!(t.view(), "\n");
    }
}
