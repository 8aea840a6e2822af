//! Key bindings with help text, and help-line rendering for them.

use matcha_core::{Key, KeyEvent};
use unicode_width::UnicodeWidthStr;

/// A named action triggered by one or more keys.
///
/// The help label is free-form so a binding can describe itself the way a
/// status line wants it, e.g. `↑/k` for a pair of up keys:
///
/// ```rust,ignore
/// let up = Binding::new(vec![Key::Up, Key::rune('k')], "↑/k", "move up");
/// if up.matches(&event) { /* ... */ }
/// ```
pub struct Binding {
    keys: Vec<KeyEvent>,
    help_key: String,
    description: String,
    enabled: bool,
}

impl Binding {
    /// Bind plain keys, no alt modifier.
    pub fn new(
        keys: Vec<Key>,
        help_key: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Binding {
            keys: keys.into_iter().map(KeyEvent::new).collect(),
            help_key: help_key.into(),
            description: description.into(),
            enabled: true,
        }
    }

    /// Bind full key events, for chords that carry the alt modifier.
    pub fn with_events(
        keys: Vec<KeyEvent>,
        help_key: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Binding {
            keys,
            help_key: help_key.into(),
            description: description.into(),
            enabled: true,
        }
    }

    /// Whether `event` triggers this binding. Disabled bindings and pasted
    /// text never match.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if !self.enabled || event.paste {
            return false;
        }
        self.keys
            .iter()
            .any(|k| k.key == event.key && k.alt == event.alt)
    }

    /// Disabled bindings never match and are skipped by help rendering.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn help_key(&self) -> &str {
        &self.help_key
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A set of bindings that knows which of them belong in help output.
///
/// Applications implement this for their keymap struct and hand it to
/// [`Help::short_for`] or [`Help::full_for`].
pub trait KeyMap {
    /// The most important bindings, for a one-line help footer.
    fn short_help(&self) -> Vec<&Binding>;

    /// All bindings, grouped under headings, for a full help screen.
    fn full_help(&self) -> Vec<(&str, Vec<&Binding>)>;
}

/// Help line settings, consumed by [`Help::new`].
#[derive(Debug, Clone)]
pub struct HelpConfig {
    /// Separator between entries on the short help line.
    pub separator: String,
    /// Cap on the short line's display width. Zero means no cap; over the
    /// cap the line ends with an ellipsis.
    pub max_width: usize,
}

impl Default for HelpConfig {
    fn default() -> Self {
        HelpConfig {
            separator: " • ".to_string(),
            max_width: 0,
        }
    }
}

/// Renders bindings as help text.
#[derive(Debug, Clone, Default)]
pub struct Help {
    config: HelpConfig,
}

impl Help {
    pub fn new(config: HelpConfig) -> Self {
        Help { config }
    }

    /// One line of `key description` entries, separator-joined, skipping
    /// disabled bindings.
    pub fn short(&self, bindings: &[&Binding]) -> String {
        let mut out = String::new();
        for binding in bindings.iter().filter(|b| b.is_enabled()) {
            let entry = format!("{} {}", binding.help_key, binding.description);
            let added = if out.is_empty() {
                entry.width()
            } else {
                self.config.separator.width() + entry.width()
            };
            if self.config.max_width > 0 && out.width() + added > self.config.max_width {
                out.push('…');
                break;
            }
            if !out.is_empty() {
                out.push_str(&self.config.separator);
            }
            out.push_str(&entry);
        }
        out
    }

    /// Multi-line help: each group renders its heading and one
    /// `key  description` row per enabled binding, keys padded to a column.
    pub fn full(&self, groups: &[(&str, Vec<&Binding>)]) -> String {
        let mut lines = Vec::new();
        for (idx, (heading, bindings)) in groups.iter().enumerate() {
            if idx > 0 {
                lines.push(String::new());
            }
            if !heading.is_empty() {
                lines.push(heading.to_string());
            }
            for binding in bindings.iter().filter(|b| b.is_enabled()) {
                let pad = 12usize.saturating_sub(binding.help_key.width());
                lines.push(format!(
                    "  {}{}{}",
                    binding.help_key,
                    " ".repeat(pad.max(2)),
                    binding.description
                ));
            }
        }
        lines.join("\n")
    }

    pub fn short_for(&self, map: &impl KeyMap) -> String {
        self.short(&map.short_help())
    }

    pub fn full_for(&self, map: &impl KeyMap) -> String {
        self.full(&map.full_help())
    }
}
