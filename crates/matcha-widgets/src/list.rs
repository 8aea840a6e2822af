//! Scrolling selection list with live filtering and a page indicator.

use matcha_core::{Key, KeyEvent};
use unicode_width::UnicodeWidthStr;

use crate::paginator::{Paginator, PaginatorConfig, PaginatorKind};
use crate::scroll::Scroll;

const REVERSE_ON: &str = "\x1b[7m";
const REVERSE_OFF: &str = "\x1b[27m";

/// Types that can live in a [`List`].
///
/// Any domain type qualifies by naming the text it should be displayed and
/// filtered by. No conversion into an intermediate row struct is needed.
///
/// ```rust,ignore
/// struct Task {
///     title: String,
///     done: bool,
/// }
///
/// impl list::Item for Task {
///     fn filter_value(&self) -> &str {
///         &self.title
///     }
/// }
/// ```
pub trait Item {
    /// Text used for display and filter matching.
    fn filter_value(&self) -> &str;
}

impl Item for String {
    fn filter_value(&self) -> &str {
        self
    }
}

impl Item for &'static str {
    fn filter_value(&self) -> &str {
        self
    }
}

/// Initial list settings, consumed by [`List::new`].
#[derive(Debug, Clone)]
pub struct ListConfig {
    /// Heading rendered above the rows. Empty means no heading line.
    pub title: String,
    /// Number of visible rows.
    pub height: usize,
    /// Prefix for the cursor row. Other rows are padded to the same width.
    pub marker: String,
    /// Whether `/` opens the filter prompt.
    pub filtering: bool,
    /// Whether cursor movement wraps at the ends.
    pub wrap: bool,
    /// Whether to render a page indicator when the rows overflow the window.
    pub show_paginator: bool,
    pub paginator_kind: PaginatorKind,
}

impl Default for ListConfig {
    fn default() -> Self {
        ListConfig {
            title: String::new(),
            height: 10,
            marker: "▸ ".to_string(),
            filtering: true,
            wrap: true,
            show_paginator: true,
            paginator_kind: PaginatorKind::Arabic,
        }
    }
}

/// A selectable list over any [`Item`] type.
///
/// Navigation is vim-flavored: arrows or `j`/`k` move the cursor, `g`/`G`
/// and home/end jump to the ends, page and half-page keys scroll in larger
/// steps. Pressing `/` opens a filter prompt that narrows the rows as you
/// type; enter keeps the filter, esc drops it.
///
/// The list never interprets enter as confirmation. Applications match enter
/// themselves and read [`selected_item`](List::selected_item):
///
/// ```rust,ignore
/// Message::Key(key) => match key.key {
///     Key::Enter => {
///         if let Some(fruit) = self.list.selected_item() {
///             self.choice = Some(fruit.clone());
///         }
///     }
///     _ => self.list = self.list.update(&key),
/// }
/// ```
pub struct List<I: Item> {
    config: ListConfig,
    items: Vec<I>,
    /// Indices into `items` that pass the filter, in original order.
    visible: Vec<usize>,
    filter: String,
    filtering: bool,
    focus: bool,
    scroll: Scroll,
    paginator: Paginator,
    status: Option<String>,
    marker_pad: String,
}

impl<I: Item> List<I> {
    /// Create a list over `items`. The first row starts selected.
    pub fn new(items: Vec<I>, config: ListConfig) -> Self {
        let visible: Vec<usize> = (0..items.len()).collect();
        let scroll = Scroll::new(visible.len(), config.height, config.wrap);
        let paginator = Paginator::new(PaginatorConfig {
            kind: config.paginator_kind,
            per_page: config.height,
            ..Default::default()
        });
        let marker_pad = " ".repeat(config.marker.width());
        let mut list = List {
            config,
            items,
            visible,
            filter: String::new(),
            filtering: false,
            focus: false,
            scroll,
            paginator,
            status: None,
            marker_pad,
        };
        list.sync_paginator();
        list
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
        self.filtering = false;
    }

    pub fn focused(&self) -> bool {
        self.focus
    }

    /// Index of the cursor row in the original, unfiltered items.
    pub fn selected(&self) -> Option<usize> {
        self.visible.get(self.scroll.cursor()).copied()
    }

    pub fn selected_item(&self) -> Option<&I> {
        self.selected().map(|i| &self.items[i])
    }

    /// Move the cursor to the item at `index` in the original items. When a
    /// filter hides that item, the cursor clamps to the nearest visible row.
    pub fn set_selected(&mut self, index: usize) {
        match self.visible.iter().position(|&i| i == index) {
            Some(pos) => self.scroll.select(pos),
            None => self.scroll.select(index),
        }
        self.sync_paginator();
    }

    /// Replace all items. The filter is re-applied and the cursor clamped.
    pub fn set_items(&mut self, items: Vec<I>) {
        self.items = items;
        self.refilter(false);
    }

    /// Insert an item at `index` in the original items, clamped to the end.
    pub fn insert_item(&mut self, index: usize, item: I) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        self.refilter(false);
    }

    /// Remove and return the item at `index` in the original items.
    pub fn remove_item(&mut self, index: usize) -> Option<I> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.refilter(false);
        Some(removed)
    }

    /// Total item count, ignoring the filter.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Rows that pass the current filter.
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn filter_value(&self) -> &str {
        &self.filter
    }

    /// Whether the filter prompt is open and capturing keys.
    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn clear_filter(&mut self) {
        self.filtering = false;
        self.filter.clear();
        self.refilter(true);
    }

    /// Set or clear the status line rendered under the rows.
    pub fn set_status(&mut self, status: Option<String>) {
        self.status = status;
    }

    pub fn update(mut self, key: &KeyEvent) -> Self {
        if !self.focus {
            return self;
        }

        if self.filtering {
            match &key.key {
                Key::Enter => self.filtering = false,
                Key::Escape => {
                    self.filtering = false;
                    self.filter.clear();
                    self.refilter(true);
                }
                Key::Backspace => {
                    self.filter.pop();
                    self.refilter(true);
                }
                Key::Up => self.scroll.up(),
                Key::Down => self.scroll.down(),
                Key::Runes(s) => {
                    self.filter.push_str(s);
                    self.refilter(true);
                }
                _ => {}
            }
            self.sync_paginator();
            return self;
        }

        match &key.key {
            Key::Up => self.scroll.up(),
            Key::Down => self.scroll.down(),
            Key::Home => self.scroll.home(),
            Key::End => self.scroll.end(),
            Key::PageUp => self.scroll.page_up(),
            Key::PageDown => self.scroll.page_down(),
            Key::Ctrl('u') => self.scroll.half_page_up(),
            Key::Ctrl('d') => self.scroll.half_page_down(),
            Key::Runes(s) if s == "k" => self.scroll.up(),
            Key::Runes(s) if s == "j" => self.scroll.down(),
            Key::Runes(s) if s == "g" => self.scroll.home(),
            Key::Runes(s) if s == "G" => self.scroll.end(),
            Key::Runes(s) if s == "/" && self.config.filtering => {
                self.filtering = true;
            }
            Key::Escape if !self.filter.is_empty() => {
                self.filter.clear();
                self.refilter(true);
            }
            _ => {}
        }
        self.sync_paginator();
        self
    }

    /// Render the list. The body is always exactly `height` lines so the
    /// widget keeps a stable footprint as rows come and go.
    pub fn view(&self) -> String {
        let mut lines = Vec::new();
        if !self.config.title.is_empty() {
            lines.push(self.config.title.clone());
        }
        if self.filtering || !self.filter.is_empty() {
            let mut prompt = format!("/{}", self.filter);
            if self.filtering {
                prompt.push_str(REVERSE_ON);
                prompt.push(' ');
                prompt.push_str(REVERSE_OFF);
            }
            lines.push(prompt);
        }

        for row in 0..self.config.height {
            let idx = self.scroll.offset() + row;
            match self.visible.get(idx) {
                Some(&orig) => {
                    let prefix = if idx == self.scroll.cursor() {
                        &self.config.marker
                    } else {
                        &self.marker_pad
                    };
                    lines.push(format!("{prefix}{}", self.items[orig].filter_value()));
                }
                None if idx == 0 && row == 0 => {
                    let empty = if self.filter.is_empty() {
                        "No items."
                    } else {
                        "No matches."
                    };
                    lines.push(format!("{}{empty}", self.marker_pad));
                }
                None => lines.push(String::new()),
            }
        }

        if let Some(status) = &self.status {
            lines.push(status.clone());
        }
        if self.config.show_paginator && self.paginator.total_pages() > 1 {
            lines.push(format!("{}{}", self.marker_pad, self.paginator.view()));
        }
        lines.join("\n")
    }

    /// Rebuild `visible` from the filter. `reset` sends the cursor back to
    /// the top, which is what incremental filter edits want; item mutations
    /// keep the cursor in place (clamped).
    fn refilter(&mut self, reset: bool) {
        if self.filter.is_empty() {
            self.visible = (0..self.items.len()).collect();
        } else {
            let needle = self.filter.to_lowercase();
            self.visible = self
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.filter_value().to_lowercase().contains(&needle))
                .map(|(i, _)| i)
                .collect();
        }
        self.scroll.set_count(self.visible.len());
        if reset {
            self.scroll.home();
        }
        self.sync_paginator();
    }

    fn sync_paginator(&mut self) {
        let height = self.config.height.max(1);
        self.paginator
            .set_total_pages(self.visible.len().div_ceil(height));
        self.paginator.set_page(self.scroll.cursor() / height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit() -> List<String> {
        let mut list = List::new(
            vec![
                "Apple".to_string(),
                "Banana".to_string(),
                "Cherry".to_string(),
                "Damson".to_string(),
            ],
            ListConfig::default(),
        );
        list.focus();
        list
    }

    fn key(k: Key) -> KeyEvent {
        KeyEvent::new(k)
    }

    #[test]
    fn first_row_starts_selected() {
        let list = fruit();
        assert_eq!(list.selected(), Some(0));
        assert_eq!(list.selected_item().map(String::as_str), Some("Apple"));
    }

    #[test]
    fn navigation_moves_and_wraps() {
        let mut list = fruit();
        list = list.update(&key(Key::Down));
        list = list.update(&KeyEvent::rune('j'));
        assert_eq!(list.selected(), Some(2));
        list = list.update(&KeyEvent::rune('G'));
        assert_eq!(list.selected(), Some(3));
        list = list.update(&key(Key::Down));
        assert_eq!(list.selected(), Some(0));
        list = list.update(&KeyEvent::rune('k'));
        assert_eq!(list.selected(), Some(3));
    }

    #[test]
    fn unfocused_list_ignores_keys() {
        let mut list = fruit();
        list.blur();
        list = list.update(&key(Key::Down));
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn window_follows_the_cursor() {
        let items: Vec<String> = (0..10).map(|i| format!("item{i}")).collect();
        let mut list = List::new(
            items,
            ListConfig {
                height: 3,
                ..Default::default()
            },
        );
        list.focus();
        for _ in 0..5 {
            list = list.update(&key(Key::Down));
        }
        let view = list.view();
        assert!(view.contains("▸ item5"));
        assert!(view.contains("item3"));
        assert!(!view.contains("item0"));
    }

    #[test]
    fn typing_a_filter_narrows_the_rows() {
        let mut list = fruit();
        list = list.update(&KeyEvent::rune('/'));
        assert!(list.is_filtering());
        list = list.update(&KeyEvent::rune('a'));
        list = list.update(&KeyEvent::rune('n'));
        assert_eq!(list.visible_count(), 1);
        assert_eq!(list.selected(), Some(1));
        list = list.update(&key(Key::Enter));
        assert!(!list.is_filtering());
        assert_eq!(list.filter_value(), "an");
        assert_eq!(list.selected_item().map(String::as_str), Some("Banana"));
    }

    #[test]
    fn esc_cancels_the_filter_prompt() {
        let mut list = fruit();
        list = list.update(&KeyEvent::rune('/'));
        list = list.update(&KeyEvent::rune('z'));
        assert_eq!(list.visible_count(), 0);
        list = list.update(&key(Key::Escape));
        assert!(!list.is_filtering());
        assert_eq!(list.visible_count(), 4);
        assert_eq!(list.filter_value(), "");
    }

    #[test]
    fn esc_drops_an_applied_filter() {
        let mut list = fruit();
        list = list.update(&KeyEvent::rune('/'));
        list = list.update(&KeyEvent::rune('a'));
        list = list.update(&key(Key::Enter));
        list = list.update(&key(Key::Escape));
        assert_eq!(list.visible_count(), 4);
    }

    #[test]
    fn no_matches_message() {
        let mut list = fruit();
        list = list.update(&KeyEvent::rune('/'));
        list = list.update(&KeyEvent::rune('q'));
        assert!(list.view().contains("No matches."));
        assert_eq!(list.selected(), None);
        assert_eq!(list.selected_item().map(String::as_str), None);
    }

    #[test]
    fn filtered_navigation_reports_original_indices() {
        let mut list = List::new(
            vec![
                "red".to_string(),
                "green".to_string(),
                "grey".to_string(),
                "blue".to_string(),
            ],
            ListConfig::default(),
        );
        list.focus();
        list = list.update(&KeyEvent::rune('/'));
        list = list.update(&KeyEvent::rune('g'));
        list = list.update(&key(Key::Enter));
        assert_eq!(list.selected(), Some(1));
        list = list.update(&key(Key::Down));
        assert_eq!(list.selected(), Some(2));
    }

    #[test]
    fn item_mutation_keeps_the_cursor_clamped() {
        let mut list = fruit();
        list = list.update(&KeyEvent::rune('G'));
        assert_eq!(list.selected(), Some(3));
        let removed = list.remove_item(3);
        assert_eq!(removed.as_deref(), Some("Damson"));
        assert_eq!(list.selected(), Some(2));
        list.set_items(vec!["one".to_string()]);
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn paginator_reflects_the_cursor_page() {
        let items: Vec<String> = (0..25).map(|i| format!("row{i}")).collect();
        let mut list = List::new(
            items,
            ListConfig {
                height: 10,
                ..Default::default()
            },
        );
        list.focus();
        assert!(list.view().contains("1/3"));
        list = list.update(&key(Key::End));
        assert!(list.view().contains("3/3"));
    }

    #[test]
    fn body_height_is_stable() {
        let list = List::new(
            vec!["only".to_string()],
            ListConfig {
                height: 4,
                ..Default::default()
            },
        );
        assert_eq!(list.view().split('\n').count(), 4);
    }
}
