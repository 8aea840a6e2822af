//! Page position indicator with the page arithmetic to back it.

use matcha_core::{Key, KeyEvent};

/// How the paginator renders its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginatorKind {
    /// Numeral fraction such as `2/5`.
    #[default]
    Arabic,
    /// One dot per page: `● ○ ○`.
    Dots,
}

/// Initial paginator settings, consumed by [`Paginator::new`].
#[derive(Debug, Clone)]
pub struct PaginatorConfig {
    pub kind: PaginatorKind,
    /// Items per page. Zero is treated as one.
    pub per_page: usize,
    /// Marker for the current page in [`PaginatorKind::Dots`] mode.
    pub active_dot: String,
    pub inactive_dot: String,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        PaginatorConfig {
            kind: PaginatorKind::Arabic,
            per_page: 10,
            active_dot: "●".to_string(),
            inactive_dot: "○".to_string(),
        }
    }
}

/// Tracks the current page of a paged collection.
///
/// The paginator holds pages, not items. Feed it the item count through
/// [`set_total_items`](Paginator::set_total_items) and use
/// [`slice_bounds`](Paginator::slice_bounds) to window the backing slice:
///
/// ```rust,ignore
/// let mut pager = Paginator::new(PaginatorConfig { per_page: 8, ..Default::default() });
/// pager.set_total_items(items.len());
/// let (start, end) = pager.slice_bounds(items.len());
/// for item in &items[start..end] { /* render */ }
/// ```
#[derive(Debug, Clone)]
pub struct Paginator {
    config: PaginatorConfig,
    page: usize,
    total_pages: usize,
}

impl Paginator {
    pub fn new(mut config: PaginatorConfig) -> Self {
        config.per_page = config.per_page.max(1);
        Paginator {
            config,
            page: 0,
            total_pages: 1,
        }
    }

    /// Current page, zero-indexed.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn per_page(&self) -> usize {
        self.config.per_page
    }

    /// Jump to a page, clamped to the valid range.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.total_pages - 1);
    }

    /// Set the page count directly. A collection always has at least one
    /// (possibly empty) page.
    pub fn set_total_pages(&mut self, pages: usize) {
        self.total_pages = pages.max(1);
        if self.page >= self.total_pages {
            self.page = self.total_pages - 1;
        }
    }

    /// Derive the page count from an item count.
    pub fn set_total_items(&mut self, items: usize) {
        self.set_total_pages(items.div_ceil(self.config.per_page));
    }

    pub fn next_page(&mut self) {
        if !self.on_last_page() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if !self.on_first_page() {
            self.page -= 1;
        }
    }

    pub fn on_first_page(&self) -> bool {
        self.page == 0
    }

    pub fn on_last_page(&self) -> bool {
        self.page + 1 >= self.total_pages
    }

    /// Number of items on the current page of a collection holding
    /// `total_items` items.
    pub fn items_on_page(&self, total_items: usize) -> usize {
        let (start, end) = self.slice_bounds(total_items);
        end - start
    }

    /// Start and end indices of the current page within a collection of
    /// `total_items`, suitable for slicing.
    pub fn slice_bounds(&self, total_items: usize) -> (usize, usize) {
        let start = (self.page * self.config.per_page).min(total_items);
        let end = (start + self.config.per_page).min(total_items);
        (start, end)
    }

    /// Handle a page-turn key. Left, `h`, and page-up go back; right, `l`,
    /// and page-down go forward.
    pub fn update(mut self, key: &KeyEvent) -> Self {
        match &key.key {
            Key::Left | Key::PageUp => self.prev_page(),
            Key::Right | Key::PageDown => self.next_page(),
            Key::Runes(s) if s == "h" => self.prev_page(),
            Key::Runes(s) if s == "l" => self.next_page(),
            _ => {}
        }
        self
    }

    pub fn view(&self) -> String {
        match self.config.kind {
            PaginatorKind::Arabic => format!("{}/{}", self.page + 1, self.total_pages),
            PaginatorKind::Dots => {
                let mut out = String::new();
                for i in 0..self.total_pages {
                    if i > 0 {
                        out.push(' ');
                    }
                    if i == self.page {
                        out.push_str(&self.config.active_dot);
                    } else {
                        out.push_str(&self.config.inactive_dot);
                    }
                }
                out
            }
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Paginator::new(PaginatorConfig::default())
    }
}
