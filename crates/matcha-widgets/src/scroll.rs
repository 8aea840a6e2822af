//! Cursor and viewport state shared by the row-oriented widgets.
//!
//! Tracks a cursor inside a collection of `count` rows, of which `height`
//! are visible at a time. Movement slides `offset` so the cursor always
//! stays inside the visible window.

#[derive(Debug, Clone)]
pub(crate) struct Scroll {
    cursor: usize,
    offset: usize,
    count: usize,
    height: usize,
    wrap: bool,
}

impl Scroll {
    pub(crate) fn new(count: usize, height: usize, wrap: bool) -> Self {
        Scroll {
            cursor: 0,
            offset: 0,
            count,
            height,
            wrap,
        }
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// Update the row count, clamping the cursor into the new range.
    pub(crate) fn set_count(&mut self, count: usize) {
        self.count = count;
        if self.count == 0 {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= self.count {
            self.cursor = self.count - 1;
        }
        self.ensure_visible();
    }

    pub(crate) fn up(&mut self) {
        if self.count == 0 {
            return;
        }
        if self.cursor == 0 {
            if self.wrap {
                self.cursor = self.count - 1;
            }
        } else {
            self.cursor -= 1;
        }
        self.ensure_visible();
    }

    pub(crate) fn down(&mut self) {
        if self.count == 0 {
            return;
        }
        if self.cursor + 1 >= self.count {
            if self.wrap {
                self.cursor = 0;
            }
        } else {
            self.cursor += 1;
        }
        self.ensure_visible();
    }

    // Page movement clamps at the ends even when wrapping is on.
    pub(crate) fn page_up(&mut self) {
        self.jump_up(self.height);
    }

    pub(crate) fn page_down(&mut self) {
        self.jump_down(self.height);
    }

    pub(crate) fn half_page_up(&mut self) {
        self.jump_up(self.height / 2);
    }

    pub(crate) fn half_page_down(&mut self) {
        self.jump_down(self.height / 2);
    }

    pub(crate) fn home(&mut self) {
        self.cursor = 0;
        self.ensure_visible();
    }

    pub(crate) fn end(&mut self) {
        if self.count > 0 {
            self.cursor = self.count - 1;
        }
        self.ensure_visible();
    }

    /// Move the cursor to `index`, clamped to the row range.
    pub(crate) fn select(&mut self, index: usize) {
        if self.count == 0 {
            return;
        }
        self.cursor = index.min(self.count - 1);
        self.ensure_visible();
    }

    fn jump_up(&mut self, rows: usize) {
        if self.count == 0 {
            return;
        }
        self.cursor = self.cursor.saturating_sub(rows.max(1));
        self.ensure_visible();
    }

    fn jump_down(&mut self, rows: usize) {
        if self.count == 0 {
            return;
        }
        self.cursor = (self.cursor + rows.max(1)).min(self.count - 1);
        self.ensure_visible();
    }

    fn ensure_visible(&mut self) {
        if self.count == 0 || self.height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.height {
            self.offset = self.cursor + 1 - self.height;
        }
    }
}
