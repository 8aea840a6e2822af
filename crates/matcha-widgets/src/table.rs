//! Data table with aligned columns, a row cursor, and a scrolling viewport.

use matcha_core::{Key, KeyEvent};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::scroll::Scroll;

const REVERSE_ON: &str = "\x1b[7m";
const REVERSE_OFF: &str = "\x1b[27m";

/// Initial table settings, consumed by [`Table::new`].
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Number of visible data rows.
    pub height: usize,
    /// Prefix for the cursor row. Other rows are padded to the same width.
    pub marker: String,
    /// Spaces between columns.
    pub column_gap: usize,
    /// Fixed column widths in display cells. Empty means size every column
    /// to its widest content; cells wider than a fixed width are truncated
    /// with an ellipsis.
    pub widths: Vec<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            height: 10,
            marker: "▸ ".to_string(),
            column_gap: 2,
            widths: Vec::new(),
        }
    }
}

/// A data table over string cells.
///
/// Rows move with arrows or `j`/`k` and wrap at the ends; `g`/`G` and
/// home/end jump, page keys scroll the viewport. Left/right (or `h`/`l`)
/// walk an optional column cursor and tab cycles it, which is how
/// cell-oriented applications track a position; the active cell renders
/// reverse-video. Confirmation is the application's concern: match enter
/// and read [`selected_row`](Table::selected_row).
///
/// # Example
///
/// ```rust,ignore
/// let table = Table::new(
///     vec!["Name".into(), "Age".into()],
///     vec![
///         vec!["Alice".into(), "30".into()],
///         vec!["Bob".into(), "25".into()],
///     ],
///     TableConfig::default(),
/// );
/// ```
pub struct Table {
    config: TableConfig,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    scroll: Scroll,
    selected_col: Option<usize>,
    focus: bool,
    marker_pad: String,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, config: TableConfig) -> Self {
        let scroll = Scroll::new(rows.len(), config.height, true);
        let marker_pad = " ".repeat(config.marker.width());
        Table {
            config,
            headers,
            rows,
            scroll,
            selected_col: None,
            focus: false,
            marker_pad,
        }
    }

    /// Build a table from simple comma-separated data. The first non-empty
    /// line holds the headers; fields are split on commas and trimmed.
    /// Quoting and escaped commas are not handled.
    pub fn from_csv(data: &str, config: TableConfig) -> Self {
        let mut lines = data.lines().filter(|l| !l.trim().is_empty());
        let headers: Vec<String> = match lines.next() {
            Some(line) => line.split(',').map(|s| s.trim().to_string()).collect(),
            None => Vec::new(),
        };
        let rows: Vec<Vec<String>> = lines
            .map(|line| line.split(',').map(|s| s.trim().to_string()).collect())
            .collect();
        Table::new(headers, rows, config)
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

    /// Index of the cursor row, when there are rows at all.
    pub fn selected(&self) -> Option<usize> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.scroll.cursor())
        }
    }

    pub fn selected_row(&self) -> Option<&[String]> {
        self.selected().map(|i| self.rows[i].as_slice())
    }

    /// Column cursor, when column navigation has been used or set.
    pub fn selected_column(&self) -> Option<usize> {
        self.selected_col
    }

    /// Set or clear the column cursor.
    pub fn set_selected_column(&mut self, col: Option<usize>) {
        self.selected_col = col.map(|c| c.min(self.headers.len().saturating_sub(1)));
    }

    /// Jump the row cursor to `index`, clamped to the last row.
    pub fn set_cursor(&mut self, index: usize) {
        self.scroll.select(index);
    }

    /// Replace the data rows, clamping the cursor to the new bounds.
    pub fn set_rows(&mut self, rows: Vec<Vec<String>>) {
        self.rows = rows;
        self.scroll.set_count(self.rows.len());
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn update(mut self, key: &KeyEvent) -> Self {
        if !self.focus {
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
            Key::Left => self.column_left(),
            Key::Right => self.column_right(),
            Key::Tab => self.column_next(),
            Key::Runes(s) if s == "k" => self.scroll.up(),
            Key::Runes(s) if s == "j" => self.scroll.down(),
            Key::Runes(s) if s == "g" => self.scroll.home(),
            Key::Runes(s) if s == "G" => self.scroll.end(),
            Key::Runes(s) if s == "h" => self.column_left(),
            Key::Runes(s) if s == "l" => self.column_right(),
            _ => {}
        }
        self
    }

    /// Render the table: header, rule, then exactly `height` data rows.
    pub fn view(&self) -> String {
        let widths = self.column_widths();
        let gap = " ".repeat(self.config.column_gap);

        let mut lines = Vec::with_capacity(self.config.height + 2);
        let header_cells: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| fit(h, w))
            .collect();
        lines.push(trimmed(format!(
            "{}{}",
            self.marker_pad,
            header_cells.join(&gap)
        )));

        let total: usize = widths.iter().sum::<usize>()
            + self.config.column_gap * widths.len().saturating_sub(1);
        lines.push(trimmed(format!("{}{}", self.marker_pad, "─".repeat(total))));

        for row in 0..self.config.height {
            let idx = self.scroll.offset() + row;
            match self.rows.get(idx) {
                Some(cells) => {
                    let on_cursor = idx == self.scroll.cursor();
                    let prefix = if on_cursor {
                        &self.config.marker
                    } else {
                        &self.marker_pad
                    };
                    let rendered: Vec<String> = widths
                        .iter()
                        .enumerate()
                        .map(|(col, &w)| {
                            let text = cells.get(col).map(String::as_str).unwrap_or("");
                            let cell = fit(text, w);
                            if on_cursor && self.selected_col == Some(col) {
                                format!("{REVERSE_ON}{cell}{REVERSE_OFF}")
                            } else {
                                cell
                            }
                        })
                        .collect();
                    lines.push(trimmed(format!("{prefix}{}", rendered.join(&gap))));
                }
                None => lines.push(String::new()),
            }
        }
        lines.join("\n")
    }

    fn column_left(&mut self) {
        if self.headers.is_empty() {
            return;
        }
        self.selected_col = Some(match self.selected_col {
            Some(c) => c.saturating_sub(1),
            None => 0,
        });
    }

    fn column_right(&mut self) {
        if self.headers.is_empty() {
            return;
        }
        let last = self.headers.len() - 1;
        self.selected_col = Some(match self.selected_col {
            Some(c) => (c + 1).min(last),
            None => 0,
        });
    }

    fn column_next(&mut self) {
        if self.headers.is_empty() {
            return;
        }
        self.selected_col = Some(match self.selected_col {
            Some(c) => (c + 1) % self.headers.len(),
            None => 0,
        });
    }

    /// Fixed widths where configured, content-sized otherwise.
    fn column_widths(&self) -> Vec<usize> {
        (0..self.headers.len())
            .map(|col| match self.config.widths.get(col) {
                Some(&w) => w,
                None => {
                    let header = self.headers[col].width();
                    self.rows
                        .iter()
                        .map(|row| row.get(col).map(|c| c.width()).unwrap_or(0))
                        .fold(header, usize::max)
                }
            })
            .collect()
    }
}

/// Pad `text` to `width` display cells, truncating with an ellipsis when it
/// does not fit.
fn fit(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let text_width = text.width();
    if text_width <= width {
        return format!("{text}{}", " ".repeat(width - text_width));
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    format!("{out}{}", " ".repeat(width.saturating_sub(used + 1)))
}

fn trimmed(line: String) -> String {
    line.trim_end().to_string()
}
