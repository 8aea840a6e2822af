//! File system browser with directory navigation, hidden-file toggling,
//! and extension filtering.

use std::path::{Path, PathBuf};

use matcha_core::{Key, KeyEvent};
use unicode_width::UnicodeWidthStr;

use crate::scroll::Scroll;

/// A single entry in the picker listing.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    /// File or directory name without the parent path.
    pub name: String,
    pub is_dir: bool,
    /// Size in bytes, zero for directories.
    pub size: u64,
}

/// Initial picker settings, consumed by [`FilePicker::new`].
#[derive(Debug, Clone)]
pub struct FilePickerConfig {
    /// Number of visible rows.
    pub height: usize,
    /// Prefix for the cursor row.
    pub marker: String,
    /// Show dotfiles. Toggled at runtime with `.`.
    pub show_hidden: bool,
    /// File extensions to keep, e.g. `["rs", "toml"]`. Empty keeps all.
    /// Directories always show.
    pub extensions: Vec<String>,
    /// Append file sizes after the name.
    pub show_size: bool,
}

impl Default for FilePickerConfig {
    fn default() -> Self {
        FilePickerConfig {
            height: 10,
            marker: "▸ ".to_string(),
            show_hidden: false,
            extensions: Vec::new(),
            show_size: false,
        }
    }
}

/// A directory browser.
///
/// Up/down move over the listing, enter (or right, `l`) descends into the
/// directory under the cursor, backspace (or left, `h`) goes to the parent.
/// `.` toggles dotfiles and `r` re-reads the directory. Directory reading
/// happens inline; `std::fs::read_dir` on a local directory is fast enough
/// that no command round-trip is worth it.
///
/// Picking a file is the application's concern. Match enter before
/// forwarding and check the entry under the cursor:
///
/// ```rust,ignore
/// Message::Key(key) => {
///     if key.key == Key::Enter {
///         if let Some(entry) = self.picker.selected_entry() {
///             if !entry.is_dir {
///                 self.choice = Some(entry.path.clone());
///             }
///         }
///     }
///     self.picker = self.picker.update(&key);
/// }
/// ```
pub struct FilePicker {
    config: FilePickerConfig,
    dir: PathBuf,
    entries: Vec<FileEntry>,
    scroll: Scroll,
    focus: bool,
    marker_pad: String,
}

impl FilePicker {
    /// Create a picker rooted at `dir` and read it immediately.
    pub fn new(dir: PathBuf, config: FilePickerConfig) -> Self {
        let entries = read_directory(&dir, config.show_hidden, &config.extensions);
        let scroll = Scroll::new(entries.len(), config.height, false);
        let marker_pad = " ".repeat(config.marker.width());
        FilePicker {
            config,
            dir,
            entries,
            scroll,
            focus: false,
            marker_pad,
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

    /// Directory currently listed.
    pub fn current_dir(&self) -> &Path {
        &self.dir
    }

    /// Entry under the cursor, if the listing is non-empty.
    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.scroll.cursor())
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn show_hidden(&self) -> bool {
        self.config.show_hidden
    }

    /// Navigate to `dir` and re-read, sending the cursor to the top.
    pub fn set_dir(&mut self, dir: PathBuf) {
        self.dir = dir;
        self.reload();
        self.scroll.home();
    }

    /// Re-read the current directory, keeping the cursor clamped in place.
    pub fn refresh(&mut self) {
        self.reload();
    }

    pub fn toggle_hidden(&mut self) {
        self.config.show_hidden = !self.config.show_hidden;
        self.reload();
        self.scroll.home();
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
            Key::Enter | Key::Right => self.enter_selected(),
            Key::Backspace | Key::Left => self.go_up(),
            Key::Runes(s) if s == "k" => self.scroll.up(),
            Key::Runes(s) if s == "j" => self.scroll.down(),
            Key::Runes(s) if s == "g" => self.scroll.home(),
            Key::Runes(s) if s == "G" => self.scroll.end(),
            Key::Runes(s) if s == "l" => self.enter_selected(),
            Key::Runes(s) if s == "h" => self.go_up(),
            Key::Runes(s) if s == "." => self.toggle_hidden(),
            Key::Runes(s) if s == "r" => self.refresh(),
            _ => {}
        }
        self
    }

    pub fn view(&self) -> String {
        let mut lines = Vec::with_capacity(self.config.height);
        for row in 0..self.config.height {
            let idx = self.scroll.offset() + row;
            match self.entries.get(idx) {
                Some(entry) => {
                    let prefix = if idx == self.scroll.cursor() {
                        &self.config.marker
                    } else {
                        &self.marker_pad
                    };
                    let icon = if entry.is_dir { "📁 " } else { "📄 " };
                    let mut line = format!("{prefix}{icon}{}", entry.name);
                    if entry.is_dir {
                        line.push('/');
                    } else if self.config.show_size {
                        line.push_str("  ");
                        line.push_str(&format_size(entry.size));
                    }
                    lines.push(line);
                }
                None if idx == 0 && row == 0 => {
                    lines.push(format!("{}(empty)", self.marker_pad));
                }
                None => lines.push(String::new()),
            }
        }
        lines.join("\n")
    }

    fn enter_selected(&mut self) {
        let Some(entry) = self.entries.get(self.scroll.cursor()) else {
            return;
        };
        if entry.is_dir {
            self.dir = entry.path.clone();
            self.reload();
            self.scroll.home();
        }
    }

    fn go_up(&mut self) {
        let Some(parent) = self.dir.parent().map(Path::to_path_buf) else {
            return;
        };
        self.dir = parent;
        self.reload();
        self.scroll.home();
    }

    fn reload(&mut self) {
        self.entries = read_directory(&self.dir, self.config.show_hidden, &self.config.extensions);
        self.scroll.set_count(self.entries.len());
    }
}

/// Read a directory into sorted entries: directories first, then files,
/// each group alphabetical and case-insensitive. Unreadable directories
/// list as empty.
fn read_directory(dir: &Path, show_hidden: bool, extensions: &[String]) -> Vec<FileEntry> {
    let Ok(read) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut entries: Vec<FileEntry> = read
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if !show_hidden && name.starts_with('.') {
                return None;
            }
            let metadata = entry.metadata().ok()?;
            let is_dir = metadata.is_dir();
            if !is_dir && !extensions.is_empty() {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                if !extensions.iter().any(|a| a == ext) {
                    return None;
                }
            }
            Some(FileEntry {
                path,
                name,
                is_dir,
                size: if is_dir { 0 } else { metadata.len() },
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    entries
}

fn format_size(size: u64) -> String {
    if size < 1024 {
        format!("{size}B")
    } else if size < 1024 * 1024 {
        format!("{:.1}K", size as f64 / 1024.0)
    } else if size < 1024 * 1024 * 1024 {
        format!("{:.1}M", size as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1}G", size as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Lay out a small tree:
    ///   root/
    ///     sub/
    ///       nested.txt
    ///     .hidden
    ///     alpha.rs
    ///     beta.txt
    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/nested.txt"), "nested").unwrap();
        fs::write(dir.path().join(".hidden"), "shh").unwrap();
        fs::write(dir.path().join("alpha.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join("beta.txt"), "beta").unwrap();
        dir
    }

    fn picker(dir: &Path, config: FilePickerConfig) -> FilePicker {
        let mut p = FilePicker::new(dir.to_path_buf(), config);
        p.focus();
        p
    }

    fn names(p: &FilePicker) -> Vec<&str> {
        p.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn lists_directories_first_then_files() {
        let dir = tree();
        let p = picker(dir.path(), FilePickerConfig::default());
        assert_eq!(names(&p), vec!["sub", "alpha.rs", "beta.txt"]);
    }

    #[test]
    fn hidden_files_are_toggled_with_dot() {
        let dir = tree();
        let mut p = picker(dir.path(), FilePickerConfig::default());
        assert!(!names(&p).contains(&".hidden"));
        p = p.update(&KeyEvent::rune('.'));
        assert!(names(&p).contains(&".hidden"));
        p = p.update(&KeyEvent::rune('.'));
        assert!(!names(&p).contains(&".hidden"));
    }

    #[test]
    fn extension_filter_keeps_directories() {
        let dir = tree();
        let p = picker(
            dir.path(),
            FilePickerConfig {
                extensions: vec!["rs".to_string()],
                ..Default::default()
            },
        );
        assert_eq!(names(&p), vec!["sub", "alpha.rs"]);
    }

    #[test]
    fn enter_descends_and_backspace_returns() {
        let dir = tree();
        let mut p = picker(dir.path(), FilePickerConfig::default());
        assert_eq!(p.selected_entry().unwrap().name, "sub");
        p = p.update(&KeyEvent::new(Key::Enter));
        assert!(p.current_dir().ends_with("sub"));
        assert_eq!(names(&p), vec!["nested.txt"]);
        p = p.update(&KeyEvent::new(Key::Backspace));
        assert_eq!(p.current_dir(), dir.path());
        assert_eq!(p.selected_entry().unwrap().name, "sub");
    }

    #[test]
    fn enter_on_a_file_stays_put() {
        let dir = tree();
        let mut p = picker(dir.path(), FilePickerConfig::default());
        p = p.update(&KeyEvent::new(Key::Down));
        assert_eq!(p.selected_entry().unwrap().name, "alpha.rs");
        p = p.update(&KeyEvent::new(Key::Enter));
        assert_eq!(p.current_dir(), dir.path());
        assert_eq!(p.selected_entry().unwrap().name, "alpha.rs");
    }

    #[test]
    fn cursor_clamps_at_the_listing_ends() {
        let dir = tree();
        let mut p = picker(dir.path(), FilePickerConfig::default());
        p = p.update(&KeyEvent::new(Key::Up));
        assert_eq!(p.selected_entry().unwrap().name, "sub");
        p = p.update(&KeyEvent::new(Key::End));
        p = p.update(&KeyEvent::new(Key::Down));
        assert_eq!(p.selected_entry().unwrap().name, "beta.txt");
    }

    #[test]
    fn refresh_picks_up_new_files() {
        let dir = tree();
        let mut p = picker(dir.path(), FilePickerConfig::default());
        fs::write(dir.path().join("gamma.txt"), "new").unwrap();
        assert!(!names(&p).contains(&"gamma.txt"));
        p = p.update(&KeyEvent::rune('r'));
        assert!(names(&p).contains(&"gamma.txt"));
    }

    #[test]
    fn unreadable_directory_lists_empty() {
        let dir = tree();
        let mut p = picker(dir.path(), FilePickerConfig::default());
        p.set_dir(dir.path().join("no-such-dir"));
        assert!(p.entries().is_empty());
        assert!(p.selected_entry().is_none());
        assert!(p.view().contains("(empty)"));
    }

    #[test]
    fn view_marks_directories_and_sizes() {
        let dir = tree();
        let p = picker(
            dir.path(),
            FilePickerConfig {
                show_size: true,
                ..Default::default()
            },
        );
        let view = p.view();
        assert!(view.contains("▸ 📁 sub/"));
        assert!(view.contains("alpha.rs  12B"));
    }
}
