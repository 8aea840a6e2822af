//! Ready-made widgets for the **matcha** TUI runtime.
//!
//! Every widget here is a plain value: construct it from its config struct,
//! keep it in your [`Model`](matcha_core::Model), hand relevant key events to
//! its `update`, and splice its `view()` string into your own. The runtime
//! has no widget knowledge; composition is ordinary struct embedding.
//!
//! All widgets are synchronous state machines except [`spinner`], whose
//! animation runs on a tick command that your update loop re-submits.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`confirm`] | Yes/no confirmation prompt |
//! | [`filepicker`] | File and directory browser |
//! | [`list`] | Scrollable, filterable selection list |
//! | [`paginator`] | Page position indicator |
//! | [`progress`] | Determinate progress bar |
//! | [`spinner`] | Animated indeterminate spinner |
//! | [`table`] | Row/column table with selection |
//! | [`tabs`] | Horizontal tab bar |
//! | [`textinput`] | Single-line text input field |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`keybinding`] | Key bindings with help-text rendering |

pub mod confirm;
pub mod filepicker;
pub mod keybinding;
pub mod list;
pub mod paginator;
pub mod progress;
mod scroll;
pub mod spinner;
pub mod table;
pub mod tabs;
pub mod textinput;
