use std::io::{self, Write};

use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue, terminal};
use unicode_width::UnicodeWidthChar;

use crate::command::MouseMode;

// crossterm only exposes an all-protocols mouse capture toggle, so the two
// reporting granularities are emitted by hand. Both ride on SGR encoding
// (?1006) for large coordinates.
const MOUSE_CELL_ON: &str = "\x1b[?1002h\x1b[?1006h";
const MOUSE_CELL_OFF: &str = "\x1b[?1006l\x1b[?1002l";
const MOUSE_ALL_ON: &str = "\x1b[?1003h\x1b[?1006h";
const MOUSE_ALL_OFF: &str = "\x1b[?1006l\x1b[?1003l";

/// The terminal-mode flags the renderer has switched on, captured so the
/// runtime can hand the terminal away (suspend, exec) and rebuild the exact
/// same state afterwards.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ModeSnapshot {
    pub alt_screen: bool,
    pub cursor_hidden: bool,
    pub mouse_mode: Option<MouseMode>,
    pub bracketed_paste: bool,
    pub focus_reporting: bool,
}

/// Diff-based frame renderer. Owns the output stream exclusively; every
/// byte the program writes to the terminal funnels through here.
///
/// [`render`](Renderer::render) only queues content; [`flush`](Renderer::flush)
/// (driven by the program's frame timer) splits the latest queued view into
/// lines, diffs against the previous frame, and writes the minimal update in
/// one buffered write. Rapid renders between two flushes collapse to the
/// newest content.
///
/// Mode toggles (alt screen, mouse, paste, focus, cursor visibility) are
/// idempotent: each is gated by a tracked flag so repeated calls never
/// double-emit, and [`restore`](Renderer::restore) can put the terminal back
/// exactly as it found it.
pub(crate) struct Renderer<W: Write> {
    out: W,
    /// Latest view text queued since the last flush, if any.
    queued: Option<String>,
    /// Pending println/printf text to emit above the frame.
    queued_above: String,
    /// Lines currently on screen.
    frame: Vec<String>,
    width: u16,
    height: u16,
    /// Frame row the cursor is parked on (inline mode bookkeeping).
    cursor_row: usize,
    alt_screen: bool,
    cursor_hidden: bool,
    mouse_mode: Option<MouseMode>,
    bracketed_paste: bool,
    focus_reporting: bool,
    /// Ignore the stored frame on the next flush.
    repaint_all: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        Renderer {
            out,
            queued: None,
            queued_above: String::new(),
            frame: Vec::new(),
            width,
            height,
            cursor_row: 0,
            alt_screen: false,
            cursor_hidden: false,
            mouse_mode: None,
            bracketed_paste: false,
            focus_reporting: false,
            repaint_all: false,
        }
    }

    /// Queue `view` as the next frame. Cheap; no terminal I/O happens here.
    pub fn render(&mut self, view: String) {
        self.queued = Some(view);
    }

    /// Invalidate the stored frame so the next flush repaints everything.
    pub fn force_repaint(&mut self) {
        self.repaint_all = true;
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.repaint_all = true;
    }

    /// Write the queued frame (and any queued print lines) to the terminal.
    ///
    /// All escape sequences and text for the cycle are assembled into one
    /// buffer and written with a single `write_all` + `flush`.
    pub fn flush(&mut self) -> io::Result<()> {
        let queued = self.queued.take();
        let has_prints = !self.alt_screen && !self.queued_above.is_empty();
        if queued.is_none() && !has_prints && !self.repaint_all {
            return Ok(());
        }

        let new_frame = match queued {
            Some(view) => self.split_view(&view),
            None => self.frame.clone(),
        };

        let mut buf: Vec<u8> = Vec::new();
        if has_prints {
            self.write_prints_and_frame(&mut buf, &new_frame)?;
        } else if self.alt_screen {
            self.write_diff_absolute(&mut buf, &new_frame)?;
        } else {
            self.write_diff_inline(&mut buf, &new_frame)?;
        }

        self.frame = new_frame;
        self.cursor_row = self.frame.len().saturating_sub(1);
        self.repaint_all = false;

        self.out.write_all(&buf)?;
        self.out.flush()
    }

    /// Split a view into display lines, clamped to the terminal size.
    fn split_view(&self, view: &str) -> Vec<String> {
        let trimmed = view.strip_suffix('\n').unwrap_or(view);
        let mut lines: Vec<String> = trimmed
            .split('\n')
            .map(|line| truncate_to_width(line, self.width).to_string())
            .collect();
        if self.height > 0 && lines.len() > self.height as usize {
            lines.truncate(self.height as usize);
        }
        lines
    }

    /// Inline mode: relative cursor motion from the parked position, using
    /// `\r\n` to advance (which creates rows at the bottom of the screen).
    fn write_diff_inline(&mut self, buf: &mut Vec<u8>, new: &[String]) -> io::Result<()> {
        let old = &self.frame;
        queue!(buf, cursor::MoveToColumn(0))?;
        if self.cursor_row > 0 {
            queue!(buf, cursor::MoveUp(self.cursor_row as u16))?;
        }
        for (i, line) in new.iter().enumerate() {
            if i > 0 {
                queue!(buf, Print("\r\n"))?;
            }
            let unchanged = !self.repaint_all && old.get(i) == Some(line);
            if unchanged {
                continue;
            }
            queue!(buf, Print(line), Clear(ClearType::UntilNewLine))?;
        }
        // Clear rows the old frame used but the new one does not.
        if old.len() > new.len() {
            for _ in new.len()..old.len() {
                queue!(buf, Print("\r\n"), Clear(ClearType::CurrentLine))?;
            }
            let back_up = (old.len() - new.len()) as u16;
            queue!(buf, cursor::MoveUp(back_up), cursor::MoveToColumn(0))?;
        }
        Ok(())
    }

    /// Alt-screen mode: absolute addressing per changed row.
    fn write_diff_absolute(&mut self, buf: &mut Vec<u8>, new: &[String]) -> io::Result<()> {
        let old = &self.frame;
        for (i, line) in new.iter().enumerate() {
            let unchanged = !self.repaint_all && old.get(i) == Some(line);
            if unchanged {
                continue;
            }
            queue!(
                buf,
                cursor::MoveTo(0, i as u16),
                Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }
        for i in new.len()..old.len() {
            queue!(buf, cursor::MoveTo(0, i as u16), Clear(ClearType::CurrentLine))?;
        }
        Ok(())
    }

    /// Emit queued print lines at the frame origin, then repaint the frame
    /// below them so it stays the bottommost content.
    fn write_prints_and_frame(&mut self, buf: &mut Vec<u8>, new: &[String]) -> io::Result<()> {
        let mut prints = std::mem::take(&mut self.queued_above);
        if !prints.ends_with('\n') {
            prints.push('\n');
        }
        queue!(buf, cursor::MoveToColumn(0))?;
        if self.cursor_row > 0 {
            queue!(buf, cursor::MoveUp(self.cursor_row as u16))?;
        }
        queue!(buf, Clear(ClearType::FromCursorDown))?;
        for line in prints.lines() {
            queue!(buf, Print(truncate_to_width(line, self.width)), Print("\r\n"))?;
        }
        for (i, line) in new.iter().enumerate() {
            if i > 0 {
                queue!(buf, Print("\r\n"))?;
            }
            queue!(buf, Print(line))?;
        }
        Ok(())
    }

    /// Queue text to print above the frame. Held while the alternate screen
    /// is active and emitted after returning to the primary buffer.
    pub fn queue_above(&mut self, text: &str, newline: bool) {
        self.queued_above.push_str(text);
        if newline && !self.queued_above.ends_with('\n') {
            self.queued_above.push('\n');
        }
    }

    /// Clear the screen; the next flush repaints from scratch.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        if self.alt_screen {
            self.execute(|buf| queue!(buf, Clear(ClearType::All), cursor::MoveTo(0, 0)))?;
        } else {
            // Inline: wipe the frame region only.
            let up = self.cursor_row as u16;
            self.execute(|buf| {
                queue!(buf, cursor::MoveToColumn(0))?;
                if up > 0 {
                    queue!(buf, cursor::MoveUp(up))?;
                }
                queue!(buf, Clear(ClearType::FromCursorDown))
            })?;
            self.cursor_row = 0;
        }
        self.frame.clear();
        self.repaint_all = true;
        Ok(())
    }

    pub fn enter_alt_screen(&mut self) -> io::Result<()> {
        if self.alt_screen {
            return Ok(());
        }
        self.alt_screen = true;
        let hidden = self.cursor_hidden;
        self.execute(|buf| {
            queue!(
                buf,
                terminal::EnterAlternateScreen,
                Clear(ClearType::All),
                cursor::MoveTo(0, 0)
            )?;
            if hidden {
                queue!(buf, cursor::Hide)?;
            }
            Ok(())
        })?;
        self.frame.clear();
        self.cursor_row = 0;
        self.repaint_all = true;
        Ok(())
    }

    pub fn exit_alt_screen(&mut self) -> io::Result<()> {
        if !self.alt_screen {
            return Ok(());
        }
        self.alt_screen = false;
        self.execute(|buf| queue!(buf, terminal::LeaveAlternateScreen))?;
        self.frame.clear();
        self.cursor_row = 0;
        self.repaint_all = true;
        Ok(())
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        if self.cursor_hidden {
            return Ok(());
        }
        self.cursor_hidden = true;
        self.execute(|buf| queue!(buf, cursor::Hide))
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        if !self.cursor_hidden {
            return Ok(());
        }
        self.cursor_hidden = false;
        self.execute(|buf| queue!(buf, cursor::Show))
    }

    pub fn enable_mouse(&mut self, mode: MouseMode) -> io::Result<()> {
        if self.mouse_mode == Some(mode) {
            return Ok(());
        }
        self.disable_mouse()?;
        self.mouse_mode = Some(mode);
        let seq = match mode {
            MouseMode::CellMotion => MOUSE_CELL_ON,
            MouseMode::AllMotion => MOUSE_ALL_ON,
        };
        self.execute(|buf| queue!(buf, Print(seq)))
    }

    pub fn disable_mouse(&mut self) -> io::Result<()> {
        let Some(mode) = self.mouse_mode.take() else {
            return Ok(());
        };
        let seq = match mode {
            MouseMode::CellMotion => MOUSE_CELL_OFF,
            MouseMode::AllMotion => MOUSE_ALL_OFF,
        };
        self.execute(|buf| queue!(buf, Print(seq)))
    }

    pub fn enable_bracketed_paste(&mut self) -> io::Result<()> {
        if self.bracketed_paste {
            return Ok(());
        }
        self.bracketed_paste = true;
        self.execute(|buf| queue!(buf, crossterm::event::EnableBracketedPaste))
    }

    pub fn disable_bracketed_paste(&mut self) -> io::Result<()> {
        if !self.bracketed_paste {
            return Ok(());
        }
        self.bracketed_paste = false;
        self.execute(|buf| queue!(buf, crossterm::event::DisableBracketedPaste))
    }

    pub fn enable_focus_reporting(&mut self) -> io::Result<()> {
        if self.focus_reporting {
            return Ok(());
        }
        self.focus_reporting = true;
        self.execute(|buf| queue!(buf, crossterm::event::EnableFocusChange))
    }

    pub fn disable_focus_reporting(&mut self) -> io::Result<()> {
        if !self.focus_reporting {
            return Ok(());
        }
        self.focus_reporting = false;
        self.execute(|buf| queue!(buf, crossterm::event::DisableFocusChange))
    }

    pub fn set_window_title(&mut self, title: &str) -> io::Result<()> {
        let title = title.to_string();
        self.execute(move |buf| queue!(buf, terminal::SetTitle(&title)))
    }

    /// Capture the current mode flags for a terminal handoff.
    pub fn snapshot(&self) -> ModeSnapshot {
        ModeSnapshot {
            alt_screen: self.alt_screen,
            cursor_hidden: self.cursor_hidden,
            mouse_mode: self.mouse_mode,
            bracketed_paste: self.bracketed_paste,
            focus_reporting: self.focus_reporting,
        }
    }

    /// Re-enable everything a snapshot recorded, then schedule a repaint.
    pub fn apply(&mut self, snapshot: ModeSnapshot) -> io::Result<()> {
        if snapshot.alt_screen {
            self.enter_alt_screen()?;
        }
        if snapshot.cursor_hidden {
            self.hide_cursor()?;
        }
        if let Some(mode) = snapshot.mouse_mode {
            self.enable_mouse(mode)?;
        }
        if snapshot.bracketed_paste {
            self.enable_bracketed_paste()?;
        }
        if snapshot.focus_reporting {
            self.enable_focus_reporting()?;
        }
        self.repaint_all = true;
        Ok(())
    }

    /// Disable every mode this renderer enabled, in reverse order of
    /// interest: input protocols first, then cursor, then the screen buffer.
    /// Idempotent; each toggle only emits if its flag is set.
    pub fn restore(&mut self) -> io::Result<()> {
        self.disable_mouse()?;
        self.disable_bracketed_paste()?;
        self.disable_focus_reporting()?;
        self.show_cursor()?;
        if self.alt_screen {
            self.exit_alt_screen()?;
        } else if !self.frame.is_empty() {
            // Park the shell prompt on a fresh line below the frame.
            self.execute(|buf| queue!(buf, Print("\r\n")))?;
        }
        Ok(())
    }

    /// Immediate small write outside the frame cycle (mode toggles, title).
    fn execute<F>(&mut self, build: F) -> io::Result<()>
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf: Vec<u8> = Vec::new();
        build(&mut buf)?;
        self.out.write_all(&buf)?;
        self.out.flush()
    }
}

/// Truncate to `width` display cells (plain text; a zero width disables
/// clamping for writers with no known size).
fn truncate_to_width(line: &str, width: u16) -> &str {
    if width == 0 {
        return line;
    }
    let width = width as usize;
    let mut used = 0;
    let mut end = 0;
    for (i, ch) in line.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        end = i + ch.len_utf8();
    }
    &line[..end]
}
