use std::io::{self, Write};
use std::sync::Once;

use crossterm::{cursor, execute, terminal};
use tokio::io::AsyncRead;

/// Where the program writes its frames.
///
/// The default is stdout. `Stderr` keeps stdout clean for pipeline output
/// (a program can render its UI on stderr and print results to stdout).
/// `Writer` substitutes any sink, which is how the runtime is tested
/// without a terminal.
pub enum Output {
    Stdout,
    Stderr,
    Writer(Box<dyn Write + Send>),
}

impl Default for Output {
    fn default() -> Self {
        Output::Stdout
    }
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Stdout => f.write_str("Output::Stdout"),
            Output::Stderr => f.write_str("Output::Stderr"),
            Output::Writer(_) => f.write_str("Output::Writer(..)"),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout => io::stdout().write(buf),
            Output::Stderr => io::stderr().write(buf),
            Output::Writer(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout => io::stdout().flush(),
            Output::Stderr => io::stderr().flush(),
            Output::Writer(w) => w.flush(),
        }
    }
}

/// Where the program reads raw input bytes.
///
/// The default reads the process's stdin. `Reader` substitutes any async
/// byte source; tests drive the full decode path with scripted bytes.
pub enum Input {
    Stdin,
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

impl Default for Input {
    fn default() -> Self {
        Input::Stdin
    }
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Stdin => f.write_str("Input::Stdin"),
            Input::Reader(_) => f.write_str("Input::Reader(..)"),
        }
    }
}

pub(crate) fn enable_raw_mode() -> io::Result<()> {
    terminal::enable_raw_mode()
}

pub(crate) fn disable_raw_mode() -> io::Result<()> {
    terminal::disable_raw_mode()
}

/// Current terminal size, with a conventional fallback for environments
/// where the query fails (no tty, tests, CI).
pub(crate) fn size_or_default() -> (u16, u16) {
    terminal::size().unwrap_or((80, 24))
}

static HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that unconditionally restores the terminal before
/// the default hook prints the panic. Installed at most once per process;
/// the restore is harmless when the terminal was never touched.
pub(crate) fn install_panic_hook() {
    HOOK_INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal_minimal();
            previous(info);
        }));
    });
}

/// Best-effort restore used on the panic path, where no renderer state is
/// reachable: disable every input protocol, return to the primary buffer,
/// show the cursor, leave raw mode. All writes are unconditional.
pub(crate) fn restore_terminal_minimal() {
    let mut out = io::stdout();
    let _ = execute!(
        out,
        crossterm::style::Print("\x1b[?1003l\x1b[?1002l\x1b[?1006l"),
        crossterm::event::DisableBracketedPaste,
        crossterm::event::DisableFocusChange,
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
    let _ = disable_raw_mode();
}
