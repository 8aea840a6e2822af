use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;

use crate::message::Message;

/// A side effect returned from [`Model::update`](crate::Model::update) or
/// [`Model::init`](crate::Model::init).
///
/// A command is a deferred unit of work producing at most one [`Message`]
/// when executed; constructing one performs no work. The runtime's executor
/// runs it after `update` returns. Commands are plain values until then:
/// combine them with [`batch`](Command::batch) (concurrent, results in
/// completion order) or [`sequence`](Command::sequence) (one at a time, in
/// order), and rewrap a child component's messages with
/// [`map`](Command::map).
///
/// # Examples
///
/// ```rust,ignore
/// // Do nothing:
/// let cmd = Command::none();
///
/// // Run async work and deliver the result as a message:
/// let cmd = Command::perform(async {
///     let data = fetch_data().await.ok()?;
///     Some(Msg::DataLoaded(data))
/// });
///
/// // Quit the program:
/// let cmd = Command::quit();
/// ```
pub struct Command<C: Send + 'static> {
    pub(crate) inner: CommandInner<C>,
}

pub(crate) type ExitMapper<C> = Box<dyn FnOnce(io::Result<ExitStatus>) -> Message<C> + Send>;

pub(crate) enum CommandInner<C: Send + 'static> {
    None,
    /// An already-built message, delivered without spawning.
    Message(Message<C>),
    /// Async work resolving to an optional message.
    Future(BoxFuture<'static, Option<Message<C>>>),
    Batch(Vec<Command<C>>),
    Sequence(Vec<Command<C>>),
    /// A terminal-control operation, applied by the runtime in stream order.
    Terminal(TerminalCommand),
    /// Execute an external process, releasing terminal control first.
    Exec {
        cmd: ExecCommand,
        on_exit: ExitMapper<C>,
    },
}

/// Terminal management operations carried by commands.
///
/// These travel through the same ordered inbound stream as messages, so a
/// [`Command::sequence`] interleaves mode changes with async work
/// deterministically. Sent via [`Command::terminal`] or the convenience
/// constructors such as [`Command::enter_alt_screen`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Switch to the alternate screen buffer.
    EnterAltScreen,
    /// Return to the primary screen buffer.
    ExitAltScreen,
    /// Enable mouse reporting with the specified granularity.
    EnableMouse(MouseMode),
    /// Disable mouse reporting.
    DisableMouse,
    /// Make the terminal cursor visible.
    ShowCursor,
    /// Hide the terminal cursor.
    HideCursor,
    /// Enable bracketed paste mode.
    EnableBracketedPaste,
    /// Disable bracketed paste mode.
    DisableBracketedPaste,
    /// Enable focus-in/focus-out reporting.
    EnableFocusReporting,
    /// Disable focus-in/focus-out reporting.
    DisableFocusReporting,
    /// Set the terminal window title.
    SetWindowTitle(String),
    /// Clear the screen and repaint from scratch on the next frame.
    ClearScreen,
    /// Print a line above the frame (inline mode) or into scrollback.
    Println(String),
    /// Print text above the frame without an implied trailing newline;
    /// consecutive prints join on one line.
    Printf(String),
}

/// Mouse reporting granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseMode {
    /// Click, release, wheel, drag.
    CellMotion,
    /// All of above + hover.
    AllMotion,
}

/// Description of an external process for [`Command::exec`].
///
/// Build one with [`ExecCommand::new`], then chain
/// [`arg`](ExecCommand::arg), [`args`](ExecCommand::args), and
/// [`working_dir`](ExecCommand::working_dir) as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCommand {
    /// The program to execute.
    pub program: String,
    /// Arguments to the program.
    pub args: Vec<String>,
    /// Working directory (None = inherit).
    pub working_dir: Option<PathBuf>,
}

impl ExecCommand {
    /// Create a new `ExecCommand` for the given program name or path.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the child process.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl<C: Send + 'static> Command<C> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Deliver `message` as soon as the executor sees it.
    pub fn message(message: Message<C>) -> Self {
        Command {
            inner: CommandInner::Message(message),
        }
    }

    /// Deliver an application message immediately.
    pub fn custom(value: C) -> Self {
        Command::message(Message::Custom(value))
    }

    /// Quit the program gracefully.
    pub fn quit() -> Self {
        Command::message(Message::Quit)
    }

    /// Suspend the process (like ctrl+z). The runtime releases the terminal
    /// first and reacquires it on resume.
    pub fn suspend() -> Self {
        Command::message(Message::Suspend)
    }

    /// Run an async future and deliver its resulting message, if any.
    ///
    /// Failures have no implicit channel: a fallible body maps its error
    /// into an application message, or returns `None` to stay silent.
    pub fn perform<F>(future: F) -> Self
    where
        F: Future<Output = Option<C>> + Send + 'static,
    {
        Command {
            inner: CommandInner::Future(Box::pin(async move {
                future.await.map(Message::Custom)
            })),
        }
    }

    /// One-shot timer: delivers [`Message::Tick`] after `duration`.
    pub fn tick(duration: Duration) -> Self {
        Command {
            inner: CommandInner::Future(Box::pin(async move {
                tokio::time::sleep(duration).await;
                Some(Message::Tick(Instant::now()))
            })),
        }
    }

    /// One-shot timer delivering a custom message after `duration`.
    ///
    /// The callback receives the completion instant, so a model driving
    /// several clocks can tell its ticks apart.
    pub fn tick_with(
        duration: Duration,
        map: impl FnOnce(Instant) -> C + Send + 'static,
    ) -> Self {
        Command {
            inner: CommandInner::Future(Box::pin(async move {
                tokio::time::sleep(duration).await;
                Some(Message::Custom(map(Instant::now())))
            })),
        }
    }

    /// Query the current window size and deliver it as [`Message::Resize`].
    pub fn window_size() -> Self {
        Command {
            inner: CommandInner::Future(Box::pin(async {
                let (width, height) = crate::terminal::size_or_default();
                Some(Message::Resize { width, height })
            })),
        }
    }

    /// Execute an external process (e.g. `$EDITOR`), releasing terminal
    /// control. The runtime restores the terminal before running the child
    /// and re-initializes after it exits. The callback receives the process
    /// exit status.
    pub fn exec(
        cmd: ExecCommand,
        on_exit: impl FnOnce(io::Result<ExitStatus>) -> C + Send + 'static,
    ) -> Self {
        Command {
            inner: CommandInner::Exec {
                cmd,
                on_exit: Box::new(move |status| Message::Custom(on_exit(status))),
            },
        }
    }

    /// Run multiple commands concurrently. Each command's message (if any)
    /// is forwarded independently, in completion order.
    pub fn batch(cmds: impl IntoIterator<Item = Command<C>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.remove(0),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Run commands one at a time in submission order; each command's
    /// completion gates the next.
    pub fn sequence(cmds: impl IntoIterator<Item = Command<C>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.remove(0),
            _ => Command {
                inner: CommandInner::Sequence(cmds),
            },
        }
    }

    /// Terminal management command.
    pub fn terminal(cmd: TerminalCommand) -> Self {
        Command {
            inner: CommandInner::Terminal(cmd),
        }
    }

    /// Print a line above the frame (inline mode) or into scrollback.
    ///
    /// Unlike the view, printed lines are permanent; they scroll away with
    /// the rest of the terminal history.
    pub fn println(text: impl Into<String>) -> Self {
        Command::terminal(TerminalCommand::Println(text.into()))
    }

    /// Print text above the frame without an implied final newline.
    /// Formatting happens at the call site (`format!`).
    pub fn printf(text: impl Into<String>) -> Self {
        Command::terminal(TerminalCommand::Printf(text.into()))
    }

    // Convenience terminal command constructors

    /// Switch to the alternate screen buffer.
    pub fn enter_alt_screen() -> Self {
        Command::terminal(TerminalCommand::EnterAltScreen)
    }

    /// Return to the primary screen buffer.
    pub fn exit_alt_screen() -> Self {
        Command::terminal(TerminalCommand::ExitAltScreen)
    }

    /// Start mouse reporting with the given granularity.
    pub fn enable_mouse(mode: MouseMode) -> Self {
        Command::terminal(TerminalCommand::EnableMouse(mode))
    }

    /// Stop mouse reporting.
    pub fn disable_mouse() -> Self {
        Command::terminal(TerminalCommand::DisableMouse)
    }

    /// Make the terminal cursor visible.
    pub fn show_cursor() -> Self {
        Command::terminal(TerminalCommand::ShowCursor)
    }

    /// Hide the terminal cursor.
    pub fn hide_cursor() -> Self {
        Command::terminal(TerminalCommand::HideCursor)
    }

    /// Enable bracketed paste mode.
    pub fn enable_bracketed_paste() -> Self {
        Command::terminal(TerminalCommand::EnableBracketedPaste)
    }

    /// Disable bracketed paste mode.
    pub fn disable_bracketed_paste() -> Self {
        Command::terminal(TerminalCommand::DisableBracketedPaste)
    }

    /// Enable focus-in/focus-out reporting.
    pub fn enable_focus_reporting() -> Self {
        Command::terminal(TerminalCommand::EnableFocusReporting)
    }

    /// Disable focus-in/focus-out reporting.
    pub fn disable_focus_reporting() -> Self {
        Command::terminal(TerminalCommand::DisableFocusReporting)
    }

    /// Set the terminal window title.
    pub fn set_window_title(title: impl Into<String>) -> Self {
        Command::terminal(TerminalCommand::SetWindowTitle(title.into()))
    }

    /// Clear the entire terminal screen.
    pub fn clear_screen() -> Self {
        Command::terminal(TerminalCommand::ClearScreen)
    }

    /// Transform the custom message type (for component composition).
    ///
    /// Built-in messages and terminal operations pass through untouched.
    pub fn map<D: Send + 'static>(
        self,
        f: impl Fn(C) -> D + Send + Sync + 'static,
    ) -> Command<D> {
        self.map_with(Arc::new(f))
    }

    fn map_with<D: Send + 'static>(self, f: Arc<dyn Fn(C) -> D + Send + Sync>) -> Command<D> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Message(msg) => Command::message(msg.map(|c| f(c))),
            CommandInner::Future(fut) => {
                let f = f.clone();
                Command {
                    inner: CommandInner::Future(Box::pin(async move {
                        fut.await.map(|msg| msg.map(|c| f(c)))
                    })),
                }
            }
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(
                    cmds.into_iter().map(|cmd| cmd.map_with(f.clone())).collect(),
                ),
            },
            CommandInner::Sequence(cmds) => Command {
                inner: CommandInner::Sequence(
                    cmds.into_iter().map(|cmd| cmd.map_with(f.clone())).collect(),
                ),
            },
            CommandInner::Terminal(tcmd) => Command::terminal(tcmd),
            CommandInner::Exec { cmd, on_exit } => {
                let f = f.clone();
                Command {
                    inner: CommandInner::Exec {
                        cmd,
                        on_exit: Box::new(move |result| on_exit(result).map(|c| f(c))),
                    },
                }
            }
        }
    }

    // --- Inspection methods (useful for testing) ---

    /// Returns `true` if this is a no-op command.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// If this command is an immediate message, return it.
    pub fn into_message(self) -> Option<Message<C>> {
        match self.inner {
            CommandInner::Message(msg) => Some(msg),
            _ => None,
        }
    }

    /// If this command is a batch, return the inner commands.
    pub fn into_batch(self) -> Option<Vec<Command<C>>> {
        match self.inner {
            CommandInner::Batch(cmds) => Some(cmds),
            _ => None,
        }
    }
}
