use std::io;
use std::panic::AssertUnwindSafe;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use crate::command::{ExecCommand, MouseMode, TerminalCommand};
use crate::decoder::Decoder;
use crate::executor::{Executor, Inbound};
use crate::message::Message;
use crate::model::Model;
use crate::renderer::{ModeSnapshot, Renderer};
#[cfg(unix)]
use crate::signals;
use crate::terminal::{self, Input, Output};

/// How long a lone ESC byte is held before it is reported as the escape
/// key rather than the start of a sequence.
const ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The program was force-killed through a [`ProgramHandle`].
    #[error("program was killed")]
    Killed,
    /// A panic escaped `update` or `view`. The terminal has been restored.
    #[error("program panicked: {0}")]
    Panic(String),
}

/// Configuration options for a [`Program`].
///
/// All fields have sensible defaults (see [`Default`] impl).  Use struct
/// update syntax to override only the options you need:
///
/// # Example
///
/// ```rust,ignore
/// use matcha_core::{MouseMode, Output, ProgramOptions};
///
/// let opts = ProgramOptions {
///     fps: 30,
///     mouse_mode: Some(MouseMode::CellMotion),
///     title: Some("My App".into()),
///     output: Output::Stderr,
///     ..ProgramOptions::default()
/// };
/// ```
pub struct ProgramOptions {
    /// Target frames per second (default: 60, max: 120).
    pub fps: u32,
    /// Start in the alternate screen (default: false, render inline).
    pub alt_screen: bool,
    /// Enable mouse reporting in the given mode.
    pub mouse_mode: Option<MouseMode>,
    /// Enable bracketed paste (default: true).
    pub bracketed_paste: bool,
    /// Enable focus change reporting.
    pub focus_reporting: bool,
    /// Set the terminal window title.
    pub title: Option<String>,
    /// Whether to catch panics and restore the terminal (default: true).
    pub catch_panics: bool,
    /// Whether to listen for signals and translate them into messages
    /// (default: true).
    pub handle_signals: bool,
    /// Log file path for debugging TUI apps.
    pub log_file: Option<std::path::PathBuf>,
    /// Where frames are written: stdout (default), stderr, or a custom
    /// writer.
    pub output: Output,
    /// Where input bytes are read from: stdin (default) or a custom
    /// reader.
    pub input: Input,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: false,
            mouse_mode: None,
            bracketed_paste: true,
            focus_reporting: false,
            title: None,
            catch_panics: true,
            handle_signals: true,
            log_file: None,
            output: Output::default(),
            input: Input::default(),
        }
    }
}

/// A cloneable handle to a running [`Program`] for external control.
///
/// `ProgramHandle` can safely be sent across threads or into async tasks.
/// It provides two capabilities:
///
/// * [`send`](ProgramHandle::send) -- inject a message into the program's
///   event loop from outside.
/// * [`kill`](ProgramHandle::kill) -- force the program to exit immediately.
///
/// Obtain a handle by calling [`Program::handle`] before entering the run
/// loop.
pub struct ProgramHandle<C: Send + 'static> {
    tx: mpsc::UnboundedSender<Inbound<C>>,
    killed: Arc<AtomicBool>,
}

impl<C: Send + 'static> Clone for ProgramHandle<C> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            killed: self.killed.clone(),
        }
    }
}

impl<C: Send + 'static> ProgramHandle<C> {
    /// Send a message to the running program.
    ///
    /// The message is enqueued on an unbounded channel and processed on the
    /// next iteration of the event loop. Messages sent before
    /// [`Program::run`] are queued and delivered once the loop starts.
    /// Sending after the program has stopped is a no-op.
    pub fn send(&self, msg: Message<C>) {
        let _ = self.tx.send(Inbound::Message(msg));
    }

    /// Force-kill the program immediately.
    ///
    /// Sets an atomic flag that the event loop checks on every iteration.
    /// The program skips the final render, restores the terminal, and
    /// returns [`ProgramError::Killed`] without processing remaining
    /// messages.
    pub fn kill(&self) {
        self.killed.store(true, Ordering::SeqCst);
    }
}

/// Lifecycle of the run loop, recorded in the debug log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    ShuttingDown,
    Stopped,
}

/// The program runtime. Manages terminal setup, the event loop, and the
/// full [`Model`] lifecycle.
///
/// `Program` wires a [`Model`] to a terminal and drives the
/// init/update/view loop until the model returns [`Command::quit`], the
/// process receives a termination signal, or a [`ProgramHandle`] kills it.
/// On a graceful exit the final model is returned so callers can extract
/// results from it.
///
/// [`Command::quit`]: crate::command::Command::quit
///
/// # Example
///
/// ```rust,ignore
/// use matcha_core::{Program, ProgramError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let model = Program::<MyApp>::new(()).run().await?;
///     // `model` is the final state after quit
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    flags: M::Flags,
    options: ProgramOptions,
    tx: mpsc::UnboundedSender<Inbound<M::Custom>>,
    rx: mpsc::UnboundedReceiver<Inbound<M::Custom>>,
    killed: Arc<AtomicBool>,
    #[allow(clippy::type_complexity)]
    filter: Option<Box<dyn Fn(Message<M::Custom>) -> Option<Message<M::Custom>> + Send>>,
}

impl<M: Model> Program<M> {
    /// Create a new program with default options.
    ///
    /// The model itself is not initialized until [`run`](Program::run), so
    /// `Model::init` observes the terminal state it will actually run in.
    pub fn new(flags: M::Flags) -> Self {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a new program with custom options.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            flags,
            options,
            tx,
            rx,
            killed: Arc::new(AtomicBool::new(false)),
            filter: None,
        }
    }

    /// Set a message filter. Every message, built-ins included, passes
    /// through the filter before the runtime acts on it. Return `Some(msg)`
    /// to pass (possibly transformed), `None` to drop. Returning `None` for
    /// [`Message::Quit`] cancels quitting.
    pub fn with_filter(
        mut self,
        filter: impl Fn(Message<M::Custom>) -> Option<Message<M::Custom>> + Send + 'static,
    ) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Get a handle for external control (send messages, force-kill).
    pub fn handle(&self) -> ProgramHandle<M::Custom> {
        ProgramHandle {
            tx: self.tx.clone(),
            killed: self.killed.clone(),
        }
    }

    /// Run the program. Resolves when the model quits, the program is
    /// killed, or an unrecoverable error occurs.
    pub async fn run(self) -> Result<M, ProgramError> {
        let Program {
            flags,
            mut options,
            tx,
            rx,
            killed,
            filter,
        } = self;

        let log_file = match options.log_file.take() {
            Some(path) => Some(
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?,
            ),
            None => None,
        };

        if options.catch_panics {
            terminal::install_panic_hook();
        }

        // Raw mode only applies to the real terminal. A custom reader is a
        // plain byte pipe with nothing to configure.
        let raw_mode = matches!(options.input, Input::Stdin);
        if raw_mode {
            // Without raw mode there is no usable terminal; fail before
            // touching anything else.
            terminal::enable_raw_mode()?;
        }

        let (width, height) = terminal::size_or_default();
        let mut renderer = Renderer::new(std::mem::take(&mut options.output), width, height);
        if let Err(err) = apply_startup_modes(&mut renderer, &mut options) {
            if raw_mode {
                let _ = terminal::disable_raw_mode();
            }
            return Err(err.into());
        }

        let mut executor = Executor::new(tx.clone());
        let (model, init_cmd) = M::init(flags);
        executor.submit(init_cmd);

        let mut io_tasks = JoinSet::new();
        spawn_input_reader(&mut io_tasks, std::mem::take(&mut options.input), tx.clone());
        #[cfg(unix)]
        if options.handle_signals {
            signals::spawn_listeners(&mut io_tasks, &tx);
        }

        // The first message every program sees is its window size.
        let _ = tx.send(Inbound::Message(Message::Resize { width, height }));
        drop(tx);

        let event_loop = EventLoop {
            renderer,
            rx,
            executor,
            io_tasks,
            filter,
            killed,
            fps: options.fps,
            raw_mode,
            needs_redraw: true,
            saved_modes: None,
            state: RunState::Idle,
            log_file,
        };

        if options.catch_panics {
            match AssertUnwindSafe(event_loop.run(model)).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => {
                    terminal::restore_terminal_minimal();
                    Err(ProgramError::Panic(panic_message(payload)))
                }
            }
        } else {
            event_loop.run(model).await
        }
    }
}

fn apply_startup_modes(
    renderer: &mut Renderer<Output>,
    options: &mut ProgramOptions,
) -> io::Result<()> {
    renderer.hide_cursor()?;
    if options.alt_screen {
        renderer.enter_alt_screen()?;
    }
    if let Some(mode) = options.mouse_mode {
        renderer.enable_mouse(mode)?;
    }
    if options.bracketed_paste {
        renderer.enable_bracketed_paste()?;
    }
    if options.focus_reporting {
        renderer.enable_focus_reporting()?;
    }
    if let Some(title) = options.title.take() {
        renderer.set_window_title(&title)?;
    }
    Ok(())
}

/// Read raw bytes, feed them through the decoder, and forward the decoded
/// events as messages.
///
/// A lone ESC cannot be distinguished from the start of a sequence by
/// bytes alone, so when the decoder is holding one the next read runs
/// under [`ESCAPE_TIMEOUT`]; if nothing follows, the escape key is
/// emitted.
fn spawn_input_reader<C: Send + 'static>(
    tasks: &mut JoinSet<()>,
    input: Input,
    tx: mpsc::UnboundedSender<Inbound<C>>,
) {
    tasks.spawn(async move {
        let mut reader: Box<dyn AsyncRead + Send + Unpin> = match input {
            Input::Stdin => Box::new(tokio::io::stdin()),
            Input::Reader(reader) => reader,
        };
        let mut decoder = Decoder::new();
        let mut buf = [0u8; 4096];

        loop {
            let read = if decoder.is_escape_pending() {
                match tokio::time::timeout(ESCAPE_TIMEOUT, reader.read(&mut buf)).await {
                    Ok(read) => read,
                    Err(_) => {
                        if let Some(event) = decoder.flush_escape() {
                            if tx.send(Inbound::Message(event.into())).is_err() {
                                return;
                            }
                        }
                        continue;
                    }
                }
            } else {
                reader.read(&mut buf).await
            };

            match read {
                Ok(0) => {
                    // EOF. Emit whatever the decoder still holds and stop.
                    if let Some(event) = decoder.flush() {
                        let _ = tx.send(Inbound::Message(event.into()));
                    }
                    return;
                }
                Ok(n) => {
                    for event in decoder.feed_bytes(&buf[..n]) {
                        if tx.send(Inbound::Message(event.into())).is_err() {
                            return;
                        }
                    }
                }
                Err(_) => return,
            }
        }
    });
}

/// Outcome of processing one inbound entry.
enum Flow {
    Continue,
    Quit,
}

/// Everything the run loop owns. The model is threaded through by value
/// since `update` consumes it.
struct EventLoop<M: Model> {
    renderer: Renderer<Output>,
    rx: mpsc::UnboundedReceiver<Inbound<M::Custom>>,
    executor: Executor<M::Custom>,
    io_tasks: JoinSet<()>,
    #[allow(clippy::type_complexity)]
    filter: Option<Box<dyn Fn(Message<M::Custom>) -> Option<Message<M::Custom>> + Send>>,
    killed: Arc<AtomicBool>,
    fps: u32,
    raw_mode: bool,
    needs_redraw: bool,
    saved_modes: Option<ModeSnapshot>,
    state: RunState,
    log_file: Option<std::fs::File>,
}

impl<M: Model> EventLoop<M> {
    async fn run(mut self, mut model: M) -> Result<M, ProgramError> {
        self.transition(RunState::Running);

        let fps = self.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let verdict: Result<(), ProgramError> = loop {
            if self.killed.load(Ordering::SeqCst) {
                break Err(ProgramError::Killed);
            }

            tokio::select! {
                biased;

                Some(inbound) = self.rx.recv() => {
                    let (next, mut flow) = self.process_inbound(model, inbound);
                    model = next;

                    // Micro-batch: drain a burst of queued events (key
                    // repeat, paste floods) before the next frame. Capped
                    // at 100 messages and 100 microseconds.
                    let deadline = Instant::now() + Duration::from_micros(100);
                    let mut drained = 0u32;
                    while matches!(flow, Ok(Flow::Continue))
                        && drained < 100
                        && Instant::now() < deadline
                    {
                        let Ok(inbound) = self.rx.try_recv() else {
                            break;
                        };
                        let (next, next_flow) = self.process_inbound(model, inbound);
                        model = next;
                        flow = next_flow;
                        drained += 1;
                    }

                    match flow {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Quit) => break Ok(()),
                        Err(err) => break Err(err),
                    }
                }

                _ = frame_interval.tick() => {
                    if self.needs_redraw {
                        if let Err(err) = self.render_frame(&model) {
                            break Err(err.into());
                        }
                        self.needs_redraw = false;
                    }
                }
            }
        };

        self.transition(RunState::ShuttingDown);
        self.io_tasks.abort_all();
        self.rx.close();
        self.executor.shutdown();

        let result = match verdict {
            Ok(()) => {
                // Paint the final view so whatever the model last produced
                // stays on screen after exit.
                let render_result = if self.needs_redraw {
                    self.render_frame(&model)
                } else {
                    Ok(())
                };
                self.restore()?;
                render_result?;
                Ok(model)
            }
            Err(err) => {
                let _ = self.restore();
                Err(err)
            }
        };

        self.transition(RunState::Stopped);
        result
    }

    fn process_inbound(
        &mut self,
        model: M,
        inbound: Inbound<M::Custom>,
    ) -> (M, Result<Flow, ProgramError>) {
        match inbound {
            Inbound::Message(msg) => self.process_message(model, msg),
            Inbound::Control(op) => {
                let result = self
                    .run_control(op)
                    .map(|_| Flow::Continue)
                    .map_err(ProgramError::from);
                (model, result)
            }
            Inbound::Exec { cmd, on_exit } => {
                self.debug_log("releasing terminal for external command");
                let status = self.run_exec(cmd);
                self.process_message(model, on_exit(status))
            }
        }
    }

    /// Apply the filter, handle built-ins, and hand everything else to the
    /// model. The filter runs first so applications can intercept or remap
    /// even quit and suspend.
    fn process_message(
        &mut self,
        model: M,
        msg: Message<M::Custom>,
    ) -> (M, Result<Flow, ProgramError>) {
        let msg = match &self.filter {
            Some(filter) => match filter(msg) {
                Some(msg) => msg,
                None => return (model, Ok(Flow::Continue)),
            },
            None => msg,
        };

        let msg = match msg {
            Message::Quit | Message::Interrupt => {
                return (model, Ok(Flow::Quit));
            }
            Message::Suspend => {
                if let Err(err) = self.suspend() {
                    return (model, Err(err.into()));
                }
                // The process just resumed; let the model react.
                return self.process_message(model, Message::Resume);
            }
            Message::Resize { width, height } => {
                self.renderer.resize(width, height);
                Message::Resize { width, height }
            }
            msg => msg,
        };

        let (model, cmd) = model.update(msg);
        self.executor.submit(cmd);
        self.needs_redraw = true;
        (model, Ok(Flow::Continue))
    }

    fn run_control(&mut self, op: TerminalCommand) -> io::Result<()> {
        match op {
            TerminalCommand::EnterAltScreen => {
                self.renderer.enter_alt_screen()?;
                self.needs_redraw = true;
            }
            TerminalCommand::ExitAltScreen => {
                self.renderer.exit_alt_screen()?;
                self.needs_redraw = true;
            }
            TerminalCommand::EnableMouse(mode) => self.renderer.enable_mouse(mode)?,
            TerminalCommand::DisableMouse => self.renderer.disable_mouse()?,
            TerminalCommand::ShowCursor => self.renderer.show_cursor()?,
            TerminalCommand::HideCursor => self.renderer.hide_cursor()?,
            TerminalCommand::EnableBracketedPaste => self.renderer.enable_bracketed_paste()?,
            TerminalCommand::DisableBracketedPaste => self.renderer.disable_bracketed_paste()?,
            TerminalCommand::EnableFocusReporting => self.renderer.enable_focus_reporting()?,
            TerminalCommand::DisableFocusReporting => self.renderer.disable_focus_reporting()?,
            TerminalCommand::SetWindowTitle(title) => self.renderer.set_window_title(&title)?,
            TerminalCommand::ClearScreen => {
                self.renderer.clear_screen()?;
                self.needs_redraw = true;
            }
            TerminalCommand::Println(text) => {
                self.renderer.queue_above(&text, true);
                self.needs_redraw = true;
            }
            TerminalCommand::Printf(text) => {
                self.renderer.queue_above(&text, false);
                self.needs_redraw = true;
            }
        }
        Ok(())
    }

    /// Release the terminal, run the child with inherited stdio, and take
    /// the terminal back. The event loop blocks for the duration, which is
    /// the point: the child owns the screen.
    fn run_exec(&mut self, cmd: ExecCommand) -> io::Result<std::process::ExitStatus> {
        self.release_terminal()?;

        let mut process = std::process::Command::new(&cmd.program);
        process.args(&cmd.args);
        if let Some(dir) = &cmd.working_dir {
            process.current_dir(dir);
        }
        let status = process
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();

        self.acquire_terminal()?;
        status
    }

    fn suspend(&mut self) -> io::Result<()> {
        self.debug_log("suspending");
        self.release_terminal()?;

        #[cfg(unix)]
        unsafe {
            // SIGSTOP rather than SIGTSTP: the latter would bounce off our
            // own signal listener instead of stopping the process.
            libc::raise(libc::SIGSTOP);
        }

        self.acquire_terminal()
    }

    fn release_terminal(&mut self) -> io::Result<()> {
        self.saved_modes = Some(self.renderer.snapshot());
        self.renderer.restore()?;
        if self.raw_mode {
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    fn acquire_terminal(&mut self) -> io::Result<()> {
        if self.raw_mode {
            terminal::enable_raw_mode()?;
        }
        if let Some(snapshot) = self.saved_modes.take() {
            self.renderer.apply(snapshot)?;
        }
        let (width, height) = terminal::size_or_default();
        self.renderer.resize(width, height);
        self.renderer.force_repaint();
        self.needs_redraw = true;
        Ok(())
    }

    fn render_frame(&mut self, model: &M) -> io::Result<()> {
        self.renderer.render(model.view());
        self.renderer.flush()
    }

    fn restore(&mut self) -> io::Result<()> {
        self.renderer.restore()?;
        if self.raw_mode {
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    fn transition(&mut self, next: RunState) {
        self.state = next;
        self.debug_log(&format!("state -> {:?}", self.state));
    }

    /// Write a debug message to the log file, if configured.
    fn debug_log(&mut self, msg: &str) {
        if let Some(ref mut f) = self.log_file {
            use std::io::Write;
            let _ = writeln!(f, "{msg}");
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Open a log file for debugging TUI applications.
///
/// Returns a file handle that can be used with `writeln!` or passed to a
/// logging framework. The file is opened in append mode. Useful because a
/// running program owns the terminal, so `println!` debugging would be
/// eaten by the renderer.
///
/// # Example
///
/// ```no_run
/// use matcha_core::log_to_file;
/// use std::io::Write;
///
/// let mut f = log_to_file("debug.log").unwrap();
/// writeln!(f, "debug message").unwrap();
/// ```
pub fn log_to_file(path: impl AsRef<std::path::Path>) -> Result<std::fs::File, std::io::Error> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}
