use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;

use crate::executor::Inbound;
use crate::message::Message;
use crate::terminal;

/// Spawn one listener task per consumed signal, each mapping deliveries to
/// a built-in message on the inbound stream.
///
/// Registering a SIGTSTP handler replaces the default stop action, so an
/// external stop request becomes [`Message::Suspend`] and goes through the
/// same controlled release path as `Command::suspend`. The runtime stops
/// itself with the uncatchable SIGSTOP and synthesizes
/// [`Message::Resume`](crate::message::Message::Resume) when that call
/// returns, so no SIGCONT listener is needed here.
pub(crate) fn spawn_listeners<C: Send + 'static>(
    tasks: &mut JoinSet<()>,
    tx: &UnboundedSender<Inbound<C>>,
) {
    spawn_one(tasks, tx.clone(), SignalKind::window_change(), || {
        let (width, height) = terminal::size_or_default();
        Message::Resize { width, height }
    });
    spawn_one(tasks, tx.clone(), SignalKind::interrupt(), || {
        Message::Interrupt
    });
    spawn_one(tasks, tx.clone(), SignalKind::terminate(), || Message::Quit);
    spawn_one(
        tasks,
        tx.clone(),
        SignalKind::from_raw(libc::SIGTSTP),
        || Message::Suspend,
    );
}

fn spawn_one<C, F>(
    tasks: &mut JoinSet<()>,
    tx: UnboundedSender<Inbound<C>>,
    kind: SignalKind,
    map: F,
) where
    C: Send + 'static,
    F: Fn() -> Message<C> + Send + 'static,
{
    tasks.spawn(async move {
        // Registration can fail outside a normal process context; the
        // program just runs without that signal then.
        let Ok(mut stream) = signal(kind) else {
            return;
        };
        while stream.recv().await.is_some() {
            if tx.send(Inbound::Message(map())).is_err() {
                return;
            }
        }
    });
}
