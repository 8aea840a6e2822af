use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::command::{Command, CommandInner, ExecCommand, ExitMapper, TerminalCommand};
use crate::message::Message;

/// One entry in the program's ordered inbound stream.
///
/// Messages go to `update`; the other variants are consumed by the runtime
/// itself. Routing terminal operations and exec requests through the same
/// stream is what lets a [`Command::sequence`] interleave them
/// deterministically with async work.
pub(crate) enum Inbound<C: Send + 'static> {
    Message(Message<C>),
    Control(TerminalCommand),
    Exec {
        cmd: ExecCommand,
        on_exit: ExitMapper<C>,
    },
}

/// Resolves submitted commands into inbound-stream entries.
///
/// Immediate messages and terminal operations are forwarded synchronously at
/// submission. Async bodies are spawned as independent tasks; batches spawn
/// one task per member (results arrive in completion order), while a
/// sequence runs inside a single task that finishes each member before
/// starting the next.
///
/// Every spawned task is tracked in a [`JoinSet`]. On shutdown the runtime
/// closes the receiving end of the channel first and then calls
/// [`shutdown`](Executor::shutdown), so a cancelled command can never
/// deliver a message afterwards.
pub(crate) struct Executor<C: Send + 'static> {
    tx: mpsc::UnboundedSender<Inbound<C>>,
    tasks: JoinSet<()>,
}

impl<C: Send + 'static> Executor<C> {
    pub fn new(tx: mpsc::UnboundedSender<Inbound<C>>) -> Self {
        Executor {
            tx,
            tasks: JoinSet::new(),
        }
    }

    pub fn submit(&mut self, cmd: Command<C>) {
        self.reap_finished();
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => {
                let _ = self.tx.send(Inbound::Message(msg));
            }
            CommandInner::Terminal(op) => {
                let _ = self.tx.send(Inbound::Control(op));
            }
            CommandInner::Exec { cmd, on_exit } => {
                let _ = self.tx.send(Inbound::Exec { cmd, on_exit });
            }
            CommandInner::Future(fut) => {
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    if let Some(msg) = fut.await {
                        let _ = tx.send(Inbound::Message(msg));
                    }
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.submit(cmd);
                }
            }
            CommandInner::Sequence(cmds) => {
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    for cmd in cmds {
                        resolve_in_order(cmd, &tx).await;
                    }
                });
            }
        }
    }

    /// Abort every in-flight command task. Callers close the channel's
    /// receiving end first; between the two, nothing spawned here can
    /// deliver again.
    pub fn shutdown(&mut self) {
        self.tasks.abort_all();
    }

    /// Drop bookkeeping for tasks that already finished.
    fn reap_finished(&mut self) {
        while self.tasks.try_join_next().is_some() {}
    }
}

/// Run one command to full completion, delivering whatever it produces,
/// before returning. Nested batches run their members concurrently but the
/// call does not resolve until the slowest member is done, which is exactly
/// the gating a sequence needs.
fn resolve_in_order<'a, C: Send + 'static>(
    cmd: Command<C>,
    tx: &'a mpsc::UnboundedSender<Inbound<C>>,
) -> BoxFuture<'a, ()> {
    async move {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => {
                let _ = tx.send(Inbound::Message(msg));
            }
            CommandInner::Terminal(op) => {
                let _ = tx.send(Inbound::Control(op));
            }
            CommandInner::Exec { cmd, on_exit } => {
                let _ = tx.send(Inbound::Exec { cmd, on_exit });
            }
            CommandInner::Future(fut) => {
                if let Some(msg) = fut.await {
                    let _ = tx.send(Inbound::Message(msg));
                }
            }
            CommandInner::Batch(cmds) => {
                futures::future::join_all(
                    cmds.into_iter().map(|cmd| resolve_in_order(cmd, tx)),
                )
                .await;
            }
            CommandInner::Sequence(cmds) => {
                for cmd in cmds {
                    resolve_in_order(cmd, tx).await;
                }
            }
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Msg {
        A,
        B,
        C,
    }

    async fn recv_custom(rx: &mut mpsc::UnboundedReceiver<Inbound<Msg>>) -> Msg {
        match tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for a message")
            .expect("channel closed early")
        {
            Inbound::Message(Message::Custom(m)) => m,
            other => panic!(
                "expected a custom message, got {:?}",
                std::mem::discriminant(&other)
            ),
        }
    }

    fn delayed(ms: u64, msg: Msg) -> Command<Msg> {
        Command::perform(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Some(msg)
        })
    }

    #[tokio::test]
    async fn batch_delivers_in_completion_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut executor = Executor::new(tx);
        executor.submit(Command::batch(vec![
            delayed(50, Msg::A),
            Command::custom(Msg::B),
        ]));
        assert_eq!(recv_custom(&mut rx).await, Msg::B);
        assert_eq!(recv_custom(&mut rx).await, Msg::A);
    }

    #[tokio::test]
    async fn sequence_preserves_submission_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut executor = Executor::new(tx);
        executor.submit(Command::sequence(vec![
            delayed(50, Msg::A),
            Command::custom(Msg::B),
        ]));
        assert_eq!(recv_custom(&mut rx).await, Msg::A);
        assert_eq!(recv_custom(&mut rx).await, Msg::B);
    }

    #[tokio::test]
    async fn batch_inside_sequence_gates_the_next_member() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut executor = Executor::new(tx);
        executor.submit(Command::sequence(vec![
            Command::batch(vec![delayed(50, Msg::A), Command::custom(Msg::B)]),
            Command::custom(Msg::C),
        ]));
        assert_eq!(recv_custom(&mut rx).await, Msg::B);
        assert_eq!(recv_custom(&mut rx).await, Msg::A);
        assert_eq!(recv_custom(&mut rx).await, Msg::C);
    }

    #[tokio::test]
    async fn terminal_operations_ride_the_stream_in_sequence_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut executor = Executor::new(tx);
        executor.submit(Command::sequence(vec![
            Command::custom(Msg::A),
            Command::enter_alt_screen(),
            Command::custom(Msg::B),
        ]));
        assert_eq!(recv_custom(&mut rx).await, Msg::A);
        match rx.recv().await {
            Some(Inbound::Control(TerminalCommand::EnterAltScreen)) => {}
            _ => panic!("expected the alt-screen control entry"),
        }
        assert_eq!(recv_custom(&mut rx).await, Msg::B);
    }

    #[tokio::test]
    async fn cancelled_commands_never_deliver() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut executor = Executor::new(tx);
        executor.submit(delayed(30, Msg::A));

        rx.close();
        executor.shutdown();
        drop(executor);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn failing_command_produces_no_message() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut executor = Executor::new(tx);
        executor.submit(Command::<Msg>::perform(async { None }));
        executor.submit(Command::custom(Msg::B));
        // Only the real message arrives.
        assert_eq!(recv_custom(&mut rx).await, Msg::B);
        assert!(rx.try_recv().is_err());
    }
}
