//! Actor wrapper around the [`Orchestrator`].
//!
//! The orchestrator is moved into a dedicated task and driven by commands
//! sent over a bounded `mpsc` channel; each command carries a `oneshot`
//! sender for its reply. Commands run strictly one at a time and always to
//! completion, so a user query can never interleave with a trigger cycle and
//! a caller that gives up waiting cannot leave a half-committed exchange.

use aide_types::error::SessionError;
use aide_types::flags::RuntimeFlags;
use aide_types::message::Message;
use aide_types::status::Diagnostics;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use super::orchestrator::{Orchestrator, QueryOptions, TriggerReport};

/// Pending commands before senders wait.
const COMMAND_BUFFER: usize = 32;

enum Command {
    Query {
        input: String,
        options: QueryOptions,
        reply: oneshot::Sender<String>,
    },
    CheckTriggers {
        reply: oneshot::Sender<TriggerReport>,
    },
    SetFlag {
        name: String,
        value: Option<bool>,
        reply: oneshot::Sender<bool>,
    },
    Flags {
        reply: oneshot::Sender<RuntimeFlags>,
    },
    Reset {
        system_prompt: Option<String>,
        reply: oneshot::Sender<()>,
    },
    History {
        reply: oneshot::Sender<Vec<Message>>,
    },
    PreviewContext {
        reply: oneshot::Sender<String>,
    },
    Diagnostics {
        reply: oneshot::Sender<Diagnostics>,
    },
}

/// Cloneable handle for talking to a spawned orchestrator.
///
/// The actor stops once every handle is dropped, and the [`JoinHandle`]
/// returned by [`spawn`] yields the orchestrator back.
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    tx: mpsc::Sender<Command>,
}

/// Move `orchestrator` into its own task.
pub fn spawn(orchestrator: Orchestrator) -> (OrchestratorHandle, JoinHandle<Orchestrator>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let task = tokio::spawn(run(orchestrator, rx));
    (OrchestratorHandle { tx }, task)
}

async fn run(mut orchestrator: Orchestrator, mut rx: mpsc::Receiver<Command>) -> Orchestrator {
    while let Some(command) = rx.recv().await {
        // A dropped reply receiver only means the caller stopped waiting.
        match command {
            Command::Query {
                input,
                options,
                reply,
            } => {
                let _ = reply.send(orchestrator.process_query(&input, options).await);
            }
            Command::CheckTriggers { reply } => {
                let _ = reply.send(orchestrator.check_triggers().await);
            }
            Command::SetFlag { name, value, reply } => {
                let _ = reply.send(orchestrator.set_flag(&name, value));
            }
            Command::Flags { reply } => {
                let _ = reply.send(orchestrator.flags().clone());
            }
            Command::Reset {
                system_prompt,
                reply,
            } => {
                orchestrator.reset(system_prompt);
                let _ = reply.send(());
            }
            Command::History { reply } => {
                let _ = reply.send(orchestrator.history());
            }
            Command::PreviewContext { reply } => {
                let _ = reply.send(orchestrator.preview_context().await);
            }
            Command::Diagnostics { reply } => {
                let _ = reply.send(orchestrator.diagnostics());
            }
        }
    }
    debug!("all orchestrator handles dropped, actor stopping");
    orchestrator
}

impl OrchestratorHandle {
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn query(
        &self,
        input: impl Into<String>,
        options: QueryOptions,
    ) -> Result<String, SessionError> {
        let input = input.into();
        self.request(|reply| Command::Query {
            input,
            options,
            reply,
        })
        .await
    }

    pub async fn check_triggers(&self) -> Result<TriggerReport, SessionError> {
        self.request(|reply| Command::CheckTriggers { reply }).await
    }

    /// Set a flag, or flip it when `value` is `None`. Returns the new value.
    pub async fn set_flag(
        &self,
        name: impl Into<String>,
        value: Option<bool>,
    ) -> Result<bool, SessionError> {
        let name = name.into();
        self.request(|reply| Command::SetFlag { name, value, reply })
            .await
    }

    pub async fn flags(&self) -> Result<RuntimeFlags, SessionError> {
        self.request(|reply| Command::Flags { reply }).await
    }

    pub async fn reset(&self, system_prompt: Option<String>) -> Result<(), SessionError> {
        self.request(|reply| Command::Reset {
            system_prompt,
            reply,
        })
        .await
    }

    pub async fn history(&self) -> Result<Vec<Message>, SessionError> {
        self.request(|reply| Command::History { reply }).await
    }

    pub async fn preview_context(&self) -> Result<String, SessionError> {
        self.request(|reply| Command::PreviewContext { reply }).await
    }

    pub async fn diagnostics(&self) -> Result<Diagnostics, SessionError> {
        self.request(|reply| Command::Diagnostics { reply }).await
    }
}
