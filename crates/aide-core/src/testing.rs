//! Test doubles and a log capture layer shared by the unit tests.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aide_types::error::{ProviderError, ResponderError};
use aide_types::message::Message;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::agent::{Orchestrator, OrchestratorSettings};
use crate::context::ContextProvider;
use crate::responder::{BoxResponder, Responder};

pub type CallLog = Arc<Mutex<Vec<Vec<Message>>>>;

/// Replies from a queue (then "ok") and records every window it receives.
pub struct ScriptedResponder {
    replies: Mutex<VecDeque<Result<String, ResponderError>>>,
    calls: CallLog,
    delay: Option<Duration>,
}

impl ScriptedResponder {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_results(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    pub fn from_results(replies: Vec<Result<String, ResponderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Arc::default(),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> CallLog {
        Arc::clone(&self.calls)
    }
}

impl Responder for ScriptedResponder {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn respond(&self, messages: &[Message]) -> Result<String, ResponderError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok("ok".to_string()))
    }
}

pub struct FixedProvider {
    name: String,
    text: String,
}

impl FixedProvider {
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
        }
    }
}

impl ContextProvider for FixedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, ProviderError> {
        Ok(self.text.clone())
    }
}

pub struct FailingProvider {
    name: String,
}

impl FailingProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl ContextProvider for FailingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, ProviderError> {
        Err(ProviderError::Other("connection refused".to_string()))
    }
}

/// Orchestrator with default settings, no providers and no triggers.
pub fn orchestrator_with(responder: impl Responder + 'static) -> Orchestrator {
    let settings = OrchestratorSettings {
        system_prompt: "You are a helpful assistant.".to_string(),
        max_history: 10,
        ..OrchestratorSettings::default()
    };
    Orchestrator::new(settings, BoxResponder::new(responder))
}

/// Formatted events recorded while a [`capture_logs`] guard is alive.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CapturedLogs {
    pub fn matching(&self, needle: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|line| line.contains(needle))
            .cloned()
            .collect()
    }
}

struct CaptureLayer {
    logs: CapturedLogs,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = event.metadata().level().to_string();
        event.record(&mut FieldWriter(&mut line));
        self.logs.lines.lock().unwrap().push(line);
    }
}

struct FieldWriter<'a>(&'a mut String);

impl Visit for FieldWriter<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let _ = write!(self.0, " {}={:?}", field.name(), value);
    }
}

/// Capture events on the current thread until the guard drops.
///
/// `#[tokio::test]` runs on a current-thread runtime, so events from the
/// test's own futures are seen.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer { logs: logs.clone() });
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
