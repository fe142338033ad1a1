//! Session driver: interactive input and trigger polling, side by side.
//!
//! The driver races the caller's interactive future against the trigger
//! loop. Whichever finishes first ends the session and the other is
//! cancelled at its next await point. The trigger loop never finishes on its
//! own, so in practice the session ends when the user quits or the
//! cancellation token fires.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::handle::OrchestratorHandle;
use super::orchestrator::ProactiveMessage;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The interactive activity returned (quit, end of input).
    Quit,
    /// The trigger loop stopped because the orchestrator went away.
    TriggersStopped,
    /// The session's cancellation token fired (e.g. Ctrl+C).
    Cancelled,
}

pub struct SessionDriver {
    handle: OrchestratorHandle,
    period: Duration,
    cancel: CancellationToken,
}

impl SessionDriver {
    pub fn new(handle: OrchestratorHandle, period: Duration) -> Self {
        Self {
            handle,
            period,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that ends the whole session when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run `interactive` and the trigger loop until one of them finishes.
    ///
    /// Proactive messages are delivered to `proactive`; the interactive side
    /// is expected to hold the receiving end and print them.
    pub async fn run<F>(self, interactive: F, proactive: mpsc::Sender<ProactiveMessage>) -> SessionEnd
    where
        F: Future<Output = ()>,
    {
        let triggers_cancel = self.cancel.child_token();
        let triggers = run_trigger_loop(self.handle, self.period, triggers_cancel.clone(), proactive);
        tokio::pin!(interactive);
        tokio::pin!(triggers);

        let end = tokio::select! {
            _ = &mut interactive => SessionEnd::Quit,
            _ = &mut triggers => SessionEnd::TriggersStopped,
            _ = self.cancel.cancelled() => SessionEnd::Cancelled,
        };

        triggers_cancel.cancel();
        info!(?end, "session ended");
        end
    }
}

/// Poll triggers every `period` until `cancel` fires.
///
/// Each poll is a single actor command, so it never interleaves with a user
/// query. Returns early only if the orchestrator is gone.
pub async fn run_trigger_loop(
    handle: OrchestratorHandle,
    period: Duration,
    cancel: CancellationToken,
    proactive: mpsc::Sender<ProactiveMessage>,
) {
    info!(period_secs = period.as_secs_f64(), "trigger loop started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("trigger loop cancelled");
                return;
            }
            _ = tokio::time::sleep(period) => {}
        }

        let report = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("trigger loop cancelled during a cycle");
                return;
            }
            report = handle.check_triggers() => report,
        };

        let report = match report {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "stopping trigger loop");
                return;
            }
        };

        debug!(
            cycle = report.cycle,
            fired = report.fired.len(),
            failed = report.failures.len(),
            "trigger cycle complete"
        );

        for message in report.fired {
            if proactive.send(message).await.is_err() {
                debug!("no listener for proactive messages");
            }
        }
    }
}
