//! Read-only status snapshot of a running orchestrator, for diagnostics.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Point-in-time view of the orchestrator, returned by the status command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    pub responder: String,
    pub providers: Vec<ProviderStatus>,
    pub flags: Vec<(String, bool)>,
    pub history_len: usize,
    pub max_history: usize,
    pub triggers: Vec<String>,
    /// Trigger evaluation cycles completed so far.
    pub trigger_cycles: u64,
}

/// One registered context provider as seen by diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub name: String,
    /// Last successful fetch, if any.
    pub last_updated: Option<DateTime<Local>>,
}
