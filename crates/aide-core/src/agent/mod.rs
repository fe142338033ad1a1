//! The orchestrator, its actor handle, and the session driver.

pub mod handle;
pub mod orchestrator;
pub mod session;
pub mod structured;

pub use handle::{OrchestratorHandle, spawn};
pub use orchestrator::{
    Orchestrator, OrchestratorSettings, ProactiveMessage, QueryOptions, TriggerFailure,
    TriggerReport,
};
pub use session::{SessionDriver, SessionEnd, run_trigger_loop};
