//! Conversation state owned by the orchestrator.

pub mod store;
