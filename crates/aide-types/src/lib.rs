//! Shared domain types for aide.
//!
//! This crate contains the types passed between the orchestration core and
//! its adapters: chat messages, runtime flags, configuration, status
//! snapshots, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod flags;
pub mod message;
pub mod status;
