//! Orchestration core for aide.
//!
//! This crate defines the collaborator "ports" (`Responder`,
//! `ContextProvider`) that the infrastructure layer implements, and the
//! logic that drives them: the bounded conversation store, the trigger
//! table, the `Orchestrator`, and the session driver that runs interactive
//! input and trigger polling side by side. It depends only on `aide-types`
//! -- never on `aide-infra` or any network crate.

pub mod agent;
pub mod chat;
pub mod context;
pub mod responder;
pub mod trigger;

#[cfg(test)]
pub(crate) mod testing;
