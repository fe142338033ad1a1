//! Proactive triggers.
//!
//! A trigger is a named predicate plus the prompt to run when it holds.
//! Predicates receive the orchestrator explicitly so they can issue probe
//! queries, and a [`TriggerTick`] describing the current cycle.

pub mod builtin;
pub mod predicate;
pub mod set;

pub use builtin::{DailyAt, EveryCycles, FnPredicate, ProbePredicate};
pub use predicate::{BoxTriggerPredicate, TriggerPredicate};
pub use set::{Trigger, TriggerSet, TriggerTick};
