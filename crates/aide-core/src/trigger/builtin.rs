//! Built-in trigger predicates.

use aide_types::error::TriggerError;
use chrono::{NaiveTime, Timelike};

use super::predicate::TriggerPredicate;
use super::set::TriggerTick;
use crate::agent::Orchestrator;

type CheckFn = dyn Fn() -> Result<bool, TriggerError> + Send + Sync;

/// Wraps a zero-argument closure.
pub struct FnPredicate {
    check: Box<CheckFn>,
}

impl FnPredicate {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            check: Box::new(move || Ok(check())),
        }
    }

    pub fn fallible<F>(check: F) -> Self
    where
        F: Fn() -> Result<bool, TriggerError> + Send + Sync + 'static,
    {
        Self {
            check: Box::new(check),
        }
    }
}

impl TriggerPredicate for FnPredicate {
    async fn evaluate(
        &self,
        _orchestrator: &mut Orchestrator,
        _tick: &TriggerTick,
    ) -> Result<bool, TriggerError> {
        (self.check)()
    }
}

/// True during one local wall-clock minute each day.
#[derive(Debug, Clone, Copy)]
pub struct DailyAt {
    at: NaiveTime,
}

impl DailyAt {
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    /// Parse `HH:MM` (24-hour).
    pub fn parse(name: &str, time: &str) -> Result<Self, TriggerError> {
        NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .map(Self::new)
            .map_err(|e| TriggerError::Invalid {
                name: name.to_string(),
                reason: format!("expected HH:MM, got '{time}': {e}"),
            })
    }
}

impl TriggerPredicate for DailyAt {
    async fn evaluate(
        &self,
        _orchestrator: &mut Orchestrator,
        tick: &TriggerTick,
    ) -> Result<bool, TriggerError> {
        Ok(tick.now.hour() == self.at.hour() && tick.now.minute() == self.at.minute())
    }
}

/// True on every Nth evaluation cycle.
#[derive(Debug, Clone, Copy)]
pub struct EveryCycles {
    cycles: u64,
}

impl EveryCycles {
    pub fn new(name: &str, cycles: u64) -> Result<Self, TriggerError> {
        if cycles == 0 {
            return Err(TriggerError::Invalid {
                name: name.to_string(),
                reason: "cycles must be at least 1".to_string(),
            });
        }
        Ok(Self { cycles })
    }
}

impl TriggerPredicate for EveryCycles {
    async fn evaluate(
        &self,
        _orchestrator: &mut Orchestrator,
        tick: &TriggerTick,
    ) -> Result<bool, TriggerError> {
        Ok(tick.cycle % self.cycles == 0)
    }
}

/// Asks the responder whether to speak up, via a non-committing probe.
#[derive(Debug, Clone)]
pub struct ProbePredicate {
    question: String,
}

impl ProbePredicate {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

impl TriggerPredicate for ProbePredicate {
    async fn evaluate(
        &self,
        orchestrator: &mut Orchestrator,
        _tick: &TriggerTick,
    ) -> Result<bool, TriggerError> {
        orchestrator.probe(&self.question).await
    }
}
