//! Trigger descriptors and the ordered table the trigger loop walks.

use std::collections::HashSet;

use aide_types::config::{TriggerCondition, TriggerConfig};
use aide_types::error::TriggerError;
use chrono::{DateTime, Local};

use super::builtin::{DailyAt, EveryCycles, ProbePredicate};
use super::predicate::{BoxTriggerPredicate, TriggerPredicate};

/// What a predicate knows about the current evaluation cycle.
#[derive(Debug, Clone, Copy)]
pub struct TriggerTick {
    /// 1-based cycle counter.
    pub cycle: u64,
    pub now: DateTime<Local>,
}

pub struct Trigger {
    name: String,
    predicate: BoxTriggerPredicate,
    prompt: String,
}

impl Trigger {
    pub fn new(
        name: impl Into<String>,
        predicate: impl TriggerPredicate + 'static,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: BoxTriggerPredicate::new(predicate),
            prompt: prompt.into(),
        }
    }

    pub fn from_config(config: &TriggerConfig) -> Result<Self, TriggerError> {
        let name = config.name.as_str();
        Ok(match &config.when {
            TriggerCondition::DailyAt { time } => {
                Self::new(name, DailyAt::parse(name, time)?, &config.prompt)
            }
            TriggerCondition::Every { cycles } => {
                Self::new(name, EveryCycles::new(name, *cycles)?, &config.prompt)
            }
            TriggerCondition::Probe { question } => {
                Self::new(name, ProbePredicate::new(question), &config.prompt)
            }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn predicate(&self) -> &BoxTriggerPredicate {
        &self.predicate
    }
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("name", &self.name)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

/// Triggers in declaration order. Names are unique.
#[derive(Debug, Default)]
pub struct TriggerSet {
    triggers: Vec<Trigger>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(configs: &[TriggerConfig]) -> Result<Self, TriggerError> {
        let mut set = Self::new();
        for config in configs {
            set.push(Trigger::from_config(config)?)?;
        }
        Ok(set)
    }

    pub fn push(&mut self, trigger: Trigger) -> Result<(), TriggerError> {
        if self.triggers.iter().any(|t| t.name == trigger.name) {
            return Err(TriggerError::Invalid {
                name: trigger.name,
                reason: "duplicate trigger name".to_string(),
            });
        }
        self.triggers.push(trigger);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.triggers.iter().map(|t| t.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

impl FromIterator<Trigger> for TriggerSet {
    /// Later triggers with an already-used name are dropped.
    fn from_iter<I: IntoIterator<Item = Trigger>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let triggers = iter
            .into_iter()
            .filter(|t| seen.insert(t.name.clone()))
            .collect();
        Self { triggers }
    }
}
