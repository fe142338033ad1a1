//! TriggerPredicate trait and its object-safe wrapper.

use std::future::Future;
use std::pin::Pin;

use aide_types::error::TriggerError;

use super::set::TriggerTick;
use crate::agent::Orchestrator;

/// Decides whether a trigger fires this cycle.
///
/// An `Err` is logged by the trigger loop and the trigger is skipped for
/// the cycle; it never stops polling.
pub trait TriggerPredicate: Send + Sync {
    fn evaluate(
        &self,
        orchestrator: &mut Orchestrator,
        tick: &TriggerTick,
    ) -> impl Future<Output = Result<bool, TriggerError>> + Send;
}

/// Object-safe version of [`TriggerPredicate`].
pub trait TriggerPredicateDyn: Send + Sync {
    fn evaluate_boxed<'a>(
        &'a self,
        orchestrator: &'a mut Orchestrator,
        tick: &'a TriggerTick,
    ) -> Pin<Box<dyn Future<Output = Result<bool, TriggerError>> + Send + 'a>>;
}

impl<T: TriggerPredicate> TriggerPredicateDyn for T {
    fn evaluate_boxed<'a>(
        &'a self,
        orchestrator: &'a mut Orchestrator,
        tick: &'a TriggerTick,
    ) -> Pin<Box<dyn Future<Output = Result<bool, TriggerError>> + Send + 'a>> {
        Box::pin(self.evaluate(orchestrator, tick))
    }
}

/// Type-erased predicate stored in a [`super::Trigger`].
pub struct BoxTriggerPredicate {
    inner: Box<dyn TriggerPredicateDyn + Send + Sync>,
}

impl BoxTriggerPredicate {
    pub fn new<T: TriggerPredicate + 'static>(predicate: T) -> Self {
        Self {
            inner: Box::new(predicate),
        }
    }

    pub async fn evaluate(
        &self,
        orchestrator: &mut Orchestrator,
        tick: &TriggerTick,
    ) -> Result<bool, TriggerError> {
        self.inner.evaluate_boxed(orchestrator, tick).await
    }
}
