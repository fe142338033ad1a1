//! Responder trait definition.
//!
//! Implementations live in aide-infra (`AnthropicResponder`,
//! `OpenAiCompatibleResponder`) and in test doubles.

use aide_types::error::ResponderError;
use aide_types::message::Message;

/// A backend that produces a single reply for an ordered message window.
///
/// The window always starts with the system message. Implementations must
/// not retain or mutate it; the orchestrator owns conversation state.
pub trait Responder: Send + Sync {
    /// Human-readable backend name (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Produce the assistant reply for `messages`.
    fn respond(
        &self,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<String, ResponderError>> + Send;
}
