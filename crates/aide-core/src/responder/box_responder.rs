//! BoxResponder -- object-safe dynamic dispatch wrapper for Responder.
//!
//! `Responder` uses RPITIT and cannot be a trait object directly, so an
//! object-safe `ResponderDyn` with boxed futures is blanket-implemented for
//! every `T: Responder`, and `BoxResponder` delegates to it.

use std::future::Future;
use std::pin::Pin;

use aide_types::error::ResponderError;
use aide_types::message::Message;

use super::port::Responder;

/// Object-safe version of [`Responder`] with boxed futures.
pub trait ResponderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn respond_boxed<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<String, ResponderError>> + Send + 'a>>;
}

impl<T: Responder> ResponderDyn for T {
    fn name(&self) -> &str {
        Responder::name(self)
    }

    fn respond_boxed<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<String, ResponderError>> + Send + 'a>> {
        Box::pin(self.respond(messages))
    }
}

/// Type-erased responder, selected at runtime from configuration.
pub struct BoxResponder {
    inner: Box<dyn ResponderDyn + Send + Sync>,
}

impl BoxResponder {
    pub fn new<T: Responder + 'static>(responder: T) -> Self {
        Self {
            inner: Box::new(responder),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn respond(&self, messages: &[Message]) -> Result<String, ResponderError> {
        self.inner.respond_boxed(messages).await
    }
}

impl std::fmt::Debug for BoxResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxResponder")
            .field("name", &self.name())
            .finish()
    }
}
