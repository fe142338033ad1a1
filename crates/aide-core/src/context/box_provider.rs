//! BoxContextProvider -- object-safe wrapper for ContextProvider.
//!
//! Same blanket-impl arrangement as [`crate::responder::BoxResponder`].

use std::future::Future;
use std::pin::Pin;

use aide_types::error::ProviderError;

use super::port::ContextProvider;

/// Object-safe version of [`ContextProvider`] with boxed futures.
pub trait ContextProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn fetch_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;
}

impl<T: ContextProvider> ContextProviderDyn for T {
    fn name(&self) -> &str {
        ContextProvider::name(self)
    }

    fn fetch_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>> {
        Box::pin(self.fetch())
    }
}

/// Type-erased context provider.
pub struct BoxContextProvider {
    inner: Box<dyn ContextProviderDyn + Send + Sync>,
}

impl BoxContextProvider {
    pub fn new<T: ContextProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn fetch(&self) -> Result<String, ProviderError> {
        self.inner.fetch_boxed().await
    }
}

impl std::fmt::Debug for BoxContextProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxContextProvider")
            .field("name", &self.name())
            .finish()
    }
}
