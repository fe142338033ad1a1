//! ContextProvider trait definition.

use aide_types::error::ProviderError;

/// A source of situational text (calendar, files, a command's output...).
///
/// `fetch` is read-only from the orchestrator's point of view and may be
/// slow or fail; failures are recovered during assembly. An empty string
/// means "nothing to report".
pub trait ContextProvider: Send + Sync {
    /// Label used in the assembled context block and in diagnostics.
    fn name(&self) -> &str;

    fn fetch(&self) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;
}
