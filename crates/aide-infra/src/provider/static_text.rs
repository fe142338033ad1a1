use aide_core::context::ContextProvider;
use aide_types::error::ProviderError;

/// Fixed text, e.g. standing preferences or a weekly routine.
pub struct StaticProvider {
    name: String,
    text: String,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl ContextProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, ProviderError> {
        Ok(self.text.clone())
    }
}
