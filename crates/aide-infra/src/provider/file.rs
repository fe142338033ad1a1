//! Reads a local text file (exported agenda, task list, mail digest).

use std::path::PathBuf;

use aide_core::context::ContextProvider;
use aide_types::error::ProviderError;

pub struct FileProvider {
    name: String,
    path: PathBuf,
}

impl FileProvider {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl ContextProvider for FileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, ProviderError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProviderError::Io(format!("{}: {e}", self.path.display())))
    }
}
