//! Fetches a plain-text feed with HTTP GET.

use std::time::Duration;

use aide_core::context::ContextProvider;
use aide_types::error::{ConfigError, ProviderError};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

pub struct HttpProvider {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let name = name.into();
        reqwest::Url::parse(&url).map_err(|e| ConfigError::InvalidValue {
            key: format!("context.providers.{name}.url"),
            reason: e.to_string(),
        })?;
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: format!("context.providers.{name}"),
                reason: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { name, url, client })
    }
}

impl ContextProvider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(FETCH_TIMEOUT.as_millis() as u64)
                } else {
                    ProviderError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http(format!("HTTP {status} from {}", self.url)));
        }
        response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))
    }
}
