//! Concrete context providers and the factory that builds them from config.

pub mod command;
pub mod file;
pub mod http;
pub mod static_text;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use aide_core::context::BoxContextProvider;
use aide_types::config::{ProviderConfig, ProviderSource};
use aide_types::error::ConfigError;

pub use command::CommandProvider;
pub use file::FileProvider;
pub use http::HttpProvider;
pub use static_text::StaticProvider;

pub fn build_provider(config: &ProviderConfig) -> Result<BoxContextProvider, ConfigError> {
    let name = config.name.clone();
    Ok(match &config.source {
        ProviderSource::File { path } => {
            BoxContextProvider::new(FileProvider::new(name, expand_home(path)))
        }
        ProviderSource::Http { url } => BoxContextProvider::new(HttpProvider::new(name, url)?),
        ProviderSource::Static { text } => BoxContextProvider::new(StaticProvider::new(name, text)),
        ProviderSource::Command {
            program,
            args,
            timeout_secs,
        } => BoxContextProvider::new(CommandProvider::new(
            name,
            program,
            args.clone(),
            Duration::from_secs(*timeout_secs),
        )),
    })
}

/// Build every configured provider, in order. Names must be unique.
pub fn build_providers(configs: &[ProviderConfig]) -> Result<Vec<BoxContextProvider>, ConfigError> {
    let mut seen = HashSet::new();
    configs
        .iter()
        .map(|config| {
            if config.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "context.providers.name".to_string(),
                    reason: "provider name must not be empty".to_string(),
                });
            }
            if !seen.insert(config.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    key: "context.providers.name".to_string(),
                    reason: format!("duplicate provider name '{}'", config.name),
                });
            }
            build_provider(config)
        })
        .collect()
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
