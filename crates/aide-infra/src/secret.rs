//! API key resolution from environment variables.
//!
//! Keys are wrapped in [`SecretString`] as soon as they are read and never
//! logged.

use aide_types::error::ConfigError;
use secrecy::SecretString;

/// Process environment lookup, for production callers.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read the API key from `env_var`. Unset or blank is a fatal config error.
pub fn resolve_api_key(
    env_var: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    match lookup(env_var) {
        Some(value) if !value.trim().is_empty() => Ok(SecretString::from(value.trim().to_string())),
        _ => Err(ConfigError::MissingCredential {
            env_var: env_var.to_string(),
        }),
    }
}
