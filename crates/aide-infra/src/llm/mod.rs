//! Responder backends and the factory that picks one from configuration.

pub mod anthropic;
pub mod openai_compat;

use aide_core::responder::BoxResponder;
use aide_types::config::{ResponderBackend, ResponderConfig};
use aide_types::error::{ConfigError, ResponderError};
use aide_types::message::Message;
use secrecy::SecretString;

use self::anthropic::AnthropicResponder;
use self::openai_compat::OpenAiCompatibleResponder;

/// Build the configured responder, optionally overriding its model.
///
/// `model_override` is how the probe responder shares the main backend and
/// credentials while running a cheaper model.
pub fn create_responder(
    config: &ResponderConfig,
    api_key: SecretString,
    model_override: Option<&str>,
) -> Result<BoxResponder, ConfigError> {
    let model = model_override.unwrap_or_else(|| config.model()).to_string();

    match config.backend {
        ResponderBackend::Anthropic => {
            let mut responder = AnthropicResponder::new(api_key, model)?
                .with_max_tokens(config.max_tokens)
                .with_temperature(config.temperature);
            if let Some(base_url) = config.base_url.as_deref() {
                responder = responder.with_base_url(base_url);
            }
            Ok(BoxResponder::new(responder))
        }
        ResponderBackend::OpenAiCompatible => {
            let responder =
                OpenAiCompatibleResponder::new(&api_key, config.base_url.as_deref(), model)
                    .with_max_tokens(config.max_tokens)
                    .with_temperature(config.temperature);
            Ok(BoxResponder::new(responder))
        }
    }
}

/// Send a one-line exchange to verify the endpoint and credentials.
pub async fn check_responder(responder: &BoxResponder) -> Result<String, ResponderError> {
    let window = [
        Message::system("Reply with the single word: pong"),
        Message::user("ping"),
    ];
    responder.respond(&window).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_anthropic_by_default() {
        let config = ResponderConfig::default();
        let responder = create_responder(&config, SecretString::from("k"), None).unwrap();
        assert_eq!(responder.name(), "anthropic");
    }

    #[test]
    fn test_create_openai_compatible() {
        let config = ResponderConfig {
            backend: ResponderBackend::OpenAiCompatible,
            base_url: Some("http://localhost:11434/v1".to_string()),
            ..ResponderConfig::default()
        };
        let responder = create_responder(&config, SecretString::from("k"), Some("llama3")).unwrap();
        assert_eq!(responder.name(), "openai_compatible");
    }
}
