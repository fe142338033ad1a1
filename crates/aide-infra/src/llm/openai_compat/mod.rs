//! OpenAI-compatible chat completions responder.
//!
//! Works against OpenAI itself or any server speaking the same protocol
//! (local model servers, gateways) via a configurable base URL. Uses
//! [`async_openai`] for the request/response types.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use aide_core::responder::Responder;
use aide_types::error::ResponderError;
use aide_types::message::{Message, MessageRole};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Does not derive `Debug`: the client holds the API key.
pub struct OpenAiCompatibleResponder {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl OpenAiCompatibleResponder {
    pub fn new(api_key: &SecretString, base_url: Option<&str>, model: impl Into<String>) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(base_url.unwrap_or(OPENAI_BASE_URL));

        Self {
            client: Client::with_config(config),
            model: model.into(),
            max_tokens: 1024,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_request(&self, messages: &[Message]) -> CreateChatCompletionRequest {
        let messages = messages.iter().map(to_openai_message).collect();

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_completion_tokens: Some(self.max_tokens),
            temperature: self.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

fn to_openai_message(message: &Message) -> ChatCompletionRequestMessage {
    let content = message.content().to_string();
    match message.role() {
        MessageRole::System => {
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(content),
                name: None,
            })
        }
        MessageRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(content),
            name: None,
        }),
        MessageRole::Assistant => {
            #[allow(deprecated)]
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(content)),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

impl Responder for OpenAiCompatibleResponder {
    fn name(&self) -> &str {
        "openai_compatible"
    }

    async fn respond(&self, messages: &[Message]) -> Result<String, ResponderError> {
        let request = self.build_request(messages);

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        debug!(id = %response.id, model = %response.model, "chat completion received");

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ResponderError::EmptyResponse);
        }
        Ok(content)
    }
}

fn map_openai_error(err: OpenAIError) -> ResponderError {
    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "invalid_api_key"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
            {
                ResponderError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                ResponderError::RateLimited {
                    retry_after_ms: None,
                }
            } else if code == "server_error" || error_type == "overloaded_error" {
                ResponderError::Overloaded(api_err.message.clone())
            } else {
                ResponderError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) => ResponderError::AuthenticationFailed,
            Some(429) => ResponderError::RateLimited {
                retry_after_ms: None,
            },
            _ => ResponderError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            ResponderError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => ResponderError::InvalidRequest(msg.clone()),
        _ => ResponderError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_responder(base_url: &str) -> OpenAiCompatibleResponder {
        OpenAiCompatibleResponder::new(&SecretString::from("sk-test"), Some(base_url), "gpt-4o-mini")
    }

    #[test]
    fn test_build_request_keeps_roles_in_order() {
        let responder = make_responder(OPENAI_BASE_URL).with_temperature(Some(0.2));
        let req = responder.build_request(&[
            Message::system("sys"),
            Message::user("hi"),
            Message::assistant("hello"),
        ]);

        assert_eq!(req.model, "gpt-4o-mini");
        assert_eq!(req.max_completion_tokens, Some(1024));
        assert_eq!(req.messages.len(), 3);
        assert!(matches!(req.messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(req.messages[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(req.messages[2], ChatCompletionRequestMessage::Assistant(_)));
        assert!(req.temperature.is_some());
    }

    #[tokio::test]
    async fn test_respond_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1700000000,
                "model": "gpt-4o-mini",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Sure thing."},
                    "finish_reason": "stop",
                    "logprobs": null
                }]
            })))
            .mount(&server)
            .await;

        let reply = make_responder(&server.uri())
            .respond(&[Message::system("sys"), Message::user("hi")])
            .await
            .unwrap();
        assert_eq!(reply, "Sure thing.");
    }

    #[tokio::test]
    async fn test_bad_key_maps_to_authentication_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {
                    "message": "Incorrect API key provided: sk-test.",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "invalid_api_key"
                }
            })))
            .mount(&server)
            .await;

        let err = make_responder(&server.uri())
            .respond(&[Message::system("sys"), Message::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ResponderError::AuthenticationFailed), "{err:?}");
    }
}
