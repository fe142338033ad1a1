//! Anthropic Messages API responder.

pub mod client;
pub mod types;

pub use client::AnthropicResponder;
