//! Infrastructure for aide: responder backends (Anthropic, OpenAI-compatible),
//! concrete context providers, config loading and credential lookup.

pub mod bootstrap;
pub mod config;
pub mod llm;
pub mod provider;
pub mod secret;
