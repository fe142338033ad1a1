//! Configuration types for aide.
//!
//! `AideConfig` is the top-level `config.toml`. Every field has a default so
//! an empty (or missing) file yields a working setup once a credential is
//! present in the environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AideConfig {
    /// Fixed system preamble of every conversation window.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Number of non-system messages retained in the conversation.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Seconds between trigger evaluation cycles.
    #[serde(default = "default_trigger_interval_secs")]
    pub trigger_interval_secs: u64,

    /// Text returned in place of a response when the responder fails.
    #[serde(default = "default_apology")]
    pub apology: String,

    #[serde(default)]
    pub responder: ResponderConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub context: ContextConfig,

    /// Proactive triggers, evaluated in declaration order.
    #[serde(default)]
    pub triggers: Vec<TriggerConfig>,
}

pub fn default_system_prompt() -> String {
    "You are a helpful personal assistant. Each user turn may begin with the \
     current time and fresh data from the user's calendar, tasks and email. \
     Use that data when it is relevant and answer concisely."
        .to_string()
}

fn default_max_history() -> usize {
    10
}

fn default_trigger_interval_secs() -> u64 {
    60
}

pub fn default_apology() -> String {
    "I apologize, but I encountered an error processing your request.".to_string()
}

impl Default for AideConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            max_history: default_max_history(),
            trigger_interval_secs: default_trigger_interval_secs(),
            apology: default_apology(),
            responder: ResponderConfig::default(),
            probe: ProbeConfig::default(),
            context: ContextConfig::default(),
            triggers: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Responder
// ---------------------------------------------------------------------------

/// Language-model backend used as the responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponderBackend {
    #[default]
    Anthropic,
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
}

impl ResponderBackend {
    /// Model used when the config names none.
    pub fn default_model(&self) -> &'static str {
        match self {
            ResponderBackend::Anthropic => "claude-sonnet-4-20250514",
            ResponderBackend::OpenAiCompatible => "gpt-4o-mini",
        }
    }

    /// Environment variable holding the API key when the config names none.
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            ResponderBackend::Anthropic => "ANTHROPIC_API_KEY",
            ResponderBackend::OpenAiCompatible => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for ResponderBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponderBackend::Anthropic => write!(f, "anthropic"),
            ResponderBackend::OpenAiCompatible => write!(f, "openai_compatible"),
        }
    }
}

impl FromStr for ResponderBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ResponderBackend::Anthropic),
            "openai_compatible" | "openai" => Ok(ResponderBackend::OpenAiCompatible),
            other => Err(format!("invalid responder backend: '{other}'")),
        }
    }
}

/// Responder backend, model and credential selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    #[serde(default)]
    pub backend: ResponderBackend,
    #[serde(default)]
    pub model: Option<String>,
    /// Override the API base URL (proxies, self-hosted gateways).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
}

fn default_max_tokens() -> u32 {
    1024
}

impl ResponderConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.backend.default_api_key_env())
    }
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            backend: ResponderBackend::default(),
            model: None,
            base_url: None,
            api_key_env: None,
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Probe queries
// ---------------------------------------------------------------------------

/// Whether trigger probes may spend a responder call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    /// Probe predicates always answer "no" without calling the responder.
    Off,
    #[default]
    Responder,
}

/// Cost controls for trigger probe queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub mode: ProbeMode,
    /// Attach provider context to probe questions.
    #[serde(default)]
    pub use_context: bool,
    /// Cheaper model for probes; uses the main responder when unset.
    #[serde(default)]
    pub model: Option<String>,
}

// ---------------------------------------------------------------------------
// Context providers
// ---------------------------------------------------------------------------

/// How providers are chosen for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSelection {
    /// Every registered provider contributes to every query.
    #[default]
    All,
    /// Ask the responder which providers are relevant first.
    Classified,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default)]
    pub selection: ContextSelection,
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// One registered context provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(flatten)]
    pub source: ProviderSource,
}

/// Where a provider reads its block from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderSource {
    /// A local text file (exported agenda, task list, mail digest).
    File { path: PathBuf },
    /// A text feed fetched with HTTP GET.
    Http { url: String },
    /// Fixed text.
    Static { text: String },
    /// Stdout of a read-only command.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default = "default_command_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_command_timeout_secs() -> u64 {
    10
}

impl ProviderSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderSource::File { .. } => "file",
            ProviderSource::Http { .. } => "http",
            ProviderSource::Static { .. } => "static",
            ProviderSource::Command { .. } => "command",
        }
    }
}

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// A proactive trigger descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub name: String,
    /// Query issued on the user's behalf when the condition holds.
    pub prompt: String,
    pub when: TriggerCondition,
}

/// Built-in trigger conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerCondition {
    /// Local wall-clock minute, `HH:MM`.
    DailyAt { time: String },
    /// Every N evaluation cycles.
    Every { cycles: u64 },
    /// Ask the responder whether a proactive message is warranted.
    Probe { question: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = AideConfig::default();
        assert_eq!(config.max_history, 10);
        assert_eq!(config.trigger_interval_secs, 60);
        assert_eq!(config.responder.backend, ResponderBackend::Anthropic);
        assert_eq!(config.probe.mode, ProbeMode::Responder);
        assert_eq!(config.context.selection, ContextSelection::All);
        assert!(config.triggers.is_empty());
    }

    #[test]
    fn test_config_deserialize_empty_uses_defaults() {
        let config: AideConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_history, 10);
        assert_eq!(config.apology, default_apology());
        assert_eq!(config.responder.max_tokens, 1024);
    }

    #[test]
    fn test_config_deserialize_full() {
        let toml_str = r#"
max_history = 4
trigger_interval_secs = 30

[responder]
backend = "openai_compatible"
model = "gpt-4o"
base_url = "http://localhost:11434/v1"
api_key_env = "LOCAL_KEY"

[probe]
mode = "off"

[context]
selection = "classified"

[[context.providers]]
name = "tasks"
kind = "file"
path = "/home/me/tasks.md"

[[context.providers]]
name = "agenda"
kind = "command"
program = "gcalcli"
args = ["agenda"]

[[triggers]]
name = "morning"
prompt = "Give me my morning briefing."
when = { kind = "daily_at", time = "08:30" }

[[triggers]]
name = "nudge"
prompt = "Anything I should know?"
when = { kind = "probe", question = "Is a meeting starting soon?" }
"#;
        let config: AideConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_history, 4);
        assert_eq!(config.responder.backend, ResponderBackend::OpenAiCompatible);
        assert_eq!(config.responder.model(), "gpt-4o");
        assert_eq!(config.responder.api_key_env(), "LOCAL_KEY");
        assert_eq!(config.probe.mode, ProbeMode::Off);
        assert_eq!(config.context.selection, ContextSelection::Classified);
        assert_eq!(config.context.providers.len(), 2);
        assert_eq!(
            config.context.providers[0].source,
            ProviderSource::File {
                path: PathBuf::from("/home/me/tasks.md")
            }
        );
        match &config.context.providers[1].source {
            ProviderSource::Command {
                program,
                args,
                timeout_secs,
            } => {
                assert_eq!(program, "gcalcli");
                assert_eq!(args, &vec!["agenda".to_string()]);
                assert_eq!(*timeout_secs, 10);
            }
            other => panic!("expected command source, got {other:?}"),
        }
        assert_eq!(config.triggers.len(), 2);
        assert_eq!(
            config.triggers[0].when,
            TriggerCondition::DailyAt {
                time: "08:30".to_string()
            }
        );
    }

    #[test]
    fn test_responder_defaults_follow_backend() {
        let mut responder = ResponderConfig::default();
        assert_eq!(responder.model(), "claude-sonnet-4-20250514");
        assert_eq!(responder.api_key_env(), "ANTHROPIC_API_KEY");
        responder.backend = ResponderBackend::OpenAiCompatible;
        assert_eq!(responder.api_key_env(), "OPENAI_API_KEY");
    }

    #[test]
    fn test_responder_backend_roundtrip() {
        for backend in [ResponderBackend::Anthropic, ResponderBackend::OpenAiCompatible] {
            let parsed: ResponderBackend = backend.to_string().parse().unwrap();
            assert_eq!(backend, parsed);
        }
        assert_eq!(
            "openai".parse::<ResponderBackend>().unwrap(),
            ResponderBackend::OpenAiCompatible
        );
    }
}
