use thiserror::Error;

/// A single context provider failed to produce its block.
///
/// Always recovered by the orchestrator: the provider contributes an error
/// marker and context assembly continues with the remaining providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("io error: {0}")]
    Io(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("command failed: {0}")]
    Command(String),

    #[error("timed out after {0}ms")]
    Timeout(u64),

    #[error("{0}")]
    Other(String),
}

/// Errors from a responder call (network, auth, rate limit, bad payload).
///
/// Recovered at the query boundary; the caller sees an apology string.
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("empty response")]
    EmptyResponse,
}

/// A trigger's condition check failed. The trigger is skipped for the cycle.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("predicate failed: {0}")]
    Predicate(String),

    #[error("probe failed: {0}")]
    Probe(String),

    #[error("invalid trigger '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

/// Startup configuration faults. These are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential: set the {env_var} environment variable")]
    MissingCredential { env_var: String },

    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("responder setup failed: {0}")]
    Responder(String),
}

/// The orchestrator task is gone (its channel closed).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("orchestrator is no longer running")]
    Closed,
}
