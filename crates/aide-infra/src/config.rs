//! Configuration loader.
//!
//! Reads `config.toml` from the data directory (`$AIDE_HOME`, else
//! `~/.aide/`) and then applies `AIDE_*` environment overrides. The
//! environment is consulted through a lookup closure so tests never touch
//! the process environment.

use std::path::{Path, PathBuf};

use aide_types::config::{AideConfig, ProviderConfig, ProviderSource, ResponderBackend};
use aide_types::error::ConfigError;

pub const CONFIG_FILE: &str = "config.toml";

/// `$AIDE_HOME`, else `~/.aide`, else `./.aide`.
pub fn resolve_data_dir(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(home) = lookup("AIDE_HOME").filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .map(|home| home.join(".aide"))
        .unwrap_or_else(|| PathBuf::from(".aide"))
}

/// Load `{data_dir}/config.toml`.
///
/// - Missing file: defaults.
/// - Unreadable or malformed file: logs a warning and returns defaults.
pub async fn load_config(data_dir: &Path) -> AideConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AideConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AideConfig::default();
        }
    };

    match toml::from_str::<AideConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", config_path.display());
            AideConfig::default()
        }
    }
}

/// Load an explicitly named config file. Any failure is fatal.
pub async fn load_config_file(path: &Path) -> Result<AideConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Apply `AIDE_*` overrides on top of the file configuration.
///
/// `AIDE_PROVIDERS` replaces the configured provider list.
pub fn apply_env_overrides(
    config: &mut AideConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(backend) = get("AIDE_RESPONDER") {
        config.responder.backend =
            backend
                .parse::<ResponderBackend>()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: "AIDE_RESPONDER".to_string(),
                    reason,
                })?;
    }
    if let Some(model) = get("AIDE_MODEL") {
        config.responder.model = Some(model);
    }
    if let Some(base_url) = get("AIDE_BASE_URL") {
        config.responder.base_url = Some(base_url);
    }
    if let Some(max_history) = get("AIDE_MAX_HISTORY") {
        config.max_history = parse_number("AIDE_MAX_HISTORY", &max_history)?;
    }
    if let Some(interval) = get("AIDE_TRIGGER_INTERVAL_SECS") {
        config.trigger_interval_secs = parse_number("AIDE_TRIGGER_INTERVAL_SECS", &interval)?;
    }
    if let Some(specs) = get("AIDE_PROVIDERS") {
        config.context.providers = specs
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_provider_spec)
            .collect::<Result<_, _>>()?;
    }
    Ok(())
}

/// Reject values that would make the session misbehave.
pub fn validate(config: &AideConfig) -> Result<(), ConfigError> {
    if config.trigger_interval_secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: "trigger_interval_secs".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if config.responder.max_tokens == 0 {
        return Err(ConfigError::InvalidValue {
            key: "responder.max_tokens".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Parse `[name=]kind:arg`, e.g. `file:~/tasks.md` or `agenda=http:https://...`.
///
/// Without an explicit name one is derived from the argument.
pub fn parse_provider_spec(spec: &str) -> Result<ProviderConfig, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: "AIDE_PROVIDERS".to_string(),
        reason: format!("'{spec}': {reason}"),
    };

    let (name, rest) = match spec.split_once('=') {
        Some((name, rest)) if !name.contains(':') => (Some(name.trim()), rest),
        _ => (None, spec),
    };
    let (kind, arg) = rest
        .split_once(':')
        .ok_or_else(|| invalid("expected kind:arg"))?;
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(invalid("missing argument"));
    }

    let source = match kind.trim() {
        "file" => ProviderSource::File {
            path: PathBuf::from(arg),
        },
        "http" | "https" => ProviderSource::Http {
            // `http:https://x` and the shorthand `https://x` both work.
            url: if arg.starts_with("//") {
                format!("{}:{arg}", kind.trim())
            } else {
                arg.to_string()
            },
        },
        "static" => ProviderSource::Static {
            text: arg.to_string(),
        },
        "command" => {
            let mut words = arg.split_whitespace().map(str::to_string);
            let program = words.next().ok_or_else(|| invalid("missing program"))?;
            ProviderSource::Command {
                program,
                args: words.collect(),
                timeout_secs: 10,
            }
        }
        other => return Err(invalid(&format!("unknown provider kind '{other}'"))),
    };

    let name = match name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => derive_name(&source),
    };
    Ok(ProviderConfig { name, source })
}

fn derive_name(source: &ProviderSource) -> String {
    match source {
        ProviderSource::File { path } => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string()),
        ProviderSource::Http { url } => reqwest::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string()),
        ProviderSource::Static { .. } => "note".to_string(),
        ProviderSource::Command { program, .. } => Path::new(program)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.clone()),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use aide_types::config::TriggerCondition;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.max_history, 10);
        assert_eq!(config.trigger_interval_secs, 60);
        assert!(config.context.providers.is_empty());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
max_history = 4

[[context.providers]]
name = "tasks"
kind = "file"
path = "~/tasks.md"

[[triggers]]
name = "standup"
prompt = "Prepare me for standup"
when = { kind = "daily_at", time = "09:55" }
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.max_history, 4);
        assert_eq!(config.context.providers[0].name, "tasks");
        assert_eq!(
            config.triggers[0].when,
            TriggerCondition::DailyAt {
                time: "09:55".to_string()
            }
        );
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.max_history, 10);
    }

    #[tokio::test]
    async fn load_config_file_invalid_toml_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        tokio::fs::write(&path, "max_history = \"lots\"").await.unwrap();

        let err = load_config_file(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = load_config_file(&tmp.path().join("absent.toml")).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn resolve_data_dir_prefers_aide_home() {
        let dir = resolve_data_dir(env(&[("AIDE_HOME", "/srv/aide")]));
        assert_eq!(dir, PathBuf::from("/srv/aide"));

        let dir = resolve_data_dir(env(&[]));
        assert!(dir.ends_with(".aide"));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AideConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("AIDE_RESPONDER", "openai"),
                ("AIDE_MODEL", "gpt-4.1-mini"),
                ("AIDE_BASE_URL", "http://localhost:11434/v1"),
                ("AIDE_MAX_HISTORY", "6"),
                ("AIDE_TRIGGER_INTERVAL_SECS", "30"),
                ("AIDE_PROVIDERS", "file:~/tasks.md, agenda=http:https://cal.example.com/today"),
            ]),
        )
        .unwrap();

        assert_eq!(config.responder.backend, ResponderBackend::OpenAiCompatible);
        assert_eq!(config.responder.model(), "gpt-4.1-mini");
        assert_eq!(config.responder.base_url.as_deref(), Some("http://localhost:11434/v1"));
        assert_eq!(config.max_history, 6);
        assert_eq!(config.trigger_interval_secs, 30);
        assert_eq!(config.context.providers.len(), 2);
        assert_eq!(config.context.providers[0].name, "tasks");
        assert_eq!(config.context.providers[1].name, "agenda");
        assert_eq!(
            config.context.providers[1].source,
            ProviderSource::Http {
                url: "https://cal.example.com/today".to_string()
            }
        );
    }

    #[test]
    fn env_overrides_reject_bad_numbers() {
        let mut config = AideConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("AIDE_MAX_HISTORY", "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "AIDE_MAX_HISTORY"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = AideConfig::default();
        apply_env_overrides(&mut config, env(&[("AIDE_MODEL", "  ")])).unwrap();
        assert!(config.responder.model.is_none());
    }

    #[test]
    fn provider_specs() {
        let https = parse_provider_spec("https://feeds.example.org/inbox.txt").unwrap();
        assert_eq!(https.name, "feeds.example.org");
        assert_eq!(
            https.source,
            ProviderSource::Http {
                url: "https://feeds.example.org/inbox.txt".to_string()
            }
        );

        let cmd = parse_provider_spec("command:/usr/bin/khal list today").unwrap();
        assert_eq!(cmd.name, "khal");
        assert_eq!(
            cmd.source,
            ProviderSource::Command {
                program: "/usr/bin/khal".to_string(),
                args: vec!["list".to_string(), "today".to_string()],
                timeout_secs: 10,
            }
        );

        let note = parse_provider_spec("prefs=static:I prefer mornings").unwrap();
        assert_eq!(note.name, "prefs");

        assert!(parse_provider_spec("ftp:somewhere").is_err());
        assert!(parse_provider_spec("file:").is_err());
        assert!(parse_provider_spec("justtext").is_err());
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = AideConfig::default();
        assert!(validate(&config).is_ok());
        config.trigger_interval_secs = 0;
        assert!(validate(&config).is_err());
    }
}
