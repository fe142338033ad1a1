//! Wires configuration into a ready-to-spawn [`Orchestrator`].

use aide_core::agent::{Orchestrator, OrchestratorSettings};
use aide_core::trigger::TriggerSet;
use aide_types::config::AideConfig;
use aide_types::error::ConfigError;
use tracing::info;

use crate::config::validate;
use crate::llm::create_responder;
use crate::provider::build_providers;
use crate::secret::resolve_api_key;

/// Build the orchestrator described by `config`.
///
/// Fails on a missing credential, an invalid provider or trigger, or a
/// responder that cannot be constructed. All of these are startup faults.
pub fn build_orchestrator(
    config: &AideConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Orchestrator, ConfigError> {
    validate(config)?;

    let key_env = config.responder.api_key_env();
    let responder = create_responder(&config.responder, resolve_api_key(key_env, &lookup)?, None)?;
    let providers = build_providers(&config.context.providers)?;
    let triggers = TriggerSet::from_config(&config.triggers).map_err(|e| ConfigError::InvalidValue {
        key: "triggers".to_string(),
        reason: e.to_string(),
    })?;

    info!(
        responder = responder.name(),
        model = config.responder.model(),
        providers = providers.len(),
        triggers = triggers.len(),
        "orchestrator configured"
    );

    let mut orchestrator = Orchestrator::new(OrchestratorSettings::from_config(config), responder)
        .with_providers(providers)
        .with_triggers(triggers);

    if let Some(model) = config.probe.model.as_deref() {
        let probe = create_responder(&config.responder, resolve_api_key(key_env, &lookup)?, Some(model))?;
        orchestrator = orchestrator.with_probe_responder(probe);
    }

    Ok(orchestrator)
}
