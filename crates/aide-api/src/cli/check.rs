//! `aide check`: build everything the session would build, report, and
//! optionally ping the responder.

use aide_infra::bootstrap::build_orchestrator;
use aide_infra::llm::{check_responder, create_responder};
use aide_infra::secret::{env_lookup, resolve_api_key};
use aide_types::config::AideConfig;
use console::style;

pub async fn check(config: &AideConfig, ping: bool, json: bool) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(config, env_lookup)?;
    let diagnostics = orchestrator.diagnostics();

    let ping_result = if ping {
        let key = resolve_api_key(config.responder.api_key_env(), env_lookup)?;
        let responder = create_responder(&config.responder, key, None)?;
        Some(check_responder(&responder).await.map_err(|e| e.to_string()))
    } else {
        None
    };

    if json {
        let output = serde_json::json!({
            "responder": diagnostics.responder,
            "model": config.responder.model(),
            "providers": diagnostics.providers.iter().map(|p| &p.name).collect::<Vec<_>>(),
            "triggers": diagnostics.triggers,
            "trigger_interval_secs": config.trigger_interval_secs,
            "ping": ping_result.as_ref().map(|r| match r {
                Ok(reply) => serde_json::json!({"ok": true, "reply": reply}),
                Err(error) => serde_json::json!({"ok": false, "error": error}),
            }),
            "healthy": ping_result.as_ref().is_none_or(|r| r.is_ok()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let ok = format!("{}", style("✓").green());
        println!();
        println!("  {} Configuration loaded", ok);
        println!(
            "  {} Responder: {} ({})",
            ok,
            diagnostics.responder,
            config.responder.model()
        );
        println!("  {} {} context provider(s)", ok, diagnostics.providers.len());
        println!("  {} {} trigger(s)", ok, diagnostics.triggers.len());
        match &ping_result {
            Some(Ok(reply)) => println!("  {} Responder answered: {}", ok, style(reply.trim()).dim()),
            Some(Err(error)) => println!("  {} Responder failed: {error}", style("✗").red()),
            None => {}
        }
        println!();
    }

    if let Some(Err(error)) = ping_result {
        anyhow::bail!("responder check failed: {error}");
    }
    Ok(())
}
