//! `aide ask`: one query, one answer, no trigger loop.

use aide_core::agent::QueryOptions;
use aide_infra::bootstrap::build_orchestrator;
use aide_infra::secret::env_lookup;
use aide_types::config::AideConfig;

use super::chat::renderer::ChatRenderer;
use super::thinking_spinner;

pub async fn ask(config: &AideConfig, question: &str, use_context: bool, json: bool) -> anyhow::Result<()> {
    let mut orchestrator = build_orchestrator(config, env_lookup)?;

    let options = QueryOptions {
        use_context,
        ..QueryOptions::default()
    };
    let spinner = (!json).then(|| thinking_spinner("thinking..."));
    let answer = orchestrator.process_query(question, options).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        let output = serde_json::json!({
            "question": question,
            "answer": answer,
            "responder": orchestrator.diagnostics().responder,
            "context": use_context,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let renderer = ChatRenderer::new(None);
        println!("{}", renderer.render(&answer).trim_end());
    }
    Ok(())
}
