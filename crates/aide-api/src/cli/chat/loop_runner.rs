//! The interactive chat session.
//!
//! The orchestrator runs as an actor. A [`SessionDriver`] races this loop
//! against the trigger loop; proactive messages arrive on a channel and are
//! printed above the prompt as soon as they come in.

use std::io::Write;
use std::time::Duration;

use aide_core::agent::{OrchestratorHandle, ProactiveMessage, QueryOptions, SessionDriver, spawn};
use aide_infra::bootstrap::build_orchestrator;
use aide_infra::secret::env_lookup;
use aide_types::config::AideConfig;
use aide_types::error::SessionError;
use aide_types::flags::{AMNESIA, RuntimeFlags};
use console::style;
use rustyline_async::SharedWriter;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::banner::welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;
use super::views::{flags_view, history_view, status_view};
use crate::cli::thinking_spinner;

/// What the loop should do after one line of input.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Print(String),
    Clear,
    Quit,
}

/// Run the interactive chat session until quit, Ctrl+C or Ctrl+D.
pub async fn run_chat_loop(config: AideConfig) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(&config, env_lookup)?;
    let diagnostics = orchestrator.diagnostics();
    let (handle, _actor) = spawn(orchestrator);

    let renderer = ChatRenderer::new(None);
    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut input, mut out) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    emit(
        &mut out,
        &welcome_banner(&diagnostics, config.responder.model(), config.trigger_interval_secs),
    );

    let driver = SessionDriver::new(
        handle.clone(),
        Duration::from_secs(config.trigger_interval_secs),
    );
    tokio::spawn(cancel_on_ctrl_c(driver.cancellation_token()));

    let (proactive_tx, mut proactive_rx) = mpsc::channel(8);
    let interactive = interactive_loop(
        &handle,
        &renderer,
        &mut input,
        out.clone(),
        &mut proactive_rx,
    );
    let end = driver.run(interactive, proactive_tx).await;

    info!(?end, "chat session finished");
    emit(&mut out, &format!("\n  {}\n", style("Session ended.").dim()));
    input.flush();
    Ok(())
}

/// Cancel the session on SIGINT. While the prompt holds the terminal in raw
/// mode, Ctrl+C arrives as [`InputEvent::Interrupted`] instead.
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        cancel.cancel();
    }
}

async fn interactive_loop(
    handle: &OrchestratorHandle,
    renderer: &ChatRenderer,
    input: &mut ChatInput,
    mut out: SharedWriter,
    proactive: &mut mpsc::Receiver<ProactiveMessage>,
) {
    loop {
        tokio::select! {
            event = input.read_line() => {
                let line = match event {
                    InputEvent::Eof | InputEvent::Interrupted => return,
                    InputEvent::Message(line) if line.is_empty() => continue,
                    InputEvent::Message(line) => line,
                };

                match handle_line(handle, renderer, &line).await {
                    Ok(Outcome::Print(text)) => emit(&mut out, &text),
                    Ok(Outcome::Clear) => input.clear(),
                    Ok(Outcome::Quit) => return,
                    Err(e) => {
                        warn!(error = %e, "orchestrator unavailable, ending session");
                        return;
                    }
                }
            }
            Some(message) = proactive.recv() => {
                emit(&mut out, &proactive_text(renderer, &message));
            }
        }
    }
}

/// Execute one line: a slash command or a query.
pub async fn handle_line(
    handle: &OrchestratorHandle,
    renderer: &ChatRenderer,
    line: &str,
) -> Result<Outcome, SessionError> {
    let Some(command) = commands::parse(line) else {
        let spinner = thinking_spinner("thinking...");
        let reply = handle.query(line, QueryOptions::default()).await;
        spinner.finish_and_clear();
        return Ok(Outcome::Print(reply_text(renderer, &reply?)));
    };

    let text = match command {
        ChatCommand::Help => commands::help_text(),
        ChatCommand::Clear => return Ok(Outcome::Clear),
        ChatCommand::Quit => return Ok(Outcome::Quit),
        ChatCommand::Reset(prompt) => {
            let custom = prompt.is_some();
            handle.reset(prompt).await?;
            let detail = if custom { " with a new system prompt" } else { "" };
            notice(&format!("Conversation reset{detail}."))
        }
        ChatCommand::Amnesia(value) => {
            let on = handle.set_flag(AMNESIA, value).await?;
            if on {
                notice("Amnesia on: your questions skip the saved history.")
            } else {
                notice("Amnesia off.")
            }
        }
        ChatCommand::Flag { name, value } => {
            let on = handle.set_flag(name.clone(), value).await?;
            let mut text = notice(&format!("{name} = {}", if on { "on" } else { "off" }));
            if !RuntimeFlags::is_known(&name) {
                text.push_str(&format!("  {}\n", style("(not a built-in flag)").dim()));
            }
            text
        }
        ChatCommand::Flags => flags_view(&handle.flags().await?),
        ChatCommand::History => history_view(&handle.history().await?),
        ChatCommand::Context => {
            let spinner = thinking_spinner("gathering context...");
            let context = handle.preview_context().await;
            spinner.finish_and_clear();
            format!("\n{}\n", style(context?.trim_end()).dim())
        }
        ChatCommand::Status => status_view(&handle.diagnostics().await?),
        ChatCommand::Unknown(message) => format!(
            "\n  {} {}. Type /help for available commands.\n",
            style("?").yellow().bold(),
            message
        ),
    };
    Ok(Outcome::Print(text))
}

fn reply_text(renderer: &ChatRenderer, reply: &str) -> String {
    format!(
        "\n  {} {}\n",
        style("aide >").cyan().bold(),
        renderer.render(reply).trim()
    )
}

fn proactive_text(renderer: &ChatRenderer, message: &ProactiveMessage) -> String {
    format!(
        "\n  {} {} {}\n",
        style("aide >").magenta().bold(),
        style(format!("[{}]", message.trigger)).dim(),
        renderer.render(&message.response).trim()
    )
}

fn notice(text: &str) -> String {
    format!("\n  {} {}\n", style("*").cyan().bold(), text)
}

fn emit(out: &mut SharedWriter, text: &str) {
    let _ = write!(out, "{text}");
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use aide_core::agent::{Orchestrator, OrchestratorSettings};
    use aide_core::responder::{BoxResponder, Responder};
    use aide_types::error::ResponderError;
    use aide_types::message::Message;

    struct Echo;

    impl Responder for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn respond(&self, messages: &[Message]) -> Result<String, ResponderError> {
            let last = messages.last().map(|m| m.content()).unwrap_or_default();
            Ok(format!("echo: {last}"))
        }
    }

    fn echo_handle() -> OrchestratorHandle {
        let orchestrator = Orchestrator::new(OrchestratorSettings::default(), BoxResponder::new(Echo));
        spawn(orchestrator).0
    }

    fn printed(outcome: Outcome) -> String {
        match outcome {
            Outcome::Print(text) => text,
            other => panic!("expected printed output, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_query_is_answered_and_recorded() {
        let handle = echo_handle();
        let renderer = ChatRenderer::new(None);

        let text = printed(handle_line(&handle, &renderer, "plan my day").await.unwrap());
        assert!(text.contains("echo:"));
        assert_eq!(handle.history().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_amnesia_command_keeps_history_untouched() {
        let handle = echo_handle();
        let renderer = ChatRenderer::new(None);

        let text = printed(handle_line(&handle, &renderer, "/amnesia on").await.unwrap());
        assert!(text.contains("Amnesia on: your questions skip the saved history."));
        handle_line(&handle, &renderer, "secret question").await.unwrap();
        assert!(handle.history().await.unwrap().is_empty());

        handle_line(&handle, &renderer, "/amnesia").await.unwrap();
        assert!(!handle.flags().await.unwrap().is_set(AMNESIA));
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let handle = echo_handle();
        let renderer = ChatRenderer::new(None);

        handle_line(&handle, &renderer, "hello").await.unwrap();
        handle_line(&handle, &renderer, "/reset").await.unwrap();
        assert!(handle.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_flag_is_reported() {
        let handle = echo_handle();
        let renderer = ChatRenderer::new(None);

        let text = printed(handle_line(&handle, &renderer, "/flag focus on").await.unwrap());
        assert!(text.contains("focus = on"));
        assert!(text.contains("not a built-in flag"));
        let flags = printed(handle_line(&handle, &renderer, "/flags").await.unwrap());
        assert!(flags.contains("focus"));
    }

    #[tokio::test]
    async fn test_status_and_context_commands() {
        let handle = echo_handle();
        let renderer = ChatRenderer::new(None);

        let status = printed(handle_line(&handle, &renderer, "/status").await.unwrap());
        assert!(status.contains("echo"));
        let context = printed(handle_line(&handle, &renderer, "/context").await.unwrap());
        assert!(context.contains("Current time:"));
    }

    #[tokio::test]
    async fn test_quit_and_clear() {
        let handle = echo_handle();
        let renderer = ChatRenderer::new(None);

        assert_eq!(handle_line(&handle, &renderer, "/quit").await.unwrap(), Outcome::Quit);
        assert_eq!(handle_line(&handle, &renderer, "/cls").await.unwrap(), Outcome::Clear);
    }

    #[tokio::test]
    async fn test_unknown_command_hints_help() {
        let handle = echo_handle();
        let renderer = ChatRenderer::new(None);

        let text = printed(handle_line(&handle, &renderer, "/nope").await.unwrap());
        assert!(text.contains("/help"));
    }

    #[test]
    fn test_proactive_text_names_trigger() {
        let renderer = ChatRenderer::new(None);
        let text = proactive_text(
            &renderer,
            &ProactiveMessage {
                trigger: "standup".to_string(),
                response: "Standup in 10 minutes.".to_string(),
            },
        );
        assert!(text.contains("[standup]"));
        assert!(text.contains("Standup"));
    }
}
