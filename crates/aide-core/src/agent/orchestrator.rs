//! The orchestrator: sole owner of conversation state and runtime flags.
//!
//! One query cycle is: assemble context, build the message window, call the
//! responder, commit the exchange. Normally the orchestrator lives inside the
//! actor task spawned by [`super::handle::spawn`], which runs each cycle to
//! completion even if the caller stops waiting.

use std::sync::Arc;

use aide_types::config::{AideConfig, ContextSelection, ProbeMode};
use aide_types::error::{ResponderError, TriggerError};
use aide_types::flags::{AMNESIA, RuntimeFlags};
use aide_types::message::{Message, MessageRole};
use aide_types::status::Diagnostics;
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{Instrument, debug, info, info_span, warn};

use super::structured::{classification_window, parse_selection, parse_verdict, probe_prompt};
use crate::chat::store::ConversationStore;
use crate::context::{BoxContextProvider, ContextAssembler};
use crate::responder::BoxResponder;
use crate::trigger::{TriggerSet, TriggerTick};

/// Per-call switches for [`Orchestrator::process_query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Record the exchange in the conversation.
    pub conversation_effect: bool,
    /// Prepend provider context to the input.
    pub use_context: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            conversation_effect: true,
            use_context: true,
        }
    }
}

impl QueryOptions {
    /// A side-channel query that leaves the conversation untouched.
    pub fn ephemeral(use_context: bool) -> Self {
        Self {
            conversation_effect: false,
            use_context,
        }
    }
}

/// Construction-time knobs, usually derived from [`AideConfig`].
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub system_prompt: String,
    pub max_history: usize,
    pub apology: String,
    pub selection: ContextSelection,
    pub probe_mode: ProbeMode,
    pub probe_use_context: bool,
}

impl OrchestratorSettings {
    pub fn from_config(config: &AideConfig) -> Self {
        Self {
            system_prompt: config.system_prompt.clone(),
            max_history: config.max_history,
            apology: config.apology.clone(),
            selection: config.context.selection,
            probe_mode: config.probe.mode,
            probe_use_context: config.probe.use_context,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&AideConfig::default())
    }
}

/// A trigger fired and produced a message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProactiveMessage {
    pub trigger: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerFailure {
    pub trigger: String,
    pub error: String,
}

/// Outcome of one trigger evaluation cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriggerReport {
    pub cycle: u64,
    pub fired: Vec<ProactiveMessage>,
    pub failures: Vec<TriggerFailure>,
}

/// How the message window for a cycle is built and whether it is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowPlan {
    /// Preamble plus this turn only; the store is not read or written.
    Amnesiac,
    /// User turn appended before the call, reply appended after.
    Committed,
    /// Current history plus this turn, nothing written.
    Detached,
}

#[derive(Debug, Clone, Copy)]
enum Route {
    Main,
    Probe,
}

pub struct Orchestrator {
    settings: OrchestratorSettings,
    store: ConversationStore,
    flags: RuntimeFlags,
    responder: BoxResponder,
    probe_responder: Option<BoxResponder>,
    context: ContextAssembler,
    triggers: Arc<TriggerSet>,
    cycles: u64,
}

impl Orchestrator {
    pub fn new(settings: OrchestratorSettings, responder: BoxResponder) -> Self {
        let store = ConversationStore::new(settings.system_prompt.clone(), settings.max_history);
        Self {
            settings,
            store,
            flags: RuntimeFlags::new(),
            responder,
            probe_responder: None,
            context: ContextAssembler::new(),
            triggers: Arc::new(TriggerSet::new()),
            cycles: 0,
        }
    }

    pub fn with_providers(mut self, providers: impl IntoIterator<Item = BoxContextProvider>) -> Self {
        for provider in providers {
            self.context.register(provider);
        }
        self
    }

    pub fn with_triggers(mut self, triggers: TriggerSet) -> Self {
        self.triggers = Arc::new(triggers);
        self
    }

    /// Use a separate (typically cheaper) responder for probes and source
    /// classification.
    pub fn with_probe_responder(mut self, responder: BoxResponder) -> Self {
        self.probe_responder = Some(responder);
        self
    }

    /// Run one query cycle and return the reply text.
    ///
    /// Never fails: a responder error is logged and replaced with the
    /// configured apology, which is committed like a normal reply.
    pub async fn process_query(&mut self, input: &str, options: QueryOptions) -> String {
        let content = self.compose(input, options.use_context).await;

        let plan = if !options.conversation_effect {
            WindowPlan::Detached
        } else if self.flags.is_set(AMNESIA) {
            WindowPlan::Amnesiac
        } else {
            WindowPlan::Committed
        };
        let window = self.window(plan, content);

        let response = match self.respond(Route::Main, &window).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "responder call failed, replying with apology");
                self.settings.apology.clone()
            }
        };

        if plan == WindowPlan::Committed {
            self.store.append(MessageRole::Assistant, response.clone());
        }
        response
    }

    /// Ask a yes/no question without touching the conversation.
    ///
    /// Expects the reply to contain `{"speak": bool}`. With probes disabled
    /// this answers `false` without calling any responder.
    pub async fn probe(&mut self, question: &str) -> Result<bool, TriggerError> {
        if self.settings.probe_mode == ProbeMode::Off {
            debug!(question, "probes disabled, skipping");
            return Ok(false);
        }

        let content = self
            .compose(&probe_prompt(question), self.settings.probe_use_context)
            .await;
        let window = self.window(WindowPlan::Detached, content);
        let reply = self
            .respond(Route::Probe, &window)
            .await
            .map_err(|e| TriggerError::Probe(e.to_string()))?;

        parse_verdict(&reply)
            .map(|verdict| verdict.speak)
            .ok_or_else(|| TriggerError::Probe(format!("unexpected probe reply: {reply}")))
    }

    /// Evaluate every trigger once, in declaration order.
    pub async fn check_triggers(&mut self) -> TriggerReport {
        self.check_triggers_at(Local::now()).await
    }

    pub async fn check_triggers_at(&mut self, now: DateTime<Local>) -> TriggerReport {
        self.cycles += 1;
        let tick = TriggerTick {
            cycle: self.cycles,
            now,
        };
        let mut report = TriggerReport {
            cycle: tick.cycle,
            ..TriggerReport::default()
        };

        let triggers = Arc::clone(&self.triggers);
        for trigger in triggers.iter() {
            match trigger.predicate().evaluate(self, &tick).await {
                Ok(true) => {
                    info!(trigger = trigger.name(), cycle = tick.cycle, "trigger fired");
                    let response = self
                        .process_query(trigger.prompt(), QueryOptions::default())
                        .await;
                    report.fired.push(ProactiveMessage {
                        trigger: trigger.name().to_string(),
                        response,
                    });
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(trigger = trigger.name(), error = %e, "trigger check failed");
                    report.failures.push(TriggerFailure {
                        trigger: trigger.name().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }

    pub fn flags(&self) -> &RuntimeFlags {
        &self.flags
    }

    /// Set a flag, or flip it when `value` is `None`. Returns the new value.
    pub fn set_flag(&mut self, name: &str, value: Option<bool>) -> bool {
        let value = match value {
            Some(v) => {
                self.flags.set(name, v);
                v
            }
            None => self.flags.toggle(name),
        };
        info!(flag = name, value, "flag updated");
        value
    }

    /// Clear the conversation and restore default flags.
    ///
    /// `system_prompt` replaces the preamble; `None` restores the configured one.
    pub fn reset(&mut self, system_prompt: Option<String>) {
        let prompt = system_prompt.unwrap_or_else(|| self.settings.system_prompt.clone());
        self.store.reset(prompt);
        self.flags.reset();
        info!("conversation reset");
    }

    /// Retained turns, oldest first, without the system preamble.
    pub fn history(&self) -> Vec<Message> {
        self.store.history().cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.store.snapshot()
    }

    /// The context block a query would currently receive, from all providers.
    pub async fn preview_context(&mut self) -> String {
        self.context.assemble(None, Local::now()).await
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            responder: self.responder.name().to_string(),
            providers: self.context.status(),
            flags: self
                .flags
                .iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            history_len: self.store.len(),
            max_history: self.store.max_history(),
            triggers: self.triggers.names(),
            trigger_cycles: self.cycles,
        }
    }

    /// Effective user content: context block followed by the input.
    async fn compose(&mut self, input: &str, use_context: bool) -> String {
        if !use_context {
            return input.to_string();
        }
        let selected = self.select_sources(input).await;
        let context = self.context.assemble(selected.as_deref(), Local::now()).await;
        format!("{context}{input}")
    }

    /// Provider subset for `input`; `None` means all.
    async fn select_sources(&self, input: &str) -> Option<Vec<String>> {
        if self.settings.selection != ContextSelection::Classified || self.context.is_empty() {
            return None;
        }

        let names = self.context.names();
        let window = classification_window(&names, input);
        match self.respond(Route::Probe, &window).await {
            Ok(reply) => {
                let selected = parse_selection(&reply, &names);
                if selected.is_none() {
                    debug!(reply = %reply, "unparseable source selection, using all providers");
                }
                selected
            }
            Err(e) => {
                debug!(error = %e, "source classification failed, using all providers");
                None
            }
        }
    }

    fn window(&mut self, plan: WindowPlan, content: String) -> Vec<Message> {
        match plan {
            WindowPlan::Amnesiac => vec![self.store.system().clone(), Message::user(content)],
            WindowPlan::Committed => {
                self.store.append(MessageRole::User, content);
                self.store.snapshot()
            }
            WindowPlan::Detached => {
                let mut window = self.store.snapshot();
                window.push(Message::user(content));
                window
            }
        }
    }

    async fn respond(&self, route: Route, window: &[Message]) -> Result<String, ResponderError> {
        let (responder, operation) = match route {
            Route::Main => (&self.responder, "chat"),
            Route::Probe => (
                self.probe_responder.as_ref().unwrap_or(&self.responder),
                "probe",
            ),
        };

        let span = info_span!(
            "gen_ai.respond",
            gen_ai.system = responder.name(),
            gen_ai.operation.name = operation,
            aide.window.messages = window.len(),
        );
        responder.respond(window).instrument(span).await
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("responder", &self.responder.name())
            .field("providers", &self.context.names())
            .field("triggers", &self.triggers.names())
            .field("history_len", &self.store.len())
            .finish_non_exhaustive()
    }
}
