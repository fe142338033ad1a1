//! Structured replies the orchestrator asks the responder for.
//!
//! Both source classification and trigger probes request a small JSON
//! object and deserialize it into a fixed type. Models like to wrap JSON in
//! prose or code fences, so parsing first cuts the reply down to its
//! outermost `{...}` span.

use aide_types::message::Message;
use serde::Deserialize;

const CLASSIFY_SYSTEM: &str = "You route a personal assistant's questions to data sources. \
Reply with a single JSON object and nothing else.";

/// `{"sources": ["calendar", "tasks"]}`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SourceSelection {
    pub sources: Vec<String>,
}

/// `{"speak": true}`
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ProbeVerdict {
    pub speak: bool,
}

/// Throwaway window asking which sources are relevant to `query`.
pub fn classification_window(source_names: &[String], query: &str) -> Vec<Message> {
    let listed = source_names.join(", ");
    vec![
        Message::system(CLASSIFY_SYSTEM),
        Message::user(format!(
            "Available sources: {listed}\n\
             Question: {query}\n\n\
             Which sources are needed to answer the question? \
             Respond as {{\"sources\": [\"name\", ...]}} using only the names listed."
        )),
    ]
}

/// Turn a trigger's yes/no question into a probe prompt.
pub fn probe_prompt(question: &str) -> String {
    format!(
        "{question}\n\n\
         Answer only with JSON: {{\"speak\": true}} if you should say something \
         to the user now, otherwise {{\"speak\": false}}."
    )
}

/// Parse a classification reply, keeping only registered names.
///
/// Returns `None` when the reply is not the expected JSON; the caller then
/// falls back to all providers.
pub fn parse_selection(reply: &str, known: &[String]) -> Option<Vec<String>> {
    let selection: SourceSelection = serde_json::from_str(json_object(reply)?).ok()?;
    Some(
        selection
            .sources
            .into_iter()
            .filter(|name| known.contains(name))
            .collect(),
    )
}

pub fn parse_verdict(reply: &str) -> Option<ProbeVerdict> {
    serde_json::from_str(json_object(reply)?).ok()
}

fn json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}
