//! Text views for the diagnostic slash commands.

use aide_types::flags::RuntimeFlags;
use aide_types::message::{Message, MessageRole};
use aide_types::status::Diagnostics;
use console::style;

const PREVIEW_CHARS: usize = 100;

pub fn status_view(diagnostics: &Diagnostics) -> String {
    let mut out = format!("\n  {}\n\n", style("Status").bold());
    out.push_str(&format!("  {:<12}{}\n", "Responder:", diagnostics.responder));
    out.push_str(&format!(
        "  {:<12}{}/{} turns\n",
        "History:", diagnostics.history_len, diagnostics.max_history
    ));
    out.push_str(&format!(
        "  {:<12}{} cycles run\n",
        "Triggers:", diagnostics.trigger_cycles
    ));
    for name in &diagnostics.triggers {
        out.push_str(&format!("    - {name}\n"));
    }

    out.push_str(&format!("  {:<12}\n", "Context:"));
    if diagnostics.providers.is_empty() {
        out.push_str(&format!("    {}\n", style("no providers").dim()));
    }
    for provider in &diagnostics.providers {
        let updated = provider
            .last_updated
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        out.push_str(&format!(
            "    - {} {}\n",
            provider.name,
            style(format!("(updated {updated})")).dim()
        ));
    }

    let flags = diagnostics
        .flags
        .iter()
        .map(|(name, value)| format!("{name}={}", on_off(*value)))
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!("  {:<12}{flags}\n", "Flags:"));
    out
}

pub fn flags_view(flags: &RuntimeFlags) -> String {
    let mut out = String::from("\n");
    for (name, value) in flags.iter() {
        let value = if value {
            style(on_off(value)).green()
        } else {
            style(on_off(value)).dim()
        };
        out.push_str(&format!("  {name:<16}{value}\n"));
    }
    out
}

/// One line per turn, long turns cut to a preview.
pub fn history_view(history: &[Message]) -> String {
    if history.is_empty() {
        return format!("\n  {}\n", style("No conversation yet.").dim());
    }

    let mut out = String::from("\n");
    for message in history {
        let label = match message.role() {
            MessageRole::User => style("You").green(),
            MessageRole::Assistant => style("aide").cyan(),
            MessageRole::System => style("system").dim(),
        };
        out.push_str(&format!("  {} {}\n", label.bold(), preview(message.content())));
    }
    out
}

fn preview(content: &str) -> String {
    let flat = content.replace('\n', " ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}
