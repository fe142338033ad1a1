//! Welcome banner printed when a chat session starts.

use aide_types::status::Diagnostics;
use console::style;

/// Banner text: responder and model, then the registered providers and
/// triggers.
pub fn welcome_banner(diagnostics: &Diagnostics, model: &str, interval_secs: u64) -> String {
    let providers = if diagnostics.providers.is_empty() {
        "none".to_string()
    } else {
        diagnostics
            .providers
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let triggers = if diagnostics.triggers.is_empty() {
        "none".to_string()
    } else {
        format!("{} (every {interval_secs}s)", diagnostics.triggers.join(", "))
    };

    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("  * {}\n\n", style("aide").cyan().bold()));
    for (label, value) in [
        ("Responder:", format!("{} ({model})", diagnostics.responder)),
        ("Context:", providers),
        ("Triggers:", triggers),
    ] {
        out.push_str(&format!("  {}  {}\n", style(label).bold(), style(value).dim()));
    }
    out.push('\n');
    out.push_str(&format!(
        "  {}\n",
        style("Type /help for commands, Ctrl+D to exit").dim()
    ));
    out.push_str(&format!("  {}\n", style("---").dim()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aide_types::status::ProviderStatus;

    fn diagnostics() -> Diagnostics {
        Diagnostics {
            responder: "anthropic".to_string(),
            providers: vec![ProviderStatus {
                name: "tasks".to_string(),
                last_updated: None,
            }],
            flags: vec![("amnesia".to_string(), false)],
            history_len: 0,
            max_history: 10,
            triggers: vec!["morning".to_string()],
            trigger_cycles: 0,
        }
    }

    #[test]
    fn test_banner_names_collaborators() {
        let banner = welcome_banner(&diagnostics(), "claude-sonnet-4-20250514", 60);
        assert!(banner.contains("claude-sonnet-4-20250514"));
        assert!(banner.contains("tasks"));
        assert!(banner.contains("morning (every 60s)"));
    }

    #[test]
    fn test_banner_without_providers() {
        let mut diag = diagnostics();
        diag.providers.clear();
        diag.triggers.clear();
        let banner = welcome_banner(&diag, "m", 60);
        assert!(banner.contains("none"));
    }
}
