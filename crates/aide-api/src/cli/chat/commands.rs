//! Slash command parsing for the chat loop.
//!
//! Lines starting with `/` are commands; everything else is a query.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Quit,
    /// Clear the conversation, optionally with a new system prompt.
    Reset(Option<String>),
    /// Set (`Some`) or toggle (`None`) the amnesia flag.
    Amnesia(Option<bool>),
    /// Set or toggle an arbitrary flag.
    Flag { name: String, value: Option<bool> },
    /// List flags and their values.
    Flags,
    /// Show retained conversation turns.
    History,
    /// Show the context block a query would currently receive.
    Context,
    /// Show orchestrator diagnostics.
    Status,
    /// Unknown command or bad arguments, with a message for the user.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd.to_lowercase(), Some(rest.trim()).filter(|a| !a.is_empty())),
        None => (trimmed.to_lowercase(), None),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/quit" | "/exit" | "/q" => ChatCommand::Quit,
        "/reset" | "/new" => ChatCommand::Reset(arg.map(str::to_string)),
        "/amnesia" => match arg.map(parse_switch) {
            None => ChatCommand::Amnesia(None),
            Some(Some(value)) => ChatCommand::Amnesia(Some(value)),
            Some(None) => ChatCommand::Unknown("/amnesia takes on or off".to_string()),
        },
        "/flag" => parse_flag(arg),
        "/flags" => ChatCommand::Flags,
        "/history" | "/hist" => ChatCommand::History,
        "/context" | "/ctx" => ChatCommand::Context,
        "/status" | "/stat" => ChatCommand::Status,
        other => ChatCommand::Unknown(format!("Unknown command: {other}")),
    };
    Some(command)
}

fn parse_flag(arg: Option<&str>) -> ChatCommand {
    let Some(arg) = arg else {
        return ChatCommand::Unknown("/flag requires a flag name".to_string());
    };

    let mut parts = arg.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let value = match parts.next() {
        None => None,
        Some(switch) => match parse_switch(switch) {
            Some(value) => Some(value),
            None => return ChatCommand::Unknown(format!("/flag {name} takes on or off")),
        },
    };
    if parts.next().is_some() {
        return ChatCommand::Unknown("usage: /flag <name> [on|off]".to_string());
    }
    ChatCommand::Flag { name, value }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Help text listing all available commands.
pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/reset [prompt]", "Clear the conversation (optionally with a new system prompt)"),
        ("/amnesia [on|off]", "Your questions skip the saved history"),
        ("/flag <name> [on|off]", "Set or toggle a flag"),
        ("/flags", "List flags"),
        ("/history", "Show conversation history"),
        ("/context", "Show the context a query would receive"),
        ("/status", "Show responder, providers and triggers"),
        ("/clear", "Clear the screen"),
        ("/quit", "End the session"),
    ];

    let mut out = format!("\n  {}\n\n", style("Available commands:").bold());
    for (command, description) in rows {
        out.push_str(&format!("  {:<24}{description}\n", style(command).cyan()));
    }
    out.push_str(&format!("\n  {}\n", style("Ctrl+D or Ctrl+C to exit").dim()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_quit() {
        assert_eq!(parse("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse("/Q"), Some(ChatCommand::Quit));
    }

    #[test]
    fn test_parse_reset_with_prompt() {
        assert_eq!(parse("/reset"), Some(ChatCommand::Reset(None)));
        assert_eq!(
            parse("/reset   You are terse. "),
            Some(ChatCommand::Reset(Some("You are terse.".to_string())))
        );
    }

    #[test]
    fn test_parse_amnesia() {
        assert_eq!(parse("/amnesia"), Some(ChatCommand::Amnesia(None)));
        assert_eq!(parse("/amnesia on"), Some(ChatCommand::Amnesia(Some(true))));
        assert_eq!(parse("/amnesia OFF"), Some(ChatCommand::Amnesia(Some(false))));
        assert!(matches!(parse("/amnesia maybe"), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(
            parse("/flag Amnesia on"),
            Some(ChatCommand::Flag {
                name: "amnesia".to_string(),
                value: Some(true)
            })
        );
        assert_eq!(
            parse("/flag verbose"),
            Some(ChatCommand::Flag {
                name: "verbose".to_string(),
                value: None
            })
        );
        assert!(matches!(parse("/flag"), Some(ChatCommand::Unknown(_))));
        assert!(matches!(parse("/flag a on extra"), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_diagnostics() {
        assert_eq!(parse("/flags"), Some(ChatCommand::Flags));
        assert_eq!(parse("/context"), Some(ChatCommand::Context));
        assert_eq!(parse("/status"), Some(ChatCommand::Status));
        assert_eq!(parse("/history"), Some(ChatCommand::History));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse("  what about a/b?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/foo bar"),
            Some(ChatCommand::Unknown("Unknown command: /foo".to_string()))
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        for command in ["/reset", "/amnesia", "/flags", "/context", "/status", "/quit"] {
            assert!(help.contains(command), "missing {command}");
        }
        assert!(help.contains("skip the saved history"));
    }
}
