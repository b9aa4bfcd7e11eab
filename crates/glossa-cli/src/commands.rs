/// Result of processing a slash command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Change the theme.
    ThemeChanged(String),
    /// Show status (model, message count, history file).
    ShowStatus,
    /// Not a command - treat as regular input.
    NotACommand,
}

/// Every command name, for Tab completion.
pub const COMMANDS: &[&str] = &["/help", "/exit", "/quit", "/theme", "/status", "/version"];

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    if !input.starts_with('/') {
        return CommandResult::NotACommand;
    }

    let parts: Vec<&str> = input.splitn(2, char::is_whitespace).collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/theme" => {
            if arg.is_empty() {
                let themes = crate::theme::Theme::all_names().join(", ");
                CommandResult::Message(format!(
                    "Available themes: {themes}\nUsage: /theme <theme-name>"
                ))
            } else if crate::theme::Theme::exists(arg) {
                CommandResult::ThemeChanged(arg.to_string())
            } else {
                CommandResult::Message(format!("Unknown theme: {arg}. Try /theme for a list."))
            }
        }
        "/status" => CommandResult::ShowStatus,
        "/version" => CommandResult::Message(format!("Glossa v{}", env!("CARGO_PKG_VERSION"))),
        _ => CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands.")),
    }
}

/// Complete a partially typed command when exactly one matches.
pub fn complete_command(input: &str) -> Option<String> {
    let matches: Vec<&&str> = COMMANDS.iter().filter(|c| c.starts_with(input)).collect();

    if matches.len() == 1 {
        Some(format!("{} ", matches[0]))
    } else {
        None
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ Glossa Commands ──────────────────────────────────────╮

  /help, /h            Show this help message
  /theme <name>        Change color theme (dark, light, amber)
  /status              Show model, message count and history file
  /version             Show version information
  /exit, /quit, /q     Quit

  KEYS
    Enter              Send
    Shift+Enter        New line (also Alt+Enter, Ctrl+J)
    Up / Down          Previous / next input
    PgUp / PgDn        Scroll the conversation
    Ctrl+U             Clear the input
    Ctrl+C             Cancel a pending reply, or quit

╰────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
