//! Special commands parser for interactive chat mode
//!
//! This module parses the slash commands available during interactive
//! chat sessions. Special commands manage the session list (switch,
//! rename, archive, delete, clear), attachments, voice capture, and
//! speech playback, rather than being sent to the model.
//!
//! Commands are prefixed with `/` and are case-insensitive.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Display help information
    Help,

    /// List sessions grouped by recency, optionally filtered
    ListSessions(Option<String>),

    /// Switch the active session
    Switch(String),

    /// Start a fresh session
    New,

    /// Rename the active session
    Rename(String),

    /// Archive the active session
    Archive,

    /// Delete the named session
    Delete(String),

    /// Delete every stored session
    Clear,

    /// Attach a document to subsequent turns
    Attach(PathBuf),

    /// Drop all current attachments
    Detach,

    /// Capture the next query by voice
    Voice,

    /// Toggle speech playback of replies on or off
    Speech(bool),

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the model as a regular query.
    None,
}

/// Parse an input line into a special command
///
/// Lines not starting with `/` are [`SpecialCommand::None`].
///
/// # Errors
///
/// Returns [`CommandError`] for unknown commands, missing arguments, or
/// unsupported argument values.
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    match command.as_str() {
        "/help" => Ok(SpecialCommand::Help),
        "/sessions" | "/list" => Ok(SpecialCommand::ListSessions(arg.map(|s| s.to_string()))),
        "/switch" => match arg {
            Some(id) => Ok(SpecialCommand::Switch(id.to_string())),
            None => Err(CommandError::MissingArgument {
                command: "/switch".to_string(),
                usage: "/switch <session name>".to_string(),
            }),
        },
        "/new" => Ok(SpecialCommand::New),
        "/rename" => match arg {
            Some(name) => Ok(SpecialCommand::Rename(name.to_string())),
            None => Err(CommandError::MissingArgument {
                command: "/rename".to_string(),
                usage: "/rename <new name>".to_string(),
            }),
        },
        "/archive" => Ok(SpecialCommand::Archive),
        "/delete" => match arg {
            Some(id) => Ok(SpecialCommand::Delete(id.to_string())),
            None => Err(CommandError::MissingArgument {
                command: "/delete".to_string(),
                usage: "/delete <session name>".to_string(),
            }),
        },
        "/clear" => Ok(SpecialCommand::Clear),
        "/attach" => match arg {
            Some(path) => Ok(SpecialCommand::Attach(PathBuf::from(path))),
            None => Err(CommandError::MissingArgument {
                command: "/attach".to_string(),
                usage: "/attach <file.pdf|file.csv|file.xlsx>".to_string(),
            }),
        },
        "/detach" => Ok(SpecialCommand::Detach),
        "/voice" | "/speak" => Ok(SpecialCommand::Voice),
        "/speech" => match arg.map(|a| a.to_lowercase()).as_deref() {
            Some("on") => Ok(SpecialCommand::Speech(true)),
            Some("off") => Ok(SpecialCommand::Speech(false)),
            Some(other) => Err(CommandError::UnsupportedArgument {
                command: "/speech".to_string(),
                arg: other.to_string(),
            }),
            None => Err(CommandError::MissingArgument {
                command: "/speech".to_string(),
                usage: "/speech on|off".to_string(),
            }),
        },
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Print the help text for interactive chat
pub fn print_help() {
    println!("Available commands:");
    println!("  /sessions [query]   List sessions grouped by recency");
    println!("  /switch <name>      Switch to another session");
    println!("  /new                Start a fresh session");
    println!("  /rename <name>      Rename the current session");
    println!("  /archive            Archive the current session");
    println!("  /delete <name>      Delete a session");
    println!("  /clear              Delete all sessions");
    println!("  /attach <file>      Attach a PDF/CSV/XLSX to the next turns");
    println!("  /detach             Drop all attachments");
    println!("  /voice              Speak the next query instead of typing");
    println!("  /speech on|off      Toggle spoken replies");
    println!("  /help               Show this help");
    println!("  /exit               Leave the chat");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_text_is_not_special() {
        assert_eq!(
            parse_special_command("what is rust?").unwrap(),
            SpecialCommand::None
        );
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(parse_special_command("/help").unwrap(), SpecialCommand::Help);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_special_command("/HELP").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("/Exit").unwrap(), SpecialCommand::Exit);
    }

    #[test]
    fn test_parse_sessions_with_and_without_query() {
        assert_eq!(
            parse_special_command("/sessions").unwrap(),
            SpecialCommand::ListSessions(None)
        );
        assert_eq!(
            parse_special_command("/sessions proj").unwrap(),
            SpecialCommand::ListSessions(Some("proj".to_string()))
        );
    }

    #[test]
    fn test_parse_switch_requires_argument() {
        assert_eq!(
            parse_special_command("/switch my chat").unwrap(),
            SpecialCommand::Switch("my chat".to_string())
        );
        assert!(matches!(
            parse_special_command("/switch"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_rename_keeps_spaces_in_name() {
        assert_eq!(
            parse_special_command("/rename project notes 2026").unwrap(),
            SpecialCommand::Rename("project notes 2026".to_string())
        );
    }

    #[test]
    fn test_parse_delete_requires_argument() {
        assert!(matches!(
            parse_special_command("/delete"),
            Err(CommandError::MissingArgument { .. })
        ));
        assert_eq!(
            parse_special_command("/delete old chat").unwrap(),
            SpecialCommand::Delete("old chat".to_string())
        );
    }

    #[test]
    fn test_parse_attach() {
        assert_eq!(
            parse_special_command("/attach report.pdf").unwrap(),
            SpecialCommand::Attach(PathBuf::from("report.pdf"))
        );
        assert!(matches!(
            parse_special_command("/attach"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_speech_toggle() {
        assert_eq!(
            parse_special_command("/speech on").unwrap(),
            SpecialCommand::Speech(true)
        );
        assert_eq!(
            parse_special_command("/speech OFF").unwrap(),
            SpecialCommand::Speech(false)
        );
        assert!(matches!(
            parse_special_command("/speech maybe"),
            Err(CommandError::UnsupportedArgument { .. })
        ));
        assert!(matches!(
            parse_special_command("/speech"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_voice_aliases() {
        assert_eq!(
            parse_special_command("/voice").unwrap(),
            SpecialCommand::Voice
        );
        assert_eq!(
            parse_special_command("/speak").unwrap(),
            SpecialCommand::Voice
        );
    }

    #[test]
    fn test_parse_exit_aliases() {
        assert_eq!(parse_special_command("/exit").unwrap(), SpecialCommand::Exit);
        assert_eq!(parse_special_command("/quit").unwrap(), SpecialCommand::Exit);
    }

    #[test]
    fn test_unknown_command_errors() {
        let err = parse_special_command("/frobnicate").unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand(_)));
        assert!(err.to_string().contains("/help"));
    }
}
