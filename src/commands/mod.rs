/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`     — Interactive chat loop with slash commands and voice input
- `ask`      — One-shot question/answer
- `sessions` — Session list and management

These handlers are intentionally small and use the library components:
the session store, the provider, and the orchestrator.
*/

use crate::config::Config;
use crate::error::{InfoFlowError, Result};
use crate::orchestrator::{ChatOrchestrator, SessionContext};
use crate::providers::create_provider;
use crate::speech::{CommandSynthesizer, CommandTranscriber, NullSynthesizer, SpeechSynthesizer};
use crate::store::{
    archive_session, classify, clear_all, delete_session, filter_ids, next_session_id,
    rename_session, SessionMap, SessionStore,
};
use chrono::NaiveDate;
use colored::Colorize;
use std::time::Duration;

// Special commands parser for the interactive loop
pub mod special_commands;

/// Open the session store configured in `config`
///
/// Falls back to the default application data directory when no path is
/// configured.
fn build_store(config: &Config) -> Result<SessionStore> {
    match &config.store.path {
        Some(path) => SessionStore::new_with_path(path),
        None => SessionStore::new(),
    }
}

/// Build the synthesizer configured in `config`
///
/// Returns a [`NullSynthesizer`] when no synthesizer command is
/// configured, so callers can always hold a synthesizer.
fn build_synthesizer(config: &Config) -> Result<Box<dyn SpeechSynthesizer>> {
    if config.speech.synthesizer_command.is_empty() {
        Ok(Box::new(NullSynthesizer))
    } else {
        Ok(Box::new(CommandSynthesizer::new(
            config.speech.synthesizer_command.clone(),
        )?))
    }
}

/// Resolve the session a command operates on
///
/// An explicit name is used as-is (resumed if it exists, created on the
/// first turn otherwise); without one, a fresh `Chat N - date` name is
/// generated from the store size.
fn resolve_session_id(
    requested: Option<String>,
    sessions: &SessionMap,
    today: NaiveDate,
) -> String {
    requested.unwrap_or_else(|| next_session_id(sessions, today))
}

/// Print the session list grouped by recency
///
/// Bucket headings are colored, archived sessions carry an `[archived]`
/// tag, and sessions outside every window are reported as a count. With
/// a query, only matching names are shown and the count line is omitted.
fn print_session_list(sessions: &SessionMap, today: NaiveDate, query: Option<&str>) {
    let buckets = classify(sessions, today);

    let mut shown = 0usize;
    for (bucket, ids) in buckets.iter() {
        let ids = match query {
            Some(q) => filter_ids(ids, q),
            None => ids.to_vec(),
        };
        if ids.is_empty() {
            continue;
        }

        println!("{}", bucket.title().cyan().bold());
        for id in &ids {
            let archived = sessions.get(id).is_some_and(|s| s.archived);
            if archived {
                println!("  {} {}", id, "[archived]".yellow());
            } else {
                println!("  {}", id);
            }
            shown += 1;
        }
        println!();
    }

    if shown == 0 {
        match query {
            Some(q) => println!("No sessions matching '{}'", q),
            None => println!("No recent sessions"),
        }
    }

    if query.is_none() && buckets.unlisted > 0 {
        println!(
            "{}",
            format!("({} older sessions not listed)", buckets.unlisted).dimmed()
        );
    }
}

/// Interactive chat handler
pub mod chat {
    //! Interactive chat loop.
    //!
    //! Runs a readline-based loop that submits user input to the
    //! orchestrator. Slash commands manage sessions, attachments, voice
    //! capture, and speech playback without leaving the loop.

    use super::*;
    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::path::PathBuf;

    /// Start an interactive chat session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `session` - Session to resume (a new one is created if omitted)
    /// * `model` - Optional override for the configured model
    /// * `attach` - Documents attached before the first turn
    /// * `no_speech` - Disable spoken replies regardless of configuration
    pub async fn run_chat(
        mut config: Config,
        session: Option<String>,
        model: Option<String>,
        attach: Vec<PathBuf>,
        no_speech: bool,
    ) -> Result<()> {
        tracing::info!("Starting interactive chat");

        if let Some(model) = model {
            config.provider.ollama.model = model;
        }

        let provider = create_provider(&config.provider.provider_type, &config.provider)?;
        let synthesizer = build_synthesizer(&config)?;
        let store = build_store(&config)?;

        let mut sessions = store.load()?;
        let mut session_id =
            resolve_session_id(session, &sessions, chrono::Local::now().date_naive());

        let mut orchestrator = ChatOrchestrator::new(provider, synthesizer, store);
        let mut attachments = attach;
        let mut speak = config.speech.enabled && !no_speech;
        let capture_timeout = Duration::from_secs(config.speech.capture_timeout_seconds);

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&session_id, speak);

        loop {
            // Re-read the clock every pass so a session crossing
            // midnight stamps current dates and lists current buckets.
            let today = chrono::Local::now().date_naive();
            let prompt = format!("{} >> ", session_id.green().bold());
            let line = match rl.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            rl.add_history_entry(trimmed)?;

            let command = match parse_special_command(trimmed) {
                Ok(command) => command,
                Err(e) => {
                    eprintln!("{}", e.to_string().red());
                    continue;
                }
            };

            let query = match command {
                SpecialCommand::Help => {
                    print_help();
                    continue;
                }
                SpecialCommand::ListSessions(query) => {
                    print_session_list(&sessions, today, query.as_deref());
                    continue;
                }
                SpecialCommand::Switch(id) => {
                    if !sessions.contains_key(&id) {
                        println!("Starting new session '{}'", id);
                    }
                    session_id = id;
                    continue;
                }
                SpecialCommand::New => {
                    session_id = next_session_id(&sessions, today);
                    println!("Started '{}'", session_id);
                    continue;
                }
                SpecialCommand::Rename(new_id) => {
                    // Renaming before the first turn only changes the
                    // active name; there is no record to move yet.
                    if sessions.contains_key(&session_id) {
                        match rename_session(&mut sessions, &session_id, &new_id) {
                            Ok(()) => orchestrator.store().save(&sessions)?,
                            Err(e) => {
                                eprintln!("{}", format!("Rename failed: {}", e).red());
                                continue;
                            }
                        }
                    }
                    session_id = new_id;
                    println!("Renamed to '{}'", session_id);
                    continue;
                }
                SpecialCommand::Archive => {
                    match archive_session(&mut sessions, &session_id) {
                        Ok(()) => {
                            orchestrator.store().save(&sessions)?;
                            println!("Archived '{}'", session_id);
                        }
                        Err(e) => eprintln!("{}", format!("Archive failed: {}", e).red()),
                    }
                    continue;
                }
                SpecialCommand::Delete(id) => {
                    match delete_session(&mut sessions, &id) {
                        Ok(_) => {
                            orchestrator.store().save(&sessions)?;
                            println!("Deleted '{}'", id);
                            if id == session_id {
                                session_id = next_session_id(&sessions, today);
                                println!("Now in '{}'", session_id);
                            }
                        }
                        Err(e) => eprintln!("{}", format!("Delete failed: {}", e).red()),
                    }
                    continue;
                }
                SpecialCommand::Clear => {
                    clear_all(&mut sessions);
                    orchestrator.store().save(&sessions)?;
                    session_id = next_session_id(&sessions, today);
                    println!("All sessions deleted; now in '{}'", session_id);
                    continue;
                }
                SpecialCommand::Attach(path) => {
                    if path.exists() {
                        println!("Attached {}", path.display());
                        attachments.push(path);
                    } else {
                        eprintln!("{}", format!("No such file: {}", path.display()).red());
                    }
                    continue;
                }
                SpecialCommand::Detach => {
                    attachments.clear();
                    println!("Attachments cleared");
                    continue;
                }
                SpecialCommand::Speech(enabled) => {
                    speak = enabled;
                    println!("Speech {}", if speak { "on" } else { "off" });
                    continue;
                }
                SpecialCommand::Voice => {
                    let transcriber = match &config.speech.transcriber_command {
                        Some(command) => CommandTranscriber::new(command.clone())?,
                        None => {
                            eprintln!(
                                "{}",
                                "No transcriber configured (speech.transcriber_command)".red()
                            );
                            continue;
                        }
                    };
                    println!("{}", "Listening...".cyan());
                    let transcript = orchestrator
                        .capture_voice(&transcriber, capture_timeout)
                        .await?;
                    if transcript.is_empty() {
                        eprintln!("{}", "Nothing captured".yellow());
                        continue;
                    }
                    println!("{} {}", "Heard:".cyan(), transcript);
                    transcript
                }
                SpecialCommand::Exit => break,
                SpecialCommand::None => trimmed.to_string(),
            };

            let ctx = SessionContext::new(session_id.clone(), today);
            match orchestrator
                .take_turn(&mut sessions, &ctx, &query, &attachments, speak)
                .await
            {
                Ok(outcome) => {
                    println!("\n{}\n", outcome.reply);
                }
                Err(e) => {
                    eprintln!("{}", format!("Error: {}", e).red());
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Display welcome banner at the start of interactive chat
    fn print_welcome_banner(session_id: &str, speak: bool) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║              InfoFlow Interactive Chat - Welcome!            ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Session: {}", session_id.green().bold());
        println!("Speech:  {}\n", if speak { "on" } else { "off" });
        println!("Type '/help' for available commands, '/exit' to quit\n");
    }

}

/// One-shot question handler
pub mod ask {
    //! Single question/answer without the interactive loop.
    //!
    //! Runs exactly one turn through the orchestrator, prints the reply,
    //! and waits for speech playback to finish before returning so the
    //! process does not exit mid-sentence.

    use super::*;
    use std::path::PathBuf;

    /// Ask a single question and print the reply
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `prompt` - The question to ask
    /// * `session` - Session to record the turn in
    /// * `model` - Optional override for the configured model
    /// * `attach` - Documents whose text augments the prompt
    /// * `no_speech` - Disable spoken replies regardless of configuration
    pub async fn run_ask(
        mut config: Config,
        prompt: String,
        session: Option<String>,
        model: Option<String>,
        attach: Vec<PathBuf>,
        no_speech: bool,
    ) -> Result<()> {
        if let Some(model) = model {
            config.provider.ollama.model = model;
        }

        let provider = create_provider(&config.provider.provider_type, &config.provider)?;
        let synthesizer = build_synthesizer(&config)?;
        let store = build_store(&config)?;

        let mut sessions = store.load()?;
        let today = chrono::Local::now().date_naive();
        let session_id = resolve_session_id(session, &sessions, today);
        let speak = config.speech.enabled && !no_speech;

        let mut orchestrator = ChatOrchestrator::new(provider, synthesizer, store);
        let ctx = SessionContext::new(session_id, today);
        let outcome = orchestrator
            .take_turn(&mut sessions, &ctx, &prompt, &attach, speak)
            .await?;

        println!("{}", outcome.reply);

        if let Some(handle) = outcome.speech {
            if let Err(e) = handle.await {
                tracing::warn!("Speech playback task failed: {}", e);
            }
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_run_ask_unknown_provider() {
            let mut config = Config::default();
            config.provider.provider_type = "invalid_provider".to_string();

            let res = run_ask(
                config,
                "q".to_string(),
                None,
                None,
                Vec::new(),
                true,
            )
            .await;
            assert!(res.is_err());
        }
    }
}

/// Session management handlers
pub mod sessions {
    //! Non-interactive session management.
    //!
    //! Each handler loads the store, applies one mutation, and saves.
    //! `list` is read-only.

    use super::*;
    use std::io::Write;

    /// List sessions grouped by recency
    pub fn run_list(config: &Config, query: Option<String>) -> Result<()> {
        let store = build_store(config)?;
        let sessions = store.load()?;
        let today = chrono::Local::now().date_naive();
        print_session_list(&sessions, today, query.as_deref());
        Ok(())
    }

    /// Rename a session
    pub fn run_rename(config: &Config, old: &str, new: &str) -> Result<()> {
        let store = build_store(config)?;
        let mut sessions = store.load()?;
        rename_session(&mut sessions, old, new)?;
        store.save(&sessions)?;
        println!("Renamed '{}' to '{}'", old, new);
        Ok(())
    }

    /// Archive a session
    pub fn run_archive(config: &Config, id: &str) -> Result<()> {
        let store = build_store(config)?;
        let mut sessions = store.load()?;
        archive_session(&mut sessions, id)?;
        store.save(&sessions)?;
        println!("Archived '{}'", id);
        Ok(())
    }

    /// Delete a session permanently
    pub fn run_delete(config: &Config, id: &str) -> Result<()> {
        let store = build_store(config)?;
        let mut sessions = store.load()?;
        delete_session(&mut sessions, id)?;
        store.save(&sessions)?;
        println!("Deleted '{}'", id);
        Ok(())
    }

    /// Delete every stored session
    ///
    /// Prompts for confirmation on stdin unless `yes` is set.
    pub fn run_clear(config: &Config, yes: bool) -> Result<()> {
        let store = build_store(config)?;
        let mut sessions = store.load()?;

        if sessions.is_empty() {
            println!("No sessions to delete");
            return Ok(());
        }

        if !yes {
            print!("Delete all {} sessions? [y/N] ", sessions.len());
            std::io::stdout().flush().map_err(InfoFlowError::Io)?;
            let mut answer = String::new();
            std::io::stdin()
                .read_line(&mut answer)
                .map_err(InfoFlowError::Io)?;
            if !confirmation_is_yes(&answer) {
                println!("Aborted");
                return Ok(());
            }
        }

        let count = sessions.len();
        clear_all(&mut sessions);
        store.save(&sessions)?;
        println!("Deleted {} sessions", count);
        Ok(())
    }

    /// Whether an interactive confirmation answer means yes
    fn confirmation_is_yes(answer: &str) -> bool {
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }

}
