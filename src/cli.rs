//! Command-line interface definition for InfoFlow
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, and
//! session management.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// InfoFlow - conversational assistant CLI
///
/// Chat with a locally hosted model, augment prompts with text extracted
/// from attached documents, and keep sessions in a flat JSON store
/// grouped by recency.
#[derive(Parser, Debug, Clone)]
#[command(name = "infoflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the session store file path
    #[arg(long, env = "INFOFLOW_SESSIONS_FILE")]
    pub sessions_file: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for InfoFlow
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Session to resume (a new one is created if omitted)
        #[arg(short, long)]
        session: Option<String>,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,

        /// Attach a document (PDF/CSV/XLSX); repeatable
        #[arg(short, long = "attach")]
        attach: Vec<PathBuf>,

        /// Do not speak replies aloud
        #[arg(long)]
        no_speech: bool,
    },

    /// Ask a single question and print the reply
    Ask {
        /// The question to ask
        prompt: String,

        /// Session to record the turn in (a new one is created if omitted)
        #[arg(short, long)]
        session: Option<String>,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,

        /// Attach a document (PDF/CSV/XLSX); repeatable
        #[arg(short, long = "attach")]
        attach: Vec<PathBuf>,

        /// Do not speak the reply aloud
        #[arg(long)]
        no_speech: bool,
    },

    /// Manage stored chat sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List sessions grouped by recency
    List {
        /// Case-insensitive substring filter on session names
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Rename a session (moves its history to the new name)
    Rename {
        /// Current session name
        old: String,
        /// New session name
        new: String,
    },

    /// Archive a session (kept in the store, flagged as archived)
    Archive {
        /// Session name
        id: String,
    },

    /// Delete a session permanently
    Delete {
        /// Session name
        id: String,
    },

    /// Delete every stored session
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            sessions_file: None,
            command: Commands::Sessions {
                command: SessionCommand::List { query: None },
            },
        }
    }
}
