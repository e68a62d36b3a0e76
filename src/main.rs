//! InfoFlow - conversational assistant CLI
//!
#![doc = "InfoFlow - conversational assistant CLI"]
#![doc = "Main entry point for the InfoFlow application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infoflow::cli::{Cli, Commands, SessionCommand};
use infoflow::commands;
use infoflow::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // If the user supplied a session file on the CLI (or via env),
    // mirror it into INFOFLOW_SESSIONS_FILE so the store initializer can
    // pick it up. This keeps callers unchanged while allowing
    // `SessionStore::new()` to honor an override.
    if let Some(path) = &cli.sessions_file {
        std::env::set_var(infoflow::store::SESSIONS_FILE_ENV, path);
        tracing::info!("Using session file override from CLI: {}", path);
    }

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat {
            session,
            model,
            attach,
            no_speech,
        } => {
            tracing::info!("Starting interactive chat");
            if let Some(s) = &session {
                tracing::debug!("Resuming session: {}", s);
            }
            if let Some(m) = &model {
                tracing::debug!("Using model override: {}", m);
            }

            commands::chat::run_chat(config, session, model, attach, no_speech).await?;
            Ok(())
        }
        Commands::Ask {
            prompt,
            session,
            model,
            attach,
            no_speech,
        } => {
            tracing::debug!("One-shot question ({} chars)", prompt.len());
            commands::ask::run_ask(config, prompt, session, model, attach, no_speech).await?;
            Ok(())
        }
        Commands::Sessions { command } => match command {
            SessionCommand::List { query } => {
                commands::sessions::run_list(&config, query)?;
                Ok(())
            }
            SessionCommand::Rename { old, new } => {
                commands::sessions::run_rename(&config, &old, &new)?;
                Ok(())
            }
            SessionCommand::Archive { id } => {
                commands::sessions::run_archive(&config, &id)?;
                Ok(())
            }
            SessionCommand::Delete { id } => {
                commands::sessions::run_delete(&config, &id)?;
                Ok(())
            }
            SessionCommand::Clear { yes } => {
                commands::sessions::run_clear(&config, yes)?;
                Ok(())
            }
        },
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `--verbose` raises the default level to debug; RUST_LOG still wins
/// when set.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "infoflow=debug"
    } else {
        "infoflow=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
