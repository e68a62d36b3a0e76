//! InfoFlow - conversational assistant CLI library
//!
//! This library provides the core functionality for the InfoFlow
//! assistant: session persistence with recency grouping, prompt
//! augmentation from documents, model dispatch, and speech I/O.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `orchestrator`: One-turn request/response cycle over the collaborators
//! - `store`: Flat-JSON session persistence, recency buckets, and search
//! - `providers`: Model-generation abstraction and the Ollama implementation
//! - `extract`: Text extraction from PDF/CSV/XLSX attachments
//! - `speech`: Voice capture and speech synthesis collaborators
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use infoflow::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     // Orchestrator usage would go here
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod providers;
pub mod speech;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{InfoFlowError, Result};
pub use orchestrator::{ChatOrchestrator, SessionContext, TurnOutcome};
pub use store::{Message, Role, Session, SessionMap, SessionStore};
