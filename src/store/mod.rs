//! Session persistence for InfoFlow
//!
//! All chat sessions live in a single JSON blob mapping session
//! identifier to its record. The whole file is read on load and
//! atomically replaced on save; there is no merging, no schema version
//! field, and no multi-writer coordination (single-user, single-process
//! assumption).
//!
//! The store does not auto-persist: callers mutate the in-memory
//! [`SessionMap`] and then call [`SessionStore::save`] explicitly.

use crate::error::{InfoFlowError, Result};
use anyhow::Context;
use chrono::NaiveDate;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub mod recency;
pub mod search;
pub mod types;

pub use recency::{classify, BucketedSessions, RecencyBucket};
pub use search::filter_ids;
pub use types::{Message, Role, Session, SessionMap};

/// Environment variable overriding the session file location
///
/// Useful for pointing the binary at a test store or alternate file
/// without changing the user's application data dir.
pub const SESSIONS_FILE_ENV: &str = "INFOFLOW_SESSIONS_FILE";

/// File name of the persisted blob inside the data directory
const SESSIONS_FILE_NAME: &str = "chat_sessions.json";

/// Durable store for chat sessions backed by a single JSON file
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store at the default location
    ///
    /// The default is `chat_sessions.json` inside the user's data
    /// directory; `INFOFLOW_SESSIONS_FILE` overrides it.
    ///
    /// # Errors
    ///
    /// Returns error if the data directory cannot be determined or
    /// created.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var(SESSIONS_FILE_ENV) {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "xbcsmith", "infoflow")
            .ok_or_else(|| InfoFlowError::Storage("Could not determine data directory".into()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory")
            .map_err(|e| InfoFlowError::Storage(e.to_string()))?;

        Ok(Self {
            path: data_dir.join(SESSIONS_FILE_NAME),
        })
    }

    /// Create a store that uses the specified file path
    ///
    /// Primarily useful for tests where the default application data
    /// directory is not desirable (for example, a temporary directory).
    ///
    /// # Errors
    ///
    /// Returns error if the parent directory cannot be created.
    pub fn new_with_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create parent directory for session store")
                    .map_err(|e| InfoFlowError::Storage(e.to_string()))?;
            }
        }

        Ok(Self { path })
    }

    /// Path of the persisted blob
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full session mapping
    ///
    /// Returns an empty mapping if no blob exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`InfoFlowError::StorageCorrupt`] if the blob exists but
    /// cannot be parsed. The error propagates to the caller; the store
    /// never attempts repair.
    pub fn load(&self) -> Result<SessionMap> {
        if !self.path.exists() {
            tracing::debug!("No session file at {}, starting empty", self.path.display());
            return Ok(SessionMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| InfoFlowError::Storage(format!("Failed to read session file: {}", e)))?;

        let sessions: SessionMap = serde_json::from_str(&contents)
            .map_err(|e| InfoFlowError::StorageCorrupt(e.to_string()))?;

        tracing::debug!(
            "Loaded {} sessions from {}",
            sessions.len(),
            self.path.display()
        );
        Ok(sessions)
    }

    /// Persist the full session mapping, replacing previous contents
    ///
    /// The blob is written to a temporary file in the same directory and
    /// renamed into place, so a crash mid-write never leaves a partial
    /// file visible to a subsequent [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the filesystem operations fail.
    pub fn save(&self, sessions: &SessionMap) -> Result<()> {
        let contents = serde_json::to_string_pretty(sessions)
            .map_err(|e| InfoFlowError::Storage(format!("Failed to serialize sessions: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .map_err(|e| InfoFlowError::Storage(format!("Failed to write session file: {}", e)))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            InfoFlowError::Storage(format!("Failed to replace session file: {}", e))
        })?;

        tracing::debug!(
            "Saved {} sessions to {}",
            sessions.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Remove a session from the in-memory mapping
///
/// Returns the removed record, or an error if the identifier is unknown.
/// The caller must [`SessionStore::save`] afterward for durability.
pub fn delete_session(sessions: &mut SessionMap, id: &str) -> Result<Session> {
    sessions
        .remove(id)
        .ok_or_else(|| InfoFlowError::UnknownSession(id.to_string()).into())
}

/// Move a session record to a new identifier
///
/// Messages and date are preserved; only the key changes and the old key
/// is removed. Refuses to clobber an existing session under `new_id`.
pub fn rename_session(sessions: &mut SessionMap, old_id: &str, new_id: &str) -> Result<()> {
    if old_id == new_id {
        return Ok(());
    }
    if sessions.contains_key(new_id) {
        return Err(InfoFlowError::SessionExists(new_id.to_string()).into());
    }
    let record = sessions
        .remove(old_id)
        .ok_or_else(|| InfoFlowError::UnknownSession(old_id.to_string()))?;
    sessions.insert(new_id.to_string(), record);
    Ok(())
}

/// Mark a session as archived
///
/// Archiving does not delete the record and does not remove it from the
/// recency buckets; it only sets a flag.
pub fn archive_session(sessions: &mut SessionMap, id: &str) -> Result<()> {
    let session = sessions
        .get_mut(id)
        .ok_or_else(|| InfoFlowError::UnknownSession(id.to_string()))?;
    session.archived = true;
    Ok(())
}

/// Empty the entire mapping
pub fn clear_all(sessions: &mut SessionMap) {
    sessions.clear();
}

/// Auto-generate an identifier for a new chat: `"Chat {count+1} - {today}"`
pub fn next_session_id(sessions: &SessionMap, today: NaiveDate) -> String {
    format!("Chat {} - {}", sessions.len() + 1, today)
}
