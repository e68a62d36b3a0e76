//! Chat turn orchestration
//!
//! [`ChatOrchestrator`] ties current-session selection, message append,
//! prompt augmentation, and model dispatch into one request/response
//! cycle. It is the only component that talks to the model provider and
//! the document-extraction collaborator.
//!
//! Turns are strictly sequential: every entry point takes `&mut self`,
//! so no turn can start while a previous dispatch is outstanding. The
//! only concurrent work is the fire-and-forget speech task, which shares
//! nothing with the turn beyond the reply text it was given at spawn
//! time.

use crate::error::Result;
use crate::extract::{augment_prompt, extract_documents};
use crate::providers::Provider;
use crate::speech::{SpeechSynthesizer, VoiceCapture, VoiceTranscriber};
use crate::store::{Message, Session, SessionMap, SessionStore};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Explicit per-turn session context
///
/// Replaces ambient "current chat" globals: callers decide which session
/// a turn belongs to and what "today" is (injectable for testability).
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Identifier of the active session; created on first turn if absent
    pub session_id: String,
    /// Calendar date stamped onto the session when the turn persists
    pub today: NaiveDate,
}

impl SessionContext {
    /// Create a context for `session_id` dated `today`
    pub fn new(session_id: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            session_id: session_id.into(),
            today,
        }
    }
}

/// Result of one completed turn
pub struct TurnOutcome {
    /// The assistant's reply (possibly a synthetic error message)
    pub reply: String,
    /// Handle of the speech playback task, when speech was requested
    ///
    /// Awaiting or aborting it is optional; the default policy is to
    /// drop the handle and let playback finish on its own.
    pub speech: Option<JoinHandle<()>>,
}

/// Drives one user turn through capture, augmentation, dispatch, and
/// persistence
pub struct ChatOrchestrator {
    provider: Box<dyn Provider>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    store: SessionStore,
}

impl ChatOrchestrator {
    /// Create an orchestrator over the given collaborators
    pub fn new(
        provider: Box<dyn Provider>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        store: SessionStore,
    ) -> Self {
        Self {
            provider,
            synthesizer,
            store,
        }
    }

    /// The session store this orchestrator persists through
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Capture a voice query through the transcriber collaborator
    ///
    /// Silence, unintelligible speech, recognizer failures, and a
    /// transcriber that cannot even be spawned each produce a distinct
    /// warning and an empty query; none of them is fatal to the session.
    pub async fn capture_voice(
        &mut self,
        transcriber: &dyn VoiceTranscriber,
        timeout: Duration,
    ) -> Result<String> {
        let capture = match transcriber.capture(timeout).await {
            Ok(capture) => capture,
            Err(e) => {
                tracing::warn!("Voice capture unavailable: {}", e);
                return Ok(String::new());
            }
        };

        match capture {
            VoiceCapture::Transcript(text) => Ok(text),
            VoiceCapture::NoSpeech => {
                tracing::warn!("No speech detected before the listening window closed");
                Ok(String::new())
            }
            VoiceCapture::Unintelligible => {
                tracing::warn!("Sorry, could not understand audio");
                Ok(String::new())
            }
            VoiceCapture::Network(reason) => {
                tracing::warn!("Could not request transcription results: {}", reason);
                Ok(String::new())
            }
        }
    }

    /// Run one full turn: augment, dispatch, append, speak, persist
    ///
    /// The user message and the assistant reply are both appended to the
    /// session (created with today's date if absent) and the whole store
    /// is saved before returning. A provider failure never propagates:
    /// it becomes a synthetic `Error: …` reply recorded like any other,
    /// so the session history still shows the failed turn.
    ///
    /// # Arguments
    ///
    /// * `sessions` - The full in-memory session mapping
    /// * `ctx` - Active session id and today's date
    /// * `query` - The user's (typed or transcribed) query
    /// * `attachments` - Documents whose text augments the prompt
    /// * `speak` - Whether to start speech playback of the reply
    ///
    /// # Errors
    ///
    /// Returns error only when persisting the store fails.
    pub async fn take_turn(
        &mut self,
        sessions: &mut SessionMap,
        ctx: &SessionContext,
        query: &str,
        attachments: &[PathBuf],
        speak: bool,
    ) -> Result<TurnOutcome> {
        let file_text = extract_documents(attachments);
        let prompt = augment_prompt(&file_text, query);

        tracing::debug!(
            "Dispatching turn for session '{}' (prompt: {} chars, {} attachments)",
            ctx.session_id,
            prompt.len(),
            attachments.len()
        );

        let reply = match self.provider.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Generation failed, recording synthetic reply: {}", e);
                format!("Error: {}", e)
            }
        };

        let session = sessions
            .entry(ctx.session_id.clone())
            .or_insert_with(|| Session::new(ctx.today));
        session.date = ctx.today;
        session.push(Message::user(query));
        session.push(Message::assistant(reply.clone()));

        let speech = speak.then(|| self.synthesizer.speak(&reply));

        self.store.save(sessions)?;

        Ok(TurnOutcome { reply, speech })
    }
}
