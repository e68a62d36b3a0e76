//! Speech I/O collaborators
//!
//! Voice capture and speech synthesis are external capabilities reached
//! through narrow traits. The default implementations shell out to
//! configurable commands (speech-to-text prints a transcript on stdout,
//! text-to-speech reads its argument aloud), so the core never links an
//! audio stack directly.
//!
//! Synthesis is fire-and-forget: it runs outside the turn's critical
//! path, and its completion or failure has no effect on session state.
//! The spawned task's handle is returned so a caller may await or abort
//! it, but the default policy is to drop it.

use crate::error::{InfoFlowError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Outcome of one voice-capture attempt
///
/// Only `Transcript` carries a usable query; each failure variant is
/// reported as a distinct non-fatal warning and the turn proceeds with
/// an empty query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceCapture {
    /// Recognized speech
    Transcript(String),
    /// Nothing was said within the listening window
    NoSpeech,
    /// Audio was captured but could not be recognized
    Unintelligible,
    /// The recognizer could not be reached or failed outright
    Network(String),
}

/// Voice input collaborator
#[async_trait]
pub trait VoiceTranscriber: Send + Sync {
    /// Listen for up to `timeout` and return the capture outcome
    ///
    /// # Errors
    ///
    /// Returns error only for local failures (e.g. the transcriber
    /// command cannot be spawned); recognition failures are encoded in
    /// the [`VoiceCapture`] variants instead.
    async fn capture(&self, timeout: Duration) -> Result<VoiceCapture>;
}

/// Transcriber that runs a configured external speech-to-text command
///
/// The command is expected to record from the microphone and print the
/// transcript to stdout. A non-zero exit is treated as a recognizer
/// failure, empty output as unintelligible speech, and hitting the
/// timeout as silence.
pub struct CommandTranscriber {
    command: Vec<String>,
}

impl CommandTranscriber {
    /// Create a transcriber from a command line (program plus arguments)
    ///
    /// # Errors
    ///
    /// Returns error if the command line is empty.
    pub fn new(command: Vec<String>) -> Result<Self> {
        if command.is_empty() {
            return Err(InfoFlowError::Voice("empty transcriber command".to_string()).into());
        }
        Ok(Self { command })
    }
}

#[async_trait]
impl VoiceTranscriber for CommandTranscriber {
    async fn capture(&self, timeout: Duration) -> Result<VoiceCapture> {
        let mut cmd = tokio::process::Command::new(&self.command[0]);
        cmd.args(&self.command[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!("Listening via {:?} (timeout {:?})", self.command[0], timeout);

        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Err(_) => {
                tracing::debug!("Voice capture timed out after {:?}", timeout);
                return Ok(VoiceCapture::NoSpeech);
            }
            Ok(Err(e)) => {
                return Err(
                    InfoFlowError::Voice(format!("failed to spawn transcriber: {}", e)).into(),
                )
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Ok(VoiceCapture::Network(if stderr.is_empty() {
                format!("transcriber exited with {}", output.status)
            } else {
                stderr
            }));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            Ok(VoiceCapture::Unintelligible)
        } else {
            Ok(VoiceCapture::Transcript(transcript))
        }
    }
}

/// Speech synthesis collaborator
///
/// `speak` must not block: implementations hand the text to a background
/// task and return its handle immediately.
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text` aloud asynchronously
    ///
    /// Emoji characters are stripped before synthesis. The returned
    /// handle may be awaited or aborted; dropping it detaches the task.
    fn speak(&self, text: &str) -> JoinHandle<()>;
}

/// Synthesizer that runs a configured external text-to-speech command
///
/// The text is appended to the command line as the final argument
/// (matching `espeak "<text>"`).
pub struct CommandSynthesizer {
    command: Vec<String>,
}

impl CommandSynthesizer {
    /// Create a synthesizer from a command line (program plus arguments)
    ///
    /// # Errors
    ///
    /// Returns error if the command line is empty.
    pub fn new(command: Vec<String>) -> Result<Self> {
        if command.is_empty() {
            return Err(InfoFlowError::Voice("empty synthesizer command".to_string()).into());
        }
        Ok(Self { command })
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&self, text: &str) -> JoinHandle<()> {
        let command = self.command.clone();
        let text = strip_emojis(text);
        tokio::spawn(async move {
            let result = tokio::process::Command::new(&command[0])
                .args(&command[1..])
                .arg(&text)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await;
            match result {
                Ok(status) if !status.success() => {
                    tracing::warn!("Speech synthesis command exited with {}", status);
                }
                Err(e) => {
                    tracing::warn!("Failed to run speech synthesis command: {}", e);
                }
                Ok(_) => {}
            }
        })
    }
}

/// Synthesizer that does nothing
///
/// Used when speech is disabled (`--no-speech`) and in tests.
pub struct NullSynthesizer;

impl SpeechSynthesizer for NullSynthesizer {
    fn speak(&self, _text: &str) -> JoinHandle<()> {
        tokio::spawn(async {})
    }
}

/// Remove emoji characters before speech synthesis
///
/// A fixed Unicode-block filter, not locale-aware: emoticons, symbols
/// and pictographs, transport and map symbols, alchemical symbols,
/// geometric shapes extended, supplemental arrows and symbols, chess
/// symbols, symbols extended-A, and dingbats.
pub fn strip_emojis(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(
                *c as u32,
                0x1F600..=0x1F64F // Emoticons
                | 0x1F300..=0x1F5FF // Symbols & Pictographs
                | 0x1F680..=0x1F6FF // Transport & Map Symbols
                | 0x1F700..=0x1F77F // Alchemical Symbols
                | 0x1F780..=0x1F7FF // Geometric Shapes Extended
                | 0x1F800..=0x1F8FF // Supplemental Arrows-C
                | 0x1F900..=0x1F9FF // Supplemental Symbols and Pictographs
                | 0x1FA00..=0x1FA6F // Chess Symbols
                | 0x1FA70..=0x1FAFF // Symbols and Pictographs Extended-A
                | 0x2702..=0x27B0 // Dingbats
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_emojis_removes_emoticons() {
        assert_eq!(strip_emojis("hello 😀 world 🚀"), "hello  world ");
    }

    #[test]
    fn test_strip_emojis_leaves_plain_text_untouched() {
        let text = "The answer is 42. Voilà, c'est fini!";
        assert_eq!(strip_emojis(text), text);
    }

    #[test]
    fn test_strip_emojis_handles_dingbats() {
        assert_eq!(strip_emojis("done ✅ and ✂ cut"), "done  and  cut");
    }

    #[test]
    fn test_strip_emojis_empty_string() {
        assert_eq!(strip_emojis(""), "");
    }

    #[test]
    fn test_strip_emojis_all_emoji_input() {
        assert_eq!(strip_emojis("😀🎉🚀♟🧠"), "♟");
        // U+265F (chess pawn) is outside the filtered blocks; only the
        // 1FA00-1FA6F chess block is stripped.
    }

    #[test]
    fn test_command_transcriber_rejects_empty_command() {
        assert!(CommandTranscriber::new(Vec::new()).is_err());
    }

    #[test]
    fn test_command_synthesizer_rejects_empty_command() {
        assert!(CommandSynthesizer::new(Vec::new()).is_err());
    }

    #[tokio::test]
    async fn test_command_transcriber_reads_stdout() {
        let transcriber = CommandTranscriber::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo what is rust".to_string(),
        ])
        .unwrap();
        let capture = transcriber.capture(Duration::from_secs(5)).await.unwrap();
        assert_eq!(capture, VoiceCapture::Transcript("what is rust".to_string()));
    }

    #[tokio::test]
    async fn test_command_transcriber_empty_output_is_unintelligible() {
        let transcriber =
            CommandTranscriber::new(vec!["true".to_string()]).expect("command accepted");
        let capture = transcriber.capture(Duration::from_secs(5)).await.unwrap();
        assert_eq!(capture, VoiceCapture::Unintelligible);
    }

    #[tokio::test]
    async fn test_command_transcriber_failure_is_network_variant() {
        let transcriber = CommandTranscriber::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo offline >&2; exit 1".to_string(),
        ])
        .unwrap();
        let capture = transcriber.capture(Duration::from_secs(5)).await.unwrap();
        assert_eq!(capture, VoiceCapture::Network("offline".to_string()));
    }

    #[tokio::test]
    async fn test_command_transcriber_timeout_is_no_speech() {
        let transcriber = CommandTranscriber::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "sleep 5".to_string(),
        ])
        .unwrap();
        let capture = transcriber
            .capture(Duration::from_millis(50))
            .await
            .unwrap();
        assert_eq!(capture, VoiceCapture::NoSpeech);
    }

    #[tokio::test]
    async fn test_null_synthesizer_completes() {
        let handle = NullSynthesizer.speak("anything 😀");
        handle.await.expect("task completed");
    }

    #[tokio::test]
    async fn test_command_synthesizer_runs_detached() {
        // `true` ignores its argument and exits 0; the handle resolves
        // even though nothing awaits the command's output.
        let synthesizer = CommandSynthesizer::new(vec!["true".to_string()]).unwrap();
        let handle = synthesizer.speak("spoken reply 🎉");
        handle.await.expect("task completed");
    }

    #[tokio::test]
    async fn test_command_synthesizer_survives_missing_binary() {
        let synthesizer =
            CommandSynthesizer::new(vec!["definitely-not-a-real-tts-binary".to_string()]).unwrap();
        // Failure is logged, not surfaced; the task still completes.
        let handle = synthesizer.speak("hello");
        handle.await.expect("task completed");
    }
}
