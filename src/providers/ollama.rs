//! Ollama provider implementation for InfoFlow
//!
//! Connects to a local or remote Ollama server and generates completions
//! through the `/api/generate` endpoint. The request carries the full
//! prompt as a single string; conversation framing is the caller's
//! concern.

use crate::config::OllamaConfig;
use crate::error::{InfoFlowError, Result};
use crate::providers::Provider;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reply shown when the server answers successfully but with no text
const EMPTY_RESPONSE_FALLBACK: &str = "Sorry, I couldn't generate a response.";

/// Ollama API provider
///
/// # Examples
///
/// ```no_run
/// use infoflow::config::OllamaConfig;
/// use infoflow::providers::{OllamaProvider, Provider};
///
/// # async fn example() -> infoflow::error::Result<()> {
/// let config = OllamaConfig {
///     host: "http://localhost:11434".to_string(),
///     model: "tinyllama".to_string(),
///     timeout_seconds: 120,
/// };
/// let provider = OllamaProvider::new(config)?;
/// let reply = provider.generate("Hello!").await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama's /api/generate endpoint
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response structure from /api/generate
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// The HTTP client carries a request timeout so a hung model call
    /// cannot stall a turn indefinitely.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("infoflow/0.2.0")
            .build()
            .map_err(|e| InfoFlowError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.host);
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        tracing::debug!(
            "Sending generate request to {} (prompt: {} chars)",
            url,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to reach Ollama server: {}", e);
                InfoFlowError::Provider(format!("Failed to connect to Ollama server: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(InfoFlowError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama generate response: {}", e);
            InfoFlowError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        if !body.done {
            tracing::warn!("Ollama reply flagged as incomplete (done=false)");
        }

        if body.response.is_empty() {
            tracing::warn!("Ollama returned an empty response, substituting fallback reply");
            return Ok(EMPTY_RESPONSE_FALLBACK.to_string());
        }

        Ok(body.response)
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(host: &str) -> OllamaConfig {
        OllamaConfig {
            host: host.to_string(),
            model: "tinyllama".to_string(),
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_new_provider_reports_model_and_host() {
        let provider = OllamaProvider::new(test_config("http://localhost:11434")).unwrap();
        assert_eq!(provider.model(), "tinyllama");
        assert_eq!(provider.host(), "http://localhost:11434");
    }

    #[tokio::test]
    async fn test_generate_success() {
        use wiremock::matchers::{body_partial_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "model": "tinyllama",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "Hello from the model",
                "done": true
            })))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(test_config(&server.uri())).unwrap();
        let reply = provider.generate("Hi").await.unwrap();
        assert_eq!(reply, "Hello from the model");
    }

    #[tokio::test]
    async fn test_generate_server_error_is_provider_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(test_config(&server.uri())).unwrap();
        let err = provider.generate("Hi").await.expect_err("expected error");
        let err = err
            .downcast::<InfoFlowError>()
            .expect("expected InfoFlowError");
        assert!(matches!(err, InfoFlowError::Provider(_)));
    }

    #[tokio::test]
    async fn test_generate_empty_response_yields_fallback_reply() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "",
                "done": true
            })))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(test_config(&server.uri())).unwrap();
        let reply = provider.generate("Hi").await.unwrap();
        assert_eq!(reply, "Sorry, I couldn't generate a response.");
    }

    #[tokio::test]
    async fn test_generate_missing_response_field_yields_fallback_reply() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "done": true })),
            )
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(test_config(&server.uri())).unwrap();
        let reply = provider.generate("Hi").await.unwrap();
        assert_eq!(reply, "Sorry, I couldn't generate a response.");
    }

    #[tokio::test]
    async fn test_generate_unreachable_host_is_provider_error() {
        // Port 9 (discard) is almost certainly closed
        let provider = OllamaProvider::new(test_config("http://127.0.0.1:9")).unwrap();
        let err = provider.generate("Hi").await.expect_err("expected error");
        let err = err
            .downcast::<InfoFlowError>()
            .expect("expected InfoFlowError");
        assert!(matches!(err, InfoFlowError::Provider(_)));
    }
}
