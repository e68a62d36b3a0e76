//! Provider module for InfoFlow
//!
//! This module contains the model-generation abstraction and its Ollama
//! implementation. The provider is a black box from the orchestrator's
//! point of view: prompt in, generated text (or failure) out.

pub mod ollama;

pub use ollama::OllamaProvider;

use crate::config::ProviderConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Model-generation collaborator
///
/// Implementations take a fully assembled prompt (user query, possibly
/// prefixed with extracted document text) and return the model's reply.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate a completion for the given prompt
    ///
    /// # Arguments
    ///
    /// * `prompt` - The full prompt text to send to the model
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response is invalid.
    /// Callers in the turn path convert failures into a synthetic
    /// assistant reply rather than propagating them.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the model this provider is configured for
    fn model(&self) -> String;
}

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider (currently only "ollama")
/// * `config` - Provider configuration
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
pub fn create_provider(provider_type: &str, config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    match provider_type {
        "ollama" => Ok(Box::new(OllamaProvider::new(config.ollama.clone())?)),
        _ => Err(crate::error::InfoFlowError::Provider(format!(
            "Unknown provider type: {}",
            provider_type
        ))
        .into()),
    }
}
