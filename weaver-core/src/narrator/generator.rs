//! The text-generation collaborator boundary.
//!
//! A generator takes an ordered sequence of text fragments (instructions
//! plus context) and returns a completion or a typed failure. One request,
//! one response; no retries.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a text generator.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Generation request failed: {0}")]
    Request(#[from] gemini::Error),

    #[error("Generator returned an empty response")]
    Empty,

    #[error("Generation failed: {0}")]
    Failed(String),
}

/// An opaque text-generation collaborator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the given ordered text fragments.
    async fn generate(&self, fragments: &[String]) -> Result<String, GenerateError>;
}

/// Generator backed by the Gemini API.
pub struct GeminiGenerator {
    client: gemini::Gemini,
}

impl GeminiGenerator {
    /// Wrap an already-configured Gemini client.
    pub fn new(client: gemini::Gemini) -> Self {
        Self { client }
    }

    /// Create a generator from the GEMINI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, gemini::Error> {
        Ok(Self::new(gemini::Gemini::from_env()?))
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, fragments: &[String]) -> Result<String, GenerateError> {
        let request = gemini::Request::from_fragments(fragments.iter().cloned());
        let response = self.client.generate(request).await?;

        let text = response.text().trim().to_string();
        if text.is_empty() {
            return Err(GenerateError::Empty);
        }
        Ok(text)
    }
}
