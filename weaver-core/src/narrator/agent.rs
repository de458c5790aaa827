//! The narrator agent.
//!
//! Wraps a boxed [`TextGenerator`] and exposes the four generation
//! operations used by the session. Operations return typed results; the
//! session decides fallback behavior, using the `FALLBACK_*` strings
//! defined here.

use super::generator::{GeminiGenerator, GenerateError, TextGenerator};
use super::prompts;
use crate::character::Character;

/// Fallback world profile when generation fails.
pub const FALLBACK_PROFILE: &str =
    "An uncharted realm stretches beyond the map's edge, its peoples and their stories not yet written.";

/// Fallback theme when generation fails.
pub const FALLBACK_THEME: &str = "A mysterious forest where ancient secrets sleep.";

/// Fallback storyline hook when generation fails.
pub const FALLBACK_HOOK: &str = "An unexpected event shatters the peace...";

/// Fallback story segment when generation fails.
pub const FALLBACK_STORY: &str = "The path ahead is shrouded in uncertainty...";

/// A freshly generated world: the profile document plus the companion
/// extraction text the element parser scans.
#[derive(Debug, Clone)]
pub struct WorldSeed {
    pub profile: String,
    pub extraction: String,
}

/// Context bundle for a continue-story request.
#[derive(Debug, Clone)]
pub struct StoryContext<'a> {
    /// World profile, already reduced if it was overlong.
    pub world_context: &'a str,
    pub genre: &'a str,
    pub storyline_hook: &'a str,
    pub previous_segment: &'a str,
    pub character: &'a Character,
}

/// The AI narrator.
pub struct Narrator {
    generator: Box<dyn TextGenerator>,
}

impl Narrator {
    /// Create a narrator over any text generator.
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Create a Gemini-backed narrator from the GEMINI_API_KEY environment
    /// variable.
    pub fn from_env() -> Result<Self, gemini::Error> {
        Ok(Self::new(Box::new(GeminiGenerator::from_env()?)))
    }

    /// Generate a world profile from a description, then ask the generator
    /// to restate the profile's element categories in the fixed four-line
    /// format.
    pub async fn world_profile(&self, description: &str) -> Result<WorldSeed, GenerateError> {
        let profile = self
            .generator
            .generate(&[prompts::profile_request(), description.to_string()])
            .await?;

        let extraction = self
            .generator
            .generate(&[prompts::extraction_request(), profile.clone()])
            .await?;

        Ok(WorldSeed {
            profile,
            extraction,
        })
    }

    /// Generate a single-sentence world theme.
    pub async fn random_theme(&self) -> Result<String, GenerateError> {
        self.generator.generate(&[prompts::theme_request()]).await
    }

    /// Generate a one-sentence storyline hook for the given profile.
    pub async fn storyline_hook(&self, profile: &str) -> Result<String, GenerateError> {
        self.generator
            .generate(&[prompts::hook_request(profile)])
            .await
    }

    /// Generate the next story segment for a player action.
    pub async fn continue_story(
        &self,
        context: &StoryContext<'_>,
        player_action: &str,
    ) -> Result<String, GenerateError> {
        self.generator
            .generate(&[prompts::story_request(context, player_action)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingGenerator, ScriptedGenerator};

    #[tokio::test]
    async fn test_world_profile_chains_two_requests() {
        let generator = ScriptedGenerator::new();
        generator.push("## World Name\nEryndor");
        generator.push("FACTIONS: Sandwalkers\nRACES: Duneborn\nSKILLS:\nROLES: Scout");

        let narrator = Narrator::new(Box::new(generator.clone()));
        let seed = narrator.world_profile("A desert kingdom").await.unwrap();

        assert_eq!(seed.profile, "## World Name\nEryndor");
        assert!(seed.extraction.starts_with("FACTIONS:"));
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_propagates_as_typed_error() {
        let narrator = Narrator::new(Box::new(FailingGenerator));
        assert!(matches!(
            narrator.random_theme().await,
            Err(GenerateError::Failed(_))
        ));
    }
}
