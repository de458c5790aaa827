//! AI narrator for world and story generation.
//!
//! The narrator wraps an opaque text-generation collaborator behind the
//! [`TextGenerator`] trait and exposes the four operations the session
//! needs: world profile (with element extraction text), random theme,
//! storyline hook, and story continuation.

pub mod agent;
pub mod generator;
pub mod prompts;

pub use agent::{
    Narrator, StoryContext, WorldSeed, FALLBACK_HOOK, FALLBACK_PROFILE, FALLBACK_STORY,
    FALLBACK_THEME,
};
pub use generator::{GeminiGenerator, GenerateError, TextGenerator};
