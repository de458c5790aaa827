//! Testing utilities for the World Weaver engine.
//!
//! This module provides tools for deterministic tests without API calls:
//! - `ScriptedGenerator` returning queued responses in order
//! - `FailingGenerator` whose every call fails
//! - `TestHarness` for driving a session through scripted scenarios
//! - Assertion helpers for verifying session state

use crate::character::CharacterBuilder;
use crate::narrator::{GenerateError, Narrator, TextGenerator};
use crate::session::{GameSession, SessionError};
use crate::stage::{GameEvent, Stage};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returned when a scripted generator runs out of queued responses.
pub const OUT_OF_SCRIPT: &str = "The narrator has run out of scripted lines.";

/// A generator that returns scripted responses in order.
///
/// Clones share the same script, so a harness can keep queueing responses
/// after the generator has been boxed into a narrator.
#[derive(Clone, Default)]
pub struct ScriptedGenerator {
    script: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn push(&self, response: impl Into<String>) {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(response.into());
    }

    /// How many generate calls have been made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// How many queued responses remain.
    pub fn remaining(&self) -> usize {
        self.script.lock().expect("script lock poisoned").len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _fragments: &[String]) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| OUT_OF_SCRIPT.to_string()))
    }
}

/// A generator whose every call fails.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _fragments: &[String]) -> Result<String, GenerateError> {
        Err(GenerateError::Failed("scripted failure".to_string()))
    }
}

/// Sample profile used by the harness constructors.
pub const SAMPLE_PROFILE: &str = "## World Name\nThe Desert Kingdom\n## Genre\nFantasy";

/// Sample extraction text matching [`SAMPLE_PROFILE`].
pub const SAMPLE_EXTRACTION: &str =
    "FACTIONS: Sandwalkers\nRACES: Duneborn\nSKILLS: Tracking\nROLES: Scout";

/// Test harness for running scripted game scenarios.
pub struct TestHarness {
    /// The session under test.
    pub session: GameSession,
    generator: ScriptedGenerator,
}

impl TestHarness {
    /// Create a fresh session with an empty script.
    pub fn new() -> Self {
        let generator = ScriptedGenerator::new();
        let session = GameSession::new(Narrator::new(Box::new(generator.clone())));
        Self { session, generator }
    }

    /// Create a session advanced past world creation with the sample world.
    pub async fn with_world() -> Self {
        let mut harness = Self::new();
        harness.expect_response(SAMPLE_PROFILE);
        harness.expect_response(SAMPLE_EXTRACTION);
        harness
            .session
            .generate_world("A desert kingdom")
            .await
            .expect("scripted world generation");
        harness
    }

    /// Create a session at character creation.
    pub async fn with_campaign_setup() -> Self {
        let mut harness = Self::with_world().await;
        harness
            .session
            .confirm_storyline("Fantasy", "The last oasis is drying up.")
            .expect("storyline confirmation");
        harness
    }

    /// Create a session in the campaign with a seeded story log.
    pub async fn in_campaign() -> Self {
        let mut harness = Self::with_campaign_setup().await;
        harness.expect_response("You wake beneath a bone-white sky.");
        harness
            .session
            .begin_campaign(
                CharacterBuilder::new()
                    .name("Kira")
                    .description("A wanderer")
                    .race("Duneborn")
                    .faction("Sandwalkers")
                    .role("Scout")
                    .skill("Tracking"),
            )
            .await
            .expect("scripted campaign start");
        harness
    }

    /// Create a session advanced to the given stage with sample data.
    pub async fn at_stage(stage: Stage) -> Self {
        match stage {
            Stage::WorldCreation => Self::new(),
            Stage::StorylineSetup => Self::with_world().await,
            Stage::CharacterCreation => Self::with_campaign_setup().await,
            Stage::Campaign => Self::in_campaign().await,
            Stage::CampaignEnd => {
                let mut harness = Self::in_campaign().await;
                harness.session.end_campaign().expect("campaign end");
                harness
            }
        }
    }

    /// Queue a generator response.
    pub fn expect_response(&mut self, text: impl Into<String>) -> &mut Self {
        self.generator.push(text);
        self
    }

    /// How many generate calls the session has made.
    pub fn generator_calls(&self) -> usize {
        self.generator.calls()
    }

    /// Fire an event with placeholder input, for transition-table tests.
    pub async fn fire(&mut self, event: GameEvent) -> Result<(), SessionError> {
        match event {
            GameEvent::GenerateProfile => self.session.generate_world("A placeholder world").await,
            GameEvent::RandomTheme => self.session.random_theme().await.map(|_| ()),
            GameEvent::RandomizeHook => self.session.randomize_hook().await.map(|_| ()),
            GameEvent::ConfirmStoryline => self
                .session
                .confirm_storyline("Fantasy", "A placeholder hook."),
            GameEvent::BeginCampaign => {
                self.session
                    .begin_campaign(
                        CharacterBuilder::new()
                            .name("Placeholder")
                            .description("A placeholder"),
                    )
                    .await
            }
            GameEvent::SubmitAction => self.session.submit_action("wait").await.map(|_| ()),
            GameEvent::EndCampaign => self.session.end_campaign(),
            GameEvent::StartNewWorld => self.session.start_new_world(),
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the session is at the expected stage.
#[track_caller]
pub fn assert_stage(session: &GameSession, expected: Stage) {
    assert_eq!(
        session.stage(),
        expected,
        "Expected stage {expected:?}, got {:?}",
        session.stage()
    );
}

/// Assert the story log and action memory lengths.
#[track_caller]
pub fn assert_log_lengths(session: &GameSession, story: usize, actions: usize) {
    assert_eq!(
        session.story_log().len(),
        story,
        "Expected story log of length {story}"
    );
    assert_eq!(
        session.action_memory().len(),
        actions,
        "Expected action memory of length {actions}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_generator_order() {
        let generator = ScriptedGenerator::new();
        generator.push("first");
        generator.push("second");

        assert_eq!(generator.generate(&[]).await.unwrap(), "first");
        assert_eq!(generator.generate(&[]).await.unwrap(), "second");
        assert_eq!(generator.generate(&[]).await.unwrap(), OUT_OF_SCRIPT);
        assert_eq!(generator.calls(), 3);
        assert_eq!(generator.remaining(), 0);
    }

    #[tokio::test]
    async fn test_failing_generator() {
        let result = FailingGenerator.generate(&[]).await;
        assert!(matches!(result, Err(GenerateError::Failed(_))));
    }

    #[tokio::test]
    async fn test_harness_stage_constructors() {
        for stage in Stage::all() {
            let harness = TestHarness::at_stage(stage).await;
            assert_stage(&harness.session, stage);
        }
    }

    #[tokio::test]
    async fn test_in_campaign_seeds_logs() {
        let harness = TestHarness::in_campaign().await;
        assert_log_lengths(&harness.session, 1, 0);
        assert_eq!(
            harness.session.story_log()[0],
            "You wake beneath a bone-white sky."
        );
    }
}
