//! GameSession - the primary public API for running a World Weaver game.
//!
//! The session owns all per-player state and sequences the stage machine:
//! every public operation corresponds to one [`GameEvent`], checks the
//! transition table and its guard before touching any field, and absorbs
//! collaborator failures by substituting the operation's fixed fallback
//! string while recording a non-fatal notice.

use crate::character::{BuilderError, Character, CharacterBuilder};
use crate::narrator::{
    prompts, GenerateError, Narrator, StoryContext, WorldSeed, FALLBACK_HOOK, FALLBACK_PROFILE,
    FALLBACK_STORY, FALLBACK_THEME,
};
use crate::stage::{GameEvent, Stage};
use crate::world::{extract_elements, profile_context, WorldElements};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from session operations.
///
/// All variants are warning-class guard failures: the stage does not change,
/// no field is mutated, and the caller may correct the input and resubmit.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{event} is not available during {stage}")]
    NotPermitted { stage: Stage, event: GameEvent },

    #[error("Please enter a world description or generate a random theme.")]
    EmptyDescription,

    #[error("Please provide both a genre and a storyline hook.")]
    MissingStoryline,

    #[error("Generate a world profile first.")]
    MissingProfile,

    #[error(transparent)]
    Character(#[from] BuilderError),

    #[error("Please describe your action.")]
    EmptyAction,
}

/// All per-session data. One instance per player; sessions share nothing.
///
/// Not persisted anywhere: losing the session discards all of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub stage: Stage,
    pub world_profile: Option<String>,
    pub world_elements: WorldElements,
    pub genre: String,
    pub storyline_hook: String,
    pub character: Option<Character>,
    pub story_log: Vec<String>,
    pub action_memory: Vec<String>,
}

/// A World Weaver game session.
pub struct GameSession {
    id: SessionId,
    narrator: Narrator,
    state: SessionState,
    notice: Option<String>,
}

impl GameSession {
    /// Create a new session over the given narrator.
    pub fn new(narrator: Narrator) -> Self {
        Self {
            id: SessionId::new(),
            narrator,
            state: SessionState::default(),
            notice: None,
        }
    }

    /// Create a Gemini-backed session from the GEMINI_API_KEY environment
    /// variable.
    pub fn from_env() -> Result<Self, gemini::Error> {
        Ok(Self::new(Narrator::from_env()?))
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    /// The full session state, for rendering.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn world_profile(&self) -> Option<&str> {
        self.state.world_profile.as_deref()
    }

    pub fn world_elements(&self) -> &WorldElements {
        &self.state.world_elements
    }

    pub fn genre(&self) -> &str {
        &self.state.genre
    }

    pub fn storyline_hook(&self) -> &str {
        &self.state.storyline_hook
    }

    pub fn character(&self) -> Option<&Character> {
        self.state.character.as_ref()
    }

    pub fn story_log(&self) -> &[String] {
        &self.state.story_log
    }

    pub fn action_memory(&self) -> &[String] {
        &self.state.action_memory
    }

    /// Take the pending non-fatal notice, if a collaborator call failed
    /// during the last operation.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Generate the world profile from a description and advance to
    /// storyline setup.
    pub async fn generate_world(&mut self, description: &str) -> Result<(), SessionError> {
        self.permit(GameEvent::GenerateProfile)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(SessionError::EmptyDescription);
        }

        let seed = match self.narrator.world_profile(description).await {
            Ok(seed) => seed,
            Err(err) => {
                self.notice = Some(format!("Error generating world profile: {err}"));
                WorldSeed {
                    profile: FALLBACK_PROFILE.to_string(),
                    extraction: String::new(),
                }
            }
        };

        self.state.world_elements = extract_elements(&seed.extraction);
        self.state.world_profile = Some(seed.profile);
        self.state.stage = Stage::StorylineSetup;
        Ok(())
    }

    /// Request a random world theme. The caller places the result into the
    /// description field; the stage does not change.
    pub async fn random_theme(&mut self) -> Result<String, SessionError> {
        self.permit(GameEvent::RandomTheme)?;
        let result = self.narrator.random_theme().await;
        Ok(self.recover(result, "Error generating random theme", FALLBACK_THEME))
    }

    /// Replace the storyline hook with a generated one.
    pub async fn randomize_hook(&mut self) -> Result<String, SessionError> {
        self.permit(GameEvent::RandomizeHook)?;
        let profile = self
            .state
            .world_profile
            .as_deref()
            .ok_or(SessionError::MissingProfile)?;

        let result = self.narrator.storyline_hook(profile).await;
        let hook = self.recover(result, "Error generating storyline hook", FALLBACK_HOOK);
        self.state.storyline_hook = hook.clone();
        Ok(hook)
    }

    /// Confirm the genre and storyline hook and advance to character
    /// creation. Both become read-only inputs to every later generation
    /// call.
    pub fn confirm_storyline(&mut self, genre: &str, hook: &str) -> Result<(), SessionError> {
        self.permit(GameEvent::ConfirmStoryline)?;
        let genre = genre.trim();
        let hook = hook.trim();
        if genre.is_empty() || hook.is_empty() {
            return Err(SessionError::MissingStoryline);
        }

        self.state.genre = genre.to_string();
        self.state.storyline_hook = hook.to_string();
        self.state.stage = Stage::CharacterCreation;
        Ok(())
    }

    /// Build the character, narrate the opening scene, and enter the
    /// campaign. The story log is seeded with the opener; the action memory
    /// starts empty.
    pub async fn begin_campaign(&mut self, builder: CharacterBuilder) -> Result<(), SessionError> {
        self.permit(GameEvent::BeginCampaign)?;
        let character = builder.build(&self.state.world_elements)?;

        let result = {
            let world_context = profile_context(
                self.state.world_profile.as_deref().unwrap_or_default(),
                &self.state.world_elements,
            );
            let directive = prompts::opening_scene_directive(&character);
            let context = StoryContext {
                world_context: &world_context,
                genre: &self.state.genre,
                storyline_hook: &self.state.storyline_hook,
                previous_segment: "The story is just beginning.",
                character: &character,
            };
            self.narrator.continue_story(&context, &directive).await
        };
        let opener = self.recover(result, "Error continuing story", FALLBACK_STORY);

        self.state.character = Some(character);
        self.state.story_log = vec![opener];
        self.state.action_memory.clear();
        self.state.stage = Stage::Campaign;
        Ok(())
    }

    /// Narrate the player's next action. Appends the action to the action
    /// memory and the new segment to the story log, and returns the
    /// segment.
    pub async fn submit_action(&mut self, action: &str) -> Result<&str, SessionError> {
        self.permit(GameEvent::SubmitAction)?;
        let action = action.trim();
        if action.is_empty() {
            return Err(SessionError::EmptyAction);
        }

        let result = match &self.state.character {
            Some(character) => {
                let world_context = profile_context(
                    self.state.world_profile.as_deref().unwrap_or_default(),
                    &self.state.world_elements,
                );
                let previous = self
                    .state
                    .story_log
                    .last()
                    .map(String::as_str)
                    .unwrap_or("The adventure has just begun.");
                let context = StoryContext {
                    world_context: &world_context,
                    genre: &self.state.genre,
                    storyline_hook: &self.state.storyline_hook,
                    previous_segment: previous,
                    character,
                };
                self.narrator.continue_story(&context, action).await
            }
            None => Err(GenerateError::Failed(
                "no character has been created".to_string(),
            )),
        };
        let segment = self.recover(result, "Error continuing story", FALLBACK_STORY);

        self.state.action_memory.push(action.to_string());
        self.state.story_log.push(segment);
        Ok(self
            .state
            .story_log
            .last()
            .map(String::as_str)
            .unwrap_or_default())
    }

    /// End the campaign and move to the campaign log.
    pub fn end_campaign(&mut self) -> Result<(), SessionError> {
        self.permit(GameEvent::EndCampaign)?;
        self.state.stage = Stage::CampaignEnd;
        Ok(())
    }

    /// Discard everything and return to world creation.
    pub fn start_new_world(&mut self) -> Result<(), SessionError> {
        self.permit(GameEvent::StartNewWorld)?;
        self.state = SessionState::default();
        self.notice = None;
        Ok(())
    }

    fn permit(&self, event: GameEvent) -> Result<(), SessionError> {
        if self.state.stage.permits(event) {
            Ok(())
        } else {
            Err(SessionError::NotPermitted {
                stage: self.state.stage,
                event,
            })
        }
    }

    /// Unwrap a generation result, substituting the operation's fallback
    /// and recording a notice on failure.
    fn recover(
        &mut self,
        result: Result<String, GenerateError>,
        context: &str,
        fallback: &str,
    ) -> String {
        match result {
            Ok(text) => text,
            Err(err) => {
                self.notice = Some(format!("{context}: {err}"));
                fallback.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_stage, FailingGenerator, TestHarness};

    #[tokio::test]
    async fn test_world_creation_to_storyline_setup() {
        let mut harness = TestHarness::new();
        harness.expect_response("## World Name\nThe Desert Kingdom");
        harness
            .expect_response("FACTIONS: Sandwalkers\nRACES: Duneborn\nSKILLS: Tracking\nROLES: Scout");

        harness
            .session
            .generate_world("A desert kingdom")
            .await
            .unwrap();

        assert_stage(&harness.session, Stage::StorylineSetup);
        assert_eq!(harness.session.world_elements().factions, vec!["Sandwalkers"]);
        assert_eq!(harness.session.world_elements().races, vec!["Duneborn"]);
        assert_eq!(
            harness.session.world_profile(),
            Some("## World Name\nThe Desert Kingdom")
        );
    }

    #[tokio::test]
    async fn test_empty_description_never_reaches_generator() {
        let mut harness = TestHarness::new();

        let err = harness.session.generate_world("   ").await.unwrap_err();
        assert!(matches!(err, SessionError::EmptyDescription));
        assert_stage(&harness.session, Stage::WorldCreation);
        assert_eq!(harness.generator_calls(), 0);
    }

    #[tokio::test]
    async fn test_random_theme_stays_in_world_creation() {
        let mut harness = TestHarness::new();
        harness.expect_response("A drowned city remembers its tides.");

        let theme = harness.session.random_theme().await.unwrap();
        assert_eq!(theme, "A drowned city remembers its tides.");
        assert_stage(&harness.session, Stage::WorldCreation);
    }

    #[tokio::test]
    async fn test_storyline_guard() {
        let mut harness = TestHarness::with_world().await;

        let err = harness
            .session
            .confirm_storyline("Fantasy", "  ")
            .unwrap_err();
        assert!(matches!(err, SessionError::MissingStoryline));
        assert_stage(&harness.session, Stage::StorylineSetup);

        harness
            .session
            .confirm_storyline("Fantasy", "The oasis is drying up.")
            .unwrap();
        assert_stage(&harness.session, Stage::CharacterCreation);
        assert_eq!(harness.session.genre(), "Fantasy");
    }

    #[tokio::test]
    async fn test_randomize_hook_replaces_field() {
        let mut harness = TestHarness::with_world().await;
        harness.expect_response("The last caravan has gone silent.");

        let hook = harness.session.randomize_hook().await.unwrap();
        assert_eq!(hook, "The last caravan has gone silent.");
        assert_eq!(harness.session.storyline_hook(), hook);
        assert_stage(&harness.session, Stage::StorylineSetup);
    }

    #[tokio::test]
    async fn test_character_with_no_elements_gets_sentinels() {
        let mut harness = TestHarness::new();
        // Profile generated, but extraction text matches no prefixes.
        harness.expect_response("## World Name\nA bare world");
        harness.expect_response("nothing to see here");
        harness.session.generate_world("A bare world").await.unwrap();
        harness
            .session
            .confirm_storyline("Mystery", "Something stirs.")
            .unwrap();

        harness.expect_response("You wake at dawn.");
        harness
            .session
            .begin_campaign(CharacterBuilder::new().name("Kira").description("A wanderer"))
            .await
            .unwrap();

        let character = harness.session.character().unwrap();
        assert_eq!(character.race, "N/A");
        assert_eq!(character.faction, "N/A");
        assert_eq!(character.role, "N/A");
        assert!(character.skills.is_empty());
        assert_eq!(harness.session.story_log().len(), 1);
        assert_eq!(harness.session.action_memory().len(), 0);
        assert_stage(&harness.session, Stage::Campaign);
    }

    #[tokio::test]
    async fn test_incomplete_character_stays_put() {
        let mut harness = TestHarness::with_campaign_setup().await;

        let err = harness
            .session
            .begin_campaign(CharacterBuilder::new().name("Kira"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Character(BuilderError::MissingDescription)
        ));
        assert_stage(&harness.session, Stage::CharacterCreation);
        assert!(harness.session.story_log().is_empty());
    }

    #[tokio::test]
    async fn test_submit_action_appends_both_logs() {
        let mut harness = TestHarness::in_campaign().await;
        assert_eq!(harness.session.story_log().len(), 1);

        harness.expect_response("The door creaks open onto a starlit hall.");
        let segment = harness
            .session
            .submit_action("open the door")
            .await
            .unwrap()
            .to_string();

        assert_eq!(segment, "The door creaks open onto a starlit hall.");
        assert_eq!(harness.session.story_log().len(), 2);
        assert_eq!(harness.session.action_memory(), ["open the door"]);
        assert_stage(&harness.session, Stage::Campaign);
    }

    #[tokio::test]
    async fn test_empty_action_rejected() {
        let mut harness = TestHarness::in_campaign().await;

        let err = harness.session.submit_action("  ").await.unwrap_err();
        assert!(matches!(err, SessionError::EmptyAction));
        assert_eq!(harness.session.story_log().len(), 1);
        assert!(harness.session.action_memory().is_empty());
    }

    #[tokio::test]
    async fn test_failing_generator_falls_back_and_still_appends() {
        let mut session = GameSession::new(Narrator::new(Box::new(FailingGenerator)));

        session.generate_world("A doomed world").await.unwrap();
        assert!(session.take_notice().is_some());
        assert_eq!(session.world_profile(), Some(FALLBACK_PROFILE));
        assert!(session.world_elements().is_empty());

        session.confirm_storyline("Tragedy", "All falls apart.").unwrap();
        session
            .begin_campaign(CharacterBuilder::new().name("Kira").description("A wanderer"))
            .await
            .unwrap();
        assert_eq!(session.story_log(), [FALLBACK_STORY]);

        for turn in 1..=3 {
            session.submit_action("press on").await.unwrap();
            assert_eq!(session.story_log().len(), 1 + turn);
            assert_eq!(session.action_memory().len(), turn);
            assert!(session.take_notice().is_some());
        }
    }

    #[tokio::test]
    async fn test_end_campaign_and_reset() {
        let mut harness = TestHarness::in_campaign().await;

        harness.session.end_campaign().unwrap();
        assert_stage(&harness.session, Stage::CampaignEnd);

        harness.session.start_new_world().unwrap();
        assert_eq!(*harness.session.state(), SessionState::default());
        assert_stage(&harness.session, Stage::WorldCreation);
    }

    #[tokio::test]
    async fn test_unlisted_events_mutate_nothing() {
        for stage in Stage::all() {
            for event in GameEvent::all() {
                if stage.permits(event) {
                    continue;
                }

                let mut harness = TestHarness::at_stage(stage).await;
                let before = harness.session.state().clone();

                let err = harness.fire(event).await.unwrap_err();
                assert!(
                    matches!(err, SessionError::NotPermitted { .. }),
                    "{event} in {stage} should be rejected by the table"
                );
                assert_eq!(
                    *harness.session.state(),
                    before,
                    "{event} in {stage} must not mutate the session"
                );
            }
        }
    }
}
