//! Game stages and the transition table.
//!
//! A session is always in exactly one [`Stage`]. The stage is the sole
//! router for which [`GameEvent`]s are valid: anything outside the table in
//! [`Stage::permits`] is rejected before any session field is touched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The stages of a session, in play order.
///
/// `CampaignEnd` is not terminal: "start new world" cycles back to
/// `WorldCreation` with a full reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    WorldCreation,
    StorylineSetup,
    CharacterCreation,
    Campaign,
    CampaignEnd,
}

impl Stage {
    /// Heading shown for this stage.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::WorldCreation => "Describe Your World",
            Stage::StorylineSetup => "Setup Storyline & Genre",
            Stage::CharacterCreation => "Create Your Character",
            Stage::Campaign => "Your Adventure",
            Stage::CampaignEnd => "Campaign Log",
        }
    }

    pub fn all() -> [Stage; 5] {
        [
            Stage::WorldCreation,
            Stage::StorylineSetup,
            Stage::CharacterCreation,
            Stage::Campaign,
            Stage::CampaignEnd,
        ]
    }

    /// The transition table. An event not listed for the current stage
    /// must leave the session untouched.
    pub fn permits(&self, event: GameEvent) -> bool {
        matches!(
            (self, event),
            (
                Stage::WorldCreation,
                GameEvent::GenerateProfile | GameEvent::RandomTheme
            ) | (
                Stage::StorylineSetup,
                GameEvent::ConfirmStoryline | GameEvent::RandomizeHook
            ) | (Stage::CharacterCreation, GameEvent::BeginCampaign)
                | (
                    Stage::Campaign,
                    GameEvent::SubmitAction | GameEvent::EndCampaign
                )
                | (Stage::CampaignEnd, GameEvent::StartNewWorld)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::WorldCreation => "world creation",
            Stage::StorylineSetup => "storyline setup",
            Stage::CharacterCreation => "character creation",
            Stage::Campaign => "the campaign",
            Stage::CampaignEnd => "the campaign log",
        };
        write!(f, "{name}")
    }
}

/// The events a session can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    GenerateProfile,
    RandomTheme,
    RandomizeHook,
    ConfirmStoryline,
    BeginCampaign,
    SubmitAction,
    EndCampaign,
    StartNewWorld,
}

impl GameEvent {
    pub fn all() -> [GameEvent; 8] {
        [
            GameEvent::GenerateProfile,
            GameEvent::RandomTheme,
            GameEvent::RandomizeHook,
            GameEvent::ConfirmStoryline,
            GameEvent::BeginCampaign,
            GameEvent::SubmitAction,
            GameEvent::EndCampaign,
            GameEvent::StartNewWorld,
        ]
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameEvent::GenerateProfile => "generating a world profile",
            GameEvent::RandomTheme => "requesting a random theme",
            GameEvent::RandomizeHook => "randomizing the storyline hook",
            GameEvent::ConfirmStoryline => "confirming the storyline",
            GameEvent::BeginCampaign => "beginning a campaign",
            GameEvent::SubmitAction => "submitting an action",
            GameEvent::EndCampaign => "ending the campaign",
            GameEvent::StartNewWorld => "starting a new world",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_stage() {
        assert_eq!(Stage::default(), Stage::WorldCreation);
    }

    #[test]
    fn test_transition_table() {
        use GameEvent::*;

        assert!(Stage::WorldCreation.permits(GenerateProfile));
        assert!(Stage::WorldCreation.permits(RandomTheme));
        assert!(Stage::StorylineSetup.permits(ConfirmStoryline));
        assert!(Stage::StorylineSetup.permits(RandomizeHook));
        assert!(Stage::CharacterCreation.permits(BeginCampaign));
        assert!(Stage::Campaign.permits(SubmitAction));
        assert!(Stage::Campaign.permits(EndCampaign));
        assert!(Stage::CampaignEnd.permits(StartNewWorld));
    }

    #[test]
    fn test_table_is_closed() {
        // Exactly eight (stage, event) pairs are legal; nothing else is.
        let permitted: usize = Stage::all()
            .iter()
            .map(|s| GameEvent::all().iter().filter(|e| s.permits(**e)).count())
            .sum();
        assert_eq!(permitted, 8);
    }

    #[test]
    fn test_events_stay_in_their_stage() {
        assert!(!Stage::Campaign.permits(GameEvent::GenerateProfile));
        assert!(!Stage::WorldCreation.permits(GameEvent::SubmitAction));
        assert!(!Stage::CampaignEnd.permits(GameEvent::EndCampaign));
        assert!(!Stage::CharacterCreation.permits(GameEvent::StartNewWorld));
    }

    #[test]
    fn test_titles() {
        for stage in Stage::all() {
            assert!(!stage.title().is_empty());
        }
    }
}
