//! Player character record and builder.
//!
//! Characters are created once at campaign start and are immutable
//! thereafter. Race, faction, and role are picked from the world's extracted
//! element lists; when a list is empty the field carries the `"N/A"`
//! sentinel instead.

use crate::world::WorldElements;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel for a choice whose element list was empty at selection time.
pub const NOT_AVAILABLE: &str = "N/A";

/// A player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub description: String,
    pub race: String,
    pub faction: String,
    pub role: String,
    pub skills: Vec<String>,
}

/// Error from character building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("Please provide a character name.")]
    MissingName,

    #[error("Please provide a character description.")]
    MissingDescription,

    #[error("Choose a race for your character.")]
    MissingRace,

    #[error("Choose a faction for your character.")]
    MissingFaction,

    #[error("Choose a role for your character.")]
    MissingRole,

    #[error("'{0}' is not a race of this world.")]
    UnknownRace(String),

    #[error("'{0}' is not a faction of this world.")]
    UnknownFaction(String),

    #[error("'{0}' is not a role of this world.")]
    UnknownRole(String),

    #[error("'{0}' is not a skill of this world.")]
    UnknownSkill(String),
}

/// Builder for creating a character against a world's element lists.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    description: Option<String>,
    race: Option<String>,
    faction: Option<String>,
    role: Option<String>,
    skills: Vec<String>,
}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    pub fn faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Add one chosen skill.
    pub fn skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    /// Replace the chosen skills.
    pub fn skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    /// Build the character, validating choices against the world elements.
    ///
    /// When an element list is empty the corresponding choice is forced to
    /// the [`NOT_AVAILABLE`] sentinel (skills to an empty set), regardless
    /// of what was passed in.
    pub fn build(self, elements: &WorldElements) -> Result<Character, BuilderError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(BuilderError::MissingName)?;

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or(BuilderError::MissingDescription)?;

        let race = pick(
            self.race,
            &elements.races,
            BuilderError::MissingRace,
            BuilderError::UnknownRace,
        )?;
        let faction = pick(
            self.faction,
            &elements.factions,
            BuilderError::MissingFaction,
            BuilderError::UnknownFaction,
        )?;
        let role = pick(
            self.role,
            &elements.roles,
            BuilderError::MissingRole,
            BuilderError::UnknownRole,
        )?;

        let skills = if elements.skills.is_empty() {
            Vec::new()
        } else {
            for skill in &self.skills {
                if !elements.skills.contains(skill) {
                    return Err(BuilderError::UnknownSkill(skill.clone()));
                }
            }
            self.skills
        };

        Ok(Character {
            name,
            description,
            race,
            faction,
            role,
            skills,
        })
    }
}

fn pick(
    chosen: Option<String>,
    options: &[String],
    missing: BuilderError,
    unknown: fn(String) -> BuilderError,
) -> Result<String, BuilderError> {
    if options.is_empty() {
        return Ok(NOT_AVAILABLE.to_string());
    }
    match chosen {
        Some(value) if options.contains(&value) => Ok(value),
        Some(value) => Err(unknown(value)),
        None => Err(missing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_elements() -> WorldElements {
        WorldElements {
            factions: vec!["Sandwalkers".into()],
            races: vec!["Duneborn".into(), "Oasisfolk".into()],
            skills: vec!["Tracking".into(), "Haggling".into()],
            roles: vec!["Scout".into()],
        }
    }

    #[test]
    fn test_build_with_choices() {
        let character = CharacterBuilder::new()
            .name("Kira")
            .description("A wanderer")
            .race("Duneborn")
            .faction("Sandwalkers")
            .role("Scout")
            .skill("Tracking")
            .build(&sample_elements())
            .unwrap();

        assert_eq!(character.name, "Kira");
        assert_eq!(character.race, "Duneborn");
        assert_eq!(character.faction, "Sandwalkers");
        assert_eq!(character.role, "Scout");
        assert_eq!(character.skills, vec!["Tracking"]);
    }

    #[test]
    fn test_empty_elements_force_sentinels() {
        let character = CharacterBuilder::new()
            .name("Kira")
            .description("A wanderer")
            .race("Duneborn")
            .skill("Tracking")
            .build(&WorldElements::default())
            .unwrap();

        assert_eq!(character.race, NOT_AVAILABLE);
        assert_eq!(character.faction, NOT_AVAILABLE);
        assert_eq!(character.role, NOT_AVAILABLE);
        assert!(character.skills.is_empty());
    }

    #[test]
    fn test_missing_name_and_description() {
        let err = CharacterBuilder::new()
            .description("A wanderer")
            .build(&WorldElements::default())
            .unwrap_err();
        assert_eq!(err, BuilderError::MissingName);

        let err = CharacterBuilder::new()
            .name("Kira")
            .description("   ")
            .build(&WorldElements::default())
            .unwrap_err();
        assert_eq!(err, BuilderError::MissingDescription);
    }

    #[test]
    fn test_choice_must_come_from_elements() {
        let err = CharacterBuilder::new()
            .name("Kira")
            .description("A wanderer")
            .race("Dragonkin")
            .faction("Sandwalkers")
            .role("Scout")
            .build(&sample_elements())
            .unwrap_err();
        assert_eq!(err, BuilderError::UnknownRace("Dragonkin".into()));
    }

    #[test]
    fn test_choice_required_when_options_exist() {
        let err = CharacterBuilder::new()
            .name("Kira")
            .description("A wanderer")
            .build(&sample_elements())
            .unwrap_err();
        assert_eq!(err, BuilderError::MissingRace);
    }

    #[test]
    fn test_unknown_skill_rejected() {
        let err = CharacterBuilder::new()
            .name("Kira")
            .description("A wanderer")
            .race("Duneborn")
            .faction("Sandwalkers")
            .role("Scout")
            .skill("Juggling")
            .build(&sample_elements())
            .unwrap_err();
        assert_eq!(err, BuilderError::UnknownSkill("Juggling".into()));
    }
}
