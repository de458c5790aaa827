//! Character creation form.
//!
//! A multi-step wizard bound to the world's extracted element lists.
//! Race, faction, and role are single-choice; skills are multi-choice.
//! Steps whose element list is empty are skipped past with a placeholder.

use crossterm::event::{KeyCode, KeyEvent};
use std::collections::HashSet;
use weaver_core::{CharacterBuilder, WorldElements};

use crate::app::InputField;

/// Steps in character creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStep {
    #[default]
    Name,
    Description,
    Race,
    Faction,
    Role,
    Skills,
    Review,
}

impl FormStep {
    pub fn title(&self) -> &'static str {
        match self {
            FormStep::Name => "Enter Your Name",
            FormStep::Description => "Describe Your Character",
            FormStep::Race => "Choose Your Race",
            FormStep::Faction => "Choose Your Faction",
            FormStep::Role => "Choose Your Role",
            FormStep::Skills => "Choose Skills",
            FormStep::Review => "Review Character",
        }
    }

    pub fn next(&self) -> Option<FormStep> {
        match self {
            FormStep::Name => Some(FormStep::Description),
            FormStep::Description => Some(FormStep::Race),
            FormStep::Race => Some(FormStep::Faction),
            FormStep::Faction => Some(FormStep::Role),
            FormStep::Role => Some(FormStep::Skills),
            FormStep::Skills => Some(FormStep::Review),
            FormStep::Review => None,
        }
    }

    pub fn prev(&self) -> Option<FormStep> {
        match self {
            FormStep::Name => None,
            FormStep::Description => Some(FormStep::Name),
            FormStep::Race => Some(FormStep::Description),
            FormStep::Faction => Some(FormStep::Race),
            FormStep::Role => Some(FormStep::Faction),
            FormStep::Skills => Some(FormStep::Role),
            FormStep::Review => Some(FormStep::Skills),
        }
    }
}

/// Character creation state.
#[derive(Debug, Default)]
pub struct CharacterForm {
    pub step: FormStep,
    pub name: InputField,
    pub description: InputField,

    /// List cursor for the current selection step.
    pub cursor: usize,
    pub race: Option<usize>,
    pub faction: Option<usize>,
    pub role: Option<usize>,
    pub skills: HashSet<usize>,

    pub finished: bool,
}

impl CharacterForm {
    /// Handle a key for the current step.
    pub fn handle_key(&mut self, key: KeyEvent, elements: &WorldElements) {
        match self.step {
            FormStep::Name => self.handle_text(key, true),
            FormStep::Description => self.handle_text(key, false),
            FormStep::Race => {
                let chosen = self.handle_list(key, elements.races.len());
                if let Some(index) = chosen {
                    self.race = index;
                }
            }
            FormStep::Faction => {
                let chosen = self.handle_list(key, elements.factions.len());
                if let Some(index) = chosen {
                    self.faction = index;
                }
            }
            FormStep::Role => {
                let chosen = self.handle_list(key, elements.roles.len());
                if let Some(index) = chosen {
                    self.role = index;
                }
            }
            FormStep::Skills => self.handle_skills(key, elements.skills.len()),
            FormStep::Review => match key.code {
                KeyCode::Enter => self.finished = true,
                KeyCode::Esc => self.retreat(),
                _ => {}
            },
        }
    }

    fn handle_text(&mut self, key: KeyEvent, is_name: bool) {
        let field = if is_name {
            &mut self.name
        } else {
            &mut self.description
        };
        match key.code {
            KeyCode::Enter => self.advance(),
            KeyCode::Esc => self.retreat(),
            KeyCode::Char(c) => field.insert(c),
            KeyCode::Backspace => field.backspace(),
            KeyCode::Delete => field.delete(),
            KeyCode::Left => field.left(),
            KeyCode::Right => field.right(),
            KeyCode::Home => field.home(),
            KeyCode::End => field.end(),
            _ => {}
        }
    }

    /// Handle a single-choice list step. Returns `Some(choice)` when Enter
    /// confirms the step: the chosen index, or `None` for an empty list.
    fn handle_list(&mut self, key: KeyEvent, len: usize) -> Option<Option<usize>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    self.cursor = (self.cursor + 1).min(len - 1);
                }
                None
            }
            KeyCode::Enter => {
                let choice = if len > 0 { Some(self.cursor) } else { None };
                self.advance();
                Some(choice)
            }
            KeyCode::Esc => {
                self.retreat();
                None
            }
            _ => None,
        }
    }

    fn handle_skills(&mut self, key: KeyEvent, len: usize) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    self.cursor = (self.cursor + 1).min(len - 1);
                }
            }
            KeyCode::Char(' ') => {
                if len > 0 {
                    if !self.skills.insert(self.cursor) {
                        self.skills.remove(&self.cursor);
                    }
                }
            }
            KeyCode::Enter => self.advance(),
            KeyCode::Esc => self.retreat(),
            _ => {}
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.step.next() {
            self.step = next;
            self.cursor = 0;
        }
    }

    fn retreat(&mut self) {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
            self.cursor = 0;
        }
    }

    /// Build a character builder from the current choices.
    pub fn builder(&self, elements: &WorldElements) -> CharacterBuilder {
        let mut builder = CharacterBuilder::new()
            .name(self.name.text())
            .description(self.description.text());

        if let Some(race) = self.race.and_then(|i| elements.races.get(i)) {
            builder = builder.race(race);
        }
        if let Some(faction) = self.faction.and_then(|i| elements.factions.get(i)) {
            builder = builder.faction(faction);
        }
        if let Some(role) = self.role.and_then(|i| elements.roles.get(i)) {
            builder = builder.role(role);
        }

        let mut chosen: Vec<usize> = self.skills.iter().copied().collect();
        chosen.sort_unstable();
        let skills: Vec<String> = chosen
            .into_iter()
            .filter_map(|i| elements.skills.get(i).cloned())
            .collect();

        builder.skills(skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use weaver_core::NOT_AVAILABLE;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample_elements() -> WorldElements {
        WorldElements {
            factions: vec!["Sandwalkers".into()],
            races: vec!["Duneborn".into(), "Oasisfolk".into()],
            skills: vec!["Tracking".into(), "Haggling".into()],
            roles: vec!["Scout".into()],
        }
    }

    fn type_text(form: &mut CharacterForm, elements: &WorldElements, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)), elements);
        }
    }

    #[test]
    fn test_wizard_walkthrough() {
        let elements = sample_elements();
        let mut form = CharacterForm::default();

        type_text(&mut form, &elements, "Kira");
        form.handle_key(key(KeyCode::Enter), &elements);
        type_text(&mut form, &elements, "A wanderer");
        form.handle_key(key(KeyCode::Enter), &elements);

        // Race: pick the second entry
        form.handle_key(key(KeyCode::Down), &elements);
        form.handle_key(key(KeyCode::Enter), &elements);
        // Faction, role: pick the first
        form.handle_key(key(KeyCode::Enter), &elements);
        form.handle_key(key(KeyCode::Enter), &elements);
        // Skills: toggle the first, confirm
        form.handle_key(key(KeyCode::Char(' ')), &elements);
        form.handle_key(key(KeyCode::Enter), &elements);

        assert_eq!(form.step, FormStep::Review);
        form.handle_key(key(KeyCode::Enter), &elements);
        assert!(form.finished);

        let character = form.builder(&elements).build(&elements).unwrap();
        assert_eq!(character.name, "Kira");
        assert_eq!(character.race, "Oasisfolk");
        assert_eq!(character.faction, "Sandwalkers");
        assert_eq!(character.role, "Scout");
        assert_eq!(character.skills, vec!["Tracking"]);
    }

    #[test]
    fn test_empty_lists_fall_through_to_sentinels() {
        let elements = WorldElements::default();
        let mut form = CharacterForm::default();

        type_text(&mut form, &elements, "Kira");
        form.handle_key(key(KeyCode::Enter), &elements);
        type_text(&mut form, &elements, "A wanderer");
        form.handle_key(key(KeyCode::Enter), &elements);

        // Race/faction/role/skills all have nothing to offer.
        form.handle_key(key(KeyCode::Enter), &elements);
        form.handle_key(key(KeyCode::Enter), &elements);
        form.handle_key(key(KeyCode::Enter), &elements);
        form.handle_key(key(KeyCode::Enter), &elements);
        assert_eq!(form.step, FormStep::Review);

        let character = form.builder(&elements).build(&elements).unwrap();
        assert_eq!(character.race, NOT_AVAILABLE);
        assert_eq!(character.faction, NOT_AVAILABLE);
        assert_eq!(character.role, NOT_AVAILABLE);
        assert!(character.skills.is_empty());
    }

    #[test]
    fn test_escape_steps_back() {
        let elements = sample_elements();
        let mut form = CharacterForm::default();

        form.handle_key(key(KeyCode::Enter), &elements);
        assert_eq!(form.step, FormStep::Description);
        form.handle_key(key(KeyCode::Esc), &elements);
        assert_eq!(form.step, FormStep::Name);
        // There is no step before the name.
        form.handle_key(key(KeyCode::Esc), &elements);
        assert_eq!(form.step, FormStep::Name);
    }
}
