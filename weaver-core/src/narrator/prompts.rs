//! Prompt builders for the narrator's generation requests.

use crate::character::Character;
use crate::narrator::agent::StoryContext;

/// Instructions for generating a structured world profile.
pub fn profile_request() -> String {
    "Create a detailed Markdown world profile including:\n\
     ## World Name\n## Genre\n## Factions (bullet list with 'Name: Description')\n\
     ## Races (bullet list with 'Name: Traits')\n## Skills (bullet list of relevant abilities)\n\
     ## Roles (list of possible roles in this world, with descriptions)\n\
     Add other sections like Geography, Culture, etc.\n\n\
     Rules:\n- Use strict Markdown formatting\n- No speculative language\n\
     - Direct factual descriptions only\n- Never comment on the creation process"
        .to_string()
}

/// Instructions for restating the four element categories of a profile.
///
/// The requested line format is the contract scanned by
/// [`crate::world::extract_elements`].
pub fn extraction_request() -> String {
    "From this world profile, extract ONLY:\n\
     - Faction names (comma-separated)\n- Race names (comma-separated)\n\
     - Skill names (comma-separated)\n- Role names (comma-separated)\n\
     Use format:\n\
     FACTIONS: [names]\nRACES: [names]\nSKILLS: [names]\nROLES: [names]"
        .to_string()
}

/// Request for a fresh single-sentence world theme.
pub fn theme_request() -> String {
    "Produce a fresh, single-sentence RPG world theme.".to_string()
}

/// Request for a one-sentence storyline hook grounded in a profile.
pub fn hook_request(profile: &str) -> String {
    format!(
        "Based on this world profile, generate a concise, one-sentence storyline hook: {profile}\n\
         Rules:\n- No introductory phrases\n- Begin directly with the hook\n\
         - Maintain in-universe perspective\n- Avoid meta-commentary"
    )
}

/// Request for the next story segment.
pub fn story_request(context: &StoryContext<'_>, player_action: &str) -> String {
    let character = context.character;
    format!(
        "World Context: {world}\nGenre: {genre}\n\
         Overall Storyline Goal: {hook}\nPrevious Scene: {previous}\n\
         Character: {name} ({role}, {race}) - {description}\nPlayer's Action: {player_action}\n\n\
         Rules:\n- Continue the narrative directly from the player's action or current situation.\n\
         - Keep the story segment engaging and around 2-4 paragraphs long.\n\
         - No filler phrases. Be direct.\n- Maintain in-universe perspective.\n- Show, don't tell.\n\
         - Describe events, character thoughts (briefly), and dialogue.\n\
         - End the segment at a point that naturally invites the player to make another decision.",
        world = context.world_context,
        genre = context.genre,
        hook = context.storyline_hook,
        previous = context.previous_segment,
        name = character.name,
        role = character.role,
        race = character.race,
        description = character.description,
    )
}

/// The synthetic "player action" that opens a campaign.
pub fn opening_scene_directive(character: &Character) -> String {
    format!(
        "Character: {} - {}.\n\
         Start the narrative with an engaging opening scene for this character in the \
         specified world and genre, based on the storyline hook. The scene should leave \
         room for the player to decide their first action.",
        character.name, character.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_character() -> Character {
        Character {
            name: "Kira".into(),
            description: "A wanderer".into(),
            race: "N/A".into(),
            faction: "N/A".into(),
            role: "Scout".into(),
            skills: vec![],
        }
    }

    #[test]
    fn test_extraction_request_names_all_prefixes() {
        let prompt = extraction_request();
        for prefix in ["FACTIONS:", "RACES:", "SKILLS:", "ROLES:"] {
            assert!(prompt.contains(prefix));
        }
    }

    #[test]
    fn test_story_request_carries_context() {
        let character = sample_character();
        let context = StoryContext {
            world_context: "## World Name\nEryndor",
            genre: "Fantasy",
            storyline_hook: "The oasis is drying up.",
            previous_segment: "You wake at dawn.",
            character: &character,
        };

        let prompt = story_request(&context, "open the door");
        assert!(prompt.contains("Eryndor"));
        assert!(prompt.contains("Fantasy"));
        assert!(prompt.contains("The oasis is drying up."));
        assert!(prompt.contains("You wake at dawn."));
        assert!(prompt.contains("Kira (Scout, N/A)"));
        assert!(prompt.contains("Player's Action: open the door"));
    }

    #[test]
    fn test_opening_scene_directive() {
        let directive = opening_scene_directive(&sample_character());
        assert!(directive.starts_with("Character: Kira - A wanderer."));
        assert!(directive.contains("opening scene"));
    }
}
