//! World elements and the extraction parser.
//!
//! A generated world profile is opaque Markdown. Its companion extraction
//! text is expected (not guaranteed) to contain four prefixed lines:
//!
//! ```text
//! FACTIONS: name, name, ...
//! RACES: ...
//! SKILLS: ...
//! ROLES: ...
//! ```
//!
//! [`extract_elements`] scans that text best-effort: missing or malformed
//! sections degrade to empty lists rather than errors, since the narrator's
//! adherence to the format cannot be enforced.

use serde::{Deserialize, Serialize};

/// The four element lists extracted from a world profile.
///
/// Labels are trimmed and non-empty; order and duplicates from the source
/// text are preserved. All-empty lists are the documented degraded case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldElements {
    pub factions: Vec<String>,
    pub races: Vec<String>,
    pub skills: Vec<String>,
    pub roles: Vec<String>,
}

impl WorldElements {
    /// True if no category has any entries.
    pub fn is_empty(&self) -> bool {
        self.factions.is_empty()
            && self.races.is_empty()
            && self.skills.is_empty()
            && self.roles.is_empty()
    }
}

/// Extract world elements from the narrator's extraction text.
///
/// Lines are scanned independently: a line must start with one of the
/// literal prefixes `FACTIONS:`, `RACES:`, `SKILLS:`, `ROLES:`
/// (case-sensitive). The remainder is split on commas, each piece trimmed,
/// empty pieces dropped. A repeated prefix overwrites the earlier match;
/// unrecognized lines are ignored.
pub fn extract_elements(text: &str) -> WorldElements {
    let mut elements = WorldElements::default();

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("FACTIONS:") {
            elements.factions = split_labels(rest);
        } else if let Some(rest) = line.strip_prefix("RACES:") {
            elements.races = split_labels(rest);
        } else if let Some(rest) = line.strip_prefix("SKILLS:") {
            elements.skills = split_labels(rest);
        } else if let Some(rest) = line.strip_prefix("ROLES:") {
            elements.roles = split_labels(rest);
        }
    }

    elements
}

fn split_labels(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(String::from)
        .collect()
}

/// Profiles longer than this are reduced before being sent as story context.
pub const PROFILE_CONTEXT_LIMIT: usize = 1500;

/// Build the world-context block for a continue-story request.
///
/// Short profiles pass through verbatim. Overlong profiles are reduced to
/// the `## World Name` and `## Genre` heading lines (when present) plus up
/// to three faction names. The exact reduction is best-effort, not a
/// contract.
pub fn profile_context(profile: &str, elements: &WorldElements) -> String {
    if profile.len() <= PROFILE_CONTEXT_LIMIT {
        return profile.to_string();
    }

    let mut context = String::new();
    context.push_str(
        &heading_block(profile, "## World Name")
            .unwrap_or_else(|| "## World Name\nUnknown World".to_string()),
    );
    context.push('\n');
    context.push_str(
        &heading_block(profile, "## Genre")
            .unwrap_or_else(|| "## Genre\nUnknown Genre".to_string()),
    );

    if !elements.factions.is_empty() {
        context.push_str("\n## Key Factions\n");
        let key: Vec<&str> = elements.factions.iter().take(3).map(String::as_str).collect();
        context.push_str(&key.join(", "));
    }

    context
}

/// Find a heading line and the line after it, as one block.
fn heading_block(profile: &str, heading: &str) -> Option<String> {
    let mut lines = profile.lines();
    let head = lines.by_ref().find(|line| line.contains(heading))?;
    match lines.next() {
        Some(next) => Some(format!("{head}\n{next}")),
        None => Some(head.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_all_categories() {
        let elements =
            extract_elements("FACTIONS: A, B\nRACES: C\nSKILLS: D, E, F\nROLES: G");
        assert_eq!(elements.factions, vec!["A", "B"]);
        assert_eq!(elements.races, vec!["C"]);
        assert_eq!(elements.skills, vec!["D", "E", "F"]);
        assert_eq!(elements.roles, vec!["G"]);
    }

    #[test]
    fn test_empty_category_and_duplicates_preserved() {
        let elements = extract_elements("FACTIONS: A, B\nRACES: C\nSKILLS:\nROLES: D, D");
        assert_eq!(elements.factions, vec!["A", "B"]);
        assert_eq!(elements.races, vec!["C"]);
        assert!(elements.skills.is_empty());
        assert_eq!(elements.roles, vec!["D", "D"]);
    }

    #[test]
    fn test_no_recognized_prefixes() {
        let elements = extract_elements("Here are the factions you asked about.\nNothing else.");
        assert!(elements.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_elements("").is_empty());
    }

    #[test]
    fn test_last_occurrence_wins() {
        let elements = extract_elements("RACES: Old\nsome chatter\nRACES: New, Newer");
        assert_eq!(elements.races, vec!["New", "Newer"]);
    }

    #[test]
    fn test_whitespace_trimmed_and_empties_dropped() {
        let elements = extract_elements("SKILLS:   Tracking ,  , Archery  ,");
        assert_eq!(elements.skills, vec!["Tracking", "Archery"]);
    }

    #[test]
    fn test_prefix_must_anchor_line_start() {
        // Indented or mid-line prefixes are not matched.
        let elements = extract_elements("  FACTIONS: A\nThe FACTIONS: B");
        assert!(elements.factions.is_empty());
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let elements = extract_elements("factions: A\nFactions: B");
        assert!(elements.factions.is_empty());
    }

    #[test]
    fn test_extra_colons_kept_in_labels() {
        let elements = extract_elements("ROLES: Scout: the quiet one, Guard");
        assert_eq!(elements.roles, vec!["Scout: the quiet one", "Guard"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let elements = extract_elements("FACTIONS: A, B\r\nRACES: C\r\n");
        assert_eq!(elements.factions, vec!["A", "B"]);
        assert_eq!(elements.races, vec!["C"]);
    }

    #[test]
    fn test_short_profile_passes_through() {
        let profile = "## World Name\nEryndor\n## Genre\nFantasy";
        let elements = WorldElements::default();
        assert_eq!(profile_context(profile, &elements), profile);
    }

    #[test]
    fn test_long_profile_is_reduced() {
        let mut profile = String::from("## World Name\nEryndor\n## Genre\nFantasy\n## Geography\n");
        profile.push_str(&"lore ".repeat(400));

        let elements = WorldElements {
            factions: vec![
                "Sandwalkers".into(),
                "Duneguard".into(),
                "Oasis Court".into(),
                "Fourth".into(),
            ],
            ..WorldElements::default()
        };

        let context = profile_context(&profile, &elements);
        assert!(context.len() < profile.len());
        assert!(context.contains("## World Name\nEryndor"));
        assert!(context.contains("## Genre\nFantasy"));
        assert!(context.contains("Sandwalkers, Duneguard, Oasis Court"));
        assert!(!context.contains("Fourth"));
    }

    #[test]
    fn test_long_profile_without_headings() {
        let profile = "lore ".repeat(400);
        let context = profile_context(&profile, &WorldElements::default());
        assert!(context.contains("Unknown World"));
        assert!(context.contains("Unknown Genre"));
    }
}
