//! Headless mode for World Weaver.
//!
//! This module provides a simple line-oriented interface for running the
//! game without a TUI. It's designed for automated testing and scripts.
//!
//! - Lines starting with `#` are commands
//! - Plain lines act on the current stage (world description during world
//!   creation, player actions during the campaign)

use std::io::{self, BufRead, Write};
use weaver_core::{CharacterBuilder, GameSession, SessionError, Stage};

/// Locally staged form values, confirmed into the session by commands.
#[derive(Default)]
struct Draft {
    genre: String,
    hook: String,
    name: String,
    description: String,
    race: Option<String>,
    faction: Option<String>,
    role: Option<String>,
    skills: Vec<String>,
}

/// Run the game in headless mode.
pub async fn run_headless(mut session: GameSession) -> io::Result<()> {
    println!("=== World Weaver Headless Mode ===");
    println!("Session: {}", session.id());
    println!();
    print_help();
    println!();
    println!("[STAGE] {}", session.stage().title());

    let mut draft = Draft::default();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let stage_before = session.stage();

        if let Some(command) = line.strip_prefix('#') {
            if !handle_command(&mut session, &mut draft, command).await {
                break;
            }
        } else {
            handle_plain(&mut session, line).await;
        }

        if let Some(notice) = session.take_notice() {
            println!("[NOTICE] {notice}");
        }
        if session.stage() != stage_before {
            println!("[STAGE] {}", session.stage().title());
        }
        stdout.flush().ok();
    }

    Ok(())
}

/// Handle a `#` command. Returns false to quit.
async fn handle_command(session: &mut GameSession, draft: &mut Draft, command: &str) -> bool {
    let parts: Vec<&str> = command.split_whitespace().collect();

    match parts.first().copied() {
        Some("quit") | Some("exit") => {
            println!("Goodbye!");
            return false;
        }
        Some("help") => print_help(),
        Some("status") => {
            println!("[STATUS]");
            println!("  Stage: {}", session.stage().title());
            println!("  Genre: {}", session.genre());
            println!("  Hook: {}", session.storyline_hook());
            if let Some(character) = session.character() {
                println!(
                    "  Character: {} ({}, {})",
                    character.name, character.role, character.race
                );
            }
            println!(
                "  Story segments: {}, actions: {}",
                session.story_log().len(),
                session.action_memory().len()
            );
        }
        Some("state") => match serde_json::to_string_pretty(session.state()) {
            Ok(json) => println!("{json}"),
            Err(e) => println!("[ERROR] {e}"),
        },
        Some("theme") => match session.random_theme().await {
            Ok(theme) => println!("[THEME] {theme}"),
            Err(e) => warn(e),
        },
        Some("set") => {
            let value = parts.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();
            match parts.get(1).copied() {
                Some("genre") => draft.genre = value,
                Some("hook") => draft.hook = value,
                Some("name") => draft.name = value,
                Some("description") => draft.description = value,
                Some("race") => draft.race = Some(value),
                Some("faction") => draft.faction = Some(value),
                Some("role") => draft.role = Some(value),
                _ => {
                    println!("[ERROR] Usage: #set genre|hook|name|description|race|faction|role <text>");
                    return true;
                }
            }
            println!("[OK]");
        }
        Some("skill") => {
            if let Some(skill) = parts.get(1..).map(|rest| rest.join(" ")).filter(|s| !s.is_empty())
            {
                draft.skills.push(skill);
                println!("[OK]");
            } else {
                println!("[ERROR] Usage: #skill <name>");
            }
        }
        Some("randomhook") => match session.randomize_hook().await {
            Ok(hook) => {
                draft.hook = hook.clone();
                println!("[HOOK] {hook}");
            }
            Err(e) => warn(e),
        },
        Some("confirm") => match session.confirm_storyline(&draft.genre, &draft.hook) {
            Ok(()) => println!("[OK] Storyline confirmed."),
            Err(e) => warn(e),
        },
        Some("begin") => {
            let mut builder = CharacterBuilder::new()
                .name(&draft.name)
                .description(&draft.description)
                .skills(draft.skills.clone());
            if let Some(race) = &draft.race {
                builder = builder.race(race);
            }
            if let Some(faction) = &draft.faction {
                builder = builder.faction(faction);
            }
            if let Some(role) = &draft.role {
                builder = builder.role(role);
            }

            match session.begin_campaign(builder).await {
                Ok(()) => print_last_segment(session),
                Err(e) => warn(e),
            }
        }
        Some("end") => match session.end_campaign() {
            Ok(()) => print_campaign_log(session),
            Err(e) => warn(e),
        },
        Some("newworld") => match session.start_new_world() {
            Ok(()) => {
                *draft = Draft::default();
                println!("[OK] The slate is clean.");
            }
            Err(e) => warn(e),
        },
        _ => println!("[ERROR] Unknown command. Type #help for help."),
    }

    true
}

/// Handle a plain input line according to the current stage.
async fn handle_plain(session: &mut GameSession, line: &str) {
    match session.stage() {
        Stage::WorldCreation => match session.generate_world(line).await {
            Ok(()) => {
                println!("[WORLD]");
                println!("{}", session.world_profile().unwrap_or_default());
                let elements = session.world_elements();
                println!(
                    "[ELEMENTS] factions={:?} races={:?} skills={:?} roles={:?}",
                    elements.factions, elements.races, elements.skills, elements.roles
                );
            }
            Err(e) => warn(e),
        },
        Stage::Campaign => match session.submit_action(line).await {
            Ok(segment) => {
                println!("[NARRATOR]");
                for para in segment.split("\n\n") {
                    println!("{para}");
                }
            }
            Err(e) => warn(e),
        },
        Stage::StorylineSetup => {
            println!("[HINT] Use #set genre <text>, #set hook <text> (or #randomhook), then #confirm.");
        }
        Stage::CharacterCreation => {
            println!("[HINT] Use #set name/description/race/faction/role, #skill <name>, then #begin.");
        }
        Stage::CampaignEnd => {
            println!("[HINT] Use #newworld to start over, or #quit.");
        }
    }
}

fn warn(err: SessionError) {
    println!("[WARN] {err}");
}

fn print_last_segment(session: &GameSession) {
    if let Some(segment) = session.story_log().last() {
        println!("[NARRATOR]");
        for para in segment.split("\n\n") {
            println!("{para}");
        }
    }
}

fn print_campaign_log(session: &GameSession) {
    println!("[LOG] Player actions:");
    if session.action_memory().is_empty() {
        println!("  (no actions were logged)");
    } else {
        for (i, action) in session.action_memory().iter().enumerate() {
            println!("  {}. {action}", i + 1);
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  #help                  - Show this help");
    println!("  #status                - Show current session status");
    println!("  #state                 - Dump session state as JSON");
    println!("  #theme                 - Suggest a random world theme");
    println!("  #set <field> <text>    - Stage a form value (genre, hook, name, ...)");
    println!("  #skill <name>          - Add a chosen skill");
    println!("  #randomhook            - Generate a storyline hook");
    println!("  #confirm               - Confirm genre and hook");
    println!("  #begin                 - Create the character and start the campaign");
    println!("  #end                   - End the campaign");
    println!("  #newworld              - Discard everything and start over");
    println!("  #quit                  - Exit");
    println!();
    println!("Plain lines are the world description (during world creation)");
    println!("or your next action (during the campaign).");
}
