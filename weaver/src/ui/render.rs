//! Render orchestration for the World Weaver TUI

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use weaver_core::{Stage, WorldElements, NOT_AVAILABLE};

use crate::app::{App, InputField, StorylineField};
use crate::character_form::{CharacterForm, FormStep};
use crate::ui::theme::GameTheme;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let [title_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_title(frame, app, title_area);

    match app.session.stage() {
        Stage::WorldCreation => render_world_creation(frame, app, body_area),
        Stage::StorylineSetup => render_storyline_setup(frame, app, body_area),
        Stage::CharacterCreation => render_character_creation(frame, app, body_area),
        Stage::Campaign => render_campaign(frame, app, body_area),
        Stage::CampaignEnd => render_campaign_end(frame, app, body_area),
    }

    render_status(frame, app, status_area);

    if app.show_state {
        render_state_overlay(frame, app, area);
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" World Weaver RPG | {} ", app.session.stage().title());
    let paragraph = Paragraph::new(Line::styled(title, app.theme.title_style())).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_style(false)),
    );
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Stage bodies
// ============================================================================

fn render_world_creation(frame: &mut Frame, app: &App, area: Rect) {
    let [intro_area, input_area, hint_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let intro = Paragraph::new("Enter a description for your world, or get a random one.")
        .style(app.theme.narrator_style())
        .wrap(Wrap { trim: false });
    frame.render_widget(intro, intro_area);

    render_input(
        frame,
        input_area,
        &app.forms.description,
        "World Description",
        "A desert kingdom ruled by sand mages...",
        true,
        &app.theme,
    );

    render_hint(
        frame,
        hint_area,
        "Enter: generate profile · Ctrl+R: random theme · Ctrl+G: session state · Ctrl+C: quit",
        &app.theme,
    );
}

fn render_storyline_setup(frame: &mut Frame, app: &App, area: Rect) {
    let [profile_area, genre_area, hook_area, hint_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let profile = app.session.world_profile().unwrap_or_default();
    let snippet: String = if profile.chars().count() > 1000 {
        profile.chars().take(1000).collect::<String>() + "..."
    } else {
        profile.to_string()
    };
    let profile_widget = Paragraph::new(snippet)
        .style(app.theme.narrator_style())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" World Profile ")
                .border_style(app.theme.border_style(false)),
        );
    frame.render_widget(profile_widget, profile_area);

    render_input(
        frame,
        genre_area,
        &app.forms.genre,
        "Genre",
        "Fantasy, Sci-Fi...",
        app.forms.storyline_focus == StorylineField::Genre,
        &app.theme,
    );
    render_input(
        frame,
        hook_area,
        &app.forms.hook,
        "Storyline Hook",
        "What sets the story in motion?",
        app.forms.storyline_focus == StorylineField::Hook,
        &app.theme,
    );

    render_hint(
        frame,
        hint_area,
        "Tab: switch field · Ctrl+R: randomize hook · Enter: confirm",
        &app.theme,
    );
}

fn render_character_creation(frame: &mut Frame, app: &App, area: Rect) {
    let [elements_area, wizard_area] =
        Layout::horizontal([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)]).areas(area);

    render_elements_panel(frame, app, elements_area);

    let [step_area, hint_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(wizard_area);

    let form = &app.forms.character;
    let elements = app.session.world_elements();
    match form.step {
        FormStep::Name => render_input(
            frame,
            step_area,
            &form.name,
            form.step.title(),
            "Kira...",
            true,
            &app.theme,
        ),
        FormStep::Description => render_input(
            frame,
            step_area,
            &form.description,
            form.step.title(),
            "A wanderer of the dunes...",
            true,
            &app.theme,
        ),
        FormStep::Race => render_choice_list(
            frame,
            step_area,
            form.step.title(),
            &elements.races,
            form.cursor,
            form.race,
            "(No races defined)",
            &app.theme,
        ),
        FormStep::Faction => render_choice_list(
            frame,
            step_area,
            form.step.title(),
            &elements.factions,
            form.cursor,
            form.faction,
            "(No factions defined)",
            &app.theme,
        ),
        FormStep::Role => render_choice_list(
            frame,
            step_area,
            form.step.title(),
            &elements.roles,
            form.cursor,
            form.role,
            "(No roles defined)",
            &app.theme,
        ),
        FormStep::Skills => render_skill_list(frame, step_area, form, elements, &app.theme),
        FormStep::Review => render_review(frame, step_area, form, elements, &app.theme),
    }

    let hint = match form.step {
        FormStep::Name | FormStep::Description => "Enter: next · Esc: back",
        FormStep::Skills => "Space: toggle · Enter: next · Esc: back",
        FormStep::Review => "Enter: begin campaign · Esc: back",
        _ => "↑/↓: move · Enter: choose · Esc: back",
    };
    render_hint(frame, hint_area, hint, &app.theme);
}

fn render_campaign(frame: &mut Frame, app: &App, area: Rect) {
    let [context_area, story_area] =
        Layout::horizontal([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)]).areas(area);

    render_context_panel(frame, app, context_area);

    let [log_area, input_area, hint_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(story_area);

    let story = app.session.story_log().join("\n\n───\n\n");
    let scroll = story_scroll(app, &story, log_area);
    let story_widget = Paragraph::new(story)
        .style(app.theme.narrator_style())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Your Adventure ")
                .border_style(app.theme.border_style(true)),
        );
    frame.render_widget(story_widget, log_area);

    render_input(
        frame,
        input_area,
        &app.forms.action,
        "What do you do next?",
        "open the door...",
        true,
        &app.theme,
    );

    render_hint(
        frame,
        hint_area,
        "Enter: act · ↑/↓: scroll · Ctrl+E: end campaign",
        &app.theme,
    );
}

fn render_campaign_end(frame: &mut Frame, app: &App, area: Rect) {
    let [body_area, hint_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    let [actions_area, narrative_area] =
        Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(body_area);

    let mut action_lines: Vec<Line> = Vec::new();
    if app.session.action_memory().is_empty() {
        action_lines.push(Line::styled(
            "No actions were logged in this adventure.",
            app.theme.system_style(),
        ));
    } else {
        for (i, action) in app.session.action_memory().iter().enumerate() {
            action_lines.push(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), app.theme.system_style()),
                Span::styled(action.clone(), app.theme.player_style()),
            ]));
        }
    }
    let actions_widget = Paragraph::new(action_lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Player Actions ")
            .border_style(app.theme.border_style(false)),
    );
    frame.render_widget(actions_widget, actions_area);

    let narrative = app.session.story_log().join("\n\n───\n\n");
    let scroll = story_scroll(app, &narrative, narrative_area);
    let narrative_widget = Paragraph::new(narrative)
        .style(app.theme.narrator_style())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Full Narrative ")
                .border_style(app.theme.border_style(false)),
        );
    frame.render_widget(narrative_widget, narrative_area);

    render_hint(
        frame,
        hint_area,
        "Enter: start a new world · ↑/↓: scroll · Ctrl+C: quit",
        &app.theme,
    );
}

// ============================================================================
// Panels and widgets
// ============================================================================

fn render_elements_panel(frame: &mut Frame, app: &App, area: Rect) {
    let elements = app.session.world_elements();
    let mut lines: Vec<Line> = Vec::new();

    for (title, items) in [
        ("Races", &elements.races),
        ("Factions", &elements.factions),
        ("Roles", &elements.roles),
        ("Skills", &elements.skills),
    ] {
        lines.push(Line::styled(title.to_string(), app.theme.accent_style()));
        if items.is_empty() {
            lines.push(Line::styled("  (none defined)", app.theme.system_style()));
        } else {
            for item in items {
                lines.push(Line::raw(format!("  {item}")));
            }
        }
        lines.push(Line::raw(""));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" World Elements ")
            .border_style(app.theme.border_style(false)),
    );
    frame.render_widget(widget, area);
}

fn render_context_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let elements = app.session.world_elements();
    let mut lines: Vec<Line> = vec![
        Line::styled("World Context", theme.accent_style()),
        Line::raw(format!("Genre: {}", app.session.genre())),
        Line::raw(format!("Hook: {}", app.session.storyline_hook())),
    ];

    if !elements.factions.is_empty() {
        let key: Vec<&str> = elements.factions.iter().take(3).map(String::as_str).collect();
        lines.push(Line::raw(format!("Key Factions: {}", key.join(", "))));
    }
    if !elements.races.is_empty() {
        let key: Vec<&str> = elements.races.iter().take(3).map(String::as_str).collect();
        lines.push(Line::raw(format!("Key Races: {}", key.join(", "))));
    }

    if let Some(character) = app.session.character() {
        lines.push(Line::raw(""));
        lines.push(Line::styled("Character", theme.accent_style()));
        lines.push(Line::raw(format!("Name: {}", character.name)));
        lines.push(Line::raw(format!("Description: {}", character.description)));
        lines.push(Line::raw(format!("Race: {}", character.race)));
        lines.push(Line::raw(format!("Faction: {}", character.faction)));
        lines.push(Line::raw(format!("Role: {}", character.role)));
        if !character.skills.is_empty() {
            lines.push(Line::raw(format!("Skills: {}", character.skills.join(", "))));
        }
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" World & Character ")
            .border_style(theme.border_style(false)),
    );
    frame.render_widget(widget, area);
}

#[allow(clippy::too_many_arguments)]
fn render_choice_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    options: &[String],
    cursor: usize,
    chosen: Option<usize>,
    placeholder: &str,
    theme: &GameTheme,
) {
    let mut lines: Vec<Line> = Vec::new();

    if options.is_empty() {
        lines.push(Line::styled(placeholder.to_string(), theme.system_style()));
        lines.push(Line::styled(
            "Press Enter to continue.",
            theme.system_style(),
        ));
    } else {
        for (i, option) in options.iter().enumerate() {
            let marker = if i == cursor { "> " } else { "  " };
            let mark = if chosen == Some(i) { " ✦" } else { "" };
            let style = if i == cursor {
                theme.accent_style()
            } else {
                Style::default().fg(theme.foreground)
            };
            lines.push(Line::styled(format!("{marker}{option}{mark}"), style));
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
            .border_style(theme.border_style(true)),
    );
    frame.render_widget(widget, area);
}

fn render_skill_list(
    frame: &mut Frame,
    area: Rect,
    form: &CharacterForm,
    elements: &WorldElements,
    theme: &GameTheme,
) {
    let mut lines: Vec<Line> = Vec::new();

    if elements.skills.is_empty() {
        lines.push(Line::styled("(No skills defined)", theme.system_style()));
        lines.push(Line::styled(
            "Press Enter to continue.",
            theme.system_style(),
        ));
    } else {
        for (i, skill) in elements.skills.iter().enumerate() {
            let marker = if i == form.cursor { "> " } else { "  " };
            let mark = if form.skills.contains(&i) { "[x]" } else { "[ ]" };
            let style = if i == form.cursor {
                theme.accent_style()
            } else {
                Style::default().fg(theme.foreground)
            };
            lines.push(Line::styled(format!("{marker}{mark} {skill}"), style));
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", form.step.title()))
            .border_style(theme.border_style(true)),
    );
    frame.render_widget(widget, area);
}

fn render_review(
    frame: &mut Frame,
    area: Rect,
    form: &CharacterForm,
    elements: &WorldElements,
    theme: &GameTheme,
) {
    let label = |chosen: Option<usize>, options: &[String]| -> String {
        chosen
            .and_then(|i| options.get(i))
            .cloned()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    let mut chosen_skills: Vec<usize> = form.skills.iter().copied().collect();
    chosen_skills.sort_unstable();
    let skills: Vec<String> = chosen_skills
        .into_iter()
        .filter_map(|i| elements.skills.get(i).cloned())
        .collect();
    let skills_line = if skills.is_empty() {
        "(none)".to_string()
    } else {
        skills.join(", ")
    };

    let lines = vec![
        Line::raw(format!("Name: {}", form.name.text())),
        Line::raw(format!("Description: {}", form.description.text())),
        Line::raw(format!("Race: {}", label(form.race, &elements.races))),
        Line::raw(format!("Faction: {}", label(form.faction, &elements.factions))),
        Line::raw(format!("Role: {}", label(form.role, &elements.roles))),
        Line::raw(format!("Skills: {skills_line}")),
        Line::raw(""),
        Line::styled("Ready to begin the campaign?", theme.accent_style()),
    ];

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", form.step.title()))
            .border_style(theme.border_style(true)),
    );
    frame.render_widget(widget, area);
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    field: &InputField,
    title: &str,
    placeholder: &str,
    focused: bool,
    theme: &GameTheme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(theme.border_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = if field.text().is_empty() {
        Line::from(vec![
            Span::styled("> ", theme.player_style()),
            Span::styled(
                placeholder.to_string(),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ])
    } else {
        let content = field.text();
        let cursor = field.cursor();
        let char_count = content.chars().count();

        let before: String = content.chars().take(cursor).collect();
        let at = content
            .chars()
            .nth(cursor)
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after: String = if cursor < char_count {
            content.chars().skip(cursor + 1).collect()
        } else {
            String::new()
        };

        let cursor_style = if focused {
            Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::styled("> ", theme.player_style()),
            Span::raw(before),
            Span::styled(at, cursor_style),
            Span::raw(after),
        ])
    };

    frame.render_widget(Paragraph::new(line), inner);
}

fn render_hint(frame: &mut Frame, area: Rect, hint: &str, theme: &GameTheme) {
    frame.render_widget(
        Paragraph::new(Line::styled(hint.to_string(), theme.system_style())),
        area,
    );
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(message) = app.status_message() {
        frame.render_widget(
            Paragraph::new(Line::styled(
                message.to_string(),
                app.theme.warning_style(),
            )),
            area,
        );
    }
}

fn render_state_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay = centered_rect(80, 80, area);
    frame.render_widget(Clear, overlay);

    let json = serde_json::to_string_pretty(app.session.state())
        .unwrap_or_else(|_| "{}".to_string());
    let widget = Paragraph::new(json)
        .style(app.theme.system_style())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Session {} (Esc to close) ", app.session.id()))
                .border_style(app.theme.border_style(true)),
        );
    frame.render_widget(widget, overlay);
}

/// Effective vertical scroll for a story paragraph.
///
/// Estimates the wrapped line count for the block's inner width; when the
/// view is locked to the bottom, scrolls to the estimated end, otherwise
/// caps the manual scroll there.
fn story_scroll(app: &App, text: &str, area: Rect) -> u16 {
    let width = area.width.saturating_sub(2).max(1) as usize;
    let height = area.height.saturating_sub(2) as usize;

    let total_lines: usize = text
        .lines()
        .map(|line| line.chars().count().max(1).div_ceil(width))
        .sum();
    let max_scroll = total_lines.saturating_sub(height);

    let scroll = if app.scroll_locked_to_bottom {
        max_scroll
    } else {
        app.scroll.min(max_scroll)
    };
    scroll.min(u16::MAX as usize) as u16
}

/// A centered rect taking the given percentages of the area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, vertical, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);

    let [_, horizontal, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(vertical);

    horizontal
}
