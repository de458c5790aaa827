//! Event handling for the World Weaver TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use weaver_core::Stage;

use crate::app::{App, InputField, SessionCommand, StorylineField};

/// Result of handling an event
#[derive(Debug, Clone)]
pub enum EventResult {
    Continue,
    NeedsRedraw,
    Quit,
    /// A submit action: run exactly one state-machine transition.
    Command(SessionCommand),
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return EventResult::Quit,
            KeyCode::Char('g') => {
                app.toggle_state_overlay();
                return EventResult::NeedsRedraw;
            }
            _ => {}
        }
    }

    if app.show_state {
        if matches!(key.code, KeyCode::Esc) {
            app.show_state = false;
        }
        return EventResult::NeedsRedraw;
    }

    match app.session.stage() {
        Stage::WorldCreation => handle_world_creation(app, key),
        Stage::StorylineSetup => handle_storyline_setup(app, key),
        Stage::CharacterCreation => handle_character_creation(app, key),
        Stage::Campaign => handle_campaign(app, key),
        Stage::CampaignEnd => handle_campaign_end(app, key),
    }
}

fn handle_world_creation(app: &mut App, key: KeyEvent) -> EventResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
        return EventResult::Command(SessionCommand::RandomTheme);
    }

    match key.code {
        KeyCode::Enter => EventResult::Command(SessionCommand::GenerateWorld(
            app.forms.description.text().to_string(),
        )),
        _ => edit_field(&mut app.forms.description, key),
    }
}

fn handle_storyline_setup(app: &mut App, key: KeyEvent) -> EventResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
        return EventResult::Command(SessionCommand::RandomizeHook);
    }

    match key.code {
        KeyCode::Tab | KeyCode::BackTab => {
            app.forms.storyline_focus = match app.forms.storyline_focus {
                StorylineField::Genre => StorylineField::Hook,
                StorylineField::Hook => StorylineField::Genre,
            };
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => EventResult::Command(SessionCommand::ConfirmStoryline {
            genre: app.forms.genre.text().to_string(),
            hook: app.forms.hook.text().to_string(),
        }),
        _ => {
            let field = match app.forms.storyline_focus {
                StorylineField::Genre => &mut app.forms.genre,
                StorylineField::Hook => &mut app.forms.hook,
            };
            edit_field(field, key)
        }
    }
}

fn handle_character_creation(app: &mut App, key: KeyEvent) -> EventResult {
    app.forms
        .character
        .handle_key(key, app.session.world_elements());

    if app.forms.character.finished {
        // A guard failure keeps the form on the review step for another try.
        app.forms.character.finished = false;
        let builder = app
            .forms
            .character
            .builder(app.session.world_elements());
        return EventResult::Command(SessionCommand::BeginCampaign(builder));
    }

    EventResult::NeedsRedraw
}

fn handle_campaign(app: &mut App, key: KeyEvent) -> EventResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('e') {
        return EventResult::Command(SessionCommand::EndCampaign);
    }

    match key.code {
        KeyCode::Enter => EventResult::Command(SessionCommand::SubmitAction(
            app.forms.action.text().to_string(),
        )),
        KeyCode::Up => {
            app.scroll_up(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Down => {
            app.scroll_down(1);
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.scroll_up(10);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_down(10);
            EventResult::NeedsRedraw
        }
        _ => edit_field(&mut app.forms.action, key),
    }
}

fn handle_campaign_end(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Enter => EventResult::Command(SessionCommand::StartNewWorld),
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_up(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_down(1);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Route an editing key into a text field.
fn edit_field(field: &mut InputField, key: KeyEvent) -> EventResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return EventResult::Continue;
    }

    match key.code {
        KeyCode::Char(c) => field.insert(c),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.left(),
        KeyCode::Right => field.right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        _ => return EventResult::Continue,
    }

    EventResult::NeedsRedraw
}
