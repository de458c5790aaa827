//! Main application state and logic

use weaver_core::{CharacterBuilder, GameSession, Stage};

use crate::character_form::CharacterForm;
use crate::ui::theme::GameTheme;

/// A state-machine transition requested by the UI.
///
/// Each submit action maps to exactly one of these; the main loop runs it
/// to completion before accepting further input.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    GenerateWorld(String),
    RandomTheme,
    RandomizeHook,
    ConfirmStoryline { genre: String, hook: String },
    BeginCampaign(CharacterBuilder),
    SubmitAction(String),
    EndCampaign,
    StartNewWorld,
}

impl SessionCommand {
    /// The "please wait" status for commands that call the narrator.
    pub fn wait_message(&self) -> Option<&'static str> {
        match self {
            SessionCommand::GenerateWorld(_) => Some("Crafting your world..."),
            SessionCommand::RandomTheme => Some("Summoning a theme..."),
            SessionCommand::RandomizeHook => Some("Spinning a storyline..."),
            SessionCommand::BeginCampaign(_) => Some("The adventure begins..."),
            SessionCommand::SubmitAction(_) => Some("The story unfolds..."),
            _ => None,
        }
    }
}

/// A single-line text input with a character-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    buffer: String,
    cursor: usize,
}

impl InputField {
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the content and move the cursor to the end.
    pub fn set(&mut self, content: impl Into<String>) {
        self.buffer = content.into();
        self.cursor = self.buffer.chars().count();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Insert a character at the cursor (unicode-safe).
    pub fn insert(&mut self, c: char) {
        let byte_pos = self
            .buffer
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len());
        self.buffer.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor (unicode-safe).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            if let Some((byte_pos, ch)) = self.buffer.char_indices().nth(self.cursor) {
                self.buffer.replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Delete the character at the cursor (unicode-safe).
    pub fn delete(&mut self) {
        if let Some((byte_pos, ch)) = self.buffer.char_indices().nth(self.cursor) {
            self.buffer.replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }
}

/// Which storyline field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorylineField {
    #[default]
    Genre,
    Hook,
}

/// Per-stage form state. Reset wholesale on a new world.
#[derive(Debug, Default)]
pub struct Forms {
    pub description: InputField,
    pub genre: InputField,
    pub hook: InputField,
    pub storyline_focus: StorylineField,
    pub character: CharacterForm,
    pub action: InputField,
}

/// Main application state
pub struct App {
    pub session: GameSession,
    pub theme: GameTheme,
    pub forms: Forms,

    // Story scroll
    pub scroll: usize,
    pub scroll_locked_to_bottom: bool,

    status_message: Option<String>,
    pub show_state: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            theme: GameTheme::default(),
            forms: Forms::default(),
            scroll: 0,
            scroll_locked_to_bottom: true,
            status_message: None,
            show_state: false,
            should_quit: false,
        }
    }

    /// Run one submitted command to completion and update UI state.
    ///
    /// Guard failures become warning status lines; collaborator failures
    /// surface as the session's non-fatal notice.
    pub async fn run_command(&mut self, command: SessionCommand) {
        let stage_before = self.session.stage();

        let result = match command {
            SessionCommand::GenerateWorld(description) => {
                self.session.generate_world(&description).await
            }
            SessionCommand::RandomTheme => match self.session.random_theme().await {
                Ok(theme) => {
                    self.forms.description.set(theme);
                    Ok(())
                }
                Err(err) => Err(err),
            },
            SessionCommand::RandomizeHook => match self.session.randomize_hook().await {
                Ok(hook) => {
                    self.forms.hook.set(hook);
                    Ok(())
                }
                Err(err) => Err(err),
            },
            SessionCommand::ConfirmStoryline { genre, hook } => {
                self.session.confirm_storyline(&genre, &hook)
            }
            SessionCommand::BeginCampaign(builder) => self.session.begin_campaign(builder).await,
            SessionCommand::SubmitAction(action) => {
                let result = self.session.submit_action(&action).await.map(|_| ());
                if result.is_ok() {
                    self.forms.action.clear();
                    self.scroll_to_bottom();
                }
                result
            }
            SessionCommand::EndCampaign => self.session.end_campaign(),
            SessionCommand::StartNewWorld => self.session.start_new_world(),
        };

        match result {
            Ok(()) => {
                self.clear_status();
                if self.session.stage() != stage_before {
                    self.after_transition();
                }
            }
            Err(err) => self.set_status(err.to_string()),
        }

        if let Some(notice) = self.session.take_notice() {
            self.set_status(notice);
        }
    }

    /// Sync form state with a freshly entered stage.
    fn after_transition(&mut self) {
        match self.session.stage() {
            Stage::WorldCreation => {
                self.forms = Forms::default();
                self.scroll = 0;
                self.scroll_locked_to_bottom = true;
            }
            Stage::StorylineSetup => {
                self.forms.storyline_focus = StorylineField::Genre;
            }
            Stage::CharacterCreation => {
                self.forms.character = CharacterForm::default();
            }
            Stage::Campaign => {
                self.forms.action.clear();
                self.scroll_to_bottom();
            }
            Stage::CampaignEnd => {
                self.scroll = 0;
                self.scroll_locked_to_bottom = false;
            }
        }
    }

    pub fn toggle_state_overlay(&mut self) {
        self.show_state = !self.show_state;
    }

    /// Scroll the story to the bottom and keep it there.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll = usize::MAX / 2;
        self.scroll_locked_to_bottom = true;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        if self.scroll > max_scroll {
            self.scroll = max_scroll;
        }
        self.scroll = self.scroll.saturating_sub(lines);
        self.scroll_locked_to_bottom = false;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        self.scroll = self.scroll.saturating_add(lines).min(max_scroll + 20);
    }

    /// Conservative line estimate for capping manual scroll.
    fn estimate_max_scroll(&self) -> usize {
        const ESTIMATED_WIDTH: usize = 70;
        const ESTIMATED_VISIBLE_HEIGHT: usize = 20;

        let estimated_lines: usize = self
            .session
            .story_log()
            .iter()
            .map(|entry| {
                entry
                    .lines()
                    .map(|line| (line.len() / ESTIMATED_WIDTH).max(1))
                    .sum::<usize>()
                    + 1
            })
            .sum();

        estimated_lines.saturating_sub(ESTIMATED_VISIBLE_HEIGHT)
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
