//! Color theme and styling for the World Weaver TUI

use ratatui::style::{Color, Modifier, Style};

/// Game UI color theme
#[derive(Debug, Clone)]
pub struct GameTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,

    // Text colors
    pub narrator_text: Color,
    pub player_text: Color,
    pub system_text: Color,
    pub warning: Color,
    pub accent: Color,
}

impl Default for GameTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            title: Color::Yellow,

            narrator_text: Color::White,
            player_text: Color::Cyan,
            system_text: Color::DarkGray,
            warning: Color::Yellow,
            accent: Color::Green,
        }
    }
}

impl GameTheme {
    /// Style for narrated story text
    pub fn narrator_style(&self) -> Style {
        Style::default().fg(self.narrator_text)
    }

    /// Style for player input and actions
    pub fn player_style(&self) -> Style {
        Style::default()
            .fg(self.player_text)
            .add_modifier(Modifier::ITALIC)
    }

    /// Style for hints and system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Style for warnings and notices
    pub fn warning_style(&self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for stage titles
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    /// Style for selected or highlighted entries
    pub fn accent_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style, brighter when the widget has focus
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }
}
