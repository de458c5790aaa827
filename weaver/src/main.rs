//! World Weaver RPG terminal application.
//!
//! Describe a world, let the AI narrator expand it into a structured
//! profile, create a character, and role-play through generated scenes.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for
//! automated testing:
//!
//! ```bash
//! cargo run -p weaver -- --headless
//! ```

mod app;
mod character_form;
mod events;
mod headless;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Duration;
use weaver_core::GameSession;

use app::{App, SessionCommand};
use events::{handle_event, EventResult};
use ui::render::render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Check for API key
    if std::env::var("GEMINI_API_KEY").is_err() {
        eprintln!("Error: GEMINI_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export GEMINI_API_KEY=your_key_here");
        std::process::exit(1);
    }

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let session = match GameSession::from_env() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Failed to set up the narrator: {e}");
            std::process::exit(1);
        }
    };

    if args.iter().any(|a| a == "--headless") {
        return headless::run_headless(session).await.map_err(|e| e.into());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(session)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    // One submitted command at a time; the session call runs to completion
    // before further input is accepted.
    let mut pending: Option<SessionCommand> = None;

    loop {
        terminal.draw(|f| render(f, &app))?;

        if let Some(command) = pending.take() {
            if let Some(wait) = command.wait_message() {
                app.set_status(wait);
                terminal.draw(|f| render(f, &app))?;
            }
            app.run_command(command).await;
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::Command(command) => pending = Some(command),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("World Weaver RPG - AI-narrated interactive fiction");
    println!();
    println!("USAGE:");
    println!("  weaver [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help       Show this help message");
    println!("  --headless       Run in headless mode (text-only, no TUI)");
    println!();
    println!("The GEMINI_API_KEY environment variable must be set (a .env file");
    println!("is also read). The flow: describe a world, confirm a genre and");
    println!("storyline hook, create a character, then play.");
    println!();
    println!("KEYS (TUI):");
    println!("  Enter            Submit the current form");
    println!("  Tab              Switch field (storyline setup)");
    println!("  Ctrl+R           Random theme / randomize hook");
    println!("  Ctrl+E           End the campaign");
    println!("  Ctrl+G           Toggle the session-state inspector");
    println!("  Ctrl+C, Ctrl+Q   Quit");
}
