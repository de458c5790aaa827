//! Interactive fiction engine with an AI narrator.
//!
//! This crate provides:
//! - The session stage machine driving the world → storyline → character →
//!   campaign flow
//! - Structured extraction of world elements from generated profiles
//! - An AI narrator backed by Gemini, behind a swappable generator boundary
//! - Deterministic test doubles and a scripted test harness
//!
//! # Quick Start
//!
//! ```ignore
//! use weaver_core::{CharacterBuilder, GameSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = GameSession::from_env()?;
//!
//!     session.generate_world("A desert kingdom ruled by sand mages").await?;
//!     session.confirm_storyline("Fantasy", "The last oasis is drying up.")?;
//!
//!     let character = CharacterBuilder::new()
//!         .name("Kira")
//!         .description("A wanderer of the dunes");
//!     session.begin_campaign(character).await?;
//!
//!     let segment = session.submit_action("I follow the caravan tracks").await?;
//!     println!("{segment}");
//!     Ok(())
//! }
//! ```

pub mod character;
pub mod narrator;
pub mod session;
pub mod stage;
pub mod testing;
pub mod world;

// Primary public API
pub use character::{BuilderError, Character, CharacterBuilder, NOT_AVAILABLE};
pub use narrator::{GenerateError, GeminiGenerator, Narrator, StoryContext, TextGenerator};
pub use session::{GameSession, SessionError, SessionId, SessionState};
pub use stage::{GameEvent, Stage};
pub use testing::{FailingGenerator, ScriptedGenerator, TestHarness};
pub use world::{extract_elements, WorldElements};
