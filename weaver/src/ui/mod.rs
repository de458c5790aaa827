//! UI module for the World Weaver TUI

pub mod render;
pub mod theme;
