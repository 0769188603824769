//! TUI module for the word game.

mod app;
pub mod theme;
mod widgets;

pub use app::App;
