//! Talebook player.
//!
//! Reads an interactive book chapter by chapter: the navigation engine and its
//! reducer, scene-type dispatch, page-turn pacing, and the HTTP adapters for
//! the scene and core APIs.

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod state;
pub mod ui;

pub use application::services::BookSession;
pub use infrastructure::config::PlayerConfig;
pub use state::GameEngine;
