//! Presentation
//!
//! The book is read through a line-oriented terminal front end.

pub mod terminal;

pub use terminal::{render_page, Command, TerminalBook, WeaponSelectionInterlude};
