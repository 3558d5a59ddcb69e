//! Test fixtures shared by the player's unit tests.

pub mod fixtures;
