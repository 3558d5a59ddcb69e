//! Application services
//!
//! Services wrap the typed [`Api`](crate::application::api::Api) for each
//! backend resource, plus the book session that drives reading.

pub mod book_session;
pub mod combat_service;
pub mod hero_service;
pub mod scene_service;

pub use book_session::{BookSession, DevJumpError};
pub use combat_service::{CombatService, CombatSession, COMBAT_LOAD_FAILED_MESSAGE};
pub use hero_service::HeroService;
pub use scene_service::SceneService;
