//! Player configuration
//!
//! Everything the player needs to reach the backend and pace the book is read
//! from environment variables once at startup and injected from there. Nothing
//! below the composition root reads the environment.

use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use talebook_domain::ChapterId;

/// Default request timeout in milliseconds (2 minutes)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 120_000;

/// Default page-turn animation length in milliseconds
pub const DEFAULT_PAGE_TURN_MS: u64 = 600;

/// Player configuration loaded from environment
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Base URL of the scene provider (`/books/scenes/...`)
    pub scene_api_base_url: String,
    /// Base URL of the core API (combats, heroes)
    pub core_api_base_url: String,
    /// Prefix joined with scene image paths
    pub image_base_url: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Page-turn animation length
    pub page_turn: Duration,
    /// Chapter loaded at startup
    pub chapter_id: ChapterId,
    /// Whether the scene-jump developer affordance is active
    pub dev_tools_enabled: bool,
    /// Names seated when no roster is given explicitly
    pub default_players: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            scene_api_base_url: "http://localhost:8081".to_string(),
            core_api_base_url: "http://localhost:8082".to_string(),
            image_base_url: "http://localhost:8081".to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            page_turn: Duration::from_millis(DEFAULT_PAGE_TURN_MS),
            chapter_id: ChapterId::new(1),
            dev_tools_enabled: cfg!(debug_assertions),
            default_players: vec!["Darius".to_string(), "Zornak".to_string()],
        }
    }
}

impl PlayerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let scene_api_base_url = var("TALEBOOK_SCENE_API_URL")
            .unwrap_or(defaults.scene_api_base_url)
            .trim_end_matches('/')
            .to_string();
        let core_api_base_url = var("TALEBOOK_CORE_API_URL")
            .unwrap_or(defaults.core_api_base_url)
            .trim_end_matches('/')
            .to_string();
        let image_base_url = var("TALEBOOK_IMAGE_BASE_URL")
            .unwrap_or_else(|| scene_api_base_url.clone())
            .trim_end_matches('/')
            .to_string();

        let request_timeout = match var("TALEBOOK_REQUEST_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse()
                    .context("TALEBOOK_REQUEST_TIMEOUT_MS must be a number of milliseconds")?,
            ),
            None => defaults.request_timeout,
        };
        let page_turn = match var("TALEBOOK_PAGE_TURN_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse()
                    .context("TALEBOOK_PAGE_TURN_MS must be a number of milliseconds")?,
            ),
            None => defaults.page_turn,
        };
        let chapter_id = match var("TALEBOOK_CHAPTER_ID") {
            Some(id) => id
                .parse()
                .context("TALEBOOK_CHAPTER_ID must be an integer chapter id")?,
            None => defaults.chapter_id,
        };
        let dev_tools_enabled = match var("TALEBOOK_DEV_TOOLS") {
            Some(flag) => parse_flag(&flag)
                .with_context(|| format!("TALEBOOK_DEV_TOOLS must be a boolean, got {flag:?}"))?,
            None => defaults.dev_tools_enabled,
        };
        let default_players = match var("TALEBOOK_PLAYERS") {
            Some(names) => names
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.default_players,
        };

        Ok(Self {
            scene_api_base_url,
            core_api_base_url,
            image_base_url,
            request_timeout,
            page_turn,
            chapter_id,
            dev_tools_enabled,
            default_players,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load `.env.local` then `.env` from `root`, without overriding variables
/// that are already set.
pub fn load_dotenv(root: &Path) {
    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = root.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable env file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = PlayerConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config, PlayerConfig::default());
    }

    #[test]
    fn image_base_follows_scene_api_unless_set() {
        let config = PlayerConfig::from_lookup(lookup(&[(
            "TALEBOOK_SCENE_API_URL",
            "https://books.example/",
        )]))
        .expect("config");
        assert_eq!(config.scene_api_base_url, "https://books.example");
        assert_eq!(config.image_base_url, "https://books.example");

        let config = PlayerConfig::from_lookup(lookup(&[
            ("TALEBOOK_SCENE_API_URL", "https://books.example"),
            ("TALEBOOK_IMAGE_BASE_URL", "https://cdn.example"),
        ]))
        .expect("config");
        assert_eq!(config.image_base_url, "https://cdn.example");
    }

    #[test]
    fn parses_numbers_flags_and_roster() {
        let config = PlayerConfig::from_lookup(lookup(&[
            ("TALEBOOK_PAGE_TURN_MS", "250"),
            ("TALEBOOK_CHAPTER_ID", "3"),
            ("TALEBOOK_DEV_TOOLS", "off"),
            ("TALEBOOK_PLAYERS", "Ana, Bo,,Cy "),
        ]))
        .expect("config");
        assert_eq!(config.page_turn, Duration::from_millis(250));
        assert_eq!(config.chapter_id, ChapterId::new(3));
        assert!(!config.dev_tools_enabled);
        assert_eq!(config.default_players, vec!["Ana", "Bo", "Cy"]);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(PlayerConfig::from_lookup(lookup(&[("TALEBOOK_PAGE_TURN_MS", "soon")])).is_err());
        assert!(PlayerConfig::from_lookup(lookup(&[("TALEBOOK_DEV_TOOLS", "maybe")])).is_err());
        assert!(PlayerConfig::from_lookup(lookup(&[("TALEBOOK_CHAPTER_ID", "one")])).is_err());
    }
}
