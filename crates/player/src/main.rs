//! Talebook player - composition root binary.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use talebook_player::application::services::{
    BookSession, CombatService, HeroService, SceneService,
};
use talebook_player::application::Api;
use talebook_player::infrastructure::config::load_dotenv;
use talebook_player::infrastructure::{ApiAdapter, PlayerConfig};
use talebook_player::state::{GameEngine, PageAnimator, ResourceRegistry, VIDEO_WEAPON_SELECTION};
use talebook_player::ui::{TerminalBook, WeaponSelectionInterlude};

/// How long the weapon-selection interlude holds the screen.
const INTERLUDE_DURATION: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env from the workspace root, then the working directory
    load_dotenv(&Path::new(env!("CARGO_MANIFEST_DIR")).join("../.."));
    load_dotenv(Path::new("."));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "talebook_player=debug,talebook=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Talebook player");

    let config = PlayerConfig::from_env()?;
    tracing::info!(
        scene_api = %config.scene_api_base_url,
        core_api = %config.core_api_base_url,
        chapter_id = %config.chapter_id,
        dev_tools = config.dev_tools_enabled,
        "Configuration loaded"
    );

    // HTTP
    let scene_api = Api::new(Arc::new(ApiAdapter::new(
        &config.scene_api_base_url,
        config.request_timeout,
    )));
    let core_api = Api::new(Arc::new(ApiAdapter::new(
        &config.core_api_base_url,
        config.request_timeout,
    )));

    // Special scene views
    let mut registry = ResourceRegistry::new();
    registry.register(
        VIDEO_WEAPON_SELECTION,
        Arc::new(WeaponSelectionInterlude::new(INTERLUDE_DURATION)),
    );

    let engine = GameEngine::new(
        Arc::new(SceneService::new(scene_api)),
        config.image_base_url.clone(),
    );
    let session = BookSession::new(
        engine,
        PageAnimator::new(config.page_turn),
        registry,
        config.dev_tools_enabled,
    );

    TerminalBook::new(
        session,
        CombatService::new(core_api.clone()),
        HeroService::new(core_api),
        config.default_players.clone(),
    )
    .run(config.chapter_id)
    .await
}
