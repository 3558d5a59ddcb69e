//! Scene provider port - where chapter scene lists come from.

use talebook_domain::{ChapterId, Scene};

use super::ApiError;

/// Source of chapter content for the navigation engine.
///
/// Scenes are returned in authored order; the first scene is where the chapter
/// starts.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SceneProviderPort: Send + Sync {
    async fn chapter_scenes(&self, chapter_id: ChapterId) -> Result<Vec<Scene>, ApiError>;
}
