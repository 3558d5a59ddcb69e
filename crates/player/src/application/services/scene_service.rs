//! Scene Service - chapter content from the scene provider

use async_trait::async_trait;
use talebook_domain::{ChapterId, Scene};

use crate::application::api::Api;
use crate::ports::outbound::{ApiError, SceneProviderPort};

/// Fetches chapter scene lists over HTTP.
#[derive(Clone)]
pub struct SceneService {
    api: Api,
}

impl SceneService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    fn chapter_path(chapter_id: ChapterId) -> String {
        format!("/books/scenes/chapters/{}", chapter_id)
    }
}

#[async_trait]
impl SceneProviderPort for SceneService {
    async fn chapter_scenes(&self, chapter_id: ChapterId) -> Result<Vec<Scene>, ApiError> {
        self.api.get(&Self::chapter_path(chapter_id)).await
    }
}
