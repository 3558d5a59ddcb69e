//! Hero Service - the hero catalog offered during game setup

use talebook_domain::Hero;

use crate::application::api::Api;
use crate::ports::outbound::ApiError;

#[derive(Clone)]
pub struct HeroService {
    api: Api,
}

impl HeroService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// All playable heroes. Heroes without a skill tree get the default one.
    pub async fn list_heroes(&self) -> Result<Vec<Hero>, ApiError> {
        let heroes: Vec<Hero> = self.api.get("/heroes").await?;
        Ok(heroes
            .into_iter()
            .map(Hero::with_default_skill_tree)
            .collect())
    }
}
