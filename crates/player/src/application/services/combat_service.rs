//! Combat Service - encounter data for fight scenes
//!
//! The combat view first shows the enemies, then the rewards once the player
//! has fought through. [`CombatSession`] tracks that two-phase flow for one
//! scene.

use talebook_domain::{CombatData, CombatPhase, SceneId};

use crate::application::api::Api;
use crate::ports::outbound::ApiError;

/// Message shown when combat data cannot be fetched.
pub const COMBAT_LOAD_FAILED_MESSAGE: &str = "Error loading combat data";

#[derive(Clone)]
pub struct CombatService {
    api: Api,
}

impl CombatService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Encounter attached to a fight scene
    pub async fn get_scene_combat(&self, scene_id: SceneId) -> Result<CombatData, ApiError> {
        self.api.get(&format!("/combats/scenes/{}", scene_id)).await
    }
}

/// Combat view state for a single fight scene.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatSession {
    scene_id: SceneId,
    data: Option<CombatData>,
    phase: CombatPhase,
    error: Option<String>,
}

impl CombatSession {
    /// Fetch the encounter for `scene_id`. Failures are kept on the session.
    pub async fn load(service: &CombatService, scene_id: SceneId) -> Self {
        let (data, error) = match service.get_scene_combat(scene_id).await {
            Ok(data) => {
                tracing::debug!(
                    scene_id = %scene_id,
                    enemies = data.enemies.len(),
                    rewards = data.rewards.len(),
                    "Combat data loaded"
                );
                (Some(data), None)
            }
            Err(e) => {
                tracing::error!(scene_id = %scene_id, error = %e, "Failed to load combat data");
                (None, Some(COMBAT_LOAD_FAILED_MESSAGE.to_string()))
            }
        };
        Self {
            scene_id,
            data,
            phase: CombatPhase::Enemies,
            error,
        }
    }

    pub fn scene_id(&self) -> SceneId {
        self.scene_id
    }

    pub fn data(&self) -> Option<&CombatData> {
        self.data.as_ref()
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The fight is won; show the rewards.
    pub fn finish_fight(&mut self) {
        self.phase = CombatPhase::Rewards;
    }

    /// Back to the enemy roster, e.g. before re-entering the scene.
    pub fn reset(&mut self) {
        self.phase = CombatPhase::Enemies;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::api_request_failed;
    use crate::ports::outbound::MockRawApiPort;
    use serde_json::json;
    use std::sync::Arc;

    fn service(raw: MockRawApiPort) -> CombatService {
        CombatService::new(Api::new(Arc::new(raw)))
    }

    #[tokio::test]
    async fn session_moves_from_enemies_to_rewards() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| path == "/combats/scenes/14")
            .times(1)
            .returning(|_| Ok(json!({ "enemies": [], "expPointsTotal": 40, "rewards": [] })));
        let service = service(raw);

        let mut session = CombatSession::load(&service, SceneId::new(14)).await;
        assert_eq!(session.phase(), CombatPhase::Enemies);
        assert_eq!(session.data().map(|d| d.exp_points_total), Some(40));
        assert_eq!(session.error(), None);

        session.finish_fight();
        assert_eq!(session.phase(), CombatPhase::Rewards);
        session.reset();
        assert_eq!(session.phase(), CombatPhase::Enemies);
    }

    #[tokio::test]
    async fn failed_load_keeps_error() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .returning(|_| Err(api_request_failed("timeout")));

        let session = CombatSession::load(&service(raw), SceneId::new(2)).await;
        assert_eq!(session.error(), Some(COMBAT_LOAD_FAILED_MESSAGE));
        assert!(session.data().is_none());
        assert_eq!(session.scene_id(), SceneId::new(2));
    }
}
