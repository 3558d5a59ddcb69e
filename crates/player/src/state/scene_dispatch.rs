//! Scene-type dispatch.
//!
//! Some scenes are not narrative pages but full-screen views (combat, board
//! games, scripted interludes, the game-over screen). [`dispatch`] decides
//! which view, if any, replaces the book for the current scene, and what
//! the view should do when it finishes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use talebook_domain::{Scene, SceneId, SceneMode, GAME_OVER_SCENE_ID};

/// Resource key of the weapon-selection interlude.
pub const VIDEO_WEAPON_SELECTION: &str = "VIDEO_WEAPON_SELECTION";

/// What happens when a view completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    /// Page forward along `next_scene_id`.
    NextScene,
    /// Navigate to a specific scene.
    GoTo(SceneId),
    /// Show the game-over scene.
    GameOver,
}

/// How a view ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    Completed,
    Failed,
}

/// Completion actions wired into each view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandlers {
    pub on_combat_continue: ViewAction,
    pub on_special_complete: ViewAction,
    pub on_board_game_complete: ViewAction,
    pub on_game_over: ViewAction,
}

impl Default for SceneHandlers {
    fn default() -> Self {
        Self {
            on_combat_continue: ViewAction::NextScene,
            on_special_complete: ViewAction::NextScene,
            on_board_game_complete: ViewAction::NextScene,
            on_game_over: ViewAction::GameOver,
        }
    }
}

/// A view for `SPEC` scenes, registered under its resource key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpecialSceneView: Send + Sync {
    /// Run the view to completion.
    async fn run(&self, scene: &Scene) -> ViewOutcome;
}

/// Views for `SPEC` scenes, keyed by the scene's `resource`.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    views: HashMap<String, Arc<dyn SpecialSceneView>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `view` under `key`, returning any view it replaces.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        view: Arc<dyn SpecialSceneView>,
    ) -> Option<Arc<dyn SpecialSceneView>> {
        self.views.insert(key.into(), view)
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn SpecialSceneView>> {
        self.views.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.views.contains_key(key)
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.views.keys().collect();
        keys.sort();
        f.debug_struct("ResourceRegistry").field("keys", &keys).finish()
    }
}

/// The view replacing the book for one scene.
#[derive(Clone)]
pub enum SceneView {
    GameOver,
    Combat {
        on_continue: ViewAction,
    },
    BoardGame {
        resource: Option<String>,
        on_complete: ViewAction,
        on_game_over: ViewAction,
    },
    Special {
        resource: String,
        view: Arc<dyn SpecialSceneView>,
        on_complete: ViewAction,
    },
}

impl SceneView {
    /// The action to take once the view ends with `outcome`.
    ///
    /// The game-over screen is terminal and has none.
    pub fn action_for(&self, outcome: ViewOutcome) -> Option<ViewAction> {
        match self {
            Self::GameOver => None,
            Self::Combat { on_continue } => Some(*on_continue),
            Self::BoardGame {
                on_complete,
                on_game_over,
                ..
            } => Some(match outcome {
                ViewOutcome::Completed => *on_complete,
                ViewOutcome::Failed => *on_game_over,
            }),
            Self::Special { on_complete, .. } => Some(*on_complete),
        }
    }
}

impl fmt::Debug for SceneView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameOver => f.write_str("GameOver"),
            Self::Combat { on_continue } => f
                .debug_struct("Combat")
                .field("on_continue", on_continue)
                .finish(),
            Self::BoardGame {
                resource,
                on_complete,
                on_game_over,
            } => f
                .debug_struct("BoardGame")
                .field("resource", resource)
                .field("on_complete", on_complete)
                .field("on_game_over", on_game_over)
                .finish(),
            Self::Special {
                resource,
                on_complete,
                ..
            } => f
                .debug_struct("Special")
                .field("resource", resource)
                .field("on_complete", on_complete)
                .finish_non_exhaustive(),
        }
    }
}

/// Pick the view for `scene`, or `None` to render it as a book page.
///
/// Checked in priority order: end of game, combat, board game, special view
/// with a registered resource.
pub fn dispatch(
    scene: Option<&Scene>,
    handlers: &SceneHandlers,
    registry: &ResourceRegistry,
) -> Option<SceneView> {
    let scene = scene?;
    if scene.id() == GAME_OVER_SCENE_ID {
        return Some(SceneView::GameOver);
    }

    match scene.mode() {
        SceneMode::End => Some(SceneView::GameOver),
        SceneMode::Fight => Some(SceneView::Combat {
            on_continue: handlers.on_combat_continue,
        }),
        SceneMode::Table { resource } => Some(SceneView::BoardGame {
            resource: resource.map(str::to_string),
            on_complete: handlers.on_board_game_complete,
            on_game_over: handlers.on_game_over,
        }),
        SceneMode::Special {
            resource: Some(resource),
        } => {
            let Some(view) = registry.get(resource) else {
                tracing::warn!(
                    scene_id = %scene.id(),
                    resource,
                    "No view registered for special scene, rendering as page"
                );
                return None;
            };
            Some(SceneView::Special {
                resource: resource.to_string(),
                view,
                on_complete: handlers.on_special_complete,
            })
        }
        SceneMode::Special { resource: None } | SceneMode::Main | SceneMode::Unknown { .. } => {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talebook_domain::SceneType;

    fn registry_with(key: &str) -> ResourceRegistry {
        let mut view = MockSpecialSceneView::new();
        view.expect_run().returning(|_| ViewOutcome::Completed);
        let mut registry = ResourceRegistry::new();
        registry.register(key, Arc::new(view));
        registry
    }

    fn scene(id: i64, scene_type: SceneType) -> Scene {
        Scene::new(SceneId::new(id), "text").with_type(scene_type)
    }

    #[test]
    fn no_scene_no_view() {
        assert!(dispatch(None, &SceneHandlers::default(), &ResourceRegistry::new()).is_none());
    }

    #[test]
    fn end_and_sentinel_are_game_over() {
        let handlers = SceneHandlers::default();
        let registry = ResourceRegistry::new();

        let end = scene(5, SceneType::End);
        assert!(matches!(
            dispatch(Some(&end), &handlers, &registry),
            Some(SceneView::GameOver)
        ));

        // The sentinel wins over any other type.
        let sentinel = scene(9999, SceneType::Fight);
        assert!(matches!(
            dispatch(Some(&sentinel), &handlers, &registry),
            Some(SceneView::GameOver)
        ));
    }

    #[test]
    fn fight_gets_combat_with_continue_handler() {
        let handlers = SceneHandlers {
            on_combat_continue: ViewAction::GoTo(SceneId::new(12)),
            ..SceneHandlers::default()
        };
        let view = dispatch(
            Some(&scene(3, SceneType::Fight)),
            &handlers,
            &ResourceRegistry::new(),
        )
        .expect("combat view");

        assert_eq!(
            view.action_for(ViewOutcome::Completed),
            Some(ViewAction::GoTo(SceneId::new(12)))
        );
    }

    #[test]
    fn table_outcome_selects_handler() {
        let table = scene(4, SceneType::Table).with_resource("DICE");
        let view = dispatch(
            Some(&table),
            &SceneHandlers::default(),
            &ResourceRegistry::new(),
        )
        .expect("board game view");

        match &view {
            SceneView::BoardGame { resource, .. } => assert_eq!(resource.as_deref(), Some("DICE")),
            other => panic!("expected board game, got {other:?}"),
        }
        assert_eq!(
            view.action_for(ViewOutcome::Completed),
            Some(ViewAction::NextScene)
        );
        assert_eq!(
            view.action_for(ViewOutcome::Failed),
            Some(ViewAction::GameOver)
        );
    }

    #[test]
    fn special_needs_registered_resource() {
        let handlers = SceneHandlers::default();
        let registry = registry_with(VIDEO_WEAPON_SELECTION);

        let known = scene(6, SceneType::Special).with_resource(VIDEO_WEAPON_SELECTION);
        assert!(matches!(
            dispatch(Some(&known), &handlers, &registry),
            Some(SceneView::Special { ref resource, .. }) if resource == VIDEO_WEAPON_SELECTION
        ));

        let unknown = scene(7, SceneType::Special).with_resource("VIDEO_CREDITS");
        assert!(dispatch(Some(&unknown), &handlers, &registry).is_none());

        let bare = scene(8, SceneType::Special);
        assert!(dispatch(Some(&bare), &handlers, &registry).is_none());
    }

    #[test]
    fn plain_and_unknown_types_render_as_pages() {
        let handlers = SceneHandlers::default();
        let registry = ResourceRegistry::new();
        assert!(dispatch(Some(&scene(1, SceneType::Main)), &handlers, &registry).is_none());
        assert!(dispatch(
            Some(&scene(2, SceneType::from_tag("GAME"))),
            &handlers,
            &registry
        )
        .is_none());
    }

    #[test]
    fn game_over_view_has_no_action() {
        let view = dispatch(
            Some(&scene(9, SceneType::End)),
            &SceneHandlers::default(),
            &ResourceRegistry::new(),
        )
        .expect("view");
        assert_eq!(view.action_for(ViewOutcome::Completed), None);
    }
}
