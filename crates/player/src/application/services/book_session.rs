//! Book Session - the reading surface over the navigation engine
//!
//! Couples page-turn animation with navigation: a forward turn animates first
//! and navigates once the page has turned, unless the destination is a scene
//! rendered by its own view. Scene-type views are dispatched from here and
//! their completion actions resolved back into engine operations.

use talebook_domain::{ChapterId, ChoiceId, SceneId, SceneType, GAME_OVER_SCENE_ID};
use thiserror::Error;

use crate::state::{
    dispatch, GameEngine, PageAnimator, ResourceRegistry, SceneHandlers, SceneView, ViewAction,
};

/// Why a developer jump was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DevJumpError {
    #[error("Developer tools are disabled")]
    Disabled,
    #[error("Enter a valid scene ID, got {0:?}")]
    InvalidId(String),
    #[error("Scene {0} is not part of this chapter")]
    NotLoaded(SceneId),
}

pub struct BookSession {
    engine: GameEngine,
    animator: PageAnimator,
    registry: ResourceRegistry,
    handlers: SceneHandlers,
    dev_tools_enabled: bool,
}

impl BookSession {
    pub fn new(
        engine: GameEngine,
        animator: PageAnimator,
        registry: ResourceRegistry,
        dev_tools_enabled: bool,
    ) -> Self {
        Self {
            engine,
            animator,
            registry,
            handlers: SceneHandlers::default(),
            dev_tools_enabled,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    pub fn animator(&self) -> &PageAnimator {
        &self.animator
    }

    pub fn dev_tools_enabled(&self) -> bool {
        self.dev_tools_enabled
    }

    pub async fn open_chapter(&mut self, chapter_id: ChapterId) {
        self.engine.load_chapter(chapter_id).await;
    }

    /// The view replacing the book for the current scene, if any.
    pub fn current_view(&self) -> Option<SceneView> {
        dispatch(self.engine.current_scene(), &self.handlers, &self.registry)
    }

    /// Page forward.
    ///
    /// Refused while a page is turning or choices are pending. Special
    /// destinations are entered without the page-turn animation.
    pub async fn next_page(&mut self) -> bool {
        if self.animator.is_animating() || !self.engine.can_go_next() {
            return false;
        }

        let skip_animation = match self.engine.get_next_scene() {
            Some(next) => GameEngine::is_special_scene_type(next.scene_type()),
            // Let the engine report the missing link.
            None => return self.engine.go_to_next_scene(),
        };

        if !skip_animation && !self.animator.turn_forward().await {
            return false;
        }
        self.engine.go_to_next_scene()
    }

    /// Page backward. Purely visual; the book has no history to go back to.
    pub async fn previous_page(&self) -> bool {
        self.animator.turn_backward().await
    }

    /// Select one of the current choices.
    ///
    /// Obligatory choices into non-special scenes turn the page first;
    /// conversational replies are appended immediately.
    pub async fn select_choice(&mut self, choice_id: ChoiceId) -> bool {
        let Some(choice) = self
            .engine
            .current_choices()
            .iter()
            .find(|c| c.id() == choice_id)
            .cloned()
        else {
            tracing::warn!(choice_id = %choice_id, "Choice is not on the current page");
            return false;
        };

        if choice.is_obligatory() {
            if self.animator.is_animating() {
                return false;
            }
            let destination_type = choice.destination_type().cloned().or_else(|| {
                self.engine
                    .get_scene_by_id(choice.destination_scene_id())
                    .map(|s| s.scene_type().clone())
            });
            let animate = !destination_type
                .as_ref()
                .is_some_and(GameEngine::is_special_scene_type);
            if animate && !self.animator.turn_forward().await {
                return false;
            }
        }

        self.engine.handle_choice_select(&choice).is_applied()
    }

    /// Carry out a view's completion action.
    pub fn resolve(&mut self, action: ViewAction) -> bool {
        match action {
            ViewAction::NextScene => self.engine.go_to_next_scene(),
            ViewAction::GoTo(id) => self.engine.navigate_to_scene(id),
            ViewAction::GameOver => self.engine.navigate_to_scene(GAME_OVER_SCENE_ID),
        }
    }

    /// Run the current special view, if any, and resolve its outcome.
    pub async fn run_special_view(&mut self) -> Option<ViewAction> {
        let Some(SceneView::Special { view, .. }) = self.current_view() else {
            return None;
        };
        let scene = self.engine.current_scene()?.clone();
        let outcome = view.run(&scene).await;
        let action = self.current_view()?.action_for(outcome)?;
        self.resolve(action);
        Some(action)
    }

    /// Developer jump from free-form input.
    pub fn dev_jump(&mut self, input: &str) -> Result<SceneId, DevJumpError> {
        if !self.dev_tools_enabled {
            return Err(DevJumpError::Disabled);
        }
        let id = input
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(SceneId::new)
            .ok_or_else(|| DevJumpError::InvalidId(input.trim().to_string()))?;

        if self.engine.jump_to_scene(id) {
            Ok(id)
        } else {
            Err(DevJumpError::NotLoaded(id))
        }
    }

    /// Destination type of the next linear page, for rendering hints.
    pub fn next_scene_type(&self) -> Option<&SceneType> {
        self.engine.get_next_scene().map(|s| s.scene_type())
    }
}
