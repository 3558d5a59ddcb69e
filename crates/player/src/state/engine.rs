//! Game engine - owns the navigation state of the open chapter.
//!
//! Every mutation goes through [`reduce`]; the engine adds the side effects
//! around it: fetching the chapter, logging rejected events and keeping the
//! image timer in step with the current scene and image.

use std::sync::Arc;

use talebook_domain::{ChapterId, Choice, Scene, SceneId, SceneType};

use crate::ports::outbound::SceneProviderPort;
use crate::state::image_sequencer::ImageSequencer;
use crate::state::navigation::{
    reduce, GameEngineState, NavigationEvent, Rejection, Transition, LOAD_FAILED_MESSAGE,
};

/// What selecting a choice did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// Entered the destination scene. Carries the choice's declared
    /// destination type, if any.
    Navigated(Option<SceneType>),
    /// The reply was appended to the current page.
    Replied,
    /// The choice was rejected; nothing changed.
    Ignored,
}

impl ChoiceOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Navigation engine for one book.
pub struct GameEngine {
    provider: Arc<dyn SceneProviderPort>,
    image_base_url: String,
    state: GameEngineState,
    sequencer: ImageSequencer,
}

impl GameEngine {
    pub fn new(provider: Arc<dyn SceneProviderPort>, image_base_url: impl Into<String>) -> Self {
        Self {
            provider,
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
            state: GameEngineState::default(),
            sequencer: ImageSequencer::new(),
        }
    }

    // =========================================================================
    // Read side
    // =========================================================================

    pub fn state(&self) -> &GameEngineState {
        &self.state
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.state.current_scene()
    }

    pub fn accumulated_text(&self) -> &[String] {
        self.state.accumulated_text()
    }

    pub fn current_choices(&self) -> &[Choice] {
        self.state.current_choices()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn can_go_next(&self) -> bool {
        self.state.can_go_next()
    }

    pub fn get_scene_by_id(&self, id: SceneId) -> Option<&Scene> {
        self.state.scene(id)
    }

    /// The scene linear paging would land on.
    pub fn get_next_scene(&self) -> Option<&Scene> {
        let next = self.state.current_scene()?.next_scene_id()?;
        self.state.scene(next)
    }

    /// Whether `scene_type` is rendered by a dedicated view.
    pub fn is_special_scene_type(scene_type: &SceneType) -> bool {
        scene_type.is_special()
    }

    /// Absolute URL of the image on display.
    pub fn current_image_url(&self) -> Option<String> {
        let image = self.state.current_image()?;
        Some(format!("{}{}", self.image_base_url, image.path))
    }

    /// Whether an image timer is armed.
    pub fn image_timer_pending(&self) -> bool {
        self.sequencer.is_pending()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Fetch a chapter and enter its first scene.
    ///
    /// Failures are reported through [`GameEngine::error`], never returned.
    pub async fn load_chapter(&mut self, chapter_id: ChapterId) {
        self.apply(NavigationEvent::LoadStarted);

        let event = match self.provider.chapter_scenes(chapter_id).await {
            Ok(scenes) => {
                tracing::info!(
                    chapter_id = %chapter_id,
                    scene_count = scenes.len(),
                    "Chapter loaded"
                );
                NavigationEvent::ChapterLoaded(scenes)
            }
            Err(e) => {
                tracing::error!(chapter_id = %chapter_id, error = %e, "Failed to load chapter");
                NavigationEvent::ChapterFailed(LOAD_FAILED_MESSAGE.to_string())
            }
        };
        self.apply(event);
    }

    pub fn navigate_to_scene(&mut self, id: SceneId) -> bool {
        self.apply(NavigationEvent::NavigateTo(id))
    }

    /// Apply a choice.
    ///
    /// A choice looping back to the current scene still counts as navigated,
    /// even though the state comes out identical.
    pub fn handle_choice_select(&mut self, choice: &Choice) -> ChoiceOutcome {
        if !self.apply(NavigationEvent::SelectChoice(choice.clone())) {
            return ChoiceOutcome::Ignored;
        }
        if choice.is_obligatory() {
            ChoiceOutcome::Navigated(choice.destination_type().cloned())
        } else {
            ChoiceOutcome::Replied
        }
    }

    pub fn go_to_next_scene(&mut self) -> bool {
        self.apply(NavigationEvent::NextScene)
    }

    /// Developer jump to any loaded scene.
    ///
    /// The image timer is stopped first. When the jump is rejected it is
    /// re-armed for the unchanged scene with its original deadline.
    pub fn jump_to_scene(&mut self, id: SceneId) -> bool {
        let held = self.sequencer.deadline();
        self.sequencer.cancel();
        let jumped = self.apply(NavigationEvent::Jump(id));
        if jumped {
            tracing::info!(scene_id = %id, "Jumped to scene");
        } else if let Some(deadline) = held {
            self.sequencer.resume(
                self.state.current_scene(),
                self.state.current_image_index(),
                deadline,
            );
        }
        jumped
    }

    /// Wait for the image timer and apply the advance.
    ///
    /// Returns the new image index. Pends forever when no timer is armed.
    pub async fn next_image_advance(&mut self) -> Option<usize> {
        let fired = self.sequencer.fired().await;
        let applied = self.apply(NavigationEvent::AdvanceImage {
            scene_id: fired.scene_id,
            from_index: fired.from_index,
        });
        applied.then(|| self.state.current_image_index())
    }

    fn apply(&mut self, event: NavigationEvent) -> bool {
        let before = self.state.image_position();
        let resets = event.resets_scene();

        match reduce(&self.state, event) {
            Transition::Applied(next) => {
                self.state = next;
                if resets || self.state.image_position() != before {
                    self.rearm_images();
                }
                true
            }
            Transition::Rejected(rejection) => {
                log_rejection(&rejection);
                false
            }
        }
    }

    fn rearm_images(&mut self) {
        self.sequencer.reschedule(
            self.state.current_scene(),
            self.state.current_image_index(),
        );
    }
}

fn log_rejection(rejection: &Rejection) {
    match rejection {
        Rejection::StaleImageAdvance { .. } => tracing::debug!("{rejection}"),
        r if r.is_warning() => tracing::warn!("{rejection}"),
        _ => tracing::error!("{rejection}"),
    }
}
