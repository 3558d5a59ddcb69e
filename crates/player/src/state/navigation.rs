//! Navigation state and its transition function.
//!
//! `GameEngineState` only changes through [`reduce`], which maps a state and one
//! [`NavigationEvent`] to either a complete new state or a [`Rejection`]. A
//! rejected event leaves the state exactly as it was, so a malformed scene
//! graph stalls playback instead of corrupting it.

use std::collections::HashMap;
use std::sync::Arc;

use talebook_domain::{Choice, ChoiceId, ChoiceKind, Scene, SceneId, SceneImage};
use thiserror::Error;

/// Message surfaced when the provider returns an empty chapter.
pub const NO_SCENES_MESSAGE: &str = "No scenes found in this chapter";

/// Message surfaced when the chapter could not be fetched or decoded.
pub const LOAD_FAILED_MESSAGE: &str = "Error loading chapter data";

/// Everything the book shows for the current chapter.
///
/// The loaded chapter is shared between states, so a transition only copies
/// the page being shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameEngineState {
    scenes: Arc<HashMap<SceneId, Arc<Scene>>>,
    chapter_order: Arc<Vec<SceneId>>,
    current_scene: Option<Arc<Scene>>,
    current_image_index: usize,
    accumulated_text: Vec<String>,
    current_choices: Vec<Choice>,
    is_loading: bool,
    error: Option<String>,
}

impl GameEngineState {
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(&id).map(Arc::as_ref)
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Scene ids in the order the provider returned them.
    pub fn chapter_order(&self) -> &[SceneId] {
        &self.chapter_order
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.current_scene.as_deref()
    }

    pub fn current_image_index(&self) -> usize {
        self.current_image_index
    }

    /// Every paragraph shown since the current scene was entered.
    pub fn accumulated_text(&self) -> &[String] {
        &self.accumulated_text
    }

    pub fn current_choices(&self) -> &[Choice] {
        &self.current_choices
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Forward paging is only possible once every choice is resolved.
    pub fn can_go_next(&self) -> bool {
        self.current_choices.is_empty()
    }

    /// The image at the current index, in sort order.
    pub fn current_image(&self) -> Option<&SceneImage> {
        self.current_scene
            .as_ref()?
            .sorted_images()
            .get(self.current_image_index)
            .copied()
    }

    /// Identity of what the image sequencer is timing.
    pub fn image_position(&self) -> Option<(SceneId, usize)> {
        self.current_scene
            .as_ref()
            .map(|scene| (scene.id(), self.current_image_index))
    }

    /// Full reset onto `scene`: new text, its choices, first image.
    fn enter(&self, scene: Arc<Scene>) -> Self {
        Self {
            scenes: Arc::clone(&self.scenes),
            chapter_order: Arc::clone(&self.chapter_order),
            current_image_index: 0,
            accumulated_text: vec![scene.text().to_string()],
            current_choices: scene.choices().to_vec(),
            current_scene: Some(scene),
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }
}

/// The closed set of things that can happen to the navigation state.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// A chapter fetch began.
    LoadStarted,
    /// The provider returned these scenes, in chapter order.
    ChapterLoaded(Vec<Scene>),
    /// The fetch failed; the message is shown to the player.
    ChapterFailed(String),
    /// Hard navigation to a loaded scene.
    NavigateTo(SceneId),
    /// The player picked a choice.
    SelectChoice(Choice),
    /// Linear paging through `next_scene_id`.
    NextScene,
    /// The image timer for `(scene_id, from_index)` elapsed.
    AdvanceImage { scene_id: SceneId, from_index: usize },
    /// Developer jump; bypasses narrative legality.
    Jump(SceneId),
}

impl NavigationEvent {
    /// Whether applying this event restarts the image sequence.
    pub fn resets_scene(&self) -> bool {
        match self {
            Self::ChapterLoaded(_) | Self::NavigateTo(_) | Self::NextScene | Self::Jump(_) => true,
            Self::SelectChoice(choice) => choice.is_obligatory(),
            Self::LoadStarted | Self::ChapterFailed(_) | Self::AdvanceImage { .. } => false,
        }
    }
}

/// Why an event was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Scene with ID {0} not found")]
    SceneNotFound(SceneId),
    #[error("No destination scene data for non-obligatory choice {0}")]
    MissingDestination(ChoiceId),
    #[error("Cannot navigate forward: scene has choices")]
    ChoicesPending,
    #[error("No next scene available")]
    NoNextScene,
    #[error("Image advance for scene {scene_id} at index {from_index} is stale")]
    StaleImageAdvance { scene_id: SceneId, from_index: usize },
}

impl Rejection {
    /// Illegal paging is expected UI noise; the rest point at bad content.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::ChoicesPending | Self::NoNextScene)
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Applied(GameEngineState),
    Rejected(Rejection),
}

/// Apply `event` to `state`.
pub fn reduce(state: &GameEngineState, event: NavigationEvent) -> Transition {
    match event {
        NavigationEvent::LoadStarted => Transition::Applied(GameEngineState {
            is_loading: true,
            error: None,
            ..state.clone()
        }),

        NavigationEvent::ChapterLoaded(scenes) => Transition::Applied(load(state, scenes)),

        NavigationEvent::ChapterFailed(message) => Transition::Applied(GameEngineState {
            is_loading: false,
            error: Some(message),
            ..state.clone()
        }),

        NavigationEvent::NavigateTo(id) | NavigationEvent::Jump(id) => navigate(state, id),

        NavigationEvent::SelectChoice(choice) => match choice.kind() {
            ChoiceKind::Navigate { destination, .. } => navigate(state, destination),
            ChoiceKind::Converse(reply) => {
                let mut next = state.clone();
                next.accumulated_text.push(reply.scene_text.clone());
                next.current_choices = reply.choices.clone();
                Transition::Applied(next)
            }
            ChoiceKind::Inert => Transition::Rejected(Rejection::MissingDestination(choice.id())),
        },

        NavigationEvent::NextScene => {
            if !state.can_go_next() {
                return Transition::Rejected(Rejection::ChoicesPending);
            }
            match state.current_scene().and_then(Scene::next_scene_id) {
                Some(next) => navigate(state, next),
                None => Transition::Rejected(Rejection::NoNextScene),
            }
        }

        NavigationEvent::AdvanceImage {
            scene_id,
            from_index,
        } => {
            let stale = Transition::Rejected(Rejection::StaleImageAdvance {
                scene_id,
                from_index,
            });
            let Some(scene) = state.current_scene.as_ref() else {
                return stale;
            };
            let is_current = scene.id() == scene_id && state.current_image_index == from_index;
            if !is_current || from_index + 1 >= scene.images().len() {
                return stale;
            }
            Transition::Applied(GameEngineState {
                current_image_index: from_index + 1,
                ..state.clone()
            })
        }
    }
}

fn navigate(state: &GameEngineState, id: SceneId) -> Transition {
    match state.scenes.get(&id) {
        Some(scene) => Transition::Applied(state.enter(Arc::clone(scene))),
        None => Transition::Rejected(Rejection::SceneNotFound(id)),
    }
}

fn load(state: &GameEngineState, scenes: Vec<Scene>) -> GameEngineState {
    let mut by_id = HashMap::with_capacity(scenes.len());
    let mut chapter_order = Vec::with_capacity(scenes.len());
    let mut first = None;
    for scene in scenes {
        // First occurrence of a duplicated id wins.
        if by_id.contains_key(&scene.id()) {
            continue;
        }
        let scene = Arc::new(scene);
        if first.is_none() {
            first = Some(Arc::clone(&scene));
        }
        chapter_order.push(scene.id());
        by_id.insert(scene.id(), scene);
    }

    let Some(first) = first else {
        return GameEngineState {
            is_loading: false,
            error: Some(NO_SCENES_MESSAGE.to_string()),
            ..state.clone()
        };
    };

    let fresh = GameEngineState {
        scenes: Arc::new(by_id),
        chapter_order: Arc::new(chapter_order),
        ..GameEngineState::default()
    };
    fresh.enter(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{
        conversation_chapter, linear_chapter, scene_with_images,
    };
    use talebook_domain::DestinationScene;

    fn loaded(scenes: Vec<Scene>) -> GameEngineState {
        match reduce(&GameEngineState::default(), NavigationEvent::ChapterLoaded(scenes)) {
            Transition::Applied(state) => state,
            Transition::Rejected(r) => panic!("load rejected: {r}"),
        }
    }

    fn applied(state: &GameEngineState, event: NavigationEvent) -> GameEngineState {
        match reduce(state, event) {
            Transition::Applied(next) => next,
            Transition::Rejected(r) => panic!("unexpected rejection: {r}"),
        }
    }

    fn rejected(state: &GameEngineState, event: NavigationEvent) -> Rejection {
        match reduce(state, event) {
            Transition::Applied(_) => panic!("expected rejection"),
            Transition::Rejected(r) => r,
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn load_enters_first_scene() {
        let state = loaded(linear_chapter());

        let current = state.current_scene().expect("current scene");
        assert_eq!(current.id(), SceneId::new(1));
        assert_eq!(state.accumulated_text(), ["A"]);
        assert!(state.current_choices().is_empty());
        assert_eq!(state.current_image_index(), 0);
        assert!(!state.is_loading());
        assert_eq!(state.error(), None);
        assert_eq!(state.chapter_order(), [SceneId::new(1), SceneId::new(2)]);
    }

    #[test]
    fn load_started_clears_error_and_keeps_content() {
        let state = loaded(linear_chapter());
        let failed = applied(&state, NavigationEvent::ChapterFailed("boom".into()));
        let restarted = applied(&failed, NavigationEvent::LoadStarted);

        assert!(restarted.is_loading());
        assert_eq!(restarted.error(), None);
        assert_eq!(restarted.current_scene(), state.current_scene());
    }

    #[test]
    fn empty_chapter_sets_error() {
        let state = loaded(vec![]);
        assert_eq!(state.error(), Some(NO_SCENES_MESSAGE));
        assert!(state.current_scene().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn transitions_share_loaded_chapter() {
        let state = loaded(linear_chapter());
        let next = applied(&state, NavigationEvent::NextScene);

        assert!(Arc::ptr_eq(&state.scenes, &next.scenes));
        assert!(Arc::ptr_eq(&state.chapter_order, &next.chapter_order));
        let entered = next.current_scene.as_ref().expect("current scene");
        assert!(Arc::ptr_eq(entered, &state.scenes[&SceneId::new(2)]));
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let state = loaded(vec![
            Scene::new(SceneId::new(1), "first"),
            Scene::new(SceneId::new(1), "second"),
        ]);
        assert_eq!(state.scene_count(), 1);
        assert_eq!(state.scene(SceneId::new(1)).map(Scene::text), Some("first"));
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[test]
    fn navigate_to_unknown_scene_is_rejected() {
        let state = loaded(linear_chapter());
        assert_eq!(
            rejected(&state, NavigationEvent::NavigateTo(SceneId::new(404))),
            Rejection::SceneNotFound(SceneId::new(404))
        );
    }

    #[test]
    fn navigate_is_idempotent() {
        let state = loaded(linear_chapter());
        let once = applied(&state, NavigationEvent::NavigateTo(SceneId::new(2)));
        let twice = applied(&once, NavigationEvent::NavigateTo(SceneId::new(2)));
        assert_eq!(once, twice);
    }

    #[test]
    fn navigating_to_first_scene_round_trips_load() {
        let state = loaded(linear_chapter());
        let back = applied(&state, NavigationEvent::NavigateTo(SceneId::new(1)));
        assert_eq!(back, state);
    }

    #[test]
    fn next_scene_follows_link_when_no_choices() {
        let state = loaded(linear_chapter());
        let next = applied(&state, NavigationEvent::NextScene);

        assert_eq!(next.current_scene().map(Scene::id), Some(SceneId::new(2)));
        assert_eq!(next.accumulated_text(), ["B"]);
        assert!(!next.can_go_next());
    }

    #[test]
    fn next_scene_rejected_while_choices_pending() {
        let state = applied(
            &loaded(linear_chapter()),
            NavigationEvent::NavigateTo(SceneId::new(2)),
        );
        let rejection = rejected(&state, NavigationEvent::NextScene);
        assert_eq!(rejection, Rejection::ChoicesPending);
        assert!(rejection.is_warning());
    }

    #[test]
    fn next_scene_rejected_without_link() {
        let state = loaded(vec![Scene::new(SceneId::new(1), "the end")]);
        assert_eq!(
            rejected(&state, NavigationEvent::NextScene),
            Rejection::NoNextScene
        );
    }

    #[test]
    fn choices_always_block_paging() {
        for scene in conversation_chapter() {
            let state = applied(
                &loaded(conversation_chapter()),
                NavigationEvent::NavigateTo(scene.id()),
            );
            assert_eq!(state.can_go_next(), !scene.has_choices(), "scene {}", scene.id());
        }
    }

    #[test]
    fn jump_reaches_any_loaded_scene() {
        let state = loaded(linear_chapter());
        let jumped = applied(&state, NavigationEvent::Jump(SceneId::new(2)));
        assert_eq!(jumped.current_scene().map(Scene::id), Some(SceneId::new(2)));
        assert_eq!(
            rejected(&state, NavigationEvent::Jump(SceneId::new(9999))),
            Rejection::SceneNotFound(SceneId::new(9999))
        );
    }

    // =========================================================================
    // Choices
    // =========================================================================

    #[test]
    fn obligatory_choice_resets_to_destination() {
        let state = applied(
            &loaded(linear_chapter()),
            NavigationEvent::NavigateTo(SceneId::new(2)),
        );
        let choice = state.current_choices()[0].clone();
        let next = applied(&state, NavigationEvent::SelectChoice(choice));

        assert_eq!(next.current_scene().map(Scene::id), Some(SceneId::new(1)));
        assert_eq!(next.accumulated_text(), ["A"]);
    }

    #[test]
    fn conversational_choice_appends_in_place() {
        let state = loaded(conversation_chapter());
        let with_image = GameEngineState {
            current_image_index: 1,
            ..state
        };
        let choice = with_image.current_choices()[0].clone();
        let reply_text = choice
            .destination_scene()
            .map(|d| d.scene_text.clone())
            .expect("embedded reply");

        let next = applied(&with_image, NavigationEvent::SelectChoice(choice));

        assert_eq!(
            next.accumulated_text().len(),
            with_image.accumulated_text().len() + 1
        );
        assert_eq!(next.accumulated_text().last(), Some(&reply_text));
        assert_eq!(next.current_scene(), with_image.current_scene());
        assert_eq!(next.current_image_index(), 1);
        assert_eq!(next.current_choices().len(), 1);
    }

    #[test]
    fn conversational_choice_without_reply_is_rejected() {
        let state = loaded(conversation_chapter());
        let broken = state.current_choices()[0]
            .clone()
            .without_destination_scene();
        assert_eq!(
            rejected(&state, NavigationEvent::SelectChoice(broken.clone())),
            Rejection::MissingDestination(broken.id())
        );
    }

    #[test]
    fn reply_without_choices_unblocks_paging() {
        let state = loaded(vec![Scene::new(SceneId::new(1), "Hello?")
            .with_next(SceneId::new(2))
            .with_choice(Choice::converse(
                ChoiceId::new(1),
                "Wave",
                DestinationScene {
                    id: SceneId::new(50),
                    scene_text: "Nobody answers.".into(),
                    choices: vec![],
                },
            ))]);
        assert!(!state.can_go_next());

        let choice = state.current_choices()[0].clone();
        let next = applied(&state, NavigationEvent::SelectChoice(choice));
        assert!(next.can_go_next());
        assert_eq!(next.accumulated_text(), ["Hello?", "Nobody answers."]);
    }

    // =========================================================================
    // Images
    // =========================================================================

    #[test]
    fn advance_image_moves_one_step() {
        let state = loaded(vec![scene_with_images(SceneId::new(1))]);
        let next = applied(
            &state,
            NavigationEvent::AdvanceImage {
                scene_id: SceneId::new(1),
                from_index: 0,
            },
        );
        assert_eq!(next.current_image_index(), 1);
        assert_eq!(next.current_image().map(|i| i.sort_order), Some(2));
    }

    #[test]
    fn advance_image_rejects_stale_and_final() {
        let state = loaded(vec![
            scene_with_images(SceneId::new(1)),
            Scene::new(SceneId::new(2), "other"),
        ]);

        let wrong_scene = NavigationEvent::AdvanceImage {
            scene_id: SceneId::new(2),
            from_index: 0,
        };
        assert!(matches!(
            rejected(&state, wrong_scene),
            Rejection::StaleImageAdvance { .. }
        ));

        let last = applied(
            &state,
            NavigationEvent::AdvanceImage {
                scene_id: SceneId::new(1),
                from_index: 0,
            },
        );
        let past_end = NavigationEvent::AdvanceImage {
            scene_id: SceneId::new(1),
            from_index: 1,
        };
        assert!(matches!(
            rejected(&last, past_end),
            Rejection::StaleImageAdvance { .. }
        ));
    }

    #[test]
    fn reset_events_are_flagged() {
        assert!(NavigationEvent::Jump(SceneId::new(1)).resets_scene());
        assert!(NavigationEvent::NextScene.resets_scene());
        assert!(!NavigationEvent::LoadStarted.resets_scene());
        let talk = conversation_chapter()[0].choices()[0].clone();
        assert!(!NavigationEvent::SelectChoice(talk).resets_scene());
    }
}
