//! Book state
//!
//! The navigation engine and the pieces it drives: the pure reducer, the
//! image timer, the page-turn gate and the scene-type dispatcher.

pub mod engine;
pub mod image_sequencer;
pub mod navigation;
pub mod page_animation;
pub mod scene_dispatch;

pub use engine::{ChoiceOutcome, GameEngine};
pub use image_sequencer::{ImageAdvance, ImageSequencer};
pub use navigation::{
    reduce, GameEngineState, NavigationEvent, Rejection, Transition, LOAD_FAILED_MESSAGE,
    NO_SCENES_MESSAGE,
};
pub use page_animation::{PageAnimationState, PageAnimator};
pub use scene_dispatch::{
    dispatch, ResourceRegistry, SceneHandlers, SceneView, SpecialSceneView, ViewAction,
    ViewOutcome, VIDEO_WEAPON_SELECTION,
};
