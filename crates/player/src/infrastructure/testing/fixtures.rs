//! Simple test fixtures used across unit tests.

use talebook_domain::{Choice, ChoiceId, DestinationScene, Scene, SceneId, SceneImage, SceneType};

use crate::ports::outbound::ApiError;

pub fn api_request_failed(msg: &str) -> ApiError {
    ApiError::RequestFailed(msg.to_string())
}

/// `1 --next--> 2`, and scene 2 offers an obligatory choice back to 1.
pub fn linear_chapter() -> Vec<Scene> {
    vec![
        Scene::new(SceneId::new(1), "A").with_next(SceneId::new(2)),
        Scene::new(SceneId::new(2), "B").with_choice(Choice::navigate(
            ChoiceId::new(9),
            "Back",
            SceneId::new(1),
        )),
    ]
}

/// Scene 1 opens a conversation whose reply offers one exit to scene 2.
pub fn conversation_chapter() -> Vec<Scene> {
    let reply = DestinationScene {
        id: SceneId::new(100),
        scene_text: "The innkeeper shrugs.".to_string(),
        choices: vec![Choice::navigate(ChoiceId::new(2), "Leave", SceneId::new(2))],
    };
    vec![
        Scene::new(SceneId::new(1), "You enter the inn.")
            .with_choice(Choice::converse(ChoiceId::new(1), "Ask about the road", reply)),
        Scene::new(SceneId::new(2), "The road is quiet.").with_next(SceneId::new(3)),
        Scene::new(SceneId::new(3), "A fight breaks out.").with_type(SceneType::Fight),
    ]
}

/// Two images: a 3 second frame followed by a resting frame. Listed out of order.
pub fn scene_with_images(id: SceneId) -> Scene {
    Scene::new(id, "The sun rises.")
        .with_image(SceneImage::new("/img/noon.jpg", 2, None))
        .with_image(SceneImage::new("/img/dawn.jpg", 1, Some(3.0)))
}
