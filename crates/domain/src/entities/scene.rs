//! Scene graph entities as delivered by the scene provider.
//!
//! A chapter is a flat list of scenes linked by `nextSceneId` (linear paging)
//! and by choices (branching). Scenes are immutable once loaded.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ChoiceId, SceneId};

/// Scene-type tag selecting which view, if any, overrides the narrative layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SceneType {
    #[default]
    Main,
    Fight,
    Special,
    Table,
    End,
    /// Any tag this client does not know. Rendered as a main scene.
    Other(String),
}

impl SceneType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "" | "MAIN" => Self::Main,
            "FGHT" => Self::Fight,
            "SPEC" => Self::Special,
            "TABL" => Self::Table,
            "END" => Self::End,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::Main => "MAIN",
            Self::Fight => "FGHT",
            Self::Special => "SPEC",
            Self::Table => "TABL",
            Self::End => "END",
            Self::Other(tag) => tag,
        }
    }

    /// Whether the destination view manages its own transition.
    ///
    /// Special types skip the generic page-turn animation. `GAME` is an
    /// authored tag without a dedicated variant.
    pub fn is_special(&self) -> bool {
        match self {
            Self::Fight | Self::Special | Self::Table | Self::End => true,
            Self::Other(tag) => tag == "GAME",
            Self::Main => false,
        }
    }
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl Serialize for SceneType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for SceneType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.map(|t| Self::from_tag(&t)).unwrap_or_default())
    }
}

/// Typed view of a scene, carrying only what its mode needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneMode<'a> {
    Main,
    Fight,
    Special { resource: Option<&'a str> },
    Table { resource: Option<&'a str> },
    End,
    Unknown { tag: &'a str },
}

/// One image in a scene's illustration sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneImage {
    pub path: String,
    pub sort_order: i32,
    /// Display time in seconds. `None` or non-positive marks a resting frame.
    #[serde(default)]
    pub time_out: Option<f64>,
}

impl SceneImage {
    pub fn new(path: impl Into<String>, sort_order: i32, time_out: Option<f64>) -> Self {
        Self {
            path: path.into(),
            sort_order,
            time_out,
        }
    }

    /// How long this image stays up before the sequence advances.
    ///
    /// A timeout too large to represent as a [`Duration`] is a resting frame.
    pub fn display_duration(&self) -> Option<Duration> {
        self.time_out
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

/// Embedded partial scene carried by a conversational choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationScene {
    pub id: SceneId,
    pub scene_text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub choices: Vec<Choice>,
}

/// A player-facing option on a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    choice_id: ChoiceId,
    choice_text: String,
    destination_scene_id: SceneId,
    #[serde(default)]
    obligatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    destination_type: Option<SceneType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    destination_scene: Option<Box<DestinationScene>>,
}

/// What selecting a choice does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChoiceKind<'a> {
    /// Hard navigation to another scene.
    Navigate {
        destination: SceneId,
        destination_type: Option<&'a SceneType>,
    },
    /// Conversational reply appended in place.
    Converse(&'a DestinationScene),
    /// Conversational choice without embedded data. Selecting it does nothing.
    Inert,
}

impl Choice {
    /// An obligatory choice navigating to `destination`.
    pub fn navigate(choice_id: ChoiceId, text: impl Into<String>, destination: SceneId) -> Self {
        Self {
            choice_id,
            choice_text: text.into(),
            destination_scene_id: destination,
            obligatory: true,
            destination_type: None,
            destination_scene: None,
        }
    }

    /// A conversational choice whose reply is embedded.
    pub fn converse(choice_id: ChoiceId, text: impl Into<String>, reply: DestinationScene) -> Self {
        Self {
            choice_id,
            choice_text: text.into(),
            destination_scene_id: reply.id,
            obligatory: false,
            destination_type: None,
            destination_scene: Some(Box::new(reply)),
        }
    }

    pub fn with_destination_type(mut self, scene_type: SceneType) -> Self {
        self.destination_type = Some(scene_type);
        self
    }

    pub fn without_destination_scene(mut self) -> Self {
        self.destination_scene = None;
        self
    }

    #[inline]
    pub fn id(&self) -> ChoiceId {
        self.choice_id
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.choice_text
    }

    #[inline]
    pub fn destination_scene_id(&self) -> SceneId {
        self.destination_scene_id
    }

    #[inline]
    pub fn is_obligatory(&self) -> bool {
        self.obligatory
    }

    #[inline]
    pub fn destination_type(&self) -> Option<&SceneType> {
        self.destination_type.as_ref()
    }

    #[inline]
    pub fn destination_scene(&self) -> Option<&DestinationScene> {
        self.destination_scene.as_deref()
    }

    pub fn kind(&self) -> ChoiceKind<'_> {
        if self.obligatory {
            return ChoiceKind::Navigate {
                destination: self.destination_scene_id,
                destination_type: self.destination_type.as_ref(),
            };
        }
        match self.destination_scene.as_deref() {
            Some(reply) => ChoiceKind::Converse(reply),
            None => ChoiceKind::Inert,
        }
    }
}

/// One narrative unit of a chapter.
///
/// # Invariants
///
/// - A scene with choices is never advanced through `next_scene_id`; the
///   choices must be resolved first.
///
/// # Example
///
/// ```
/// use talebook_domain::{Choice, ChoiceId, Scene, SceneId};
///
/// let scene = Scene::new(SceneId::new(1), "The road forks.")
///     .with_choice(Choice::navigate(ChoiceId::new(1), "Go left", SceneId::new(2)));
///
/// assert!(scene.has_choices());
/// assert_eq!(scene.id(), SceneId::new(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    id: SceneId,
    #[serde(default)]
    scene_type: SceneType,
    #[serde(default)]
    scene_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_scene_id: Option<SceneId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    choices: Vec<Choice>,
    #[serde(default, deserialize_with = "null_as_empty")]
    images: Vec<SceneImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chapter_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scene_location: Option<String>,
}

impl Scene {
    pub fn new(id: SceneId, scene_text: impl Into<String>) -> Self {
        Self {
            id,
            scene_type: SceneType::Main,
            scene_text: scene_text.into(),
            next_scene_id: None,
            choices: Vec::new(),
            images: Vec::new(),
            resource: None,
            chapter_description: None,
            scene_location: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> SceneId {
        self.id
    }

    #[inline]
    pub fn scene_type(&self) -> &SceneType {
        &self.scene_type
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.scene_text
    }

    #[inline]
    pub fn next_scene_id(&self) -> Option<SceneId> {
        self.next_scene_id
    }

    #[inline]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[inline]
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    #[inline]
    pub fn images(&self) -> &[SceneImage] {
        &self.images
    }

    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    #[inline]
    pub fn chapter_description(&self) -> Option<&str> {
        self.chapter_description.as_deref()
    }

    #[inline]
    pub fn scene_location(&self) -> Option<&str> {
        self.scene_location.as_deref()
    }

    /// Images in presentation order. The provider does not sort them.
    pub fn sorted_images(&self) -> Vec<&SceneImage> {
        let mut images: Vec<&SceneImage> = self.images.iter().collect();
        images.sort_by_key(|image| image.sort_order);
        images
    }

    pub fn mode(&self) -> SceneMode<'_> {
        let resource = self.resource.as_deref();
        match &self.scene_type {
            SceneType::Main => SceneMode::Main,
            SceneType::Fight => SceneMode::Fight,
            SceneType::Special => SceneMode::Special { resource },
            SceneType::Table => SceneMode::Table { resource },
            SceneType::End => SceneMode::End,
            SceneType::Other(tag) => SceneMode::Unknown { tag },
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_type(mut self, scene_type: SceneType) -> Self {
        self.scene_type = scene_type;
        self
    }

    pub fn with_next(mut self, next: SceneId) -> Self {
        self.next_scene_id = Some(next);
        self
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_image(mut self, image: SceneImage) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
