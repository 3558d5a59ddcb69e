//! Talebook domain vocabulary.
//!
//! Scene graph types as served by the scene provider, game-setup rules, and
//! the wire types of the combat and hero endpoints. No I/O lives here.

extern crate self as talebook_domain;

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;

pub use entities::{
    default_skill_tree, BaseStats, Choice, ChoiceKind, CombatData, CombatPhase,
    DestinationScene, Enemy, EnemySkill, Hero, Reward, RewardStats, Scene, SceneImage, SceneMode,
    SceneType, SkillTreeNode,
};

pub use aggregates::{GameSetup, HeroSelection, Player};
pub use error::DomainError;
pub use ids::{ChapterId, ChoiceId, SceneId, GAME_OVER_SCENE_ID};
