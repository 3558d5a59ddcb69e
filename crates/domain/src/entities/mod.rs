//! Domain entities - Core game objects with identity

mod combat;
mod hero;
mod scene;

pub use combat::{BaseStats, CombatData, CombatPhase, Enemy, EnemySkill, Reward, RewardStats};
pub use hero::{default_skill_tree, Hero, SkillTreeNode};
pub use scene::{Choice, ChoiceKind, DestinationScene, Scene, SceneImage, SceneMode, SceneType};
