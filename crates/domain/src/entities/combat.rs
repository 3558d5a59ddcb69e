//! Combat encounter data attached to fight scenes.

use serde::{Deserialize, Serialize};

/// Stat line shared by enemies and heroes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub physical_attack: i32,
    pub magic_attack: i32,
    pub evasion: i32,
    pub mana: i32,
    pub vitality: i32,
    pub physical_defense: i32,
    pub magic_defense: i32,
    pub movement: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemySkill {
    pub name: String,
    pub description: String,
    pub uses: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_boss: bool,
    pub exp_points: u32,
    pub image_path: String,
    pub stats: BaseStats,
    #[serde(default)]
    pub skills: Vec<EnemySkill>,
}

/// Optional item stats; the backend sends nulls for fields that do not apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardStats {
    pub weight: Option<i32>,
    pub unlock_level: Option<i32>,
    pub special_condition: Option<String>,
    pub physical_attack: Option<i32>,
    pub magic_attack: Option<i32>,
    pub weapon_type: Option<String>,
    pub physical_defense: Option<i32>,
    pub magic_defense: Option<i32>,
    pub armor_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub product_id: i64,
    pub product_type: String,
    pub quantity: u32,
    pub name: String,
    pub description: String,
    pub rarity_code: Option<String>,
    pub rarity_name: Option<String>,
    pub rarity_color: Option<String>,
    pub image_path: String,
    pub stats: Option<RewardStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatData {
    #[serde(default)]
    pub enemies: Vec<Enemy>,
    #[serde(default)]
    pub exp_points_total: u32,
    #[serde(default)]
    pub rewards: Vec<Reward>,
}

impl CombatData {
    pub fn has_boss(&self) -> bool {
        self.enemies.iter().any(|enemy| enemy.is_boss)
    }
}

/// Which half of the combat view is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatPhase {
    #[default]
    #[serde(rename = "PHASE_ENEMIES")]
    Enemies,
    #[serde(rename = "PHASE_REWARDS")]
    Rewards,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_combat_payload_with_null_reward_stats() {
        let data: CombatData = serde_json::from_value(json!({
            "enemies": [{
                "id": 1,
                "name": "Bandit",
                "description": "Hungry and armed.",
                "isBoss": false,
                "expPoints": 20,
                "imagePath": "/enemies/bandit.png",
                "stats": {
                    "physicalAttack": 3, "magicAttack": 0, "evasion": 1, "mana": 0,
                    "vitality": 6, "physicalDefense": 2, "magicDefense": 0, "movement": 3
                },
                "skills": [{ "name": "Ambush", "description": "Strikes first.", "uses": 1 }]
            }],
            "expPointsTotal": 20,
            "rewards": [{
                "productId": 8, "productType": "WEAPON", "quantity": 1,
                "name": "Rusty dagger", "description": "Better than nothing.",
                "rarityCode": null, "rarityName": null, "rarityColor": null,
                "imagePath": "/items/dagger.png", "stats": null
            }]
        }))
        .expect("combat data");

        assert_eq!(data.enemies[0].stats.vitality, 6);
        assert!(!data.has_boss());
        assert_eq!(data.rewards[0].stats, None);
    }

    #[test]
    fn phase_uses_backend_tags() {
        assert_eq!(
            serde_json::to_string(&CombatPhase::Rewards).expect("serialize"),
            "\"PHASE_REWARDS\""
        );
    }
}
