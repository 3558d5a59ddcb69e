//! Playable heroes offered during game setup.

use serde::{Deserialize, Serialize};

use super::combat::BaseStats;

/// A node of a hero's skill tree, positioned for the tree diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTreeNode {
    pub id: String,
    pub label: String,
    pub tooltip: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub connections: Vec<String>,
}

impl SkillTreeNode {
    fn new(id: &str, label: &str, tooltip: &str, x: f32, y: f32, connections: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            tooltip: tooltip.to_string(),
            x,
            y,
            connections: connections.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub code: String,
    pub name: String,
    pub alias: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub portrait_image_url: Option<String>,
    #[serde(default)]
    pub specie_description: String,
    pub base_stats: BaseStats,
    #[serde(default)]
    pub skill_tree: Vec<SkillTreeNode>,
}

impl Hero {
    pub fn new(code: impl Into<String>, name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            alias: alias.into(),
            description: String::new(),
            portrait_image_url: None,
            specie_description: String::new(),
            base_stats: BaseStats::default(),
            skill_tree: Vec::new(),
        }
    }

    /// "ARIA" + "the Swift" -> "Aria, the Swift"
    pub fn display_name(&self) -> String {
        format!("{}, {}", title_case(&self.name), self.alias)
    }

    /// Fill in the default tree when the backend sends none.
    pub fn with_default_skill_tree(mut self) -> Self {
        if self.skill_tree.is_empty() {
            self.skill_tree = default_skill_tree();
        }
        self
    }
}

fn title_case(s: &str) -> String {
    s.to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Placeholder tree used until the backend serves per-hero trees.
pub fn default_skill_tree() -> Vec<SkillTreeNode> {
    vec![
        SkillTreeNode::new("1", "Start", "Tracking starting node", 100.0, 390.0, &["2", "3"]),
        SkillTreeNode::new("2", "+1 Physical Attack", "+1 physical damage", 50.0, 340.0, &["5", "7"]),
        SkillTreeNode::new("3", "+1 Evasion", "+1 evasion", 150.0, 340.0, &["4", "7"]),
        SkillTreeNode::new("4", "Call of the Oak", "Unlocks a wolf companion", 180.0, 290.0, &["8"]),
        SkillTreeNode::new("5", "+1 Vitality", "+1 vitality", 20.0, 290.0, &["6"]),
        SkillTreeNode::new("6", "Double Arrow", "Shoots two arrows", 10.0, 230.0, &["9"]),
        SkillTreeNode::new("7", "+1 Defense", "+1 defense", 100.0, 290.0, &["9"]),
        SkillTreeNode::new("8", "+1 Evasion", "+1 evasion", 190.0, 230.0, &["9"]),
        SkillTreeNode::new("9", "+1 Mana", "+1 mana", 100.0, 230.0, &["10"]),
        SkillTreeNode::new("10", "Solar Shot", "Blinds enemies with a shot to the sky", 100.0, 170.0, &["11"]),
        SkillTreeNode::new("11", "+1 Magic Defense", "+1 magic defense", 100.0, 110.0, &["12"]),
        SkillTreeNode::new("12", "+1 Mana", "+1 mana", 100.0, 50.0, &["13"]),
        SkillTreeNode::new("13", "Rain of Arrows", "Shoots up to four arrows at once", 100.0, -10.0, &[]),
    ]
}
