//! Game setup aggregate - player roster and hero draft
//!
//! Players pick heroes from the catalog in roster order. A hero can only be
//! drafted once, and the draft is complete when every player holds a hero. Turn order is
//! local only; there is no synchronisation with other clients.

use crate::entities::Hero;
use crate::error::DomainError;

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: u32,
    name: String,
    hero_code: Option<String>,
}

impl Player {
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn hero_code(&self) -> Option<&str> {
        self.hero_code.as_deref()
    }
}

/// Outcome of drafting a hero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroSelection {
    /// The hero went to `player_id`; `next_player_index` picks next.
    Assigned {
        player_id: u32,
        next_player_index: usize,
    },
    /// The hero went to the last player without one.
    SelectionComplete { player_id: u32 },
}

impl HeroSelection {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::SelectionComplete { .. })
    }
}

/// Roster and hero draft for one game.
///
/// # Invariants
///
/// - There is at least one player
/// - Every assigned hero code comes from the catalog it was drafted from
/// - No hero code is assigned to two players
/// - `is_selection_complete()` is true iff every player has a hero
///
/// # Example
///
/// ```
/// use talebook_domain::aggregates::GameSetup;
/// use talebook_domain::Hero;
///
/// let catalog = [
///     Hero::new("WARRIOR", "DARIUS", "the Bold"),
///     Hero::new("MAGE", "ZORNAK", "the Grey"),
/// ];
/// let mut setup = GameSetup::new(["Ana", "Bo"]).unwrap();
/// assert!(setup.select_hero(&catalog, "RANGER").is_err());
/// assert!(!setup.select_hero(&catalog, "WARRIOR").unwrap().is_complete());
/// assert!(setup.select_hero(&catalog, "MAGE").unwrap().is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSetup {
    players: Vec<Player>,
    current_player_index: usize,
    selected_hero_codes: Vec<String>,
    is_selection_complete: bool,
}

impl GameSetup {
    /// Seat the named players in order. Ids start at 1.
    pub fn new<I, S>(player_names: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut players = Vec::new();
        for (index, name) in player_names.into_iter().enumerate() {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                return Err(DomainError::validation(format!(
                    "Player {} has an empty name",
                    index + 1
                )));
            }
            players.push(Player {
                id: index as u32 + 1,
                name,
                hero_code: None,
            });
        }

        if players.is_empty() {
            return Err(DomainError::validation("At least one player is required"));
        }

        Ok(Self {
            players,
            current_player_index: 0,
            selected_hero_codes: Vec::new(),
            is_selection_complete: false,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[inline]
    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    #[inline]
    pub fn selected_hero_codes(&self) -> &[String] {
        &self.selected_hero_codes
    }

    #[inline]
    pub fn is_selection_complete(&self) -> bool {
        self.is_selection_complete
    }

    /// The player whose turn it is to pick, or `None` once the draft is over.
    pub fn current_player(&self) -> Option<&Player> {
        if self.is_selection_complete {
            return None;
        }
        self.players.get(self.current_player_index)
    }

    pub fn is_hero_taken(&self, hero_code: &str) -> bool {
        self.selected_hero_codes.iter().any(|c| c == hero_code)
    }

    /// Heroes from `catalog` nobody has drafted yet.
    pub fn available_heroes<'a>(&self, catalog: &'a [Hero]) -> Vec<&'a Hero> {
        catalog
            .iter()
            .filter(|hero| !self.is_hero_taken(&hero.code))
            .collect()
    }

    /// Players paired with their drafted hero, in roster order.
    ///
    /// Players whose hero code is missing from `catalog` are skipped.
    pub fn assigned_heroes<'a>(&'a self, catalog: &'a [Hero]) -> Vec<(&'a Player, &'a Hero)> {
        self.players
            .iter()
            .filter_map(|player| {
                let code = player.hero_code.as_deref()?;
                catalog
                    .iter()
                    .find(|hero| hero.code == code)
                    .map(|hero| (player, hero))
            })
            .collect()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Give the hero `hero_code` from `catalog` to the current player.
    pub fn select_hero(
        &mut self,
        catalog: &[Hero],
        hero_code: &str,
    ) -> Result<HeroSelection, DomainError> {
        if self.is_selection_complete {
            return Err(DomainError::constraint("Hero selection is already complete"));
        }
        let hero_code = hero_code.trim();
        if hero_code.is_empty() {
            return Err(DomainError::validation("Hero code cannot be empty"));
        }
        if !catalog.iter().any(|hero| hero.code == hero_code) {
            return Err(DomainError::not_found("Hero", hero_code));
        }
        if self.is_hero_taken(hero_code) {
            return Err(DomainError::constraint(format!(
                "Hero {hero_code} was already selected"
            )));
        }

        let index = self.current_player_index;
        let player = self
            .players
            .get_mut(index)
            .ok_or_else(|| DomainError::not_found("Player", (index + 1).to_string()))?;
        player.hero_code = Some(hero_code.to_string());
        let player_id = player.id;
        self.selected_hero_codes.push(hero_code.to_string());

        let next_player_index = index + 1;
        if next_player_index >= self.players.len() {
            self.is_selection_complete = true;
            Ok(HeroSelection::SelectionComplete { player_id })
        } else {
            self.current_player_index = next_player_index;
            Ok(HeroSelection::Assigned {
                player_id,
                next_player_index,
            })
        }
    }
}
