use serde::{Deserialize, Serialize};

use crate::abilities::AbilityDefinition;
use crate::battlefield::Position;
use crate::classes::{ClassDefinition, ClassId};

/// Stable identifier of a character within a match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub String);

impl CharacterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CharacterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the two sides, serialized as `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    #[default]
    Zero,
    One,
}

impl Player {
    pub fn other(self) -> Player {
        match self {
            Player::Zero => Player::One,
            Player::One => Player::Zero,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Player::Zero => 0,
            Player::One => 1,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Player::Zero),
            1 => Ok(Player::One),
            other => Err(format!("player id must be 0 or 1, got {other}")),
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        match player {
            Player::Zero => 0,
            Player::One => 1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Players are shown 1-based.
        write!(f, "Player {}", self.index() + 1)
    }
}

/// Everything needed to put a character on the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSpec {
    pub id: CharacterId,
    pub name: String,
    pub class: ClassId,
    pub player: Player,
    pub position: Position,
    #[serde(default)]
    pub health: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub class: ClassId,
    pub player: Player,
    pub position: Position,
    pub health: i32,
    pub has_moved: bool,
    pub has_attacked: bool,
}

impl Character {
    pub fn new(spec: CharacterSpec) -> Self {
        let max = spec.class.definition().max_health;
        Self {
            id: spec.id,
            name: spec.name,
            class: spec.class,
            player: spec.player,
            position: spec.position,
            health: spec.health.map_or(max, |hp| hp.clamp(0, max)),
            has_moved: false,
            has_attacked: false,
        }
    }

    pub fn definition(&self) -> &'static ClassDefinition {
        self.class.definition()
    }

    pub fn abilities(&self) -> Vec<&'static AbilityDefinition> {
        self.class.abilities()
    }

    pub fn ability(&self, index: usize) -> Option<&'static AbilityDefinition> {
        self.class.ability(index)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_defeated(&self) -> bool {
        !self.is_alive()
    }

    pub fn has_completed_turn(&self) -> bool {
        self.has_moved && self.has_attacked
    }

    pub fn reset_actions(&mut self) {
        self.has_moved = false;
        self.has_attacked = false;
    }

    pub fn is_enemy_of(&self, other: &Character) -> bool {
        self.player != other.player
    }
}
