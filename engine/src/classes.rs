use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityDefinition, AbilityId};

/// Stable key for a character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassId {
    Mage,
    Fighter,
    Ranger,
}

/// Immutable reference record for a class. Ranges are in distance units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassDefinition {
    pub id: ClassId,
    pub name: &'static str,
    pub move_range: i32,
    pub attack_bonus: i32,
    pub armor_class: i32,
    pub save_bonus: i32,
    pub max_health: i32,
    pub bonus_against: ClassId,
    pub bonus_amount: i32,
    pub description: &'static str,
}

const MAGE: ClassDefinition = ClassDefinition {
    id: ClassId::Mage,
    name: "Mage",
    move_range: 30,
    attack_bonus: 8,
    armor_class: 15,
    save_bonus: 6,
    max_health: 20,
    bonus_against: ClassId::Fighter,
    bonus_amount: 3,
    description: "Mages are spellcasters who excel at ranged magical attacks",
};

const FIGHTER: ClassDefinition = ClassDefinition {
    id: ClassId::Fighter,
    name: "Fighter",
    move_range: 60,
    attack_bonus: 5,
    armor_class: 18,
    save_bonus: 3,
    max_health: 30,
    bonus_against: ClassId::Ranger,
    bonus_amount: 3,
    description: "Fighters are melee specialists with high health, armor, and mobility",
};

const RANGER: ClassDefinition = ClassDefinition {
    id: ClassId::Ranger,
    name: "Ranger",
    move_range: 30,
    attack_bonus: 4,
    armor_class: 18,
    save_bonus: 5,
    max_health: 25,
    bonus_against: ClassId::Mage,
    bonus_amount: 3,
    description: "Rangers are skilled with bows and excel at long-range physical attacks",
};

impl ClassId {
    pub const ALL: [ClassId; 3] = [ClassId::Mage, ClassId::Fighter, ClassId::Ranger];

    pub fn definition(self) -> &'static ClassDefinition {
        match self {
            ClassId::Mage => &MAGE,
            ClassId::Fighter => &FIGHTER,
            ClassId::Ranger => &RANGER,
        }
    }

    /// Abilities restricted to this class, standard first, special second.
    pub fn abilities(self) -> Vec<&'static AbilityDefinition> {
        AbilityId::ALL
            .iter()
            .map(|id| id.definition())
            .filter(|ability| ability.class == self)
            .collect()
    }

    pub fn ability(self, index: usize) -> Option<&'static AbilityDefinition> {
        self.abilities().get(index).copied()
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }
}

impl ClassDefinition {
    /// Matchup bonus added to the attack roll against `defender`.
    pub fn attack_bonus_against(&self, defender: ClassId) -> i32 {
        if defender == self.bonus_against {
            self.attack_bonus + self.bonus_amount
        } else {
            self.attack_bonus
        }
    }
}

impl std::fmt::Display for ClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
