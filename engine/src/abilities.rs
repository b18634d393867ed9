use serde::{Deserialize, Serialize};

use crate::classes::ClassId;

/// Stable key for an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityId {
    Missile,
    Fireblast,
    Slash,
    Bash,
    Shoot,
    Snipe,
}

/// Immutable reference record for an ability.
///
/// `radius == 0` marks a single-target ability and `save_difficulty == 0`
/// means no saving throw is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: &'static str,
    pub display_name: &'static str,
    pub class: ClassId,
    pub costs_standard: bool,
    pub costs_move: bool,
    pub range: i32,
    pub radius: i32,
    pub damage: i32,
    pub bonus_against: ClassId,
    pub bonus_amount: i32,
    pub save_difficulty: i32,
    pub description: &'static str,
}

impl AbilityDefinition {
    pub fn is_area(&self) -> bool {
        self.radius > 0
    }

    pub fn allows_save(&self) -> bool {
        self.save_difficulty > 0
    }

    pub fn bonus_damage_against(&self, defender: ClassId) -> i32 {
        if defender == self.bonus_against {
            self.bonus_amount
        } else {
            0
        }
    }
}

const MISSILE: AbilityDefinition = AbilityDefinition {
    id: AbilityId::Missile,
    name: "Missile",
    display_name: "Magic Missile",
    class: ClassId::Mage,
    costs_standard: true,
    costs_move: false,
    range: 30,
    radius: 0,
    damage: 3,
    bonus_against: ClassId::Fighter,
    bonus_amount: 1,
    save_difficulty: 0,
    description: "A simple magical projectile that strikes with unerring accuracy",
};

const FIREBLAST: AbilityDefinition = AbilityDefinition {
    id: AbilityId::Fireblast,
    name: "Fireblast",
    display_name: "Fire Blast",
    class: ClassId::Mage,
    costs_standard: true,
    costs_move: true,
    range: 60,
    radius: 15,
    damage: 6,
    bonus_against: ClassId::Fighter,
    bonus_amount: 2,
    save_difficulty: 15,
    description: "A powerful explosion of fire that damages all enemies in an area",
};

// Fighter reach is a single 5-unit square.
const SLASH: AbilityDefinition = AbilityDefinition {
    id: AbilityId::Slash,
    name: "Slash",
    display_name: "Slash",
    class: ClassId::Fighter,
    costs_standard: true,
    costs_move: false,
    range: 5,
    radius: 0,
    damage: 5,
    bonus_against: ClassId::Ranger,
    bonus_amount: 0,
    save_difficulty: 0,
    description: "A quick strike with a melee weapon (5 foot reach)",
};

const BASH: AbilityDefinition = AbilityDefinition {
    id: AbilityId::Bash,
    name: "Bash",
    display_name: "Shield Bash",
    class: ClassId::Fighter,
    costs_standard: true,
    costs_move: true,
    range: 5,
    radius: 0,
    damage: 10,
    bonus_against: ClassId::Ranger,
    bonus_amount: 0,
    save_difficulty: 0,
    description: "A powerful blow with a shield that deals heavy damage (5 foot reach)",
};

const SHOOT: AbilityDefinition = AbilityDefinition {
    id: AbilityId::Shoot,
    name: "Shoot",
    display_name: "Quick Shot",
    class: ClassId::Ranger,
    costs_standard: true,
    costs_move: false,
    range: 60,
    radius: 0,
    damage: 4,
    bonus_against: ClassId::Mage,
    bonus_amount: 2,
    save_difficulty: 0,
    description: "A fast arrow shot that deals moderate damage",
};

const SNIPE: AbilityDefinition = AbilityDefinition {
    id: AbilityId::Snipe,
    name: "Snipe",
    display_name: "Aimed Shot",
    class: ClassId::Ranger,
    costs_standard: true,
    costs_move: true,
    range: 60,
    radius: 0,
    damage: 8,
    bonus_against: ClassId::Mage,
    bonus_amount: 2,
    save_difficulty: 15,
    description: "A carefully aimed shot that deals heavy damage but allows a saving throw",
};

impl AbilityId {
    /// Table order; per-class ability lists are derived from it.
    pub const ALL: [AbilityId; 6] = [
        AbilityId::Missile,
        AbilityId::Fireblast,
        AbilityId::Slash,
        AbilityId::Bash,
        AbilityId::Shoot,
        AbilityId::Snipe,
    ];

    pub fn definition(self) -> &'static AbilityDefinition {
        match self {
            AbilityId::Missile => &MISSILE,
            AbilityId::Fireblast => &FIREBLAST,
            AbilityId::Slash => &SLASH,
            AbilityId::Bash => &BASH,
            AbilityId::Shoot => &SHOOT,
            AbilityId::Snipe => &SNIPE,
        }
    }
}
