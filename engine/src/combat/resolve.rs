use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::abilities::AbilityDefinition;
use crate::character::{Character, CharacterId};
use crate::checks::{damage_after_save, saving_throw};
use crate::classes::ClassDefinition;
use crate::life::apply_damage;
use crate::Dice;

/// Result of one attack against one defender.
///
/// `save_roll` is zero when no save was rolled; `damage_dealt` is the health
/// actually lost and is zero on a miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub target_id: CharacterId,
    pub hit: bool,
    pub attack_roll: i32,
    pub base_damage: i32,
    pub bonus_damage: i32,
    pub damage_dealt: i32,
    pub save_roll: i32,
    pub saved: bool,
    pub target_defeated: bool,
}

/// Roll to hit, then damage and an optional save, and apply the result.
pub fn resolve_attack(
    dice: &mut Dice,
    attacker_name: &str,
    attacker: &ClassDefinition,
    ability: &AbilityDefinition,
    defender: &mut Character,
    mut log: impl FnMut(String),
) -> AttackReport {
    let defender_class = defender.definition();
    let roll = i32::from(dice.roll_d20());
    let attack_roll = roll + attacker.attack_bonus_against(defender.class);
    let hit = attack_roll >= defender_class.armor_class;
    debug!(
        attacker = attacker_name,
        defender = %defender.id,
        roll,
        attack_roll,
        armor_class = defender_class.armor_class,
        hit,
        "attack roll"
    );
    log(format!(
        "[ATTACK][{}] {} d20={} → to-hit={} vs AC={} {}",
        attacker_name,
        ability.display_name,
        roll,
        attack_roll,
        defender_class.armor_class,
        if hit { "HIT ✔" } else { "MISS ✖" }
    ));

    if !hit {
        return AttackReport {
            target_id: defender.id.clone(),
            hit: false,
            attack_roll,
            base_damage: ability.damage,
            bonus_damage: 0,
            damage_dealt: 0,
            save_roll: 0,
            saved: false,
            target_defeated: false,
        };
    }

    let bonus_damage = ability.bonus_damage_against(defender.class);
    let mut damage = ability.damage + bonus_damage;
    let mut save_roll = 0;
    let mut saved = false;
    if ability.allows_save() {
        let save = saving_throw(dice, defender_class.save_bonus, ability.save_difficulty);
        save_roll = save.total;
        saved = save.passed;
        damage = damage_after_save(damage, &save);
        log(format!(
            "[SAVE][{}] DC {}: roll={} total={} → {}",
            defender.name,
            save.dc,
            save.roll,
            save.total,
            if save.passed { "HALF DAMAGE" } else { "FAIL" }
        ));
    }

    let applied = apply_damage(defender, damage, &mut log);
    AttackReport {
        target_id: defender.id.clone(),
        hit: true,
        attack_roll,
        base_damage: ability.damage,
        bonus_damage,
        damage_dealt: applied.lost(),
        save_roll,
        saved,
        target_defeated: defender.is_defeated(),
    }
}
