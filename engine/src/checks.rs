use crate::Dice;

/// Outcome of a d20 + modifier roll against a fixed difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckResult {
    pub roll: i32,
    pub total: i32,
    pub dc: i32,
    pub passed: bool,
}

/// Roll d20 + `modifier` against `dc`; meeting the DC passes.
pub fn check(dice: &mut Dice, modifier: i32, dc: i32) -> CheckResult {
    let roll = i32::from(dice.roll_d20());
    let total = roll + modifier;
    CheckResult {
        roll,
        total,
        dc,
        passed: total >= dc,
    }
}

/// A defender's saving throw. A pass halves incoming damage.
pub fn saving_throw(dice: &mut Dice, save_bonus: i32, dc: i32) -> CheckResult {
    check(dice, save_bonus, dc)
}

/// Damage after a save: halved and rounded down on success.
pub fn damage_after_save(damage: i32, save: &CheckResult) -> i32 {
    if save.passed {
        damage.div_euclid(2)
    } else {
        damage
    }
}
