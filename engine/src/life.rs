use crate::character::Character;

/// What a single application of damage did to a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageApplied {
    pub before: i32,
    pub after: i32,
    /// True if this call took the character from alive to defeated.
    pub dropped: bool,
}

impl DamageApplied {
    /// Health actually lost, never negative.
    pub fn lost(&self) -> i32 {
        self.before - self.after
    }
}

/// Apply damage, clamping health at zero. Negative damage is treated as zero.
pub fn apply_damage(
    target: &mut Character,
    dmg: i32,
    mut log: impl FnMut(String),
) -> DamageApplied {
    let before = target.health;
    target.health = (target.health - dmg.max(0)).max(0);
    let after = target.health;
    log(format!(
        "[HP][{}] {} → {} (−{})",
        target.name,
        before,
        after,
        before - after
    ));

    let dropped = before > 0 && after == 0;
    if dropped {
        log(format!("[STATE][{}] is defeated", target.name));
    }
    DamageApplied {
        before,
        after,
        dropped,
    }
}
