use serde::{Deserialize, Serialize};
use tracing::info;

use crate::abilities::{AbilityDefinition, AbilityId};
use crate::action::AttackTarget;
use crate::battlefield::Position;
use crate::character::CharacterId;
use crate::combat::resolve::{resolve_attack, AttackReport};
use crate::error::ActionError;
use crate::rules::{targets_in_area, valid_attacks, AttackOption};
use crate::state::GameState;
use crate::Dice;

/// Everything one use of an ability did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityOutcome {
    pub attacker: CharacterId,
    pub ability: AbilityId,
    pub center: Position,
    pub reports: Vec<AttackReport>,
}

impl AbilityOutcome {
    pub fn any_hit(&self) -> bool {
        self.reports.iter().any(|r| r.hit)
    }

    pub fn total_damage(&self) -> i32 {
        self.reports.iter().map(|r| r.damage_dealt).sum()
    }

    pub fn defeated(&self) -> impl Iterator<Item = &CharacterId> {
        self.reports
            .iter()
            .filter(|r| r.target_defeated)
            .map(|r| &r.target_id)
    }
}

/// Check that `attacker_id` may use ability `ability_index` on `target`
/// without rolling or mutating anything. Returns the ability and the chosen
/// option on success.
pub fn plan_ability(
    state: &GameState,
    attacker_id: &CharacterId,
    ability_index: usize,
    target: &AttackTarget,
) -> Result<(&'static AbilityDefinition, AttackOption), ActionError> {
    let attacker = state.actor_for_turn(attacker_id)?;
    if attacker.has_attacked {
        return Err(ActionError::AlreadyAttacked(attacker_id.clone()));
    }
    let ability = attacker
        .ability(ability_index)
        .ok_or_else(|| ActionError::UnknownAbility {
            character: attacker_id.clone(),
            index: ability_index,
        })?;
    let options = valid_attacks(&state.battlefield, &state.characters, attacker, ability_index);
    let chosen = select_option(state, &options, ability, target).ok_or_else(|| {
        ActionError::IllegalAttack {
            character: attacker_id.clone(),
            ability: ability.display_name,
        }
    })?;
    Ok((ability, chosen))
}

/// Validate and execute an ability in place.
///
/// Every check runs before the first roll, so an `Err` leaves `state`
/// untouched. Action costs are spent even when an area ability finds no one.
pub fn use_ability(
    state: &mut GameState,
    attacker_id: &CharacterId,
    ability_index: usize,
    target: &AttackTarget,
    dice: &mut Dice,
    mut log: impl FnMut(String),
) -> Result<AbilityOutcome, ActionError> {
    let (ability, chosen) = plan_ability(state, attacker_id, ability_index, target)?;
    let attacker = state.actor_for_turn(attacker_id)?;

    let attacker_name = attacker.name.clone();
    let attacker_class = attacker.definition();
    let defenders: Vec<CharacterId> = if ability.is_area() {
        targets_in_area(&state.characters, attacker, chosen.position, ability.radius)
            .into_iter()
            .map(|c| c.id.clone())
            .collect()
    } else {
        chosen.target_id.iter().cloned().collect()
    };

    log(format!(
        "[ABILITY][{}] {} at {} ({} target(s))",
        attacker_name,
        ability.display_name,
        chosen.position.label(),
        defenders.len()
    ));

    let mut reports = Vec::with_capacity(defenders.len());
    for id in &defenders {
        if let Some(defender) = state.character_mut(id) {
            reports.push(resolve_attack(
                dice,
                &attacker_name,
                attacker_class,
                ability,
                defender,
                &mut log,
            ));
        }
    }

    if let Some(attacker) = state.character_mut(attacker_id) {
        if ability.costs_standard {
            attacker.has_attacked = true;
        }
        if ability.costs_move {
            attacker.has_moved = true;
        }
    }

    let outcome = AbilityOutcome {
        attacker: attacker_id.clone(),
        ability: ability.id,
        center: chosen.position,
        reports,
    };
    info!(
        attacker = %attacker_id,
        ability = ability.name,
        targets = outcome.reports.len(),
        damage = outcome.total_damage(),
        "ability resolved"
    );
    Ok(outcome)
}

fn select_option(
    state: &GameState,
    options: &[AttackOption],
    ability: &AbilityDefinition,
    target: &AttackTarget,
) -> Option<AttackOption> {
    let cell = match target {
        AttackTarget::Cell(pos) => *pos,
        AttackTarget::Character(id) if !ability.is_area() => {
            return options
                .iter()
                .find(|o| o.target_id.as_ref() == Some(id))
                .cloned();
        }
        // Aiming an area ability at a character aims it at their cell.
        AttackTarget::Character(id) => state.character(id).filter(|c| c.is_alive())?.position,
    };
    options.iter().find(|o| o.position == cell).cloned()
}
