//! Movement and targeting rules.
//!
//! Movement uses a Manhattan bound rather than terrain-weighted pathfinding;
//! terrain costs are recorded on the battlefield but do not shrink the reach.
//! Attack range uses straight-line distance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battlefield::{Battlefield, Position};
use crate::character::{Character, CharacterId};
use crate::UNITS_PER_CELL;

/// A cell an ability may be aimed at. Single-target abilities always carry
/// the enemy standing there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOption {
    pub position: Position,
    #[serde(default)]
    pub target_id: Option<CharacterId>,
}

/// The living character at `pos`, ignoring anyone in `exclude`.
pub fn occupant_at<'a>(
    characters: &'a [Character],
    pos: Position,
    exclude: &[&CharacterId],
) -> Option<&'a Character> {
    characters
        .iter()
        .find(|c| c.position == pos && c.is_alive() && !exclude.contains(&&c.id))
}

pub fn valid_moves(
    battlefield: &Battlefield,
    characters: &[Character],
    mover: &Character,
) -> Vec<Position> {
    if mover.is_defeated() || mover.has_moved {
        return Vec::new();
    }
    let move_range = mover.definition().move_range;
    let origin = mover.position;
    let moves: Vec<Position> = battlefield
        .cells_around(origin, move_range / UNITS_PER_CELL)
        .filter(|&cell| cell != origin)
        .filter(|&cell| origin.manhattan_distance(cell) * UNITS_PER_CELL <= move_range)
        .filter(|&cell| occupant_at(characters, cell, &[&mover.id]).is_none())
        .collect();
    debug!(character = %mover.id, count = moves.len(), "valid moves");
    moves
}

pub fn valid_attacks(
    battlefield: &Battlefield,
    characters: &[Character],
    attacker: &Character,
    ability_index: usize,
) -> Vec<AttackOption> {
    if attacker.is_defeated() || attacker.has_attacked {
        return Vec::new();
    }
    let Some(ability) = attacker.ability(ability_index) else {
        return Vec::new();
    };
    let origin = attacker.position;
    let range = f64::from(ability.range);
    let options: Vec<AttackOption> = battlefield
        .cells_around(origin, ability.range / UNITS_PER_CELL)
        .filter(|&cell| origin.distance_units(cell) <= range)
        .filter_map(|cell| {
            if ability.is_area() {
                return Some(AttackOption {
                    position: cell,
                    target_id: None,
                });
            }
            occupant_at(characters, cell, &[])
                .filter(|c| c.is_enemy_of(attacker))
                .map(|enemy| AttackOption {
                    position: cell,
                    target_id: Some(enemy.id.clone()),
                })
        })
        .collect();
    debug!(
        character = %attacker.id,
        ability = ability.name,
        count = options.len(),
        "valid attacks"
    );
    options
}

/// Living enemies of `caster` within `radius` units of `center`.
pub fn targets_in_area<'a>(
    characters: &'a [Character],
    caster: &Character,
    center: Position,
    radius: i32,
) -> Vec<&'a Character> {
    characters
        .iter()
        .filter(|c| c.is_alive() && c.is_enemy_of(caster))
        .filter(|c| center.distance_units(c.position) <= f64::from(radius))
        .collect()
}
