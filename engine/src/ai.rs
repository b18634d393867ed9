//! Heuristic opponent.
//!
//! Scores every legal move and attack for the side to act and picks among the
//! best few; lower difficulty widens the pool it picks from. The AI only reads
//! the state and returns an [`Action`], which goes through the same command
//! layer as a human's.

use tracing::debug;

use crate::action::{Action, AttackTarget};
use crate::battlefield::Position;
use crate::character::Character;
use crate::state::GameState;
use crate::Dice;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAction {
    pub action: Action,
    pub score: f64,
}

/// All candidate actions for the current player, best first.
pub fn candidate_actions(state: &GameState, difficulty: u8) -> Vec<ScoredAction> {
    let difficulty = difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
    let mut candidates = Vec::new();

    for character in state.living_characters(state.current_player) {
        let standard = state.valid_attacks(&character.id, 0);
        if !standard.is_empty() {
            push_attacks(state, character, 0, difficulty, &mut candidates);
            push_attacks(state, character, 1, difficulty, &mut candidates);
        }
        for cell in state.valid_moves(&character.id) {
            candidates.push(ScoredAction {
                score: score_move(state, character, cell, difficulty),
                action: Action::Move {
                    character_id: character.id.clone(),
                    target_position: cell,
                },
            });
        }
    }

    // Stable, so ties keep roster order.
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

/// Pick the next action for the current player, or `None` if that player
/// has no characters at all.
pub fn choose_action(state: &GameState, difficulty: u8, dice: &mut Dice) -> Option<Action> {
    let candidates = candidate_actions(state, difficulty);
    if candidates.is_empty() {
        let id = state.player_characters(state.current_player).next()?.id.clone();
        return Some(Action::EndTurn { character_id: id });
    }
    let difficulty = difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
    let pool = usize::from(4 - difficulty).min(candidates.len());
    let pick = dice.pick_index(pool);
    let chosen = candidates.into_iter().nth(pick)?;
    debug!(
        action = chosen.action.type_name(),
        character = %chosen.action.character_id(),
        score = chosen.score,
        pool,
        "ai choice"
    );
    Some(chosen.action)
}

fn push_attacks(
    state: &GameState,
    character: &Character,
    ability_index: usize,
    difficulty: u8,
    out: &mut Vec<ScoredAction>,
) {
    let Some(ability) = character.ability(ability_index) else {
        return;
    };
    for option in state.valid_attacks(&character.id, ability_index) {
        // Area cells are only worth scoring when an enemy stands in them.
        let target = match &option.target_id {
            Some(id) => state.character(id),
            None => state
                .occupant_at(option.position, &[])
                .filter(|c| c.is_enemy_of(character)),
        };
        let Some(target) = target else {
            continue;
        };
        let aim = if ability.is_area() {
            AttackTarget::Cell(option.position)
        } else {
            AttackTarget::Character(target.id.clone())
        };
        out.push(ScoredAction {
            score: score_attack(character, target, ability_index, difficulty),
            action: Action::Attack {
                character_id: character.id.clone(),
                target: aim,
                ability_index,
            },
        });
    }
}

fn score_attack(attacker: &Character, target: &Character, ability_index: usize, difficulty: u8) -> f64 {
    let mut score = 50.0;
    score += (1.0 - f64::from(target.health) / 30.0) * 30.0;
    if ability_index > 0 {
        score += f64::from(difficulty) * 10.0;
    }
    if attacker.has_moved {
        score += 20.0;
    }
    score
}

fn score_move(state: &GameState, mover: &Character, cell: Position, difficulty: u8) -> f64 {
    let mut score = 30.0;
    let enemies: Vec<&Character> = state
        .living_characters(mover.player.other())
        .collect();
    if enemies.is_empty() {
        return score;
    }

    let nearest = |from: Position| {
        enemies
            .iter()
            .map(|e| cell_distance(from, e.position))
            .fold(f64::INFINITY, f64::min)
    };
    score += (nearest(mover.position) - nearest(cell)) * 10.0;

    if difficulty >= 2 && enemies.iter().any(|e| cell_distance(cell, e.position) <= 1.0) {
        score += 20.0;
    }
    score
}

fn cell_distance(a: Position, b: Position) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    (dx * dx + dy * dy).sqrt()
}
