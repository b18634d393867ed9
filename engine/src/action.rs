//! Validate-then-apply commands.
//!
//! An [`Action`] is a plain descriptor. Applying it never touches the input
//! state: work happens on a clone that is handed back only on success, so a
//! rejected action returns exactly what it was given.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::battlefield::Position;
use crate::character::{CharacterId, Player};
use crate::combat::{plan_ability, use_ability, AbilityOutcome};
use crate::error::ActionError;
use crate::state::GameState;
use crate::turn::advance_turn;
use crate::Dice;

/// Where an ability is aimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackTarget {
    Character(CharacterId),
    Cell(Position),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Move {
        character_id: CharacterId,
        target_position: Position,
    },
    Attack {
        character_id: CharacterId,
        target: AttackTarget,
        #[serde(default)]
        ability_index: usize,
    },
    EndTurn {
        character_id: CharacterId,
    },
}

/// The effect of a successful action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    Moved { from: Position, to: Position },
    Ability(AbilityOutcome),
    TurnEnded { player: Player, turn: u32 },
}

/// A successfully applied action.
#[derive(Debug, Clone)]
pub struct Applied {
    pub state: GameState,
    pub outcome: ActionOutcome,
    pub message: String,
    pub log: Vec<String>,
}

/// The flattened record handed to front ends: on failure `new_state` is the
/// unmodified input state and `message` says why.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    pub new_state: GameState,
    #[serde(skip)]
    pub error: Option<ActionError>,
    pub outcome: Option<ActionOutcome>,
    pub log: Vec<String>,
}

const ACTION_TYPES: [&str; 3] = ["move", "attack", "end_turn"];

impl Action {
    pub fn character_id(&self) -> &CharacterId {
        match self {
            Action::Move { character_id, .. }
            | Action::Attack { character_id, .. }
            | Action::EndTurn { character_id } => character_id,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Action::Move { .. } => "move",
            Action::Attack { .. } => "attack",
            Action::EndTurn { .. } => "end_turn",
        }
    }

    /// Decode an action from its JSON form, reporting unknown tags as
    /// [`ActionError::InvalidActionType`].
    pub fn from_json(text: &str) -> Result<Action, ActionError> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| ActionError::MalformedAction(e.to_string()))?;
        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ActionError::MalformedAction("missing \"type\"".to_string()))?;
        if !ACTION_TYPES.contains(&tag) {
            return Err(ActionError::InvalidActionType(tag.to_string()));
        }
        serde_json::from_value(value).map_err(|e| ActionError::MalformedAction(e.to_string()))
    }

    /// Check the action against `state` without touching it or the caller's dice.
    pub fn validate(&self, state: &GameState) -> Result<(), ActionError> {
        if state.is_over() {
            return Err(ActionError::MatchOver);
        }
        match self {
            Action::Move {
                character_id,
                target_position,
            } => {
                let mover = state.actor_for_turn(character_id)?;
                let illegal = || ActionError::IllegalMove {
                    character: character_id.clone(),
                    target: *target_position,
                };
                if mover.has_moved {
                    return Err(illegal());
                }
                if !state.valid_moves(character_id).contains(target_position) {
                    return Err(illegal());
                }
                Ok(())
            }
            Action::Attack {
                character_id,
                target,
                ability_index,
            } => plan_ability(state, character_id, *ability_index, target).map(|_| ()),
            Action::EndTurn { character_id } => {
                let character = state
                    .character(character_id)
                    .ok_or_else(|| ActionError::UnknownCharacter(character_id.clone()))?;
                if character.player != state.current_player {
                    return Err(ActionError::NotYourTurn(character_id.clone()));
                }
                Ok(())
            }
        }
    }

    pub fn try_apply(&self, state: &GameState, dice: &mut Dice) -> Result<Applied, ActionError> {
        if state.is_over() {
            return Err(ActionError::MatchOver);
        }
        let mut log = Vec::new();
        let mut next = state.clone();
        let (outcome, message) = match self {
            Action::Move {
                character_id,
                target_position,
            } => {
                self.validate(state)?;
                let mover = next
                    .character_mut(character_id)
                    .ok_or_else(|| ActionError::UnknownCharacter(character_id.clone()))?;
                let from = mover.position;
                mover.position = *target_position;
                mover.has_moved = true;
                log.push(format!(
                    "[MOVE][{}] {} → {}",
                    mover.name,
                    from.label(),
                    target_position.label()
                ));
                (
                    ActionOutcome::Moved {
                        from,
                        to: *target_position,
                    },
                    "Move successful".to_string(),
                )
            }
            Action::Attack {
                character_id,
                target,
                ability_index,
            } => {
                let outcome = use_ability(
                    &mut next,
                    character_id,
                    *ability_index,
                    target,
                    dice,
                    |line| log.push(line),
                )?;
                let message = attack_message(&next, &outcome);
                (ActionOutcome::Ability(outcome), message)
            }
            Action::EndTurn { .. } => {
                self.validate(state)?;
                let player = advance_turn(&mut next);
                log.push(format!("[TURN] {}, turn {}", player, next.current_turn));
                (
                    ActionOutcome::TurnEnded {
                        player,
                        turn: next.current_turn,
                    },
                    format!("{player}'s turn"),
                )
            }
        };

        if let Some(winner) = next.check_winner() {
            log.push(format!("[END] {winner} wins"));
            info!(winner = %winner, "match over");
        }
        Ok(Applied {
            state: next,
            outcome,
            message,
            log,
        })
    }

    /// Apply the action, folding any rejection into the result.
    pub fn apply(&self, state: &GameState, dice: &mut Dice) -> ActionResult {
        match self.try_apply(state, dice) {
            Ok(applied) => {
                info!(
                    action = self.type_name(),
                    character = %self.character_id(),
                    message = %applied.message,
                    "action applied"
                );
                ActionResult {
                    success: true,
                    message: applied.message,
                    new_state: applied.state,
                    error: None,
                    outcome: Some(applied.outcome),
                    log: applied.log,
                }
            }
            Err(error) => {
                warn!(
                    action = self.type_name(),
                    character = %self.character_id(),
                    %error,
                    "action rejected"
                );
                ActionResult {
                    success: false,
                    message: error.to_string(),
                    new_state: state.clone(),
                    error: Some(error),
                    outcome: None,
                    log: Vec::new(),
                }
            }
        }
    }
}

fn attack_message(state: &GameState, outcome: &AbilityOutcome) -> String {
    if outcome.reports.is_empty() {
        return "No targets in the area".to_string();
    }
    if !outcome.any_hit() {
        return "Miss!".to_string();
    }
    let saved = outcome.reports.iter().any(|r| r.hit && r.saved);
    let mut message = format!(
        "Hit! {} damage dealt{}",
        outcome.total_damage(),
        if saved { " (save for half damage)" } else { "" }
    );
    for id in outcome.defeated() {
        let name = state.character(id).map_or(id.as_str(), |c| c.name.as_str());
        message.push_str(&format!(" - {name} defeated!"));
    }
    message
}
