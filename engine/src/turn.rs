//! Player-turn transitions and the per-character select/move/attack phases.

use tracing::info;

use crate::action::{Action, AttackTarget};
use crate::battlefield::Position;
use crate::character::{CharacterId, Player};
use crate::state::GameState;

/// Hand control to the other player.
///
/// Only the incoming player's characters get their action flags cleared; the
/// outgoing side keeps its flags until its own next turn. The turn counter
/// advances when control returns to player 0.
pub fn advance_turn(state: &mut GameState) -> Player {
    let next = state.current_player.other();
    state.current_player = next;
    for c in state.characters.iter_mut().filter(|c| c.player == next) {
        c.reset_actions();
    }
    if next == Player::Zero {
        state.current_turn += 1;
    }
    info!(player = %next, turn = state.current_turn, "turn advanced");
    next
}

/// What the acting player is doing with the selected character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPhase {
    #[default]
    Select,
    Move,
    Attack { ability_index: usize },
}

/// Selection state for an interactive front end.
///
/// Holds no game data of its own; every committed choice leaves as an
/// [`Action`] to be applied through the command layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseMachine {
    selected: Option<CharacterId>,
    phase: TurnPhase,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn selected(&self) -> Option<&CharacterId> {
        self.selected.as_ref()
    }

    /// Select any character; only the current player's can enter a phase.
    pub fn select(&mut self, id: CharacterId) {
        self.selected = Some(id);
        self.phase = TurnPhase::Select;
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.phase = TurnPhase::Select;
    }

    pub fn cancel(&mut self) {
        self.phase = TurnPhase::Select;
    }

    /// Enter the move phase. Returns false if the selection cannot move.
    pub fn begin_move(&mut self, state: &GameState) -> bool {
        let ready = self
            .selected_actor(state)
            .is_some_and(|c| !c.has_moved);
        if ready {
            self.phase = TurnPhase::Move;
        }
        ready
    }

    /// Enter the attack phase with the given ability. Returns false if the
    /// selection has already attacked or lacks that ability.
    pub fn begin_attack(&mut self, state: &GameState, ability_index: usize) -> bool {
        let ready = self
            .selected_actor(state)
            .is_some_and(|c| !c.has_attacked && c.ability(ability_index).is_some());
        if ready {
            self.phase = TurnPhase::Attack { ability_index };
        }
        ready
    }

    /// Cells worth highlighting for the current phase.
    pub fn highlighted_cells(&self, state: &GameState) -> Vec<Position> {
        let Some(id) = self.selected.as_ref() else {
            return Vec::new();
        };
        match self.phase {
            TurnPhase::Select => Vec::new(),
            TurnPhase::Move => state.valid_moves(id),
            TurnPhase::Attack { ability_index } => state
                .valid_attacks(id, ability_index)
                .into_iter()
                .map(|o| o.position)
                .collect(),
        }
    }

    /// Turn a clicked cell into an action for the current phase and drop
    /// back to `Select`. Nothing is produced in `Select`.
    pub fn choose_cell(&mut self, cell: Position) -> Option<Action> {
        let character_id = self.selected.clone()?;
        let action = match self.phase {
            TurnPhase::Select => return None,
            TurnPhase::Move => Action::Move {
                character_id,
                target_position: cell,
            },
            TurnPhase::Attack { ability_index } => Action::Attack {
                character_id,
                target: AttackTarget::Cell(cell),
                ability_index,
            },
        };
        self.phase = TurnPhase::Select;
        Some(action)
    }

    /// End the turn on behalf of the selection.
    pub fn end_turn(&mut self) -> Option<Action> {
        let character_id = self.selected.take()?;
        self.phase = TurnPhase::Select;
        Some(Action::EndTurn { character_id })
    }

    fn selected_actor<'a>(&self, state: &'a GameState) -> Option<&'a crate::character::Character> {
        let id = self.selected.as_ref()?;
        state.actor_for_turn(id).ok()
    }
}
