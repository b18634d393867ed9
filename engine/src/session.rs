use crate::action::{Action, ActionResult};
use crate::error::ActionError;
use crate::state::GameState;
use crate::Dice;

/// A match in progress with its history, for undo and replay.
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    history: Vec<GameState>,
    actions: Vec<Action>,
}

impl Session {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            history: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Successful actions in the order they were applied.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Apply `action`; only a success is recorded.
    pub fn submit(&mut self, action: Action, dice: &mut Dice) -> ActionResult {
        let result = action.apply(&self.state, dice);
        if result.success {
            let previous = std::mem::replace(&mut self.state, result.new_state.clone());
            self.history.push(previous);
            self.actions.push(action);
        }
        result
    }

    /// Step back one action. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                self.actions.pop();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn into_state(self) -> GameState {
        self.state
    }
}

/// Re-run recorded actions from `initial` with a dice seeded by `seed`.
///
/// Stops at the first action that no longer applies.
pub fn replay(initial: &GameState, actions: &[Action], seed: u64) -> Result<GameState, ActionError> {
    let mut dice = Dice::from_seed(seed);
    let mut state = initial.clone();
    for action in actions {
        state = action.try_apply(&state, &mut dice)?.state;
    }
    Ok(state)
}
