use thiserror::Error;

use crate::battlefield::Position;
use crate::character::CharacterId;

/// Broad category of a rejected action, as surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidActor,
    IllegalMove,
    IllegalAttack,
    InvalidActionType,
    MatchOver,
}

/// Why an action could not be applied. Never fatal; the state is left as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("character {0} not found")]
    UnknownCharacter(CharacterId),

    #[error("{0} does not belong to the current player")]
    NotYourTurn(CharacterId),

    #[error("{0} has been defeated")]
    CharacterDefeated(CharacterId),

    #[error("{character} cannot move to {target}")]
    IllegalMove {
        character: CharacterId,
        target: Position,
    },

    #[error("{0} has already attacked this turn")]
    AlreadyAttacked(CharacterId),

    #[error("{character} has no ability #{index}")]
    UnknownAbility { character: CharacterId, index: usize },

    #[error("{character} cannot reach that target with {ability}")]
    IllegalAttack {
        character: CharacterId,
        ability: &'static str,
    },

    #[error("unknown action type '{0}'")]
    InvalidActionType(String),

    #[error("malformed action: {0}")]
    MalformedAction(String),

    #[error("the match is already over")]
    MatchOver,
}

impl ActionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionError::UnknownCharacter(_)
            | ActionError::NotYourTurn(_)
            | ActionError::CharacterDefeated(_) => ErrorKind::InvalidActor,
            ActionError::IllegalMove { .. } => ErrorKind::IllegalMove,
            ActionError::AlreadyAttacked(_)
            | ActionError::UnknownAbility { .. }
            | ActionError::IllegalAttack { .. } => ErrorKind::IllegalAttack,
            ActionError::InvalidActionType(_) | ActionError::MalformedAction(_) => {
                ErrorKind::InvalidActionType
            }
            ActionError::MatchOver => ErrorKind::MatchOver,
        }
    }
}

/// Malformed maps, scenarios, or saved states.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unknown terrain code {0}")]
    UnknownTerrain(u8),

    #[error("battlefield grid is empty")]
    EmptyGrid,

    #[error("battlefield row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("battlefield grid is too large")]
    GridTooLarge,

    #[error("battlefield size {rows}x{cols} does not match its grid")]
    SizeMismatch { rows: i32, cols: i32 },

    #[error("{id} starts outside the battlefield at {position}")]
    OutOfBounds { id: CharacterId, position: Position },

    #[error("duplicate character id {0}")]
    DuplicateCharacter(CharacterId),

    #[error("unknown map '{0}'")]
    UnknownMap(String),

    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}
