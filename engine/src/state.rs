use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::battlefield::{Battlefield, Position};
use crate::character::{Character, CharacterId, CharacterSpec, Player};
use crate::error::{ActionError, ContentError};
use crate::rules::{self, AttackOption};

/// The whole of a match at one instant.
///
/// Owns all of its data, so `clone()` is a deep copy: mutating a clone never
/// reaches back into the original. That is what lets the command layer and
/// any lookahead try an action and throw the result away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub battlefield: Battlefield,
    pub characters: Vec<Character>,
    pub current_player: Player,
    #[serde(default = "first_turn")]
    pub current_turn: u32,
}

fn first_turn() -> u32 {
    1
}

impl GameState {
    /// Start a match: player 0 to act on turn 1, everyone at full health.
    pub fn new(battlefield: Battlefield, roster: Vec<CharacterSpec>) -> Result<Self, ContentError> {
        let state = Self {
            battlefield,
            characters: roster.into_iter().map(Character::new).collect(),
            current_player: Player::Zero,
            current_turn: 1,
        };
        state.validate()?;
        Ok(state)
    }

    /// Structural checks for states built by hand or loaded from disk.
    pub fn validate(&self) -> Result<(), ContentError> {
        let field = &self.battlefield;
        let rows_match = usize::try_from(field.rows).ok() == Some(field.grid.len());
        let cols_match = field
            .grid
            .iter()
            .all(|row| usize::try_from(field.cols).ok() == Some(row.len()));
        if !rows_match || !cols_match || field.rows == 0 || field.cols == 0 {
            return Err(ContentError::SizeMismatch {
                rows: field.rows,
                cols: field.cols,
            });
        }
        let mut seen = HashSet::new();
        for c in &self.characters {
            if !seen.insert(&c.id) {
                return Err(ContentError::DuplicateCharacter(c.id.clone()));
            }
            if !field.is_in_bounds(c.position) {
                return Err(ContentError::OutOfBounds {
                    id: c.id.clone(),
                    position: c.position,
                });
            }
        }
        Ok(())
    }

    pub fn character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| &c.id == id)
    }

    pub fn character_mut(&mut self, id: &CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| &c.id == id)
    }

    /// The character, provided it exists, is alive, and belongs to the
    /// player whose turn it is.
    pub fn actor_for_turn(&self, id: &CharacterId) -> Result<&Character, ActionError> {
        let character = self
            .character(id)
            .ok_or_else(|| ActionError::UnknownCharacter(id.clone()))?;
        if character.player != self.current_player {
            return Err(ActionError::NotYourTurn(id.clone()));
        }
        if character.is_defeated() {
            return Err(ActionError::CharacterDefeated(id.clone()));
        }
        Ok(character)
    }

    pub fn player_characters(&self, player: Player) -> impl Iterator<Item = &Character> {
        self.characters.iter().filter(move |c| c.player == player)
    }

    pub fn living_characters(&self, player: Player) -> impl Iterator<Item = &Character> {
        self.player_characters(player).filter(|c| c.is_alive())
    }

    pub fn is_valid_position(&self, pos: Position) -> bool {
        self.battlefield.is_in_bounds(pos)
    }

    pub fn occupant_at(&self, pos: Position, exclude: &[&CharacterId]) -> Option<&Character> {
        rules::occupant_at(&self.characters, pos, exclude)
    }

    pub fn valid_moves(&self, id: &CharacterId) -> Vec<Position> {
        self.character(id)
            .map(|c| rules::valid_moves(&self.battlefield, &self.characters, c))
            .unwrap_or_default()
    }

    pub fn valid_attacks(&self, id: &CharacterId, ability_index: usize) -> Vec<AttackOption> {
        self.character(id)
            .map(|c| rules::valid_attacks(&self.battlefield, &self.characters, c, ability_index))
            .unwrap_or_default()
    }

    /// The player whose opponent has no one left standing.
    pub fn check_winner(&self) -> Option<Player> {
        if self.living_characters(Player::Zero).next().is_none() {
            return Some(Player::One);
        }
        if self.living_characters(Player::One).next().is_none() {
            return Some(Player::Zero);
        }
        None
    }

    pub fn is_over(&self) -> bool {
        self.check_winner().is_some()
    }

    pub fn to_json(&self) -> Result<String, ContentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ContentError> {
        let state: GameState = serde_json::from_str(text)?;
        state.validate()?;
        Ok(state)
    }
}
