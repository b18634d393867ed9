use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod abilities;
pub mod action;
pub mod ai;
pub mod api;
pub mod battlefield;
pub mod character;
pub mod checks;
pub mod classes;
pub mod combat;
pub mod content;
pub mod error;
pub mod life;
pub mod rules;
pub mod session;
pub mod state;
pub mod turn;

pub use abilities::{AbilityDefinition, AbilityId};
pub use action::{Action, ActionOutcome, ActionResult, Applied, AttackTarget};
pub use battlefield::{Battlefield, MapDefinition, Position, Terrain};
pub use character::{Character, CharacterId, CharacterSpec, Player};
pub use classes::{ClassDefinition, ClassId};
pub use combat::{AbilityOutcome, AttackReport};
pub use error::{ActionError, ContentError, ErrorKind};
pub use rules::AttackOption;
pub use state::GameState;

/// Game distance units covered by one grid cell.
pub const UNITS_PER_CELL: i32 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AdMode {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

#[derive(Debug, Clone)]
enum Source {
    Seeded(ChaCha8Rng),
    Scripted { rolls: Vec<u8>, next: usize },
}

/// The single source of randomness for the engine.
///
/// Every roll in combat resolution and AI selection goes through a `Dice`, so
/// a seeded or scripted instance makes a whole match reproducible.
#[derive(Debug, Clone)]
pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// Replays `rolls` in order, wrapping around when exhausted. Values are
    /// returned as-is regardless of the die size asked for.
    pub fn from_scripted(rolls: Vec<u8>) -> Self {
        Self {
            source: Source::Scripted { rolls, next: 0 },
        }
    }

    /// Uniform roll in `1..=sides`.
    pub fn roll_die(&mut self, sides: u8) -> u8 {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(1..=sides.max(1)),
            Source::Scripted { rolls, next } => {
                if rolls.is_empty() {
                    return 1;
                }
                let value = rolls[*next % rolls.len()];
                *next += 1;
                value
            }
        }
    }

    pub fn roll_d20(&mut self) -> u8 {
        self.roll_die(20)
    }

    pub fn roll_with_advantage(&mut self) -> u8 {
        let a = self.roll_d20();
        let b = self.roll_d20();
        a.max(b)
    }

    pub fn roll_with_disadvantage(&mut self) -> u8 {
        let a = self.roll_d20();
        let b = self.roll_d20();
        a.min(b)
    }

    pub fn d20(&mut self, mode: AdMode) -> u8 {
        match mode {
            AdMode::Normal => self.roll_d20(),
            AdMode::Advantage => self.roll_with_advantage(),
            AdMode::Disadvantage => self.roll_with_disadvantage(),
        }
    }

    /// Sum of `count` independent rolls of a `sides`-sided die.
    pub fn roll_multiple(&mut self, count: u32, sides: u8) -> u32 {
        (0..count).map(|_| u32::from(self.roll_die(sides))).sum()
    }

    /// Uniform index in `0..len`; `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(0..len.max(1)),
            Source::Scripted { .. } => usize::from(self.roll_die(u8::MAX)).saturating_sub(1) % len.max(1),
        }
    }
}
