//! Attack resolution and ability execution.

pub mod actions;
pub mod resolve;

pub use actions::{plan_ability, use_ability, AbilityOutcome};
pub use resolve::{resolve_attack, AttackReport};
