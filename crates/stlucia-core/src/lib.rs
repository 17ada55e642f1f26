//! St Lucia core - shared domain types for the dice contest.
//!
//! This crate provides the authoritative game model shared between
//! the hub (stlucia-hub) and the player side (stlucia-player):
//! dice sets, the deterministic roll source, player records, and the
//! game state with its pure mutations. No I/O lives here; the hub's
//! turn coordinator drives these types from its single task.

pub mod dice;
pub mod error;
pub mod game;
pub mod player;
pub mod rolls;

// Re-exports for convenience
pub use dice::{Die, DiceSet, DICE_SET_SIZE};
pub use error::{DomainError, DomainResult};
pub use game::{Game, FREE_DICE_ALLOWANCE, TERRITORY_HOLD_BONUS, TOKENS_PER_POINT};
pub use player::{PlayerId, PlayerState, PlayerStatus, MAX_PLAYERS, MIN_PLAYERS, STARTING_HEALTH};
pub use rolls::{RollError, RollSource};
