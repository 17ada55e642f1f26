//! Player identity and per-participant records.

use std::fmt;

use crate::error::DomainError;

/// Minimum number of participants in a game.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of participants (labels A through Z).
pub const MAX_PLAYERS: usize = 26;

/// Health every participant starts with, and the healing ceiling.
pub const STARTING_HEALTH: u32 = 10;

const FIRST_LABEL: char = 'A';

/// Ordinal identity of a participant; the wire label is derived from
/// the index (0 -> 'A', 1 -> 'B', ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(usize);

impl PlayerId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// The single-letter wire label.
    pub fn label(self) -> char {
        (FIRST_LABEL as u8 + self.0 as u8) as char
    }

    /// Parses a label, checking it lies in range for the game size.
    pub fn from_label(label: char, num_players: usize) -> Result<Self, DomainError> {
        let last = (FIRST_LABEL as u8 + num_players.saturating_sub(1) as u8) as char;
        if !(FIRST_LABEL..=last).contains(&label) {
            return Err(DomainError::InvalidLabel { label });
        }
        Ok(Self((label as u8 - FIRST_LABEL as u8) as usize))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Connection / survival status of a participant.
///
/// Lifecycle: Unconnected -> Remaining (after handshake) ->
/// Eliminated (health 0 or game over); never revived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Unconnected,
    Remaining,
    Eliminated,
}

/// Mutable per-participant record owned by the game.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub health: u32,
    pub points: u32,
    pub tokens: u32,
    pub status: PlayerStatus,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            health: STARTING_HEALTH,
            points: 0,
            tokens: 0,
            status: PlayerStatus::Unconnected,
        }
    }

    /// Heals up to the starting-health ceiling; returns the amount
    /// actually applied.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let applied = amount.min(STARTING_HEALTH - self.health);
        self.health += applied;
        applied
    }

    /// Damages down to zero; returns the amount actually applied.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.health);
        self.health -= applied;
        applied
    }

    pub fn is_eliminated(&self) -> bool {
        self.status == PlayerStatus::Eliminated
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}
