//! Domain-specific error types.

use thiserror::Error;

/// Errors that can occur in domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A character outside the six legal die faces
    #[error("Invalid die face: '{found}'")]
    InvalidDieFace { found: char },

    /// Tried to remove a die that is not in the set
    #[error("Die '{die}' is not in the dice set")]
    MissingDie { die: char },

    /// A dice set that should hold a full roll does not
    #[error("Dice set holds {found} dice, expected {expected}")]
    WrongSetSize { found: u8, expected: u8 },

    /// A player label outside A..=<last player>
    #[error("Invalid player label: '{label}'")]
    InvalidLabel { label: char },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
