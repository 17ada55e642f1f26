//! The player's fatal-error taxonomy, one exit code per class.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// Wrong command-line shape (exit 1)
    #[error("Usage: player number_of_players my_id")]
    Usage,

    /// Player count is not an integer in range (exit 2)
    #[error("Invalid player count")]
    InvalidCount,

    /// Label is not a single letter within the game size (exit 3)
    #[error("Invalid player ID")]
    InvalidId,

    /// The hub closed the pipe or a write failed (exit 4)
    #[error("Unexpectedly lost contact with StLucia")]
    LostContact,

    /// The hub sent something unparseable (exit 5)
    #[error("Bad message from StLucia")]
    BadMessage,
}

impl PlayerError {
    pub fn exit_code(&self) -> i32 {
        match self {
            PlayerError::Usage => 1,
            PlayerError::InvalidCount => 2,
            PlayerError::InvalidId => 3,
            PlayerError::LostContact => 4,
            PlayerError::BadMessage => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_stable() {
        assert_eq!(PlayerError::Usage.exit_code(), 1);
        assert_eq!(PlayerError::InvalidCount.exit_code(), 2);
        assert_eq!(PlayerError::InvalidId.exit_code(), 3);
        assert_eq!(PlayerError::LostContact.exit_code(), 4);
        assert_eq!(PlayerError::BadMessage.exit_code(), 5);
    }
}
