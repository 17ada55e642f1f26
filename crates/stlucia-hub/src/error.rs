//! The hub's fatal-error taxonomy.
//!
//! Every failure class carries a fixed process exit code and a fixed
//! one-line diagnostic; all fatal paths converge on the same exit
//! routine in main.

use thiserror::Error;

use stlucia_core::RollError;

/// Fatal hub errors, one per exit code.
#[derive(Error, Debug)]
pub enum HubError {
    /// Wrong command-line shape (exit 1)
    #[error("Usage: stlucia rollfile winscore prog1 prog2 [prog3 [prog4]]")]
    Usage,

    /// winscore is not a positive integer (exit 2)
    #[error("Invalid score")]
    InvalidScore,

    /// Roll file could not be opened (exit 3)
    #[error("Unable to access rollfile")]
    RollFileOpen(#[source] std::io::Error),

    /// Roll file contents are invalid (exit 4)
    #[error("Error reading rolls")]
    RollFileContents(#[source] RollError),

    /// Spawning or piping to a player failed (exit 5)
    #[error("Unable to start subprocess")]
    Piping(#[source] std::io::Error),

    /// A player process ended unexpectedly (exit 6)
    #[error("Player quit")]
    PlayerQuit,

    /// A player sent a malformed message (exit 7)
    #[error("Invalid message received from player")]
    InvalidMessage,

    /// A player sent a well-formed but illegal request (exit 8)
    #[error("Invalid request by player")]
    InvalidRequest,

    /// Interrupted by signal (exit 9)
    #[error("SIGINT caught")]
    Interrupted,
}

impl HubError {
    /// Maps a roll-source load failure onto the open/contents split.
    pub fn from_roll_error(err: RollError) -> Self {
        match err {
            RollError::Open(io) => HubError::RollFileOpen(io),
            other => HubError::RollFileContents(other),
        }
    }

    /// The process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            HubError::Usage => 1,
            HubError::InvalidScore => 2,
            HubError::RollFileOpen(_) => 3,
            HubError::RollFileContents(_) => 4,
            HubError::Piping(_) => 5,
            HubError::PlayerQuit => 6,
            HubError::InvalidMessage => 7,
            HubError::InvalidRequest => 8,
            HubError::Interrupted => 9,
        }
    }

    /// Whether the exit routine should still send `shutdown` to the
    /// remaining players. Configuration and spawn failures happen
    /// before a coherent game exists; later failures do not.
    pub fn notifies_players(&self) -> bool {
        matches!(
            self,
            HubError::PlayerQuit
                | HubError::InvalidMessage
                | HubError::InvalidRequest
                | HubError::Interrupted
        )
    }
}
