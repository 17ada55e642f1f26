//! Wire protocol for hub/player communication.
//!
//! One line per message, space-delimited fields, `\n`-terminated.
//! The codec enforces structural bounds only (field count and field
//! length); message-kind validation lives in the typed parsers, and
//! game-rule legality is the coordinator's job.

pub mod codec;
pub mod message;

// Re-exports for convenience
pub use codec::{tokenize, MAX_FIELDS, MAX_FIELD_LEN};
pub use message::{AttackDirection, HubMessage, PlayerReply, READY_BYTE};

use thiserror::Error;

/// Errors raised while parsing protocol traffic. All of these are
/// "malformed input" from the receiver's point of view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// More fields than the protocol allows
    #[error("Message has {count} fields (max {MAX_FIELDS})")]
    TooManyFields { count: usize },

    /// A single field longer than the protocol allows
    #[error("Field of {len} bytes exceeds the {MAX_FIELD_LEN} byte limit")]
    FieldTooLong { len: usize },

    /// Unknown leading verb
    #[error("Unknown message: '{verb}'")]
    UnknownMessage { verb: String },

    /// Right verb, wrong number of fields
    #[error("Message '{verb}' has {count} fields, expected {expected}")]
    WrongFieldCount {
        verb: &'static str,
        count: usize,
        expected: usize,
    },

    /// A dice string that is not the required shape
    #[error("Invalid dice string: '{dice}'")]
    InvalidDice { dice: String },

    /// A label outside the game's player range
    #[error("Invalid player label: '{label}'")]
    InvalidLabel { label: String },

    /// A numeric field outside its allowed range
    #[error("Invalid value for '{verb}': '{value}'")]
    InvalidValue { verb: &'static str, value: String },
}
