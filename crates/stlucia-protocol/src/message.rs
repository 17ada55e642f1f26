//! Typed protocol messages and their wire grammar.

use std::fmt;

use stlucia_core::{DiceSet, PlayerId, DICE_SET_SIZE};

use crate::codec::tokenize;
use crate::ProtocolError;

/// The single readiness byte a player emits before any messages.
pub const READY_BYTE: u8 = b'!';

/// Direction of a territorial attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackDirection {
    /// At the territory holder, from outside
    In,
    /// From the territory holder, at everyone else
    Out,
}

impl fmt::Display for AttackDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackDirection::In => write!(f, "in"),
            AttackDirection::Out => write!(f, "out"),
        }
    }
}

/// Messages sent by the hub to players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubMessage {
    /// Turn offer with the freshly rolled dice
    Turn { dice: DiceSet },

    /// Updated dice after a reroll request
    Rerolled { dice: DiceSet },

    /// Broadcast of another player's final roll
    Rolled { player: PlayerId, dice: DiceSet },

    /// Broadcast of a net point gain this turn
    Points { player: PlayerId, gained: u32 },

    /// Broadcast of a territorial attack
    Attacks {
        player: PlayerId,
        strength: u32,
        direction: AttackDirection,
    },

    /// Broadcast that a player has been eliminated
    Eliminated { player: PlayerId },

    /// Broadcast that a player now holds St Lucia
    Claim { player: PlayerId },

    /// Forced query to the territory holder after an inward attack
    StayQuery,

    /// Broadcast of the winner; the game is over
    Winner { player: PlayerId },

    /// Terminal shutdown notice
    Shutdown,
}

impl HubMessage {
    /// Parses and validates a hub message as a player must: field
    /// counts, dice shape, label range and value ranges are all
    /// checked against the game size.
    pub fn parse(line: &str, num_players: usize) -> Result<Self, ProtocolError> {
        let fields = tokenize(line)?;
        match fields[0] {
            "turn" => {
                expect_fields("turn", &fields, 2)?;
                Ok(HubMessage::Turn {
                    dice: parse_full_roll(fields[1])?,
                })
            }
            "rerolled" => {
                expect_fields("rerolled", &fields, 2)?;
                Ok(HubMessage::Rerolled {
                    dice: parse_full_roll(fields[1])?,
                })
            }
            "rolled" => {
                expect_fields("rolled", &fields, 3)?;
                Ok(HubMessage::Rolled {
                    player: parse_label(fields[1], num_players)?,
                    dice: parse_full_roll(fields[2])?,
                })
            }
            "points" => {
                expect_fields("points", &fields, 3)?;
                Ok(HubMessage::Points {
                    player: parse_label(fields[1], num_players)?,
                    gained: parse_digit("points", fields[2], b'9')?,
                })
            }
            "attacks" => {
                expect_fields("attacks", &fields, 4)?;
                let direction = match fields[3] {
                    "in" => AttackDirection::In,
                    "out" => AttackDirection::Out,
                    other => {
                        return Err(ProtocolError::InvalidValue {
                            verb: "attacks",
                            value: other.to_string(),
                        })
                    }
                };
                Ok(HubMessage::Attacks {
                    player: parse_label(fields[1], num_players)?,
                    strength: parse_digit("attacks", fields[2], b'6')?,
                    direction,
                })
            }
            "eliminated" => {
                expect_fields("eliminated", &fields, 2)?;
                Ok(HubMessage::Eliminated {
                    player: parse_label(fields[1], num_players)?,
                })
            }
            "claim" => {
                expect_fields("claim", &fields, 2)?;
                Ok(HubMessage::Claim {
                    player: parse_label(fields[1], num_players)?,
                })
            }
            "stay?" => {
                expect_fields("stay?", &fields, 1)?;
                Ok(HubMessage::StayQuery)
            }
            "winner" => {
                expect_fields("winner", &fields, 2)?;
                Ok(HubMessage::Winner {
                    player: parse_label(fields[1], num_players)?,
                })
            }
            "shutdown" => {
                expect_fields("shutdown", &fields, 1)?;
                Ok(HubMessage::Shutdown)
            }
            verb => Err(ProtocolError::UnknownMessage {
                verb: verb.to_string(),
            }),
        }
    }
}

impl fmt::Display for HubMessage {
    /// Renders the wire form, without the trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HubMessage::Turn { dice } => write!(f, "turn {dice}"),
            HubMessage::Rerolled { dice } => write!(f, "rerolled {dice}"),
            HubMessage::Rolled { player, dice } => write!(f, "rolled {player} {dice}"),
            HubMessage::Points { player, gained } => write!(f, "points {player} {gained}"),
            HubMessage::Attacks {
                player,
                strength,
                direction,
            } => write!(f, "attacks {player} {strength} {direction}"),
            HubMessage::Eliminated { player } => write!(f, "eliminated {player}"),
            HubMessage::Claim { player } => write!(f, "claim {player}"),
            HubMessage::StayQuery => write!(f, "stay?"),
            HubMessage::Winner { player } => write!(f, "winner {player}"),
            HubMessage::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// Replies sent by players to the hub.
///
/// Parsing only checks shape; whether a reply is legal in the current
/// protocol state (a `stay` during reroll negotiation, say) is the
/// coordinator's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerReply {
    /// Keep the offered dice; negotiation over
    KeepAll,

    /// Replace this non-empty subset of the current dice
    Reroll { subset: DiceSet },

    /// Holder keeps the territory
    Stay,

    /// Holder cedes the territory to the attacker
    Go,
}

impl PlayerReply {
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let fields = tokenize(line)?;
        match fields[0] {
            "keepall" => {
                expect_fields("keepall", &fields, 1)?;
                Ok(PlayerReply::KeepAll)
            }
            "reroll" => {
                expect_fields("reroll", &fields, 2)?;
                let subset: DiceSet = fields[1].parse().map_err(|_| {
                    ProtocolError::InvalidDice {
                        dice: fields[1].to_string(),
                    }
                })?;
                if subset.is_empty() || subset.total() > DICE_SET_SIZE {
                    return Err(ProtocolError::InvalidDice {
                        dice: fields[1].to_string(),
                    });
                }
                Ok(PlayerReply::Reroll { subset })
            }
            "stay" => {
                expect_fields("stay", &fields, 1)?;
                Ok(PlayerReply::Stay)
            }
            "go" => {
                expect_fields("go", &fields, 1)?;
                Ok(PlayerReply::Go)
            }
            verb => Err(ProtocolError::UnknownMessage {
                verb: verb.to_string(),
            }),
        }
    }
}

impl fmt::Display for PlayerReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerReply::KeepAll => write!(f, "keepall"),
            PlayerReply::Reroll { subset } => write!(f, "reroll {subset}"),
            PlayerReply::Stay => write!(f, "stay"),
            PlayerReply::Go => write!(f, "go"),
        }
    }
}

fn expect_fields(
    verb: &'static str,
    fields: &[&str],
    expected: usize,
) -> Result<(), ProtocolError> {
    if fields.len() != expected {
        return Err(ProtocolError::WrongFieldCount {
            verb,
            count: fields.len(),
            expected,
        });
    }
    Ok(())
}

/// A dice field that must be a full six-die roll.
fn parse_full_roll(field: &str) -> Result<DiceSet, ProtocolError> {
    let invalid = || ProtocolError::InvalidDice {
        dice: field.to_string(),
    };
    if field.len() != DICE_SET_SIZE as usize {
        return Err(invalid());
    }
    field.parse().map_err(|_| invalid())
}

/// A single-letter label within the game's player range.
fn parse_label(field: &str, num_players: usize) -> Result<PlayerId, ProtocolError> {
    let invalid = || ProtocolError::InvalidLabel {
        label: field.to_string(),
    };
    let mut chars = field.chars();
    let (Some(label), None) = (chars.next(), chars.next()) else {
        return Err(invalid());
    };
    PlayerId::from_label(label, num_players).map_err(|_| invalid())
}

/// A one-character numeric field in `'0'..=max`.
fn parse_digit(verb: &'static str, field: &str, max: u8) -> Result<u32, ProtocolError> {
    let invalid = || ProtocolError::InvalidValue {
        verb,
        value: field.to_string(),
    };
    let bytes = field.as_bytes();
    if bytes.len() != 1 || !(b'0'..=max).contains(&bytes[0]) {
        return Err(invalid());
    }
    Ok((bytes[0] - b'0') as u32)
}
