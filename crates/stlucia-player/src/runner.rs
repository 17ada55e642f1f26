//! Process entry point shared by the player binaries.
//!
//! The hub speaks to a player over its standard streams, so all I/O
//! here is plain blocking stdio: read a line, update the shadow,
//! reply if the message demands one. The hub also delivers SIGINT to
//! the whole process group on interactive interrupts; players ignore
//! it and wait for the hub's own shutdown notice instead.

use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use stlucia_core::{PlayerId, MAX_PLAYERS, MIN_PLAYERS};
use stlucia_protocol::{HubMessage, PlayerReply, READY_BYTE};

use crate::error::PlayerError;
use crate::shadow::{ShadowGame, Update, REROLL_ALLOWANCE};
use crate::strategy::Strategy;

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Number of seats in the game.
    count: String,

    /// This player's single-letter label.
    label: String,
}

/// Runs a player process to completion and returns its exit code.
pub fn play(strategy: &dyn Strategy) -> i32 {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    // The hub interrupts as a group; shutdown arrives on stdin
    unsafe {
        libc::signal(libc::SIGINT, libc::SIG_IGN);
    }

    match run(strategy) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    }
}

fn run(strategy: &dyn Strategy) -> Result<(), PlayerError> {
    let args = Args::try_parse().map_err(|_| PlayerError::Usage)?;
    let num_players: usize = args.count.parse().map_err(|_| PlayerError::InvalidCount)?;
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
        return Err(PlayerError::InvalidCount);
    }
    let mut labels = args.label.chars();
    let me = match (labels.next(), labels.next()) {
        (Some(label), None) => {
            PlayerId::from_label(label, num_players).map_err(|_| PlayerError::InvalidId)?
        }
        _ => return Err(PlayerError::InvalidId),
    };

    let mut shadow = ShadowGame::new(me, num_players);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(&[READY_BYTE])
        .and_then(|_| out.flush())
        .map_err(|_| PlayerError::LostContact)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|_| PlayerError::LostContact)?;
        if read == 0 {
            return Err(PlayerError::LostContact);
        }
        debug!(message = %line.trim_end(), "from StLucia");

        let message =
            HubMessage::parse(&line, num_players).map_err(|_| PlayerError::BadMessage)?;
        match shadow.apply(&message) {
            Update::None => {}
            Update::TurnOffer => {
                let reply = turn_reply(&mut shadow, strategy);
                send(&mut out, &reply)?;
            }
            Update::StayQuery => {
                let reply = if strategy.wants_retreat(&shadow.view()) {
                    PlayerReply::Go
                } else {
                    PlayerReply::Stay
                };
                send(&mut out, &reply)?;
            }
            Update::SelfEliminated | Update::GameOver => return Ok(()),
        }
    }
}

/// Decides the reply to a turn offer: once the reroll allowance is
/// spent, or the strategy keeps everything, the roll is committed and
/// its healing applied locally.
pub fn turn_reply(shadow: &mut ShadowGame, strategy: &dyn Strategy) -> PlayerReply {
    if shadow.rerolls_used() < REROLL_ALLOWANCE {
        let subset = strategy.plan_reroll(&shadow.view());
        if !subset.is_empty() {
            return PlayerReply::Reroll { subset };
        }
    }
    shadow.apply_own_healing();
    PlayerReply::KeepAll
}

fn send(out: &mut impl Write, reply: &PlayerReply) -> Result<(), PlayerError> {
    writeln!(out, "{reply}")
        .and_then(|_| out.flush())
        .map_err(|_| PlayerError::LostContact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{Collector, Holdout};

    fn offer(shadow: &mut ShadowGame, line: &str) {
        let message = HubMessage::parse(line, 2).expect("valid message");
        assert_eq!(shadow.apply(&message), Update::TurnOffer);
    }

    #[test]
    fn test_reroll_allowance_forces_keepall() {
        let mut shadow = ShadowGame::new(PlayerId::new(0), 2);

        // Collector never keeps a lone 2, so it rerolls while allowed
        offer(&mut shadow, "turn 111112");
        assert_eq!(
            turn_reply(&mut shadow, &Collector).to_string(),
            "reroll 2"
        );
        offer(&mut shadow, "rerolled 111112");
        assert_eq!(
            turn_reply(&mut shadow, &Collector).to_string(),
            "reroll 2"
        );
        offer(&mut shadow, "rerolled 111112");
        // Third offer of the same turn: allowance spent
        assert_eq!(turn_reply(&mut shadow, &Collector).to_string(), "keepall");
    }

    #[test]
    fn test_keepall_applies_own_healing() {
        let mut shadow = ShadowGame::new(PlayerId::new(0), 2);
        // Take damage, then keep a roll with two H faces
        shadow.apply(&HubMessage::parse("claim B", 2).expect("valid"));
        shadow.apply(&HubMessage::parse("attacks B 4 out", 2).expect("valid"));
        assert_eq!(shadow.view().my_health, 6);

        offer(&mut shadow, "turn 12HH3A");
        assert_eq!(turn_reply(&mut shadow, &Holdout).to_string(), "keepall");
        assert_eq!(shadow.view().my_health, 8);
    }
}
