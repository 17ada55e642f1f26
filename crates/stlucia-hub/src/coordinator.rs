//! The authoritative turn state machine.
//!
//! One turn is a strict sequence: territory bonus, fresh roll, reroll
//! negotiation, roll broadcast, healing, territorial resolution,
//! scoring, elimination notices, win check. The coordinator owns both
//! the game state and the roster and is the only task that touches
//! either, so every message exchange happens in lock step with the
//! state change it reports.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use stlucia_core::{DiceSet, DomainError, Game, PlayerId, PlayerStatus};
use stlucia_protocol::{AttackDirection, HubMessage, PlayerReply};

use crate::error::HubError;
use crate::spawn::Roster;

/// Runs the contest over an already-launched roster.
pub struct Coordinator {
    game: Game,
    roster: Roster,
    cancel: CancellationToken,
}

impl Coordinator {
    pub fn new(game: Game, roster: Roster, cancel: CancellationToken) -> Self {
        Self {
            game,
            roster,
            cancel,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Plays turns until someone wins; returns the winner.
    pub async fn run(&mut self) -> Result<PlayerId, HubError> {
        loop {
            if let Some(winner) = self.run_turn().await? {
                return Ok(winner);
            }
        }
    }

    /// Notifies and reaps the roster. Used on every exit path.
    pub async fn shutdown(&mut self, notify: bool) {
        self.roster.shutdown(&self.game, notify).await;
    }

    /// Plays one full turn for the current player. Returns the winner
    /// if this turn ended the game.
    pub async fn run_turn(&mut self) -> Result<Option<PlayerId>, HubError> {
        let active = self.game.current();
        let starting_points = self.game.player(active).points;

        self.game.apply_territory_bonus();
        self.game.roll_fresh();
        self.negotiate_roll(active).await?;

        let final_dice = self.game.latest_dice().clone();
        info!(player = %active, dice = %final_dice, "player rolled");
        self.broadcast(
            &HubMessage::Rolled {
                player: active,
                dice: final_dice,
            },
            true,
        )
        .await;

        self.game.heal_active();
        self.resolve_attack(active).await?;

        self.game.score_roll();
        let total = self.game.player(active).points;
        let gained = total - starting_points;
        if gained > 0 {
            info!(player = %active, gained, total, "player scored");
            self.broadcast(
                &HubMessage::Points {
                    player: active,
                    gained,
                },
                false,
            )
            .await;
        }

        self.announce_eliminations().await;

        if self.game.is_last_remaining(active) || self.game.has_won_on_points(active) {
            info!(player = %active, "player wins");
            self.broadcast(&HubMessage::Winner { player: active }, false)
                .await;
            self.game.finish();
            return Ok(Some(active));
        }
        self.game.advance_turn();
        Ok(None)
    }

    /// Offers the fresh roll to the active player and services reroll
    /// requests until it commits with `keepall`.
    async fn negotiate_roll(&mut self, active: PlayerId) -> Result<(), HubError> {
        let dice = self.game.latest_dice().clone();
        self.send(active, &HubMessage::Turn { dice }).await?;
        loop {
            let line = self.recv(active).await?;
            let reply = PlayerReply::parse(&line).map_err(|e| {
                debug!(player = %active, error = %e, "malformed turn reply");
                HubError::InvalidMessage
            })?;
            match reply {
                PlayerReply::KeepAll => return Ok(()),
                PlayerReply::Reroll { subset } => {
                    self.apply_reroll(active, &subset)?;
                    let dice = self.game.latest_dice().clone();
                    self.send(active, &HubMessage::Rerolled { dice }).await?;
                }
                // Territory replies have no place in roll negotiation
                PlayerReply::Stay | PlayerReply::Go => return Err(HubError::InvalidRequest),
            }
        }
    }

    /// Naming a die the player does not hold is a malformed message;
    /// a merged set of the wrong size is an illegal request.
    fn apply_reroll(&mut self, active: PlayerId, subset: &DiceSet) -> Result<(), HubError> {
        self.game.reroll(subset).map_err(|e| {
            debug!(player = %active, error = %e, "reroll rejected");
            match e {
                DomainError::MissingDie { .. } => HubError::InvalidMessage,
                _ => HubError::InvalidRequest,
            }
        })
    }

    /// Applies the territorial consequences of the final roll's `A`
    /// faces: claim an empty territory, strike outward as the holder,
    /// or strike inward and put the stay question to the holder.
    async fn resolve_attack(&mut self, active: PlayerId) -> Result<(), HubError> {
        let strength = self.game.latest_dice().attacks() as u32;
        if strength == 0 {
            return Ok(());
        }
        match self.game.territory() {
            None => self.claim(active).await,
            Some(holder) if holder == active => {
                let targets: Vec<PlayerId> = self
                    .game
                    .ids()
                    .filter(|&id| id != active && !self.game.player(id).is_eliminated())
                    .collect();
                for target in targets {
                    self.game.damage(target, strength);
                }
                self.broadcast(
                    &HubMessage::Attacks {
                        player: active,
                        strength,
                        direction: AttackDirection::Out,
                    },
                    false,
                )
                .await;
                Ok(())
            }
            Some(holder) => {
                self.game.damage(holder, strength);
                self.broadcast(
                    &HubMessage::Attacks {
                        player: active,
                        strength,
                        direction: AttackDirection::In,
                    },
                    false,
                )
                .await;
                self.send(holder, &HubMessage::StayQuery).await?;
                let line = self.recv(holder).await?;
                // A dead holder's reply is consumed but cannot matter
                if self.game.player(holder).health == 0 {
                    return self.claim(active).await;
                }
                match PlayerReply::parse(&line) {
                    Ok(PlayerReply::Stay) => Ok(()),
                    Ok(PlayerReply::Go) => self.claim(active).await,
                    Ok(_) => Err(HubError::InvalidRequest),
                    Err(e) => {
                        debug!(player = %holder, error = %e, "malformed stay reply");
                        Err(HubError::InvalidMessage)
                    }
                }
            }
        }
    }

    /// Transfers the territory to `id` with its one-point award and
    /// tells everyone.
    async fn claim(&mut self, id: PlayerId) -> Result<(), HubError> {
        self.game.claim_territory(id);
        info!(player = %id, "player claimed StLucia");
        self.broadcast(&HubMessage::Claim { player: id }, false).await;
        Ok(())
    }

    /// Announces each newly fallen player to the players still
    /// standing, the fallen one included, then marks it eliminated.
    /// With several falling in one turn, an earlier victim no longer
    /// hears about a later one.
    async fn announce_eliminations(&mut self) {
        let ids: Vec<PlayerId> = self.game.ids().collect();
        for id in ids {
            if !self.game.is_newly_fallen(id) {
                continue;
            }
            self.broadcast(&HubMessage::Eliminated { player: id }, false)
                .await;
            self.game.mark_eliminated(id);
        }
    }

    /// Sends to one player; a write failure here means the player is
    /// gone, which is fatal.
    async fn send(&mut self, id: PlayerId, message: &HubMessage) -> Result<(), HubError> {
        self.roster
            .seat_mut(id)
            .link
            .send_line(&message.to_string())
            .await
            .map_err(|_| HubError::PlayerQuit)
    }

    /// Blocks for one line from a player; a closed pipe or read
    /// failure is fatal, and cancellation interrupts the wait.
    async fn recv(&mut self, id: PlayerId) -> Result<String, HubError> {
        let seat = self.roster.seat_mut(id);
        tokio::select! {
            _ = self.cancel.cancelled() => Err(HubError::Interrupted),
            line = seat.link.recv_line() => match line {
                Ok(Some(line)) => Ok(line),
                Ok(None) | Err(_) => Err(HubError::PlayerQuit),
            },
        }
    }

    /// Sends to every remaining player, optionally skipping the
    /// active one. Broadcast write failures are not fatal; the reader
    /// will surface as a quit at its next turn if it is truly gone.
    async fn broadcast(&mut self, message: &HubMessage, skip_active: bool) {
        let line = message.to_string();
        let active = self.game.current();
        let ids: Vec<PlayerId> = self.game.ids().collect();
        for id in ids {
            if self.game.player(id).status != PlayerStatus::Remaining {
                continue;
            }
            if skip_active && id == active {
                continue;
            }
            if let Err(e) = self.roster.seat_mut(id).link.send_line(&line).await {
                debug!(player = %id, error = %e, "broadcast not delivered");
            }
        }
    }
}
