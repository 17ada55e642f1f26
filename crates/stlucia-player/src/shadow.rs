//! The player's mirror of the game state.
//!
//! The hub is authoritative; a player only ever sees the broadcast
//! stream, so the shadow applies each message the way the hub applied
//! the real change. Health tracking matters to the strategies; points
//! announcements are validated upstream and carry nothing a strategy
//! needs, so they pass through without a state change.

use stlucia_core::{DiceSet, PlayerId, PlayerState, PlayerStatus};
use stlucia_protocol::{AttackDirection, HubMessage};

use crate::strategy::GameView;

/// Rerolls a player allows itself per turn.
pub const REROLL_ALLOWANCE: u8 = 2;

/// What a freshly applied message requires of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// No reply expected
    None,
    /// The hub is waiting for `keepall` or a reroll request
    TurnOffer,
    /// The hub is waiting for `stay` or `go`
    StayQuery,
    /// This player has been eliminated; exit cleanly
    SelfEliminated,
    /// The game is over (winner announced or shutdown); exit cleanly
    GameOver,
}

/// Mirrored game state as observable from one seat.
#[derive(Debug)]
pub struct ShadowGame {
    me: PlayerId,
    players: Vec<PlayerState>,
    territory: Option<PlayerId>,
    latest: DiceSet,
    rerolls_used: u8,
}

impl ShadowGame {
    pub fn new(me: PlayerId, num_players: usize) -> Self {
        Self {
            me,
            players: vec![PlayerState::new(); num_players],
            territory: None,
            latest: DiceSet::new(),
            rerolls_used: 0,
        }
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn rerolls_used(&self) -> u8 {
        self.rerolls_used
    }

    /// The strategy-facing snapshot of this state.
    pub fn view(&self) -> GameView<'_> {
        GameView {
            me: self.me,
            latest: &self.latest,
            territory: self.territory,
            my_health: self.players[self.me.index()].health,
            holder_health: self
                .territory
                .map(|holder| self.players[holder.index()].health),
            remaining: self
                .players
                .iter()
                .filter(|p| !p.is_eliminated())
                .count(),
        }
    }

    /// Applies the healing of a committed roll to this player, as the
    /// hub will. Called once the turn's dice are kept.
    pub fn apply_own_healing(&mut self) {
        self.heal(self.me, self.latest.heals() as u32);
    }

    /// Applies one hub message and reports what the caller owes in
    /// response.
    pub fn apply(&mut self, message: &HubMessage) -> Update {
        match message {
            HubMessage::Turn { dice } => {
                self.rerolls_used = 0;
                self.latest = dice.clone();
                Update::TurnOffer
            }
            HubMessage::Rerolled { dice } => {
                self.rerolls_used += 1;
                self.latest = dice.clone();
                Update::TurnOffer
            }
            HubMessage::Rolled { player, dice } => {
                self.heal(*player, dice.heals() as u32);
                Update::None
            }
            HubMessage::Points { .. } => Update::None,
            HubMessage::Attacks {
                strength,
                direction: AttackDirection::In,
                ..
            } => {
                if let Some(holder) = self.territory {
                    self.players[holder.index()].damage(*strength);
                }
                Update::None
            }
            HubMessage::Attacks {
                strength,
                direction: AttackDirection::Out,
                ..
            } => {
                for index in 0..self.players.len() {
                    if self.territory == Some(PlayerId::new(index)) {
                        continue;
                    }
                    self.players[index].damage(*strength);
                }
                Update::None
            }
            HubMessage::Eliminated { player } => {
                self.players[player.index()].status = PlayerStatus::Eliminated;
                if *player == self.me {
                    Update::SelfEliminated
                } else {
                    Update::None
                }
            }
            HubMessage::Claim { player } => {
                self.territory = Some(*player);
                Update::None
            }
            HubMessage::StayQuery => Update::StayQuery,
            HubMessage::Winner { .. } | HubMessage::Shutdown => Update::GameOver,
        }
    }

    /// Territory holders cannot heal, mirroring the hub's rule.
    fn heal(&mut self, id: PlayerId, amount: u32) {
        if self.territory == Some(id) {
            return;
        }
        self.players[id.index()].heal(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(line: &str, num_players: usize) -> HubMessage {
        HubMessage::parse(line, num_players).expect("valid message")
    }

    fn shadow() -> ShadowGame {
        ShadowGame::new(PlayerId::new(0), 3)
    }

    #[test]
    fn test_turn_resets_reroll_allowance() {
        let mut shadow = shadow();
        assert_eq!(shadow.apply(&msg("turn 123AAP", 3)), Update::TurnOffer);
        assert_eq!(shadow.apply(&msg("rerolled 123HAP", 3)), Update::TurnOffer);
        assert_eq!(shadow.apply(&msg("rerolled 123HHP", 3)), Update::TurnOffer);
        assert_eq!(shadow.rerolls_used(), 2);

        assert_eq!(shadow.apply(&msg("turn 111222", 3)), Update::TurnOffer);
        assert_eq!(shadow.rerolls_used(), 0);
        assert_eq!(shadow.view().latest.to_string(), "111222");
    }

    #[test]
    fn test_rolled_heals_the_roller() {
        let mut shadow = shadow();
        // B takes inward damage first so the heal is visible
        shadow.apply(&msg("claim B", 3));
        shadow.apply(&msg("attacks A 3 in", 3));
        shadow.apply(&msg("claim C", 3));
        assert_eq!(shadow.view().holder_health, Some(10));

        // B holds nothing now, so its H faces heal it
        shadow.apply(&msg("rolled B 12HHAP", 3));
        shadow.apply(&msg("claim B", 3));
        assert_eq!(shadow.view().holder_health, Some(9));
    }

    #[test]
    fn test_holder_cannot_heal_from_rolled() {
        let mut shadow = shadow();
        shadow.apply(&msg("claim B", 3));
        shadow.apply(&msg("attacks A 2 in", 3));
        shadow.apply(&msg("rolled B 12HHAP", 3));
        assert_eq!(shadow.view().holder_health, Some(8));
    }

    #[test]
    fn test_inward_attack_hits_only_the_holder() {
        let mut shadow = shadow();
        shadow.apply(&msg("claim C", 3));
        shadow.apply(&msg("attacks A 4 in", 3));
        assert_eq!(shadow.view().holder_health, Some(6));
        assert_eq!(shadow.view().my_health, 10);
    }

    #[test]
    fn test_inward_attack_with_no_holder_is_ignored() {
        let mut shadow = shadow();
        shadow.apply(&msg("attacks A 4 in", 3));
        assert_eq!(shadow.view().my_health, 10);
    }

    #[test]
    fn test_outward_attack_spares_only_the_holder() {
        let mut shadow = shadow();
        shadow.apply(&msg("claim B", 3));
        shadow.apply(&msg("attacks B 2 out", 3));
        assert_eq!(shadow.view().my_health, 8);
        assert_eq!(shadow.view().holder_health, Some(10));
    }

    #[test]
    fn test_elimination_of_self_ends_the_game() {
        let mut shadow = shadow();
        assert_eq!(shadow.apply(&msg("eliminated B", 3)), Update::None);
        assert_eq!(shadow.view().remaining, 2);
        assert_eq!(
            shadow.apply(&msg("eliminated A", 3)),
            Update::SelfEliminated
        );
    }

    #[test]
    fn test_terminal_messages() {
        let mut shadow = shadow();
        assert_eq!(shadow.apply(&msg("winner C", 3)), Update::GameOver);
        assert_eq!(shadow.apply(&msg("shutdown", 3)), Update::GameOver);
        assert_eq!(shadow.apply(&msg("stay?", 3)), Update::StayQuery);
    }

    #[test]
    fn test_own_healing_respects_territory() {
        let mut shadow = shadow();
        shadow.apply(&msg("claim B", 3));
        shadow.apply(&msg("attacks B 3 out", 3));
        shadow.apply(&msg("turn 12HHAP", 3));
        shadow.apply_own_healing();
        assert_eq!(shadow.view().my_health, 9);

        // As holder, the same dice heal nothing
        shadow.apply(&msg("claim A", 3));
        shadow.apply(&msg("turn 12HHAP", 3));
        shadow.apply_own_healing();
        assert_eq!(shadow.view().my_health, 9);
    }
}
