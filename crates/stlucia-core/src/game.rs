//! Authoritative game state and its pure mutations.
//!
//! Everything here is driven by the hub's single task; the turn
//! coordinator performs the message exchange and calls into this
//! module for every state change, so the rules are testable without
//! any process plumbing.

use tracing::debug;

use crate::dice::{DiceSet, DICE_SET_SIZE};
use crate::error::DomainError;
use crate::player::{PlayerId, PlayerState, PlayerStatus};
use crate::rolls::RollSource;

/// Points credited to the territory holder at the start of their turn.
pub const TERRITORY_HOLD_BONUS: u32 = 2;

/// Tokens that convert into one point.
pub const TOKENS_PER_POINT: u32 = 10;

/// Number faces of each kind that score nothing.
pub const FREE_DICE_ALLOWANCE: u8 = 2;

/// One game: score limit, territory, the players, whose turn it is,
/// the shared roll source and the dice of the turn in progress.
#[derive(Debug)]
pub struct Game {
    score_limit: u32,
    territory: Option<PlayerId>,
    players: Vec<PlayerState>,
    current: PlayerId,
    rolls: RollSource,
    latest: DiceSet,
}

impl Game {
    pub fn new(score_limit: u32, num_players: usize, rolls: RollSource) -> Self {
        Self {
            score_limit,
            territory: None,
            players: vec![PlayerState::new(); num_players],
            current: PlayerId::new(0),
            rolls,
            latest: DiceSet::new(),
        }
    }

    pub fn score_limit(&self) -> u32 {
        self.score_limit
    }

    pub fn territory(&self) -> Option<PlayerId> {
        self.territory
    }

    pub fn current(&self) -> PlayerId {
        self.current
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.players.len()).map(PlayerId::new)
    }

    /// The dice of the turn in progress, post any rerolls so far.
    pub fn latest_dice(&self) -> &DiceSet {
        &self.latest
    }

    /// Number of players not yet eliminated.
    pub fn remaining(&self) -> usize {
        self.players.iter().filter(|p| !p.is_eliminated()).count()
    }

    /// Marks a participant connected after a successful handshake.
    pub fn mark_connected(&mut self, id: PlayerId) {
        self.players[id.index()].status = PlayerStatus::Remaining;
    }

    /// Credits the territory-holding bonus if the active player holds
    /// St Lucia. Applied before the roll, so it never depends on the
    /// turn's outcome.
    pub fn apply_territory_bonus(&mut self) {
        if self.territory == Some(self.current) {
            self.players[self.current.index()].points += TERRITORY_HOLD_BONUS;
            debug!(player = %self.current, bonus = TERRITORY_HOLD_BONUS, "territory bonus");
        }
    }

    /// Draws a fresh full set of dice for the active player.
    pub fn roll_fresh(&mut self) {
        self.latest.reset();
        self.rolls.draw_into(DICE_SET_SIZE, &mut self.latest);
    }

    /// Applies a reroll request: remove the named subset from the
    /// latest dice, draw that many replacements, and re-validate that
    /// the set is a full roll again.
    ///
    /// A subset die the player does not hold fails with `MissingDie`
    /// before any replacement is drawn; a post-merge total other than
    /// six fails with `WrongSetSize`.
    pub fn reroll(&mut self, subset: &DiceSet) -> Result<(), DomainError> {
        let mut updated = self.latest.clone();
        for die in subset.dice() {
            updated.remove(die)?;
        }
        self.rolls.draw_into(subset.total(), &mut updated);
        if updated.total() != DICE_SET_SIZE {
            return Err(DomainError::WrongSetSize {
                found: updated.total(),
                expected: DICE_SET_SIZE,
            });
        }
        self.latest = updated;
        Ok(())
    }

    /// Applies the latest dice's healing to the active player.
    ///
    /// Territory holders cannot heal; this is a rule, not an
    /// oversight. Returns the health actually recovered.
    pub fn heal_active(&mut self) -> u32 {
        let healing = self.latest.heals() as u32;
        if healing == 0 || self.territory == Some(self.current) {
            return 0;
        }
        self.players[self.current.index()].heal(healing)
    }

    /// Damages a participant, clamping at zero health. Returns the
    /// damage actually dealt.
    pub fn damage(&mut self, target: PlayerId, amount: u32) -> u32 {
        self.players[target.index()].damage(amount)
    }

    /// Makes the given player the new territory holder and grants the
    /// one-point claim award. Shared by the unclaimed-territory case
    /// and an inward attack resolved as a transfer.
    pub fn claim_territory(&mut self, id: PlayerId) {
        self.territory = Some(id);
        self.players[id.index()].points += 1;
    }

    /// Scores the latest dice for the active player: P faces feed the
    /// token pool (ten tokens roll over into one point, repeatedly);
    /// number faces beyond the free allowance score at face-specific
    /// rates.
    pub fn score_roll(&mut self) {
        let dice = self.latest.clone();
        let player = &mut self.players[self.current.index()];

        player.tokens += dice.points() as u32;
        while player.tokens >= TOKENS_PER_POINT {
            player.tokens -= TOKENS_PER_POINT;
            player.points += 1;
        }

        if dice.ones() > FREE_DICE_ALLOWANCE {
            player.points += (dice.ones() - 2) as u32;
        }
        if dice.twos() > FREE_DICE_ALLOWANCE {
            player.points += (dice.twos() - 1) as u32;
        }
        if dice.threes() > FREE_DICE_ALLOWANCE {
            player.points += dice.threes() as u32;
        }
    }

    /// True if a participant has run out of health but has not been
    /// marked eliminated yet.
    pub fn is_newly_fallen(&self, id: PlayerId) -> bool {
        let player = self.player(id);
        !player.is_eliminated() && player.health == 0
    }

    /// Marks one participant eliminated. The caller announces the
    /// elimination first, while the participant still counts as
    /// remaining and hears its own notice.
    pub fn mark_eliminated(&mut self, id: PlayerId) {
        self.players[id.index()].status = PlayerStatus::Eliminated;
    }

    /// True if every participant other than `id` is eliminated.
    pub fn is_last_remaining(&self, id: PlayerId) -> bool {
        self.ids()
            .filter(|&other| other != id)
            .all(|other| self.player(other).is_eliminated())
    }

    /// True if `id` has reached the score limit.
    pub fn has_won_on_points(&self, id: PlayerId) -> bool {
        self.player(id).points >= self.score_limit
    }

    /// Ends the game: every participant becomes eliminated.
    pub fn finish(&mut self) {
        for player in &mut self.players {
            player.status = PlayerStatus::Eliminated;
        }
    }

    /// Advances the turn circularly to the next non-eliminated
    /// participant. The caller guarantees one exists (the win check
    /// has already handled the everyone-else-eliminated case).
    pub fn advance_turn(&mut self) {
        loop {
            self.current = PlayerId::new((self.current.index() + 1) % self.players.len());
            if !self.player(self.current).is_eliminated() {
                break;
            }
        }
    }
}
