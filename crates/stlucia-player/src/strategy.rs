//! The four playing styles.
//!
//! A strategy answers two questions: which of the current dice to
//! throw back for a reroll (an empty subset commits the roll), and
//! whether to abandon the territory when attacked there. Strategies
//! are pure over a `GameView`; the runner owns all I/O and the shadow
//! owns all state.

use stlucia_core::{DiceSet, Die, PlayerId};

/// Read-only snapshot of the shadow state a strategy decides from.
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    pub me: PlayerId,
    /// The turn's dice as last offered.
    pub latest: &'a DiceSet,
    pub territory: Option<PlayerId>,
    pub my_health: u32,
    /// Health of the territory holder, when there is one.
    pub holder_health: Option<u32>,
    /// Players not yet eliminated.
    pub remaining: usize,
}

impl GameView<'_> {
    fn holds_territory(&self) -> bool {
        self.territory == Some(self.me)
    }
}

pub trait Strategy {
    /// The subset of the offered dice to reroll; empty means keep.
    fn plan_reroll(&self, view: &GameView) -> DiceSet;

    /// Whether to cede the territory when attacked in it.
    fn wants_retreat(&self, view: &GameView) -> bool;
}

fn take(subset: &mut DiceSet, die: Die, count: u8) {
    for _ in 0..count {
        subset.add(die);
    }
}

/// Chases scoring combinations: rerolls number faces short of a
/// triple and everything that is not a number, keeping H faces only
/// when hurt. Retreats when low.
pub struct Collector;

const TRIPLE: u8 = 3;

impl Strategy for Collector {
    fn plan_reroll(&self, view: &GameView) -> DiceSet {
        let dice = view.latest;
        let mut subset = DiceSet::new();
        if dice.ones() < TRIPLE {
            take(&mut subset, Die::One, dice.ones());
        }
        if dice.twos() < TRIPLE {
            take(&mut subset, Die::Two, dice.twos());
        }
        if dice.threes() < TRIPLE {
            take(&mut subset, Die::Three, dice.threes());
        }
        if view.my_health > 5 {
            take(&mut subset, Die::Heal, dice.heals());
        }
        take(&mut subset, Die::Attack, dice.attacks());
        take(&mut subset, Die::Point, dice.points());
        subset
    }

    fn wants_retreat(&self, view: &GameView) -> bool {
        view.my_health < 5
    }
}

/// Keeps almost everything: rerolls attack faces only when hurt.
/// Retreats when hurt, except head-to-head where the territory is
/// worth holding to the end.
pub struct Holdout;

impl Strategy for Holdout {
    fn plan_reroll(&self, view: &GameView) -> DiceSet {
        let mut subset = DiceSet::new();
        if view.my_health < 5 {
            take(&mut subset, Die::Attack, view.latest.attacks());
        }
        subset
    }

    fn wants_retreat(&self, view: &GameView) -> bool {
        if view.remaining == 2 {
            return false;
        }
        view.my_health < 4
    }
}

/// Hunts the territory holder: keeps attack faces that already
/// suffice to finish the holder, rerolls everything else. Never
/// retreats.
pub struct Berserker;

impl Strategy for Berserker {
    fn plan_reroll(&self, view: &GameView) -> DiceSet {
        let dice = view.latest;
        let mut subset = DiceSet::new();
        if view.holds_territory() {
            take(&mut subset, Die::Attack, dice.attacks());
        } else {
            take(&mut subset, Die::Point, dice.points());
            let lethal = view
                .holder_health
                .is_some_and(|health| dice.attacks() as u32 >= health);
            if !lethal {
                take(&mut subset, Die::Attack, dice.attacks());
            }
        }
        take(&mut subset, Die::One, dice.ones());
        take(&mut subset, Die::Two, dice.twos());
        take(&mut subset, Die::Three, dice.threes());
        take(&mut subset, Die::Heal, dice.heals());
        subset
    }

    fn wants_retreat(&self, _view: &GameView) -> bool {
        false
    }
}

/// Drifts with the territory: keeps attack faces as the holder and
/// heal faces otherwise, rerolling the rest. Always retreats.
pub struct Nomad;

impl Strategy for Nomad {
    fn plan_reroll(&self, view: &GameView) -> DiceSet {
        let dice = view.latest;
        let mut subset = DiceSet::new();
        if view.holds_territory() {
            take(&mut subset, Die::Heal, dice.heals());
        } else {
            take(&mut subset, Die::Attack, dice.attacks());
        }
        take(&mut subset, Die::One, dice.ones());
        take(&mut subset, Die::Two, dice.twos());
        take(&mut subset, Die::Three, dice.threes());
        take(&mut subset, Die::Point, dice.points());
        subset
    }

    fn wants_retreat(&self, _view: &GameView) -> bool {
        true
    }
}
