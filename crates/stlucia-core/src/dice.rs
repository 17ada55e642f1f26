//! Die faces and multisets of dice.
//!
//! The canonical string form of a dice set is part of the wire
//! protocol: all `1`s, then `2`s, `3`s, `H`s, `A`s, `P`s, with no
//! separators. Both sides must reproduce it exactly.

use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Number of dice in a full roll.
pub const DICE_SET_SIZE: u8 = 6;

/// One face of a St Lucia die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Die {
    One,
    Two,
    Three,
    Heal,
    Attack,
    Point,
}

/// All faces in canonical order.
pub const FACES: [Die; 6] = [
    Die::One,
    Die::Two,
    Die::Three,
    Die::Heal,
    Die::Attack,
    Die::Point,
];

impl Die {
    /// Parses a single face character.
    pub fn from_char(c: char) -> Result<Self, DomainError> {
        match c {
            '1' => Ok(Die::One),
            '2' => Ok(Die::Two),
            '3' => Ok(Die::Three),
            'H' => Ok(Die::Heal),
            'A' => Ok(Die::Attack),
            'P' => Ok(Die::Point),
            found => Err(DomainError::InvalidDieFace { found }),
        }
    }

    /// The wire character for this face.
    pub fn as_char(self) -> char {
        match self {
            Die::One => '1',
            Die::Two => '2',
            Die::Three => '3',
            Die::Heal => 'H',
            Die::Attack => 'A',
            Die::Point => 'P',
        }
    }

    fn index(self) -> usize {
        match self {
            Die::One => 0,
            Die::Two => 1,
            Die::Three => 2,
            Die::Heal => 3,
            Die::Attack => 4,
            Die::Point => 5,
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A multiset of die faces, one counter per face.
///
/// Invariant: the sum of the counters is the number of dice the set
/// represents (0 for an empty set, exactly 6 for a full roll).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiceSet {
    counts: [u8; 6],
}

impl DiceSet {
    /// Creates an empty dice set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dice showing the given face.
    pub fn count(&self, die: Die) -> u8 {
        self.counts[die.index()]
    }

    /// Adds one die to the set.
    pub fn add(&mut self, die: Die) {
        self.counts[die.index()] += 1;
    }

    /// Removes one die from the set.
    ///
    /// Fails if the face is not present; a reroll request naming a
    /// die the player does not hold is a protocol violation, never a
    /// silent decrement.
    pub fn remove(&mut self, die: Die) -> Result<(), DomainError> {
        let slot = &mut self.counts[die.index()];
        if *slot == 0 {
            return Err(DomainError::MissingDie { die: die.as_char() });
        }
        *slot -= 1;
        Ok(())
    }

    /// Total number of dice in the set.
    pub fn total(&self) -> u8 {
        self.counts.iter().sum()
    }

    /// Returns true if the set holds no dice.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Clears the set back to empty.
    pub fn reset(&mut self) {
        self.counts = [0; 6];
    }

    /// Iterates the dice in canonical order, one item per die.
    pub fn dice(&self) -> impl Iterator<Item = Die> + '_ {
        FACES
            .iter()
            .flat_map(move |&face| std::iter::repeat(face).take(self.count(face) as usize))
    }

    pub fn ones(&self) -> u8 {
        self.count(Die::One)
    }

    pub fn twos(&self) -> u8 {
        self.count(Die::Two)
    }

    pub fn threes(&self) -> u8 {
        self.count(Die::Three)
    }

    pub fn heals(&self) -> u8 {
        self.count(Die::Heal)
    }

    pub fn attacks(&self) -> u8 {
        self.count(Die::Attack)
    }

    pub fn points(&self) -> u8 {
        self.count(Die::Point)
    }
}

impl fmt::Display for DiceSet {
    /// Renders the canonical string form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for die in self.dice() {
            write!(f, "{}", die.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for DiceSet {
    type Err = DomainError;

    /// Parses a dice string of any length; rejects non-face
    /// characters. Length checks are the caller's concern.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = DiceSet::new();
        for c in s.chars() {
            set.add(Die::from_char(c)?);
        }
        Ok(set)
    }
}

impl FromIterator<Die> for DiceSet {
    fn from_iter<T: IntoIterator<Item = Die>>(iter: T) -> Self {
        let mut set = DiceSet::new();
        for die in iter {
            set.add(die);
        }
        set
    }
}
