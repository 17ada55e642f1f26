//! The deterministic roll source.
//!
//! Rolls come from a pre-loaded sequence of face characters and are
//! handed out in order, wrapping around when exhausted. Two runs with
//! the same roll file produce byte-identical outcomes, which is what
//! makes the hub's behaviour testable end to end.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::dice::{Die, DiceSet};

/// Errors raised while loading or reading a roll source.
#[derive(Error, Debug)]
pub enum RollError {
    /// The roll file could not be opened or read
    #[error("Unable to access roll file: {0}")]
    Open(#[from] std::io::Error),

    /// A character outside the legal face alphabet
    #[error("Invalid roll character: '{found}'")]
    InvalidCharacter { found: char },

    /// No faces at all after skipping newlines
    #[error("Roll file contains no rolls")]
    Empty,
}

/// A cyclic, read-only sequence of die faces with a cursor.
///
/// Invariant: the face list is non-empty and the cursor stays in
/// `[0, len)`; reads past the end wrap to the start.
#[derive(Debug, Clone)]
pub struct RollSource {
    faces: Vec<Die>,
    cursor: usize,
}

impl RollSource {
    /// Parses a roll sequence from text.
    ///
    /// Newlines are separators and are skipped; every other character
    /// must be one of the six faces. An empty effective sequence is an
    /// error.
    pub fn parse(text: &str) -> Result<Self, RollError> {
        let mut faces = Vec::new();
        for c in text.chars() {
            if c == '\n' {
                continue;
            }
            let die =
                Die::from_char(c).map_err(|_| RollError::InvalidCharacter { found: c })?;
            faces.push(die);
        }
        if faces.is_empty() {
            return Err(RollError::Empty);
        }
        Ok(Self { faces, cursor: 0 })
    }

    /// Loads a roll source from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RollError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Number of faces in one cycle of the sequence.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the next face, advancing the cursor with wraparound.
    pub fn next_die(&mut self) -> Die {
        let die = self.faces[self.cursor];
        self.cursor = (self.cursor + 1) % self.faces.len();
        die
    }

    /// Draws `n` faces into a fresh dice set.
    pub fn draw(&mut self, n: u8) -> DiceSet {
        let mut set = DiceSet::new();
        self.draw_into(n, &mut set);
        set
    }

    /// Draws `n` faces, merging them into an existing set.
    pub fn draw_into(&mut self, n: u8, set: &mut DiceSet) {
        for _ in 0..n {
            set.add(self.next_die());
        }
    }
}
