//! St Lucia player programs.
//!
//! A player is a subprocess of the hub: it reads hub messages from
//! standard input, mirrors the game state it can observe, and answers
//! the two questions the protocol ever asks it - which dice to reroll
//! and whether to abandon the territory when attacked. Four binaries
//! share this crate, differing only in their `Strategy`.
//!
//! ```text
//! stdin ──▶ ShadowGame (mirrored state) ──▶ Strategy ──▶ stdout
//! ```

pub mod error;
pub mod runner;
pub mod shadow;
pub mod strategy;

pub use error::PlayerError;
pub use runner::play;
pub use shadow::{ShadowGame, Update};
pub use strategy::{Berserker, Collector, GameView, Holdout, Nomad, Strategy};
