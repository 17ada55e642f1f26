//! St Lucia hub - process orchestration and turn coordination.
//!
//! This crate provides the hub's infrastructure:
//! - `cli` - command-line contract
//! - `link` - the per-player line transport seam
//! - `spawn` - subprocess orchestrator (pipes, handshake, reaping)
//! - `coordinator` - the authoritative turn state machine
//! - `error` - the exit-code taxonomy every fatal path maps to
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     stlucia hub                          │
//! │                                                          │
//! │  ┌─────────────┐  owns   ┌──────────────────────────┐    │
//! │  │ Coordinator │────────▶│  Game (stlucia-core)     │    │
//! │  │ (turn loop) │         │  players/territory/rolls │    │
//! │  └──────┬──────┘         └──────────────────────────┘    │
//! │         │ request/reply, lock-step                       │
//! │         ▼                                                │
//! │  ┌─────────────┐  pipes  ┌──────────────────────────┐    │
//! │  │   Roster    │◀───────▶│  player processes (N)    │    │
//! │  │ (PlayerLink)│         │  stdin/stdout, stderr /dev/null │
//! │  └─────────────┘         └──────────────────────────┘    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The hub is strictly synchronous in protocol terms: one
//! outstanding request at a time, every reply awaited before the
//! next state change. Signals only cancel a token the coordinator
//! selects on at each blocking read.

pub mod cli;
pub mod coordinator;
pub mod error;
pub mod link;
pub mod spawn;

pub use coordinator::Coordinator;
pub use error::HubError;
pub use spawn::{Roster, Seat};
