//! Subprocess orchestration: spawning, handshake, shutdown, reaping.
//!
//! Each participant is launched with exactly two positional arguments
//! (player count, single-letter label), its stdin/stdout wired to the
//! hub and its stderr discarded. A participant only becomes part of
//! the game after the one-byte readiness handshake; spawn failures
//! are never retried. The roster owns every child it ever spawned, so
//! a partial launch still gets reaped on the way out.

use std::os::unix::process::ExitStatusExt;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stlucia_core::{Game, PlayerId, PlayerStatus};
use stlucia_protocol::HubMessage;

use crate::error::HubError;
use crate::link::{ChildLink, PlayerLink};

/// Bounded wait for a child to exit during shutdown.
pub const REAP_TIMEOUT: Duration = Duration::from_secs(2);

/// One launched participant: its transport and, for real processes,
/// the child handle to reap.
pub struct Seat {
    pub id: PlayerId,
    pub link: Box<dyn PlayerLink>,
    child: Option<Child>,
}

/// All participants the hub has launched so far.
pub struct Roster {
    seats: Vec<Seat>,
}

impl Roster {
    pub fn new() -> Self {
        Self { seats: Vec::new() }
    }

    /// Builds a roster from pre-wired links, marking every seat
    /// connected. Used by tests that script the player side.
    pub fn from_links(links: Vec<Box<dyn PlayerLink>>, game: &mut Game) -> Self {
        let mut roster = Self::new();
        for (index, link) in links.into_iter().enumerate() {
            let id = PlayerId::new(index);
            game.mark_connected(id);
            roster.seats.push(Seat {
                id,
                link,
                child: None,
            });
        }
        roster
    }

    pub fn seat_mut(&mut self, id: PlayerId) -> &mut Seat {
        &mut self.seats[id.index()]
    }

    /// Spawns one process per program and performs the readiness
    /// handshake for each, marking participants connected in turn.
    ///
    /// On failure the roster keeps whatever was already spawned so
    /// the caller's shutdown path can reap it.
    pub async fn launch(
        &mut self,
        programs: &[String],
        game: &mut Game,
        cancel: &CancellationToken,
    ) -> Result<(), HubError> {
        let count = programs.len();
        for (index, program) in programs.iter().enumerate() {
            let id = PlayerId::new(index);
            let mut child = Command::new(program)
                .arg(count.to_string())
                .arg(id.label().to_string())
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .spawn()
                .map_err(HubError::Piping)?;

            let stdin = child
                .stdin
                .take()
                .ok_or_else(|| HubError::Piping(broken_pipe("no stdin pipe")))?;
            let stdout = child
                .stdout
                .take()
                .ok_or_else(|| HubError::Piping(broken_pipe("no stdout pipe")))?;
            let link = ChildLink::new(stdin, stdout);

            // Seat the child before the handshake so a failure still
            // leaves it owned by the roster for reaping.
            self.seats.push(Seat {
                id,
                link: Box::new(link),
                child: Some(child),
            });
            let seat = self
                .seats
                .last_mut()
                .ok_or_else(|| HubError::Piping(broken_pipe("seat missing")))?;

            let ready = tokio::select! {
                _ = cancel.cancelled() => return Err(HubError::Interrupted),
                ready = seat.link.await_ready() => ready.map_err(HubError::Piping)?,
            };
            if !ready {
                return Err(HubError::Piping(broken_pipe("bad handshake byte")));
            }
            game.mark_connected(id);
            debug!(player = %id, program = %program, "player connected");
        }
        Ok(())
    }

    /// Shuts the game down: optionally notifies the remaining players,
    /// then reaps every spawned child with a bounded wait, killing
    /// anything that will not exit.
    pub async fn shutdown(&mut self, game: &Game, notify: bool) {
        if notify {
            let line = HubMessage::Shutdown.to_string();
            for seat in &mut self.seats {
                if game.player(seat.id).status != PlayerStatus::Remaining {
                    continue;
                }
                if let Err(e) = seat.link.send_line(&line).await {
                    debug!(player = %seat.id, error = %e, "shutdown notice not delivered");
                }
            }
        }

        for seat in &mut self.seats {
            let Some(child) = seat.child.as_mut() else {
                continue;
            };
            match timeout(REAP_TIMEOUT, child.wait()).await {
                Ok(Ok(status)) => {
                    if let Some(signal) = status.signal() {
                        let _ = child.start_kill();
                        warn!(player = %seat.id, signal, "player terminated due to signal");
                    } else if let Some(code) = status.code() {
                        if code != 0 {
                            warn!(player = %seat.id, code, "player exited with non-zero status");
                        }
                    }
                }
                Ok(Err(e)) => {
                    warn!(player = %seat.id, error = %e, "failed to wait for player");
                }
                Err(_) => {
                    warn!(player = %seat.id, "player did not exit in time, killing");
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                }
            }
            seat.child = None;
        }
        info!("all players reaped");
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

fn broken_pipe(message: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::BrokenPipe, message.to_string())
}
