//! The per-player line transport.
//!
//! The coordinator talks to players through the `PlayerLink` trait so
//! the turn state machine can be exercised against scripted links in
//! tests; the production implementation wraps a child process's
//! standard input and output pipes.

use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, ChildStdout};

use stlucia_protocol::READY_BYTE;

/// One player's bidirectional line transport.
#[async_trait]
pub trait PlayerLink: Send {
    /// Performs the one-byte readiness handshake; returns true only
    /// if the player emitted the ready sentinel.
    async fn await_ready(&mut self) -> io::Result<bool>;

    /// Sends one protocol line, appending the terminator and flushing.
    async fn send_line(&mut self, line: &str) -> io::Result<()>;

    /// Receives one line; `None` means the player closed its pipe.
    async fn recv_line(&mut self) -> io::Result<Option<String>>;
}

/// Production link over a child process's pipes.
pub struct ChildLink {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ChildLink {
    pub fn new(stdin: ChildStdin, stdout: ChildStdout) -> Self {
        Self {
            stdin,
            stdout: BufReader::new(stdout),
        }
    }
}

#[async_trait]
impl PlayerLink for ChildLink {
    async fn await_ready(&mut self) -> io::Result<bool> {
        match self.stdout.read_u8().await {
            Ok(byte) => Ok(byte == READY_BYTE),
            // An immediately closed pipe is a failed handshake, not
            // an I/O fault of the hub's
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn send_line(&mut self, line: &str) -> io::Result<()> {
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await
    }

    async fn recv_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = self.stdout.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
