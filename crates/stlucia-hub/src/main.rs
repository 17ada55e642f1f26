//! St Lucia hub binary.
//!
//! # Usage
//!
//! ```bash
//! stlucia rollfile winscore prog1 prog2 [prog3 [prog4]]
//!
//! # Enable debug logging
//! RUST_LOG=stlucia_hub=debug stlucia rolls.txt 10 ./collector ./berserker
//! ```
//!
//! The hub spawns one subprocess per player program, referees the
//! contest over their pipes, and prints one diagnostic line on any
//! fatal failure. The exit code identifies the failure class; 0 means
//! a game was played to a winner.

use std::process;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use stlucia_core::{Game, RollSource};
use stlucia_hub::cli::Args;
use stlucia_hub::{Coordinator, HubError, Roster};

fn main() {
    process::exit(run());
}

#[tokio::main]
async fn run() -> i32 {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::from_env() {
        Ok(args) => args,
        Err(e) => return report(&e),
    };
    let score_limit = match args.score_limit() {
        Ok(score) => score,
        Err(e) => return report(&e),
    };
    let rolls = match RollSource::load(&args.rollfile) {
        Ok(rolls) => rolls,
        Err(e) => return report(&HubError::from_roll_error(e)),
    };
    let mut game = Game::new(score_limit, args.programs.len(), rolls);

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_interrupt().await {
            error!(error = %e, "failed to install signal handlers");
        }
        signal_token.cancel();
    });

    info!(
        players = args.programs.len(),
        score_limit,
        "starting game"
    );

    let mut roster = Roster::new();
    if let Err(e) = roster.launch(&args.programs, &mut game, &cancel).await {
        roster.shutdown(&game, e.notifies_players()).await;
        return report(&e);
    }

    let mut coordinator = Coordinator::new(game, roster, cancel);
    match coordinator.run().await {
        Ok(winner) => {
            info!(player = %winner, "game over");
            coordinator.shutdown(true).await;
            0
        }
        Err(e) => {
            coordinator.shutdown(e.notifies_players()).await;
            report(&e)
        }
    }
}

/// Prints the single diagnostic line and yields the exit code.
fn report(err: &HubError) -> i32 {
    eprintln!("{err}");
    err.exit_code()
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn wait_for_interrupt() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => info!("received SIGINT"),
        _ = sigterm.recv() => info!("received SIGTERM"),
    }
    Ok(())
}
