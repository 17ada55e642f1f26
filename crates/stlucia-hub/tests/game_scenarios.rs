//! Integration tests for the turn coordinator.
//!
//! The coordinator is exercised against scripted in-memory links, so
//! every scenario controls exactly what each player replies and can
//! inspect every line the hub sent.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use stlucia_core::{Game, PlayerId, RollSource};
use stlucia_hub::link::PlayerLink;
use stlucia_hub::{Coordinator, HubError, Roster};

/// A link whose replies are scripted up front and whose received
/// lines are recorded for inspection.
struct ScriptLink {
    replies: VecDeque<String>,
    received: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl PlayerLink for ScriptLink {
    async fn await_ready(&mut self) -> io::Result<bool> {
        Ok(true)
    }

    async fn send_line(&mut self, line: &str) -> io::Result<()> {
        self.received.lock().expect("lock").push(line.to_string());
        Ok(())
    }

    async fn recv_line(&mut self) -> io::Result<Option<String>> {
        // Script exhausted means the player closed its pipe
        Ok(self.replies.pop_front().map(|line| format!("{line}\n")))
    }
}

/// Per-player transcript of everything the hub sent.
type Transcript = Arc<Mutex<Vec<String>>>;

fn fixture(
    rolls: &str,
    score_limit: u32,
    scripts: &[&[&str]],
) -> (Game, Vec<Box<dyn PlayerLink>>, Vec<Transcript>) {
    let source = RollSource::parse(rolls).expect("valid rolls");
    let game = Game::new(score_limit, scripts.len(), source);

    let mut links: Vec<Box<dyn PlayerLink>> = Vec::new();
    let mut transcripts = Vec::new();
    for script in scripts {
        let received: Transcript = Arc::new(Mutex::new(Vec::new()));
        transcripts.push(received.clone());
        links.push(Box::new(ScriptLink {
            replies: script.iter().map(|s| s.to_string()).collect(),
            received,
        }));
    }
    (game, links, transcripts)
}

fn coordinator(mut game: Game, links: Vec<Box<dyn PlayerLink>>) -> Coordinator {
    let roster = Roster::from_links(links, &mut game);
    Coordinator::new(game, roster, CancellationToken::new())
}

fn lines(transcript: &Transcript) -> Vec<String> {
    transcript.lock().expect("lock").clone()
}

const A: PlayerId = PlayerId::new(0);
const B: PlayerId = PlayerId::new(1);

#[tokio::test]
async fn test_turn_with_claim_and_scoring() {
    let (game, links, transcripts) =
        fixture("123AAP", 50, &[&["keepall"], &["keepall"]]);
    let mut hub = coordinator(game, links);

    let outcome = hub.run_turn().await.expect("turn completes");
    assert_eq!(outcome, None);

    // Active player: the offer, then the claim and points broadcasts
    assert_eq!(
        lines(&transcripts[0]),
        vec!["turn 123AAP", "claim A", "points A 1"]
    );
    // Bystander: the final roll, then the same broadcasts
    assert_eq!(
        lines(&transcripts[1]),
        vec!["rolled A 123AAP", "claim A", "points A 1"]
    );

    assert_eq!(hub.game().territory(), Some(A));
    assert_eq!(hub.game().player(A).points, 1);
    assert_eq!(hub.game().current(), B);
}

#[tokio::test]
async fn test_reroll_negotiation() {
    let (game, links, transcripts) =
        fixture("111222PP", 50, &[&["reroll 22", "keepall"], &[]]);
    let mut hub = coordinator(game, links);

    hub.run_turn().await.expect("turn completes");

    let sent = lines(&transcripts[0]);
    assert_eq!(sent[0], "turn 111222");
    // Two 2s replaced with the next two dice from the source
    assert_eq!(sent[1], "rerolled 1112PP");
    assert_eq!(lines(&transcripts[1])[0], "rolled A 1112PP");
}

#[tokio::test]
async fn test_reroll_of_absent_die_is_malformed() {
    let (game, links, transcripts) = fixture("111222", 50, &[&["reroll H"], &[]]);
    let mut hub = coordinator(game, links);

    let err = hub.run_turn().await.expect_err("reroll of absent die");
    assert!(matches!(err, HubError::InvalidMessage));
    assert_eq!(err.exit_code(), 7);

    // No reroll was applied, nothing further was sent
    assert_eq!(lines(&transcripts[0]), vec!["turn 111222"]);
    assert!(lines(&transcripts[1]).is_empty());
}

#[tokio::test]
async fn test_lethal_inward_attack_transfers_territory() {
    let (mut game, links, transcripts) =
        fixture("1123AA", 50, &[&["keepall"], &["stay"]]);
    game.claim_territory(B);
    game.player_mut(B).health = 2;
    let mut hub = coordinator(game, links);

    // B is dead at reply time; its "stay" cannot save the territory,
    // and A then wins as the last player standing.
    let outcome = hub.run_turn().await.expect("turn completes");
    assert_eq!(outcome, Some(A));

    assert_eq!(
        lines(&transcripts[0]),
        vec![
            "turn 1123AA",
            "attacks A 2 in",
            "claim A",
            "points A 1",
            "eliminated B",
            "winner A"
        ]
    );
    // The victim hears its own elimination but not the winner notice
    assert_eq!(
        lines(&transcripts[1]),
        vec![
            "rolled A 1123AA",
            "attacks A 2 in",
            "stay?",
            "claim A",
            "points A 1",
            "eliminated B"
        ]
    );
    assert_eq!(hub.game().territory(), Some(A));
}

#[tokio::test]
async fn test_surviving_holder_may_stay() {
    let (mut game, links, transcripts) =
        fixture("1123AA", 50, &[&["keepall"], &["stay"]]);
    game.claim_territory(B);
    let mut hub = coordinator(game, links);

    hub.run_turn().await.expect("turn completes");

    assert_eq!(hub.game().territory(), Some(B));
    assert_eq!(hub.game().player(B).health, 8);
    // No claim, no points for A this turn
    assert_eq!(lines(&transcripts[0]), vec!["turn 1123AA", "attacks A 2 in"]);
}

#[tokio::test]
async fn test_surviving_holder_may_go() {
    let (mut game, links, _transcripts) =
        fixture("1123AA", 50, &[&["keepall"], &["go"]]);
    game.claim_territory(B);
    let mut hub = coordinator(game, links);

    hub.run_turn().await.expect("turn completes");

    assert_eq!(hub.game().territory(), Some(A));
    assert_eq!(hub.game().player(A).points, 1);
}

#[tokio::test]
async fn test_holder_turn_attacks_outward() {
    let (mut game, links, transcripts) =
        fixture("12HHAA", 50, &[&["keepall"], &["keepall"]]);
    game.claim_territory(A);
    game.player_mut(A).health = 5;
    let mut hub = coordinator(game, links);

    hub.run_turn().await.expect("turn completes");

    // Holders cannot heal themselves
    assert_eq!(hub.game().player(A).health, 5);
    assert_eq!(hub.game().player(B).health, 8);
    // Claim point plus the start-of-turn holding bonus
    assert_eq!(hub.game().player(A).points, 3);
    assert_eq!(
        lines(&transcripts[0]),
        vec!["turn 12HHAA", "attacks A 2 out", "points A 2"]
    );
    assert_eq!(
        lines(&transcripts[1]),
        vec!["rolled A 12HHAA", "attacks A 2 out", "points A 2"]
    );
}

#[tokio::test]
async fn test_win_on_points_broadcasts_winner() {
    let (mut game, links, transcripts) =
        fixture("111222", 3, &[&["keepall"], &["keepall"]]);
    game.player_mut(A).points = 1;
    let mut hub = coordinator(game, links);

    // Three 1s score 1, three 2s score 2; 1 + 3 >= the limit
    let outcome = hub.run_turn().await.expect("turn completes");
    assert_eq!(outcome, Some(A));
    assert!(lines(&transcripts[0]).contains(&"winner A".to_string()));
    assert!(lines(&transcripts[1]).contains(&"winner A".to_string()));
}

#[tokio::test]
async fn test_stay_during_negotiation_is_illegal() {
    let (game, links, _transcripts) = fixture("111222", 50, &[&["stay"], &[]]);
    let mut hub = coordinator(game, links);

    let err = hub.run_turn().await.expect_err("stay has no place here");
    assert!(matches!(err, HubError::InvalidRequest));
    assert_eq!(err.exit_code(), 8);
}

#[tokio::test]
async fn test_gibberish_reply_is_malformed() {
    let (game, links, _transcripts) = fixture("111222", 50, &[&["flee now"], &[]]);
    let mut hub = coordinator(game, links);

    let err = hub.run_turn().await.expect_err("unknown verb");
    assert!(matches!(err, HubError::InvalidMessage));
}

#[tokio::test]
async fn test_closed_pipe_is_player_quit() {
    let (game, links, _transcripts) = fixture("111222", 50, &[&[], &[]]);
    let mut hub = coordinator(game, links);

    let err = hub.run_turn().await.expect_err("no reply at all");
    assert!(matches!(err, HubError::PlayerQuit));
    assert_eq!(err.exit_code(), 6);
}

#[tokio::test]
async fn test_run_plays_to_a_winner() {
    // A claims on its first turn and stays when B strikes inward;
    // the holding bonus then carries A to a points win on its second
    // turn.
    let (game, links, _transcripts) = fixture(
        "123AAP123HAP",
        3,
        &[&["keepall", "stay", "keepall"], &["keepall"]],
    );
    let mut hub = coordinator(game, links);

    let winner = hub.run().await.expect("game plays out");
    assert_eq!(winner, A);
    // The game is over; everyone is out of the remaining set
    assert_eq!(hub.game().remaining(), 0);
}

#[tokio::test]
async fn test_cancellation_interrupts_a_blocked_read() {
    struct PendingLink {
        received: Transcript,
    }

    #[async_trait]
    impl PlayerLink for PendingLink {
        async fn await_ready(&mut self) -> io::Result<bool> {
            Ok(true)
        }

        async fn send_line(&mut self, line: &str) -> io::Result<()> {
            self.received.lock().expect("lock").push(line.to_string());
            Ok(())
        }

        async fn recv_line(&mut self) -> io::Result<Option<String>> {
            std::future::pending().await
        }
    }

    let source = RollSource::parse("111222").expect("valid rolls");
    let mut game = Game::new(50, 2, source);
    let links: Vec<Box<dyn PlayerLink>> = (0..2)
        .map(|_| {
            Box::new(PendingLink {
                received: Arc::new(Mutex::new(Vec::new())),
            }) as Box<dyn PlayerLink>
        })
        .collect();
    let roster = Roster::from_links(links, &mut game);
    let cancel = CancellationToken::new();
    let mut hub = Coordinator::new(game, roster, cancel.clone());

    cancel.cancel();
    let err = hub.run_turn().await.expect_err("read was cancelled");
    assert!(matches!(err, HubError::Interrupted));
    assert_eq!(err.exit_code(), 9);
}
