use std::sync::Arc;
use std::time::Duration;

use arcade_hub::consts::VIEW_HOME;
use arcade_hub::persistence::MemoryStore;
use arcade_hub::platform::{HeadlessNavigator, StoredIdentity};
use arcade_hub::renderer::DrawList;
use arcade_hub::runtime::{Banner, MemoryLedger, RewardOutcome, RunState};
use arcade_hub::{Arcade, ArcadeError, Settings};

fn arcade(named: bool, ledger: Option<Arc<MemoryLedger>>) -> Arcade<MemoryLedger> {
    let mut store = MemoryStore::new();
    let mut identity = StoredIdentity::default();
    if named {
        identity.set_name(&mut store, "neo_1").unwrap();
    }
    Arcade::new(
        Settings::default(),
        Box::new(store),
        Box::new(identity),
        Box::new(HeadlessNavigator::default()),
        ledger,
    )
}

/// Step the active game in 100 ms frames until its run ends
fn play_until_over(arcade: &mut Arcade<MemoryLedger>, start_ms: f64) -> f64 {
    let mut canvas = DrawList::new(900.0, 520.0);
    let mut now = start_ms;
    for _ in 0..2000 {
        let ended = arcade.frame(now, &mut canvas);
        now += 100.0;
        if ended {
            return now;
        }
    }
    panic!("run never ended");
}

#[test]
fn test_missing_name_redirects_home() {
    let mut arcade = arcade(false, Some(Arc::new(MemoryLedger::new())));
    arcade.navigate("tetris");

    let result = arcade.start_game("tetris", 0.0);
    assert!(matches!(result, Err(ArcadeError::MissingPlayerName)));
    assert_eq!(arcade.active_view(), VIEW_HOME);
    assert_eq!(arcade.status(), "Set your player name first.");
    assert_eq!(arcade.state("tetris"), RunState::Idle);
}

#[test]
fn test_missing_ledger_disables_play() {
    let mut arcade = arcade(true, None);
    arcade.navigate("snake");
    assert!(!arcade.play_enabled());

    let result = arcade.start_game("snake", 0.0);
    assert!(matches!(result, Err(ArcadeError::LedgerUnavailable)));
    assert_eq!(arcade.state("snake"), RunState::Idle);
    let host = arcade.host("snake").unwrap();
    assert!(!host.borrow().status().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_full_run_is_submitted_once() {
    let ledger = Arc::new(MemoryLedger::new().with_total(50));
    let mut arcade = arcade(true, Some(Arc::clone(&ledger)));
    arcade.navigate("inbox");
    arcade.start_game("inbox", 0.0).unwrap();

    let now = play_until_over(&mut arcade, 0.0);
    assert_eq!(arcade.state("inbox"), RunState::Over);
    assert_eq!(arcade.pending_claims(), 1);
    assert!(matches!(arcade.banner("inbox"), Some(Banner::GameOver { .. })));

    // Further frames never produce a second claim
    let mut canvas = DrawList::new(900.0, 520.0);
    for i in 0..20 {
        assert!(!arcade.frame(now + i as f64 * 16.0, &mut canvas));
    }

    let reports = arcade.submit_pending().await;
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.game_id, "inbox");
    assert_eq!(
        report.outcome,
        RewardOutcome::Awarded {
            total: 50 + report.coins as u64
        }
    );
    assert_eq!(arcade.banner("inbox").unwrap().title(), "Submitted!");
    assert_eq!(ledger.awards()[0].game_key, "inbox_invaders");

    assert!(arcade.submit_pending().await.is_empty());
    assert_eq!(ledger.award_calls(), 1);

    let best = arcade.best_scores("inbox_invaders");
    if report.score > 0 {
        assert_eq!(best.best(), report.score);
    } else {
        assert!(best.is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_ledger_reports_timeout() {
    let ledger = Arc::new(MemoryLedger::new().with_latency(Duration::from_secs(40)));
    let mut arcade = arcade(true, Some(Arc::clone(&ledger)));
    arcade.start_game("inbox", 0.0).unwrap();
    play_until_over(&mut arcade, 0.0);

    let reports = arcade.submit_pending().await;
    assert_eq!(
        reports[0].outcome,
        RewardOutcome::Failed {
            message: "timeout".to_string()
        }
    );
    match arcade.banner("inbox").unwrap() {
        Banner::SubmitFailed { coins, message, .. } => {
            assert_eq!(coins, reports[0].coins);
            assert_eq!(message, "timeout");
        }
        other => panic!("unexpected banner {:?}", other),
    }
    assert_eq!(ledger.award_calls(), 1);
}

#[test]
fn test_navigating_away_stops_the_game() {
    let mut arcade = arcade(true, Some(Arc::new(MemoryLedger::new())));
    arcade.start_game("snake", 0.0).unwrap();
    let mut canvas = DrawList::new(900.0, 520.0);
    arcade.frame(0.0, &mut canvas);
    arcade.frame(16.0, &mut canvas);
    assert_eq!(arcade.state("snake"), RunState::Playing);

    arcade.navigate("leaderboard");
    assert_eq!(arcade.state("snake"), RunState::Idle);
    assert!(!arcade.host("snake").unwrap().borrow().is_running());
    assert!(!arcade.frame(32.0, &mut canvas));
}

#[test]
fn test_switching_games_leaves_one_running() {
    let mut arcade = arcade(true, Some(Arc::new(MemoryLedger::new())));
    arcade.start_game("snake", 0.0).unwrap();
    arcade.start_game("pong", 10.0).unwrap();

    assert_eq!(arcade.state("snake"), RunState::Idle);
    assert_eq!(arcade.state("pong"), RunState::Playing);
    let running = arcade
        .game_ids()
        .filter(|id| arcade.host(id).unwrap().borrow().is_running())
        .count();
    assert_eq!(running, 1);
}

#[tokio::test(start_paused = true)]
async fn test_result_for_replaced_session_is_dropped() {
    let ledger = Arc::new(MemoryLedger::new());
    let mut arcade = arcade(true, Some(Arc::clone(&ledger)));
    arcade.start_game("inbox", 0.0).unwrap();
    let now = play_until_over(&mut arcade, 0.0);

    let claims = arcade.take_pending();
    assert_eq!(claims.len(), 1);

    // The player starts over before the ledger answers
    arcade.start_game("inbox", now).unwrap();

    let pipeline = arcade.pipeline().unwrap();
    let mut reports = Vec::new();
    for claim in claims {
        reports.push(pipeline.submit(claim).await);
    }
    assert!(reports[0].outcome.is_awarded());
    assert!(!arcade.deliver(&reports[0]));
    assert_eq!(arcade.banner("inbox"), Some(Banner::Hidden));
    assert_eq!(arcade.state("inbox"), RunState::Playing);
}
