//! Arcade Hub - headless entry point
//!
//! Plays one run of a game on a 60 Hz interval, submits the reward
//! to an in-memory ledger and prints the outcome.
//!
//! Usage: `arcade-hub [game] [player-name]` (defaults: breakout, player_one)

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

use arcade_hub::consts::{FIELD_HEIGHT, FIELD_WIDTH, VIEW_HOME};
use arcade_hub::persistence::MemoryStore;
use arcade_hub::platform::{HeadlessNavigator, StoredIdentity};
use arcade_hub::renderer::DrawList;
use arcade_hub::runtime::MemoryLedger;
use arcade_hub::{Arcade, ArcadeError, Settings};

/// Display refresh stand-in
const FRAME_PERIOD: Duration = Duration::from_micros(16_667);
/// Give up on runs that never end on their own (ten minutes)
const MAX_FRAMES: u32 = 60 * 600;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ArcadeError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let game = args.next().unwrap_or_else(|| "breakout".to_string());
    let name = args.next().unwrap_or_else(|| "player_one".to_string());

    let mut store = MemoryStore::new();
    let mut identity = StoredIdentity::load(&store);
    identity.set_name(&mut store, &name)?;

    let ledger = Arc::new(MemoryLedger::new().with_latency(Duration::from_millis(150)));
    let mut arcade = Arcade::new(
        Settings::default(),
        Box::new(store),
        Box::new(identity),
        Box::new(HeadlessNavigator::default()),
        Some(Arc::clone(&ledger)),
    );

    arcade.navigate(&game);
    let session = arcade.start_game(&game, 0.0)?;
    log::info!("Playing {} as {} (session {})", game, name, session);

    let mut canvas = DrawList::new(FIELD_WIDTH, FIELD_HEIGHT);
    let mut ticker = tokio::time::interval(FRAME_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let origin = Instant::now();
    let mut ended = false;
    for frame in 0..MAX_FRAMES {
        let now = ticker.tick().await;
        canvas.commands.clear();
        let now_ms = now.duration_since(origin).as_secs_f64() * 1000.0;
        if arcade.frame(now_ms, &mut canvas) {
            log::info!("Run ended after {} frames", frame + 1);
            ended = true;
            break;
        }
    }

    if !ended {
        log::info!("{} still running after {} frames, leaving", game, MAX_FRAMES);
        arcade.navigate(VIEW_HOME);
        println!("{}: no result (run did not finish)", game);
        return Ok(());
    }

    for report in arcade.submit_pending().await {
        log::info!("Session {} outcome: {:?}", report.session, report.outcome);
    }

    if let Some(banner) = arcade.banner(&game) {
        println!("{}", banner.title());
        for line in banner.lines() {
            println!("  {}", line);
        }
    }
    println!("Ledger total: {}", ledger.total());
    println!("Local best: {}", best_for(&arcade, &game));
    Ok(())
}

/// Best local score for a game view
fn best_for(arcade: &Arcade<MemoryLedger>, view: &str) -> u64 {
    let key = arcade
        .host(view)
        .map(|h| h.borrow().sim().game_key())
        .unwrap_or("");
    arcade.best_scores(key).best()
}
