//! Portal glue
//!
//! Wires the games to their collaborators: one `GameHost` per game, all
//! registered with the `GameRegistry`, a shared "active view" that each
//! host's loop driver checks every frame, and the reward pipeline that
//! spends the claims hosts hand out.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::consts::VIEW_HOME;
use crate::error::ArcadeError;
use crate::highscores::HighScores;
use crate::persistence::KeyValueStore;
use crate::platform::{Identity, Navigator};
use crate::renderer::Canvas;
use crate::runtime::{
    Banner, GameHost, GameRegistry, Ledger, LoopDriver, RewardClaim, RewardPipeline, RewardReport,
    RunState, SessionId, SharedHooks,
};
use crate::settings::Settings;
use crate::sim::{ControlEvent, all_games};

/// Status shown when the portal was started without a ledger
pub const LEDGER_MISSING_STATUS: &str = "Score ledger unavailable. Play is disabled.";

pub struct Arcade<L: Ledger> {
    settings: Settings,
    store: Box<dyn KeyValueStore>,
    identity: Box<dyn Identity>,
    navigator: Box<dyn Navigator>,
    pipeline: Option<RewardPipeline<L>>,
    registry: GameRegistry,
    hosts: BTreeMap<String, Rc<RefCell<GameHost>>>,
    active_view: Rc<RefCell<String>>,
    pending: Vec<RewardClaim>,
    status: String,
}

impl<L: Ledger> Arcade<L> {
    /// Build every game and register it; the home view is shown
    ///
    /// `ledger` may be absent: the portal still navigates but refuses to
    /// start runs. Invalid tuning tables in `settings` are reset to defaults.
    pub fn new(
        settings: Settings,
        store: Box<dyn KeyValueStore>,
        identity: Box<dyn Identity>,
        navigator: Box<dyn Navigator>,
        ledger: Option<Arc<L>>,
    ) -> Self {
        let settings = settings.sanitized();
        let active_view = Rc::new(RefCell::new(VIEW_HOME.to_string()));
        let pipeline = ledger.map(|ledger| RewardPipeline::new(ledger, &settings));
        if pipeline.is_none() {
            log::warn!("No score ledger configured, play is disabled");
        }

        let mut registry = GameRegistry::new();
        let mut hosts = BTreeMap::new();
        for sim in all_games(&settings) {
            let view = sim.view_id().to_string();
            let shown = Rc::clone(&active_view);
            let own_view = view.clone();
            let driver = LoopDriver::new(move || *shown.borrow() == own_view);
            let host = Rc::new(RefCell::new(GameHost::new(sim, driver, &settings)));
            let hooks: SharedHooks = host.clone();
            registry.register(view.clone(), hooks);
            hosts.insert(view, host);
        }
        log::info!("Arcade ready with {} games", hosts.len());

        Self {
            settings,
            store,
            identity,
            navigator,
            pipeline,
            registry,
            hosts,
            active_view,
            pending: Vec::new(),
            status: String::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn ledger(&self) -> Option<&Arc<L>> {
        self.pipeline.as_ref().map(|p| p.ledger())
    }

    /// Whether runs may be started at all
    pub fn play_enabled(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn game_ids(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    pub fn active_view(&self) -> String {
        self.active_view.borrow().clone()
    }

    /// Portal-level status line (redirect reasons, disabled play)
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn host(&self, id: &str) -> Option<Rc<RefCell<GameHost>>> {
        self.hosts.get(id).cloned()
    }

    pub fn state(&self, id: &str) -> RunState {
        self.hosts
            .get(id)
            .map(|h| h.borrow().state())
            .unwrap_or(RunState::Idle)
    }

    pub fn banner(&self, id: &str) -> Option<Banner> {
        self.hosts.get(id).map(|h| h.borrow().banner().clone())
    }

    /// Claims waiting for `submit_pending`
    pub fn pending_claims(&self) -> usize {
        self.pending.len()
    }

    /// Switch views: every game stops, then the target (if a game) is shown
    pub fn navigate(&mut self, view: &str) {
        *self.active_view.borrow_mut() = view.to_string();
        self.registry.on_navigate_to(view);
        self.navigator.show_view(view);
        if self.play_enabled() {
            return;
        }
        if let Some(host) = self.hosts.get(view) {
            host.borrow_mut().set_status(LEDGER_MISSING_STATUS);
        }
    }

    /// Start a run of `id` at `now_ms`
    ///
    /// Without a player name the portal goes home instead; without a ledger
    /// nothing starts.
    pub fn start_game(&mut self, id: &str, now_ms: f64) -> Result<SessionId, ArcadeError> {
        if !self.hosts.contains_key(id) {
            return Err(ArcadeError::UnknownGame(id.to_string()));
        }
        if self.pipeline.is_none() {
            self.status = LEDGER_MISSING_STATUS.to_string();
            return Err(ArcadeError::LedgerUnavailable);
        }
        if self.identity.local_player_name().is_none() {
            let err = ArcadeError::MissingPlayerName;
            log::info!("Start of {} refused: no player name", id);
            self.navigate(VIEW_HOME);
            self.status = err.to_string();
            return Err(err);
        }

        if *self.active_view.borrow() != id {
            self.navigate(id);
        }
        self.status.clear();

        let host = self
            .hosts
            .get(id)
            .ok_or_else(|| ArcadeError::UnknownGame(id.to_string()))?;
        Ok(host.borrow_mut().start(now_ms))
    }

    /// Route an input event to the game on screen
    pub fn push_input(&mut self, event: ControlEvent) {
        let view = self.active_view();
        if let Some(host) = self.hosts.get(&view) {
            host.borrow_mut().push_input(event);
        }
    }

    /// Run one frame of the active game
    ///
    /// Returns true when the run ended on this frame and a claim is queued.
    pub fn frame(&mut self, now_ms: f64, canvas: &mut dyn Canvas) -> bool {
        let view = self.active_view();
        let Some(host) = self.hosts.get(&view) else {
            return false;
        };
        let (claim, started_at) = {
            let mut host = host.borrow_mut();
            let claim = host.frame(now_ms, canvas);
            let started_at = host.session().map(|s| s.started_at).unwrap_or(now_ms);
            (claim, started_at)
        };
        let Some(claim) = claim else {
            return false;
        };

        self.record_best(&claim, started_at);
        self.pending.push(claim);
        true
    }

    fn record_best(&mut self, claim: &RewardClaim, started_at: f64) {
        let key = claim.award.game_key.as_str();
        let mut board = HighScores::load(self.store.as_ref(), key);
        if let Some(rank) = board.add_score(claim.score, claim.award.coins, started_at) {
            log::info!("{} run placed #{} on the local board", key, rank);
            if let Err(e) = board.save(self.store.as_mut(), key) {
                log::warn!("Failed to save {} best scores: {}", key, e);
            }
        }
    }

    /// Local best scores for a ledger game key
    pub fn best_scores(&self, game_key: &str) -> HighScores {
        HighScores::load(self.store.as_ref(), game_key)
    }

    /// Spend every queued claim, then route each result to its host
    ///
    /// Results for sessions that were replaced or discarded meanwhile are
    /// dropped by the host.
    pub async fn submit_pending(&mut self) -> Vec<RewardReport> {
        let claims = std::mem::take(&mut self.pending);
        let Some(pipeline) = self.pipeline.as_ref() else {
            if !claims.is_empty() {
                log::warn!("Dropping {} claims, no ledger configured", claims.len());
            }
            return Vec::new();
        };

        let mut reports = Vec::with_capacity(claims.len());
        for claim in claims {
            reports.push(pipeline.submit(claim).await);
        }
        for report in &reports {
            self.deliver(report);
        }
        reports
    }

    /// Hand a finished submission to the host that asked for it
    pub fn deliver(&self, report: &RewardReport) -> bool {
        match self.hosts.get(&report.game_id) {
            Some(host) => host.borrow_mut().apply_report(report),
            None => false,
        }
    }

    /// Remove the queued claims without submitting them
    ///
    /// For callers that drive `RewardPipeline::submit` themselves and hand
    /// the reports back through `deliver`.
    pub fn take_pending(&mut self) -> Vec<RewardClaim> {
        std::mem::take(&mut self.pending)
    }

    pub fn pipeline(&self) -> Option<&RewardPipeline<L>> {
        self.pipeline.as_ref()
    }
}
