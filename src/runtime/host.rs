//! Game host
//!
//! Owns one simulation plus everything around it: the frame loop, buffered
//! input, the current session and the overlay banner. A host moves through
//! `Idle -> Playing <-> Paused -> Over`; navigation away drops it back to
//! Idle from anywhere.

use glam::Vec2;

use super::banner::Banner;
use super::ledger::CoinAward;
use super::loop_driver::{FrameTick, LoopDriver};
use super::registry::GameHooks;
use super::reward::{RewardClaim, RewardReport};
use super::session::{GameSession, RunState, SessionId};
use crate::renderer::{Canvas, palette};
use crate::settings::Settings;
use crate::sim::{Control, ControlEvent, InputQueue, Simulation};

pub const PAUSED_STATUS: &str = "Paused (P to resume)";

pub struct GameHost {
    id: String,
    sim: Box<dyn Simulation>,
    driver: LoopDriver,
    input: InputQueue,
    session: Option<GameSession>,
    banner: Banner,
    status: String,
    max_frame_dt: f32,
    sessions_started: u64,
}

impl GameHost {
    pub fn new(sim: Box<dyn Simulation>, driver: LoopDriver, settings: &Settings) -> Self {
        Self {
            id: sim.view_id().to_string(),
            sim,
            driver,
            input: InputQueue::new(),
            session: None,
            banner: Banner::Hidden,
            status: String::new(),
            max_frame_dt: settings.max_frame_dt,
            sessions_started: 0,
        }
    }

    /// Registry id (the game's view)
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sim(&self) -> &dyn Simulation {
        self.sim.as_ref()
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn state(&self) -> RunState {
        self.session.as_ref().map(|s| s.state).unwrap_or(RunState::Idle)
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    /// View shown: present the ready overlay, no auto-start
    pub fn on_show(&mut self) {
        self.banner = Banner::Ready {
            hint: self.sim.hint().to_string(),
        };
        self.status.clear();
    }

    /// Begin a fresh session at `now_ms`
    ///
    /// A running session is stopped first; everything is re-initialized.
    pub fn start(&mut self, now_ms: f64) -> SessionId {
        if self.session.is_some() {
            self.stop();
        }

        self.sessions_started += 1;
        let id = SessionId(self.sessions_started);
        let seed = (now_ms.max(0.0) as u64) ^ (self.sessions_started << 32);
        self.sim.reset(seed);
        self.input.clear();
        self.session = Some(GameSession::new(id, self.id.clone(), now_ms));
        self.banner = Banner::Hidden;
        self.status.clear();
        self.driver.start();

        log::info!("{} session {} started", self.id, id);
        id
    }

    /// Playing <-> Paused for games that allow it
    pub fn toggle_pause(&mut self) -> bool {
        if !self.sim.pausable() {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.toggle_pause() {
            return false;
        }
        if session.state == RunState::Paused {
            self.status = PAUSED_STATUS.to_string();
        } else {
            self.status.clear();
        }
        // Keys held across the pause are forgotten
        self.input.clear();
        true
    }

    /// Buffer a control event for the next frame
    ///
    /// Only accepted while a run is live; Pause toggles immediately.
    pub fn push_input(&mut self, event: ControlEvent) {
        match self.state() {
            RunState::Playing | RunState::Paused => {}
            _ => return,
        }
        if event == ControlEvent::Press(Control::Pause) {
            self.toggle_pause();
            return;
        }
        if self.state() == RunState::Playing {
            self.input.push(event);
        }
    }

    /// Run one frame at `now_ms`
    ///
    /// Returns the reward claim on the frame the run ends, exactly once per
    /// session.
    pub fn frame(&mut self, now_ms: f64, canvas: &mut dyn Canvas) -> Option<RewardClaim> {
        let dt = match self.driver.advance(now_ms) {
            FrameTick::Stopped => return None,
            FrameTick::Hidden => {
                self.stop();
                return None;
            }
            FrameTick::Step { dt } => dt.min(self.max_frame_dt),
        };

        let inputs = self.input.drain();
        let mut claim = None;
        if self.state() == RunState::Playing {
            self.sim.update(dt, &inputs);
            if let Some(session) = self.session.as_mut() {
                session.score = self.sim.score();
            }
            if self.sim.is_terminal() {
                claim = self.finish();
            }
        }

        self.render(canvas);
        claim
    }

    /// Draw the current state without stepping
    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.sim.render(canvas);
        if self.state() == RunState::Paused {
            let size = canvas.size();
            canvas.fill_rect(Vec2::ZERO, size, palette::SHADE.with_alpha(0.6));
            canvas.text(size * 0.5 - Vec2::new(40.0, 0.0), "PAUSED", palette::TEXT);
        }
    }

    /// Playing -> Over: halt the loop, then hand out the one claim
    fn finish(&mut self) -> Option<RewardClaim> {
        self.driver.stop();

        let score = self.sim.score();
        let coins = self.sim.coins();
        let session = self.session.as_mut()?;
        if !session.finish(score) {
            return None;
        }
        self.banner = Banner::GameOver {
            title: self.sim.end_title().to_string(),
            score: self.sim.score_label(),
            coins,
        };
        log::info!(
            "{} session {} over: score {} for {} coins",
            self.id,
            session.id,
            score,
            coins
        );

        if !session.mark_submitted() {
            return None;
        }
        Some(RewardClaim {
            session: session.id,
            game_id: self.id.clone(),
            score,
            award: CoinAward {
                game_key: self.sim.game_key().to_string(),
                coins,
                reason: self.sim.end_reason().to_string(),
            },
        })
    }

    /// Show a submission result if it belongs to the current session
    ///
    /// Returns false (and changes nothing) for a report whose session has
    /// been replaced or discarded.
    pub fn apply_report(&mut self, report: &RewardReport) -> bool {
        let current = self.session.as_ref().map(|s| s.id);
        if current != Some(report.session) {
            log::debug!(
                "Dropping stale result for {} session {}",
                self.id,
                report.session
            );
            return false;
        }
        self.banner = Banner::from_outcome(self.sim.score_label(), report.coins, &report.outcome);
        true
    }

    /// Any -> Idle; idempotent
    pub fn stop(&mut self) {
        self.driver.stop();
        self.input.clear();
        if let Some(session) = self.session.take() {
            log::debug!("{} session {} discarded", self.id, session.id);
        }
    }
}

impl GameHooks for GameHost {
    fn stop(&mut self) {
        GameHost::stop(self);
    }

    fn on_show(&mut self) {
        GameHost::on_show(self);
    }
}
