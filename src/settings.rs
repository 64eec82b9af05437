//! Runtime settings and per-game tuning
//!
//! Persisted as JSON in the key/value store, separately from scores.

use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, MAX_FRAME_DT, SUBMIT_TIMEOUT_MS};
use crate::error::ArcadeError;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Falling-block puzzle timing (seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetrisTuning {
    /// Gravity interval at level 1
    pub base_drop: f32,
    /// Gravity interval while soft drop is held
    pub soft_drop: f32,
    /// Fastest gravity interval
    pub min_drop: f32,
    /// Interval reduction per level
    pub level_step: f32,
    /// Lines needed per level
    pub lines_per_level: u32,
}

impl Default for TetrisTuning {
    fn default() -> Self {
        Self {
            base_drop: 0.8,
            soft_drop: 0.06,
            min_drop: 0.12,
            level_step: 0.06,
            lines_per_level: 10,
        }
    }
}

impl TetrisTuning {
    /// Intervals positive and `min_drop <= base_drop`
    pub fn is_valid(&self) -> bool {
        positive(self.base_drop)
            && positive(self.soft_drop)
            && positive(self.min_drop)
            && self.min_drop <= self.base_drop
            && non_negative(self.level_step)
            && self.lines_per_level >= 1
    }
}

/// Snake pacing and food supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    pub cell: f32,
    /// Step interval at speed 1 (seconds)
    pub base_step: f32,
    pub min_step: f32,
    pub step_per_level: f32,
    pub max_speed: u32,
    /// Points per speed level
    pub points_per_speed: u64,
    pub max_food: usize,
    /// Seconds between bonus food spawns
    pub food_spawn_every: f32,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            cell: 20.0,
            base_step: 0.12,
            min_step: 0.06,
            step_per_level: 0.01,
            max_speed: 10,
            points_per_speed: 6,
            max_food: 4,
            food_spawn_every: 10.0,
        }
    }
}

impl SnakeTuning {
    /// Room for a starting snake, positive intervals, `min_step <= base_step`
    pub fn is_valid(&self) -> bool {
        positive(self.cell)
            && self.cell <= FIELD_HEIGHT / 4.0
            && positive(self.base_step)
            && positive(self.min_step)
            && self.min_step <= self.base_step
            && non_negative(self.step_per_level)
            && self.max_speed >= 1
            && self.points_per_speed >= 1
            && self.max_food >= 1
            && positive(self.food_spawn_every)
    }
}

/// Brick-breaker physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutTuning {
    pub lives: u32,
    pub ball_speed: f32,
    pub paddle_speed: f32,
    /// Horizontal speed at the paddle edge
    pub paddle_english: f32,
    /// Velocity multiplier per brick hit
    pub brick_speedup: f32,
    pub points_per_brick: u64,
}

impl Default for BreakoutTuning {
    fn default() -> Self {
        Self {
            lives: 3,
            ball_speed: 280.0,
            paddle_speed: 520.0,
            paddle_english: 360.0,
            brick_speedup: 1.01,
            points_per_brick: 10,
        }
    }
}

impl BreakoutTuning {
    pub fn is_valid(&self) -> bool {
        self.lives >= 1
            && positive(self.ball_speed)
            && non_negative(self.paddle_speed)
            && self.paddle_english.is_finite()
            && positive(self.brick_speedup)
    }
}

/// Paddle-vs-AI pong
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongTuning {
    /// Points needed to win
    pub goal: u32,
    pub serve_speed: f32,
    pub player_speed: f32,
    pub ai_speed: f32,
    /// Vertical velocity added at the paddle edge
    pub spin: f32,
    pub max_vy: f32,
}

impl Default for PongTuning {
    fn default() -> Self {
        Self {
            goal: 7,
            serve_speed: 320.0,
            player_speed: 520.0,
            ai_speed: 360.0,
            spin: 220.0,
            max_vy: 420.0,
        }
    }
}

impl PongTuning {
    pub fn is_valid(&self) -> bool {
        self.goal >= 1
            && positive(self.serve_speed)
            && non_negative(self.player_speed)
            && non_negative(self.ai_speed)
            && self.spin.is_finite()
            && positive(self.max_vy)
    }
}

/// Inbox catch/avoid run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxTuning {
    pub run_seconds: f32,
    pub lives: u32,
    pub spawn_per_second: f32,
    pub spam_chance: f64,
    pub speed_min: f32,
    pub speed_max: f32,
    pub cursor_speed: f32,
    pub pickup_radius: f32,
    /// Seconds a combo survives without a catch
    pub combo_window: f32,
}

impl Default for InboxTuning {
    fn default() -> Self {
        Self {
            run_seconds: 45.0,
            lives: 3,
            spawn_per_second: 2.2,
            spam_chance: 0.22,
            speed_min: 120.0,
            speed_max: 320.0,
            cursor_speed: 520.0,
            pickup_radius: 34.0,
            combo_window: 1.2,
        }
    }
}

impl InboxTuning {
    /// Most spawns a run may ask for per second
    pub const MAX_SPAWN_RATE: f32 = 60.0;

    /// `speed_min <= speed_max`, spam chance a probability, bounded spawn rate
    pub fn is_valid(&self) -> bool {
        positive(self.run_seconds)
            && self.lives >= 1
            && non_negative(self.spawn_per_second)
            && self.spawn_per_second <= Self::MAX_SPAWN_RATE
            && (0.0..=1.0).contains(&self.spam_chance)
            && non_negative(self.speed_min)
            && self.speed_min <= self.speed_max
            && self.speed_max.is_finite()
            && non_negative(self.cursor_speed)
            && non_negative(self.pickup_radius)
            && non_negative(self.combo_window)
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

/// Reset `table` to its default when it fails `is_valid`
fn fallback<T: Default>(table: &mut T, is_valid: fn(&T) -> bool, name: &str) {
    if !is_valid(table) {
        log::warn!("Invalid {} tuning in settings, using defaults", name);
        *table = T::default();
    }
}

/// Portal settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Milliseconds a coin submission may take before it is reported as failed
    pub submit_timeout_ms: u64,
    /// Largest dt (seconds) handed to a simulation in one frame
    pub max_frame_dt: f32,
    /// Refresh leaderboard and rank after a successful submission
    pub refresh_after_submit: bool,

    // === Per-game tuning ===
    pub tetris: TetrisTuning,
    pub snake: SnakeTuning,
    pub breakout: BreakoutTuning,
    pub pong: PongTuning,
    pub inbox: InboxTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            submit_timeout_ms: SUBMIT_TIMEOUT_MS,
            max_frame_dt: MAX_FRAME_DT,
            refresh_after_submit: true,
            tetris: TetrisTuning::default(),
            snake: SnakeTuning::default(),
            breakout: BreakoutTuning::default(),
            pong: PongTuning::default(),
            inbox: InboxTuning::default(),
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "arcadehub_settings";

    /// Submission timeout as a `Duration`
    pub fn submit_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.submit_timeout_ms)
    }

    /// Replace every out-of-range value or tuning table with its default
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !positive(self.max_frame_dt) {
            log::warn!("Invalid max_frame_dt {}, using {}", self.max_frame_dt, defaults.max_frame_dt);
            self.max_frame_dt = defaults.max_frame_dt;
        }
        if self.submit_timeout_ms == 0 {
            log::warn!("Zero submit timeout, using {} ms", defaults.submit_timeout_ms);
            self.submit_timeout_ms = defaults.submit_timeout_ms;
        }
        fallback(&mut self.tetris, TetrisTuning::is_valid, "tetris");
        fallback(&mut self.snake, SnakeTuning::is_valid, "snake");
        fallback(&mut self.breakout, BreakoutTuning::is_valid, "breakout");
        fallback(&mut self.pong, PongTuning::is_valid, "pong");
        fallback(&mut self.inbox, InboxTuning::is_valid, "inbox");
        self
    }

    /// Load settings from the store, falling back to defaults
    ///
    /// Tuning tables that fail validation are replaced by their defaults.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from store");
                settings.sanitized()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), ArcadeError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
