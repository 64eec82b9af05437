//! Arcade Hub - a small arcade portal runtime
//!
//! Core modules:
//! - `runtime`: Loop driver, run state machine, reward submission, game registry
//! - `sim`: Deterministic per-game simulations (falling blocks, snake, breakout, pong, inbox)
//! - `renderer`: Canvas abstraction the simulations draw into
//! - `platform`: Identity and navigation collaborators
//! - `persistence`: Key/value storage collaborator
//! - `settings`: Runtime configuration and per-game tuning

pub mod arcade;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod runtime;
pub mod settings;
pub mod sim;

pub use arcade::Arcade;
pub use error::{ArcadeError, LedgerError};
pub use highscores::HighScores;
pub use settings::Settings;

/// Portal-wide constants
pub mod consts {
    /// Upper bound of any coin reward
    pub const MAX_COINS: u32 = 5000;
    /// Default time allowed for a ledger submission before it is reported as failed
    pub const SUBMIT_TIMEOUT_MS: u64 = 12_000;
    /// Frames longer than this are clamped before reaching a simulation (tab stalls, debugger)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// View names understood by the navigation layer
    pub const VIEW_HOME: &str = "home";
    pub const VIEW_LEADERBOARD: &str = "leaderboard";

    /// Canvas size shared by the field-based games
    pub const FIELD_WIDTH: f32 = 900.0;
    pub const FIELD_HEIGHT: f32 = 520.0;
}

/// Clamp a raw reward to the `[0, MAX_COINS]` range
#[inline]
pub fn clamp_coins(raw: u64) -> u32 {
    raw.min(consts::MAX_COINS as u64) as u32
}
