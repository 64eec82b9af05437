//! Run state and per-run session record

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of one game's run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RunState {
    /// No session; waiting for a start
    #[default]
    Idle,
    Playing,
    Paused,
    /// Terminal for the session
    Over,
}

/// Identifies one session within a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One run of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: SessionId,
    pub game_id: String,
    pub state: RunState,
    pub score: u64,
    /// Monotonic ms of the start frame
    pub started_at: f64,
    submitted: bool,
}

impl GameSession {
    pub fn new(id: SessionId, game_id: impl Into<String>, started_at: f64) -> Self {
        Self {
            id,
            game_id: game_id.into(),
            state: RunState::Playing,
            score: 0,
            started_at,
            submitted: false,
        }
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    /// Flip `submitted`; true only the first time
    pub fn mark_submitted(&mut self) -> bool {
        if self.submitted {
            return false;
        }
        self.submitted = true;
        true
    }

    /// Playing <-> Paused; returns false in any other state
    pub fn toggle_pause(&mut self) -> bool {
        self.state = match self.state {
            RunState::Playing => RunState::Paused,
            RunState::Paused => RunState::Playing,
            _ => return false,
        };
        true
    }

    /// Enter Over with the final score; false if already over
    pub fn finish(&mut self, score: u64) -> bool {
        if self.state == RunState::Over {
            return false;
        }
        self.state = RunState::Over;
        self.score = score;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submitted_flips_once() {
        let mut session = GameSession::new(SessionId(1), "tetris", 0.0);
        assert!(!session.submitted());
        assert!(session.mark_submitted());
        assert!(!session.mark_submitted());
        assert!(session.submitted());
    }

    #[test]
    fn test_pause_only_while_running() {
        let mut session = GameSession::new(SessionId(1), "tetris", 0.0);
        assert!(session.toggle_pause());
        assert_eq!(session.state, RunState::Paused);
        assert!(session.toggle_pause());
        assert_eq!(session.state, RunState::Playing);

        assert!(session.finish(120));
        assert!(!session.toggle_pause());
        assert!(!session.finish(300));
        assert_eq!(session.score, 120);
        assert_eq!(session.state, RunState::Over);
    }

    #[test]
    fn test_state_serializes_by_name() {
        let json = serde_json::to_string(&RunState::Paused).unwrap();
        assert_eq!(json, "\"Paused\"");
    }
}
