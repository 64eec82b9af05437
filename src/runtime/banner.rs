//! Player-facing overlay state for a game view

use serde::{Deserialize, Serialize};

use super::reward::RewardOutcome;

/// What the overlay above a game canvas shows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Banner {
    /// Run in progress
    #[default]
    Hidden,
    /// View shown, waiting for a start
    Ready { hint: String },
    /// Run ended; the reward is being submitted
    GameOver {
        title: String,
        score: String,
        coins: u32,
    },
    Submitted {
        score: String,
        coins: u32,
        total: u64,
    },
    SubmitFailed {
        score: String,
        coins: u32,
        message: String,
    },
}

impl Banner {
    /// Banner after a submission finished
    pub fn from_outcome(score: String, coins: u32, outcome: &RewardOutcome) -> Self {
        match outcome {
            RewardOutcome::Awarded { total } => Banner::Submitted {
                score,
                coins,
                total: *total,
            },
            RewardOutcome::Failed { message } => Banner::SubmitFailed {
                score,
                coins,
                message: message.clone(),
            },
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Banner::Hidden => "",
            Banner::Ready { .. } => "Ready?",
            Banner::GameOver { title, .. } => title,
            Banner::Submitted { .. } => "Submitted!",
            Banner::SubmitFailed { .. } => "Submit Failed",
        }
    }

    /// Body lines as shown under the title
    pub fn lines(&self) -> Vec<String> {
        match self {
            Banner::Hidden => Vec::new(),
            Banner::Ready { hint } => vec![hint.clone()],
            Banner::GameOver { score, coins, .. } => vec![
                format!("Score: {}", score),
                format!("Reward: +{} coins", coins),
                "Submitting…".to_string(),
            ],
            Banner::Submitted {
                score,
                coins,
                total,
            } => vec![
                format!("Score: {}", score),
                format!("+{} coins", coins),
                format!("Total: {}", total),
            ],
            Banner::SubmitFailed {
                score,
                coins,
                message,
            } => vec![
                format!("Score: {}", score),
                format!("+{} coins", coins),
                message.clone(),
            ],
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, Banner::Hidden)
    }
}
