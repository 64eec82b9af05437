//! Reward submission pipeline
//!
//! A finished run turns into exactly one `RewardClaim`. The pipeline spends
//! the claim on a single ledger call raced against a timeout:
//! - the call runs as its own task, so losing the race does not cancel it
//!   (its late answer is simply dropped)
//! - success fires detached leaderboard/rank refreshes
//! - failure is reported once and never retried

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ledger::{CoinAward, Ledger};
use super::session::SessionId;
use crate::settings::Settings;

/// Message reported when the ledger does not answer in time
pub const TIMEOUT_MESSAGE: &str = "timeout";

/// The right to submit one finished run
///
/// Not `Clone`: a claim is produced once per session and consumed by
/// `RewardPipeline::submit`.
#[derive(Debug, PartialEq)]
pub struct RewardClaim {
    pub session: SessionId,
    /// Registry id of the game that produced the claim
    pub game_id: String,
    pub score: u64,
    pub award: CoinAward,
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardOutcome {
    Awarded { total: u64 },
    Failed { message: String },
}

impl RewardOutcome {
    pub fn is_awarded(&self) -> bool {
        matches!(self, RewardOutcome::Awarded { .. })
    }
}

/// Result of spending a claim, routed back to the owning host
#[derive(Debug, Clone, PartialEq)]
pub struct RewardReport {
    pub session: SessionId,
    pub game_id: String,
    pub score: u64,
    pub coins: u32,
    pub outcome: RewardOutcome,
}

pub struct RewardPipeline<L: Ledger> {
    ledger: Arc<L>,
    timeout: Duration,
    refresh_after_submit: bool,
}

impl<L: Ledger> RewardPipeline<L> {
    pub fn new(ledger: Arc<L>, settings: &Settings) -> Self {
        Self {
            ledger,
            timeout: settings.submit_timeout(),
            refresh_after_submit: settings.refresh_after_submit,
        }
    }

    pub fn with_timeout(ledger: Arc<L>, timeout: Duration) -> Self {
        Self {
            ledger,
            timeout,
            refresh_after_submit: true,
        }
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Spend `claim` on one ledger call
    pub async fn submit(&self, claim: RewardClaim) -> RewardReport {
        let RewardClaim {
            session,
            game_id,
            score,
            award,
        } = claim;
        let coins = award.coins;
        log::info!(
            "Submitting {} coins for {} session {} ({})",
            coins,
            award.game_key,
            session,
            award.reason
        );

        let ledger = Arc::clone(&self.ledger);
        let call = tokio::spawn(async move { ledger.award_coins(award).await });

        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(Ok(total))) => RewardOutcome::Awarded { total },
            Ok(Ok(Err(e))) => RewardOutcome::Failed {
                message: e.to_string(),
            },
            Ok(Err(e)) => RewardOutcome::Failed {
                message: e.to_string(),
            },
            Err(_) => {
                log::warn!(
                    "Ledger did not answer within {:?} for session {}",
                    self.timeout,
                    session
                );
                RewardOutcome::Failed {
                    message: TIMEOUT_MESSAGE.to_string(),
                }
            }
        };

        match &outcome {
            RewardOutcome::Awarded { total } => {
                log::info!("Session {} credited, new total {}", session, total);
                if self.refresh_after_submit {
                    self.spawn_refresh();
                }
            }
            RewardOutcome::Failed { message } => {
                log::warn!("Session {} submission failed: {}", session, message);
            }
        }

        RewardReport {
            session,
            game_id,
            score,
            coins,
            outcome,
        }
    }

    /// Fire-and-forget leaderboard and rank reloads
    fn spawn_refresh(&self) {
        let ledger = Arc::clone(&self.ledger);
        tokio::spawn(async move {
            if let Err(e) = ledger.refresh_leaderboard().await {
                log::debug!("Leaderboard refresh failed: {}", e);
            }
        });
        let ledger = Arc::clone(&self.ledger);
        tokio::spawn(async move {
            if let Err(e) = ledger.refresh_rank().await {
                log::debug!("Rank refresh failed: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::runtime::ledger::MemoryLedger;

    fn claim(session: u64, coins: u32) -> RewardClaim {
        RewardClaim {
            session: SessionId(session),
            game_id: "tetris".to_string(),
            score: 1200,
            award: CoinAward {
                game_key: "tetris".to_string(),
                coins,
                reason: "game_over".to_string(),
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_awarded_then_refresh() {
        let ledger = Arc::new(MemoryLedger::new().with_total(100));
        let pipeline = RewardPipeline::with_timeout(Arc::clone(&ledger), Duration::from_secs(12));

        let report = pipeline.submit(claim(1, 14)).await;
        assert_eq!(report.outcome, RewardOutcome::Awarded { total: 114 });
        assert_eq!(report.coins, 14);
        assert_eq!(report.session, SessionId(1));

        // Let the detached refreshes run
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(ledger.leaderboard_refreshes(), 1);
        assert_eq!(ledger.rank_refreshes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_ledger_times_out_and_late_result_is_dropped() {
        let ledger = Arc::new(MemoryLedger::new().with_latency(Duration::from_secs(30)));
        let pipeline = RewardPipeline::with_timeout(Arc::clone(&ledger), Duration::from_secs(12));

        let started = tokio::time::Instant::now();
        let report = pipeline.submit(claim(7, 20)).await;
        assert_eq!(
            report.outcome,
            RewardOutcome::Failed {
                message: TIMEOUT_MESSAGE.to_string()
            }
        );
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(12) && waited < Duration::from_secs(13));
        assert_eq!(ledger.award_calls(), 1);

        // The in-flight call still completes, but nobody is listening
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(ledger.total(), 20);
        assert_eq!(ledger.award_calls(), 1);
        assert_eq!(ledger.leaderboard_refreshes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_is_reported_not_retried() {
        let ledger = Arc::new(MemoryLedger::new().failing(LedgerError::Unauthorized));
        let pipeline = RewardPipeline::with_timeout(Arc::clone(&ledger), Duration::from_secs(12));

        let report = pipeline.submit(claim(2, 9)).await;
        assert_eq!(
            report.outcome,
            RewardOutcome::Failed {
                message: "Login required to submit coins.".to_string()
            }
        );
        assert_eq!(report.coins, 9);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(ledger.award_calls(), 1);
        assert_eq!(ledger.rank_refreshes(), 0);
    }

    #[test]
    fn test_pipeline_reads_settings() {
        let mut settings = Settings::default();
        settings.submit_timeout_ms = 500;
        let pipeline = RewardPipeline::new(Arc::new(MemoryLedger::new()), &settings);
        assert_eq!(pipeline.timeout(), Duration::from_millis(500));
    }
}
