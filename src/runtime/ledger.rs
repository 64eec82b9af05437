//! Score ledger collaborator
//!
//! The real ledger is a remote service (coin totals, leaderboard, rank).
//! The runtime only depends on the `Ledger` trait; `MemoryLedger` backs the
//! headless binary and tests.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// One coin award request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinAward {
    pub game_key: String,
    pub coins: u32,
    pub reason: String,
}

/// Remote score ledger
pub trait Ledger: Send + Sync + 'static {
    /// Credit coins, returning the player's new total
    fn award_coins(&self, award: CoinAward) -> impl Future<Output = Result<u64, LedgerError>> + Send;

    /// Best-effort leaderboard reload
    fn refresh_leaderboard(&self) -> impl Future<Output = Result<(), LedgerError>> + Send;

    /// Best-effort rank reload
    fn refresh_rank(&self) -> impl Future<Output = Result<(), LedgerError>> + Send;
}

#[derive(Debug, Default)]
struct Book {
    total: u64,
    awards: Vec<CoinAward>,
}

/// In-process ledger with optional latency and failure injection
#[derive(Debug, Default)]
pub struct MemoryLedger {
    book: Mutex<Book>,
    latency: Option<Duration>,
    failure: Option<LedgerError>,
    award_calls: AtomicUsize,
    leaderboard_refreshes: AtomicUsize,
    rank_refreshes: AtomicUsize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing coin total
    pub fn with_total(mut self, total: u64) -> Self {
        if let Ok(book) = self.book.get_mut() {
            book.total = total;
        }
        self
    }

    /// Delay every award by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Reject every award with `error`
    pub fn failing(mut self, error: LedgerError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn total(&self) -> u64 {
        self.book.lock().map(|b| b.total).unwrap_or(0)
    }

    /// Awards that were credited, oldest first
    pub fn awards(&self) -> Vec<CoinAward> {
        self.book.lock().map(|b| b.awards.clone()).unwrap_or_default()
    }

    /// How many award calls were made (credited or not)
    pub fn award_calls(&self) -> usize {
        self.award_calls.load(Ordering::SeqCst)
    }

    pub fn leaderboard_refreshes(&self) -> usize {
        self.leaderboard_refreshes.load(Ordering::SeqCst)
    }

    pub fn rank_refreshes(&self) -> usize {
        self.rank_refreshes.load(Ordering::SeqCst)
    }
}

impl Ledger for MemoryLedger {
    fn award_coins(&self, award: CoinAward) -> impl Future<Output = Result<u64, LedgerError>> + Send {
        async move {
            self.award_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            if let Some(error) = &self.failure {
                return Err(error.clone());
            }

            let mut book = self
                .book
                .lock()
                .map_err(|_| LedgerError::Network("ledger state poisoned".to_string()))?;
            book.total += award.coins as u64;
            log::debug!(
                "Credited {} coins for {} ({}), total {}",
                award.coins,
                award.game_key,
                award.reason,
                book.total
            );
            book.awards.push(award);
            Ok(book.total)
        }
    }

    fn refresh_leaderboard(&self) -> impl Future<Output = Result<(), LedgerError>> + Send {
        async move {
            self.leaderboard_refreshes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn refresh_rank(&self) -> impl Future<Output = Result<(), LedgerError>> + Send {
        async move {
            self.rank_refreshes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn award(coins: u32) -> CoinAward {
        CoinAward {
            game_key: "snake".to_string(),
            coins,
            reason: "snake_game_over".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_ledger_accumulates() {
        let ledger = MemoryLedger::new().with_total(40);
        assert_eq!(ledger.award_coins(award(10)).await, Ok(50));
        assert_eq!(ledger.award_coins(award(5)).await, Ok(55));
        assert_eq!(ledger.award_calls(), 2);
        assert_eq!(ledger.awards().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_ledger_records_call_only() {
        let ledger = MemoryLedger::new().failing(LedgerError::Unauthorized);
        assert_eq!(ledger.award_coins(award(10)).await, Err(LedgerError::Unauthorized));
        assert_eq!(ledger.award_calls(), 1);
        assert_eq!(ledger.total(), 0);
    }
}
