//! Game runtime
//!
//! Everything between "a view was shown" and "coins were credited":
//! - `loop_driver`: per-frame dt, stops itself when the view is hidden
//! - `session` / `host`: the run state machine around one simulation
//! - `reward` / `ledger`: at-most-once, time-bounded coin submission
//! - `registry`: lifecycle hooks keyed by game id

pub mod banner;
pub mod host;
pub mod ledger;
pub mod loop_driver;
pub mod registry;
pub mod reward;
pub mod session;

pub use banner::Banner;
pub use host::GameHost;
pub use ledger::{CoinAward, Ledger, MemoryLedger};
pub use loop_driver::{FrameTick, LoopDriver};
pub use registry::{GameHooks, GameRegistry, SharedHooks};
pub use reward::{RewardClaim, RewardOutcome, RewardPipeline, RewardReport};
pub use session::{GameSession, RunState, SessionId};
