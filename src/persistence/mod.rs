//! Key/value persistence
//!
//! The portal never owns a file format of its own: best scores, the display
//! name and settings are opaque string values behind a get/set store.
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `JsonFileStore`: a single JSON object on disk

pub mod store;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ArcadeError;

/// Load a JSON value stored under `key`
///
/// Missing keys and corrupt payloads both yield `None`; callers fall back to
/// their defaults.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let json = store.get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt value under {}: {}", key, e);
            None
        }
    }
}

/// Serialize `value` as JSON under `key`
pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), ArcadeError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
