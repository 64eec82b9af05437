//! Player identity
//!
//! Authentication is external; by the time a game starts the portal has
//! written the player's display name into storage.

use crate::error::ArcadeError;
use crate::persistence::KeyValueStore;

/// Identity collaborator
pub trait Identity {
    /// Trimmed local player name, `None` when unset or blank
    fn local_player_name(&self) -> Option<String>;
}

/// Validate a display name: 3-16 characters of `[A-Za-z0-9_]`
pub fn validate_name(name: &str) -> Result<&str, ArcadeError> {
    let name = name.trim();
    let len = name.chars().count();
    if !(3..=16).contains(&len) {
        return Err(ArcadeError::InvalidName(
            "Name must be 3–16 characters.".to_string(),
        ));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ArcadeError::InvalidName(
            "Use letters/numbers/_ only.".to_string(),
        ));
    }
    Ok(name)
}

/// Identity read from the key/value store
#[derive(Debug, Clone, Default)]
pub struct StoredIdentity {
    name: Option<String>,
}

impl StoredIdentity {
    pub const STORAGE_KEY: &'static str = "arcadehub_playerName";

    /// Read the stored name
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let name = store
            .get(Self::STORAGE_KEY)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self { name }
    }

    /// Validate and persist a new display name
    pub fn set_name(&mut self, store: &mut dyn KeyValueStore, name: &str) -> Result<(), ArcadeError> {
        let name = validate_name(name)?;
        store.set(Self::STORAGE_KEY, name)?;
        log::info!("Player name set to {}", name);
        self.name = Some(name.to_string());
        Ok(())
    }

    /// Forget the name (sign-out)
    pub fn clear(&mut self, store: &mut dyn KeyValueStore) -> Result<(), ArcadeError> {
        store.remove(Self::STORAGE_KEY)?;
        self.name = None;
        Ok(())
    }
}

impl Identity for StoredIdentity {
    fn local_player_name(&self) -> Option<String> {
        self.name.clone()
    }
}
