//! Game registry
//!
//! Maps a game id to its lifecycle hooks. Navigation always stops every
//! registered game before showing the target, so at most one simulation is
//! ever running.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Lifecycle hooks a game exposes to navigation
pub trait GameHooks {
    /// Halt the frame loop and drop any session; no-op when idle
    fn stop(&mut self);
    /// The game's view was just shown
    fn on_show(&mut self);
}

pub type SharedHooks = Rc<RefCell<dyn GameHooks>>;

#[derive(Default)]
pub struct GameRegistry {
    entries: BTreeMap<String, SharedHooks>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register hooks under `id`; a later registration replaces an earlier one
    pub fn register(&mut self, id: impl Into<String>, hooks: SharedHooks) -> Option<SharedHooks> {
        let id = id.into();
        let previous = self.entries.insert(id.clone(), hooks);
        if previous.is_some() {
            log::debug!("Replaced hooks for {}", id);
        }
        previous
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stop every registered game
    pub fn stop_all(&self) {
        for (id, hooks) in &self.entries {
            match hooks.try_borrow_mut() {
                Ok(mut hooks) => hooks.stop(),
                Err(_) => log::warn!("Game {} is busy, cannot stop it", id),
            }
        }
    }

    /// Stop everything, then show `view` if it is a registered game
    ///
    /// Returns true when `view` named a game.
    pub fn on_navigate_to(&self, view: &str) -> bool {
        self.stop_all();
        let Some(hooks) = self.entries.get(view) else {
            return false;
        };
        match hooks.try_borrow_mut() {
            Ok(mut hooks) => {
                hooks.on_show();
                true
            }
            Err(_) => {
                log::warn!("Game {} is busy, cannot show it", view);
                false
            }
        }
    }
}
