//! Platform collaborators
//!
//! The runtime only needs two things from the surrounding portal:
//! - Identity: who is playing (empty means nobody may play)
//! - Navigation: which view is shown

pub mod identity;

pub use identity::{Identity, StoredIdentity, validate_name};

/// View switching chrome owned by the portal
pub trait Navigator {
    /// Present `view`; the runtime has already stopped every game by the time this is called
    fn show_view(&mut self, view: &str);
}

/// Navigator that only records the current view (headless runs, tests)
#[derive(Debug, Clone, Default)]
pub struct HeadlessNavigator {
    pub current: Option<String>,
    pub history: Vec<String>,
}

impl Navigator for HeadlessNavigator {
    fn show_view(&mut self, view: &str) {
        log::debug!("View -> {}", view);
        self.current = Some(view.to_string());
        self.history.push(view.to_string());
    }
}
