use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Believed state of a menu group
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    Expanded,
    Collapsed,
}

/// Best-effort memory of which menus were opened during a session.
///
/// Keyed by menu label. The cache is a belief, not the truth: a reload or an
/// external re-render can collapse menus behind its back, so callers must be
/// ready to act anyway and should [`clear`](Self::clear) it after a reload.
#[derive(Debug, Clone, Default)]
pub struct ExpansionStateCache {
    /// Insertion-ordered for readable debug output
    states: IndexMap<String, MenuState>,
}

impl ExpansionStateCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state of a menu
    pub fn cache_state(&mut self, label: impl Into<String>, state: MenuState) {
        let label = label.into();
        log::debug!("Cached state for menu '{}': {:?}", label, state);
        self.states.insert(label, state);
    }

    /// Cached state of a menu, `None` when unknown
    pub fn get_state(&self, label: &str) -> Option<MenuState> {
        let state = self.states.get(label).copied();
        log::debug!("Retrieved cached state for menu '{}': {:?}", label, state);
        state
    }

    /// Whether the menu is believed to be open
    pub fn is_expanded(&self, label: &str) -> bool {
        self.get_state(label) == Some(MenuState::Expanded)
    }

    /// Drop the belief about a single menu
    pub fn forget(&mut self, label: &str) -> Option<MenuState> {
        self.states.shift_remove(label)
    }

    /// Drop everything, e.g. after a page reload
    pub fn clear(&mut self) {
        self.states.clear();
        log::debug!("Cleared menu state cache");
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterate over `(label, state)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, MenuState)> {
        self.states.iter().map(|(label, state)| (label.as_str(), *state))
    }
}
