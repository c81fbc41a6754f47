//! Detail overlay state machine.
//!
//! At most one overlay is presented. Opening another country from a border
//! link replaces the current one; there is no stack and no "back".

use crate::store::RecordStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Closed,
    Open(String),
}

impl OverlayState {
    pub fn is_open(&self) -> bool {
        matches!(self, OverlayState::Open(_))
    }

    /// Key of the country currently shown, if any
    pub fn open_key(&self) -> Option<&str> {
        match self {
            OverlayState::Open(key) => Some(key),
            OverlayState::Closed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayAction {
    /// A grid card was activated
    OpenCard(String),
    /// A border link inside the open overlay was activated
    ActivateBorder(String),
    /// The close control was activated
    Close,
    /// Something outside the overlay content was activated
    ActivateOutside,
}

/// Apply `action` to `state`.
///
/// Opening a key that is not in the full store leaves the state untouched.
pub fn reduce(state: &OverlayState, action: OverlayAction, store: &RecordStore) -> OverlayState {
    match action {
        OverlayAction::OpenCard(key) | OverlayAction::ActivateBorder(key) => {
            if store.contains(&key) {
                OverlayState::Open(key)
            } else {
                log::debug!("No country with key {}, overlay unchanged", key);
                state.clone()
            }
        }
        OverlayAction::Close | OverlayAction::ActivateOutside => OverlayState::Closed,
    }
}
