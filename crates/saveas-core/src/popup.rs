//! Popup handles and the popup-navigation state machine.
//!
//! `Opened → Navigating → Navigated (handle cleared) → ObjectUrlReleased`.
//! A handle is consumed by navigation, so nothing can reach back into the
//! popup once it has loaded the saved content.

use std::fmt;

use crate::host::{Host, HostError, PopupId};

/// Interim text shown in a popup until its content is ready.
pub const PLACEHOLDER_TEXT: &str = "downloading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PopupState {
    Opened,
    Navigating,
    Navigated,
    ObjectUrlReleased,
}

impl fmt::Display for PopupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PopupState::Opened => "opened",
            PopupState::Navigating => "navigating",
            PopupState::Navigated => "navigated",
            PopupState::ObjectUrlReleased => "object-url-released",
        };
        f.write_str(s)
    }
}

/// Exclusive reference to an opened popup. Not `Clone`: whoever navigates it
/// gives it up.
#[derive(Debug, PartialEq, Eq)]
pub struct PopupHandle {
    id: PopupId,
}

impl PopupHandle {
    /// Wraps a popup the caller opened itself (e.g. inside a click handler).
    pub fn new(id: PopupId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> PopupId {
        self.id
    }
}

/// Popup outcome of a save, carried across the fetch re-entry so the popup
/// step runs once, inside the gesture.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum PopupSlot {
    /// No popup step has run yet.
    #[default]
    Unopened,
    /// The host refused the popup; every later step navigates the current page.
    Blocked,
    Open(PopupHandle),
}

impl PopupSlot {
    pub fn is_open(&self) -> bool {
        matches!(self, PopupSlot::Open(_))
    }
}

impl From<Option<PopupHandle>> for PopupSlot {
    fn from(popup: Option<PopupHandle>) -> Self {
        match popup {
            Some(handle) => PopupSlot::Open(handle),
            None => PopupSlot::Unopened,
        }
    }
}

/// Opens a popup showing the placeholder. `None` when the host blocks it.
pub(crate) fn open(host: &dyn Host) -> Option<PopupHandle> {
    match host.open_popup() {
        Some(id) => {
            host.set_popup_placeholder(id, PLACEHOLDER_TEXT);
            transition(Some(id), PopupState::Opened);
            Some(PopupHandle::new(id))
        }
        None => {
            tracing::warn!("popup blocked; navigating the current page instead");
            None
        }
    }
}

/// Navigates the popup if there is one, else the current page. Consumes the
/// handle either way.
pub(crate) fn navigate(
    host: &dyn Host,
    popup: Option<PopupHandle>,
    url: &str,
) -> Result<(), HostError> {
    match popup {
        Some(handle) => {
            transition(Some(handle.id), PopupState::Navigating);
            let result = host.navigate_popup(handle.id, url);
            let id = handle.id;
            drop(handle);
            transition(Some(id), PopupState::Navigated);
            result
        }
        None => host.navigate_current(url),
    }
}

pub(crate) fn transition(popup: Option<PopupId>, state: PopupState) {
    tracing::debug!(popup = popup.map(|p| p.0), %state, "popup state");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostEvent, HostProfile, RecordingHost};

    #[test]
    fn states_are_ordered() {
        assert!(PopupState::Opened < PopupState::Navigating);
        assert!(PopupState::Navigating < PopupState::Navigated);
        assert!(PopupState::Navigated < PopupState::ObjectUrlReleased);
    }

    #[test]
    fn open_sets_placeholder_once() {
        let host = RecordingHost::new(HostProfile::old_safari());
        let handle = open(&host).unwrap();
        assert_eq!(
            host.events(),
            vec![
                HostEvent::OpenPopup { popup: handle.id() },
                HostEvent::PopupPlaceholder {
                    popup: handle.id(),
                    text: PLACEHOLDER_TEXT.to_string()
                },
            ]
        );
    }

    #[test]
    fn open_reports_blocked_popup() {
        let host = RecordingHost::new(HostProfile {
            popup_blocked: true,
            ..HostProfile::old_safari()
        });
        assert!(open(&host).is_none());
        assert!(host.events().is_empty());
    }

    #[test]
    fn slot_from_caller_popup() {
        assert_eq!(PopupSlot::from(None), PopupSlot::Unopened);
        let slot = PopupSlot::from(Some(PopupHandle::new(PopupId(7))));
        assert!(slot.is_open());
    }

    #[test]
    fn navigate_with_popup_targets_popup() {
        let host = RecordingHost::new(HostProfile::old_safari());
        let id = host.open_popup().unwrap();
        navigate(&host, Some(PopupHandle::new(id)), "blob:x/1").unwrap();
        assert_eq!(
            host.events().last(),
            Some(&HostEvent::NavigatePopup {
                popup: id,
                url: "blob:x/1".to_string()
            })
        );
    }

    #[test]
    fn navigate_without_popup_targets_current_page() {
        let host = RecordingHost::new(HostProfile::old_safari());
        navigate(&host, None, "blob:x/1").unwrap();
        assert_eq!(
            host.events(),
            vec![HostEvent::NavigateCurrent {
                url: "blob:x/1".to_string()
            }]
        );
    }
}
