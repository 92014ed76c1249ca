//! Host with no document: background workers, daemons, CI.

use super::{Anchor, Host, HostError, PopupId};
use crate::blob::Blob;
use crate::config::OPAQUE_ORIGIN;

/// Every probe reads `false`; the dispatcher selects the no-op strategy and
/// never calls the action primitives, which refuse if reached anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessHost;

impl Host for HeadlessHost {
    fn has_document(&self) -> bool {
        false
    }

    fn user_agent(&self) -> Option<String> {
        None
    }

    fn anchor_supports_download(&self) -> bool {
        false
    }

    fn has_legacy_save_blob(&self) -> bool {
        false
    }

    fn is_safari_family(&self) -> bool {
        false
    }

    fn can_read_data_url(&self) -> bool {
        false
    }

    fn origin(&self) -> String {
        OPAQUE_ORIGIN.to_string()
    }

    fn dispatch_click(&self, _anchor: &Anchor) -> Result<(), HostError> {
        Err(HostError::NoDocument)
    }

    fn dispatch_legacy_click(&self, _anchor: &Anchor) -> Result<(), HostError> {
        Err(HostError::NoDocument)
    }

    fn create_object_url(&self, _blob: &Blob) -> String {
        String::new()
    }

    fn revoke_object_url(&self, _url: &str) {}

    fn open_popup(&self) -> Option<PopupId> {
        None
    }

    fn set_popup_placeholder(&self, _popup: PopupId, _text: &str) {}

    fn navigate_popup(&self, _popup: PopupId, _url: &str) -> Result<(), HostError> {
        Err(HostError::NoDocument)
    }

    fn navigate_current(&self, _url: &str) -> Result<(), HostError> {
        Err(HostError::NoDocument)
    }

    fn legacy_save_or_open(&self, _blob: &Blob, _name: &str) -> Result<(), HostError> {
        Err(HostError::NoDocument)
    }
}
