//! In-memory host that records every primitive call.
//!
//! Backs `saveas save --dry-run` and the crate's tests. Each capability is a
//! switch on [`HostProfile`], as are popup blocking and click rejection.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;

use super::{Anchor, Host, HostError, PopupId};
use crate::blob::Blob;

/// Feature switches and behavior of a simulated host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProfile {
    pub has_document: bool,
    pub user_agent: Option<String>,
    pub anchor_download: bool,
    pub legacy_save_blob: bool,
    pub safari_family: bool,
    pub data_url_reader: bool,
    pub origin: String,
    /// `open_popup` returns `None`.
    pub popup_blocked: bool,
    /// `dispatch_click` fails, forcing the legacy click path.
    pub reject_modern_click: bool,
}

impl HostProfile {
    /// Current desktop browser with download-attribute support.
    pub fn desktop() -> Self {
        Self {
            has_document: true,
            user_agent: Some(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                    .to_string(),
            ),
            anchor_download: true,
            legacy_save_blob: false,
            safari_family: false,
            data_url_reader: true,
            origin: "https://app.example.com".to_string(),
            popup_blocked: false,
            reject_modern_click: false,
        }
    }

    /// Browser with only the blocking save-or-open blob primitive.
    pub fn legacy_blob() -> Self {
        Self {
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Trident/7.0; rv:11.0) like Gecko".to_string(),
            ),
            anchor_download: false,
            legacy_save_blob: true,
            ..Self::desktop()
        }
    }

    /// Old Safari: no download attribute, no legacy API.
    pub fn old_safari() -> Self {
        Self {
            user_agent: Some(
                "Mozilla/5.0 (iPad; CPU OS 9_3 like Mac OS X) AppleWebKit/601.1.46 (KHTML, like Gecko) Version/9.0 Mobile/13E233 Safari/601.1"
                    .to_string(),
            ),
            anchor_download: false,
            safari_family: true,
            ..Self::desktop()
        }
    }

    /// WebView inside a native macOS app.
    pub fn macos_webview() -> Self {
        Self {
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko)"
                    .to_string(),
            ),
            safari_family: true,
            ..Self::desktop()
        }
    }

    /// Chrome on iOS.
    pub fn chrome_ios() -> Self {
        Self {
            user_agent: Some(
                "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/120.0.6099.119 Mobile/15E148 Safari/604.1"
                    .to_string(),
            ),
            anchor_download: false,
            ..Self::desktop()
        }
    }

    /// Worker-like context with no document.
    pub fn headless() -> Self {
        Self {
            has_document: false,
            user_agent: None,
            anchor_download: false,
            data_url_reader: false,
            origin: crate::config::OPAQUE_ORIGIN.to_string(),
            ..Self::desktop()
        }
    }
}

/// One recorded host primitive call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum HostEvent {
    Click { anchor: Anchor, legacy: bool },
    CreateObjectUrl { url: String, len: usize },
    RevokeObjectUrl { url: String },
    OpenPopup { popup: PopupId },
    PopupPlaceholder { popup: PopupId, text: String },
    NavigatePopup { popup: PopupId, url: String },
    NavigateCurrent { url: String },
    LegacySaveOrOpen { name: String, mime: String, bytes: Vec<u8> },
}

/// Host that records calls instead of performing them.
#[derive(Debug)]
pub struct RecordingHost {
    profile: HostProfile,
    events: Mutex<Vec<HostEvent>>,
    live_urls: Mutex<HashSet<String>>,
    next_id: AtomicU64,
}

impl RecordingHost {
    pub fn new(profile: HostProfile) -> Self {
        Self {
            profile,
            events: Mutex::new(Vec::new()),
            live_urls: Mutex::new(HashSet::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn profile(&self) -> &HostProfile {
        &self.profile
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clicks(&self) -> Vec<Anchor> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Click { anchor, .. } => Some(anchor),
                _ => None,
            })
            .collect()
    }

    pub fn created_object_urls(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::CreateObjectUrl { url, .. } => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn revoked_object_urls(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::RevokeObjectUrl { url } => Some(url),
                _ => None,
            })
            .collect()
    }

    /// True while `url` has been created and not yet revoked.
    pub fn is_live(&self, url: &str) -> bool {
        self.live_urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(url)
    }

    fn record(&self, event: HostEvent) {
        tracing::trace!(?event, "host primitive");
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Host for RecordingHost {
    fn has_document(&self) -> bool {
        self.profile.has_document
    }

    fn user_agent(&self) -> Option<String> {
        self.profile.user_agent.clone()
    }

    fn anchor_supports_download(&self) -> bool {
        self.profile.anchor_download
    }

    fn has_legacy_save_blob(&self) -> bool {
        self.profile.legacy_save_blob
    }

    fn is_safari_family(&self) -> bool {
        self.profile.safari_family
    }

    fn can_read_data_url(&self) -> bool {
        self.profile.data_url_reader
    }

    fn origin(&self) -> String {
        self.profile.origin.clone()
    }

    fn dispatch_click(&self, anchor: &Anchor) -> Result<(), HostError> {
        if self.profile.reject_modern_click {
            return Err(HostError::ClickRejected);
        }
        self.record(HostEvent::Click {
            anchor: anchor.clone(),
            legacy: false,
        });
        Ok(())
    }

    fn dispatch_legacy_click(&self, anchor: &Anchor) -> Result<(), HostError> {
        self.record(HostEvent::Click {
            anchor: anchor.clone(),
            legacy: true,
        });
        Ok(())
    }

    fn create_object_url(&self, blob: &Blob) -> String {
        let url = format!("blob:{}/{}", self.profile.origin, self.next_id());
        self.live_urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.clone());
        self.record(HostEvent::CreateObjectUrl {
            url: url.clone(),
            len: blob.len(),
        });
        url
    }

    fn revoke_object_url(&self, url: &str) {
        self.live_urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(url);
        self.record(HostEvent::RevokeObjectUrl {
            url: url.to_string(),
        });
    }

    fn open_popup(&self) -> Option<PopupId> {
        if self.profile.popup_blocked {
            return None;
        }
        let popup = PopupId(self.next_id());
        self.record(HostEvent::OpenPopup { popup });
        Some(popup)
    }

    fn set_popup_placeholder(&self, popup: PopupId, text: &str) {
        self.record(HostEvent::PopupPlaceholder {
            popup,
            text: text.to_string(),
        });
    }

    fn navigate_popup(&self, popup: PopupId, url: &str) -> Result<(), HostError> {
        self.record(HostEvent::NavigatePopup {
            popup,
            url: url.to_string(),
        });
        Ok(())
    }

    fn navigate_current(&self, url: &str) -> Result<(), HostError> {
        self.record(HostEvent::NavigateCurrent {
            url: url.to_string(),
        });
        Ok(())
    }

    fn legacy_save_or_open(&self, blob: &Blob, name: &str) -> Result<(), HostError> {
        self.record(HostEvent::LegacySaveOrOpen {
            name: name.to_string(),
            mime: blob.mime().to_string(),
            bytes: blob.bytes().to_vec(),
        });
        Ok(())
    }
}
