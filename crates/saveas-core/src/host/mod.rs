//! Host environment primitives.
//!
//! The dispatcher never touches a DOM, an object-URL table or a window
//! directly; it only calls through [`Host`]. Implementations here:
//! - [`DirectoryHost`]: native host that materializes downloads as files.
//! - [`HeadlessHost`]: no document at all (worker-like), every save is a no-op.
//! - [`RecordingHost`]: in-memory host that records each primitive call.

mod directory;
mod filename;
mod headless;
mod recording;

pub use directory::DirectoryHost;
pub use filename::{filename_from_url_path, sanitize_filename};
pub use headless::HeadlessHost;
pub use recording::{HostEvent, HostProfile, RecordingHost};

use serde::Serialize;

use crate::blob::Blob;
use crate::transport::TransportError;

/// Link relation that drops the opener back-reference (tab-nabbing).
pub const REL_NOOPENER: &str = "noopener";

/// Browsing-context target that opens a new context.
pub const TARGET_BLANK: &str = "_blank";

/// Errors raised by host primitives. Executors log these; they never reach
/// the caller of `save`.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("synthetic click rejected by host")]
    ClickRejected,
    #[error("unknown or revoked object URL: {0}")]
    UnknownObjectUrl(String),
    #[error("malformed data URL")]
    BadDataUrl,
    #[error("unsupported href: {0}")]
    UnsupportedHref(String),
    #[error("no document host")]
    NoDocument,
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Reference to a browsing context opened by [`Host::open_popup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PopupId(pub u64);

/// A detached anchor element, never attached to the visible document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Anchor {
    pub href: String,
    /// Suggested download name (the `download` attribute).
    pub download: String,
    pub rel: String,
    /// `Some("_blank")` to open in a new browsing context instead of downloading.
    pub target: Option<String>,
}

impl Anchor {
    /// Anchor carrying a download name with the opener reference disabled.
    pub fn detached(download: &str) -> Self {
        Self {
            href: String::new(),
            download: download.to_string(),
            rel: REL_NOOPENER.to_string(),
            target: None,
        }
    }

    /// Same anchor, opening in a new browsing context.
    pub fn in_new_context(mut self) -> Self {
        self.target = Some(TARGET_BLANK.to_string());
        self
    }

    pub fn opens_new_context(&self) -> bool {
        self.target.as_deref() == Some(TARGET_BLANK)
    }

    /// Origin of `href`; `"null"` when opaque or unparseable.
    pub fn origin(&self) -> String {
        crate::origin::origin_of(&self.href)
    }
}

/// Primitives of the environment a save runs in.
///
/// Feature probes are read once by the prober; the rest are called by the
/// executors. Implementations must be cheap to call from the thread that
/// invoked `save` and from the runtime's deferred tasks.
pub trait Host: Send + Sync {
    /// False in worker-like contexts with no document/window.
    fn has_document(&self) -> bool;
    fn user_agent(&self) -> Option<String>;
    /// Whether anchors expose the attribute-driven download trigger.
    fn anchor_supports_download(&self) -> bool;
    /// Whether the blocking save-or-open blob primitive exists.
    fn has_legacy_save_blob(&self) -> bool;
    /// Safari-family engine marker (independent of the user agent).
    fn is_safari_family(&self) -> bool;
    /// Whether blobs can be read into data-URLs.
    fn can_read_data_url(&self) -> bool;
    /// Serialized origin of the current page.
    fn origin(&self) -> String;

    /// Dispatches a synthetic click on `anchor`.
    fn dispatch_click(&self, anchor: &Anchor) -> Result<(), HostError>;
    /// Dispatches a click built through the legacy mouse-event initializer.
    fn dispatch_legacy_click(&self, anchor: &Anchor) -> Result<(), HostError>;

    fn create_object_url(&self, blob: &Blob) -> String;
    fn revoke_object_url(&self, url: &str);

    /// Opens an empty browsing context. `None` when a popup blocker refuses.
    fn open_popup(&self) -> Option<PopupId>;
    fn set_popup_placeholder(&self, popup: PopupId, text: &str);
    fn navigate_popup(&self, popup: PopupId, url: &str) -> Result<(), HostError>;
    fn navigate_current(&self, url: &str) -> Result<(), HostError>;

    /// Blocking save-or-open dialog; returns once the user dismisses it.
    fn legacy_save_or_open(&self, blob: &Blob, name: &str) -> Result<(), HostError>;
}
