//! Save strategy selection (pure function of capabilities).

use serde::Serialize;
use std::fmt;

use crate::capabilities::Capabilities;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Detached anchor with the download attribute.
    NativeLink,
    /// Blocking save-or-open blob primitive.
    LegacyBlobApi,
    /// Popup navigated to an object-URL or data-URL.
    PopupFallback,
    /// No document host; requests are discarded.
    NoOp,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strategy::NativeLink => "native-link",
            Strategy::LegacyBlobApi => "legacy-blob-api",
            Strategy::PopupFallback => "popup-fallback",
            Strategy::NoOp => "no-op",
        };
        f.write_str(s)
    }
}

/// First match wins: no DOM, download attribute, legacy blob API, popup.
pub fn select(caps: &Capabilities) -> Strategy {
    if !caps.has_dom_host {
        Strategy::NoOp
    } else if caps.has_download_attribute {
        Strategy::NativeLink
    } else if caps.has_legacy_save_blob_api {
        Strategy::LegacyBlobApi
    } else {
        Strategy::PopupFallback
    }
}
