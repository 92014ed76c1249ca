//! Host capability probing.
//!
//! Turns host feature flags and user-agent heuristics into an immutable
//! [`Capabilities`] value. The saver probes once and memoizes the result.

use serde::Serialize;

use crate::host::Host;

/// What the host can do, as far as saving files is concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// A document/window exists. False in worker-like contexts.
    pub has_dom_host: bool,
    /// Anchor download attribute present and functional.
    pub has_download_attribute: bool,
    /// Native-app WebView whose download attribute does nothing.
    pub is_broken_webview: bool,
    /// Blocking save-or-open blob primitive present.
    pub has_legacy_save_blob_api: bool,
    /// Chrome on iOS (cannot navigate to `attachment/file` data-URLs).
    pub is_chrome_ios: bool,
    /// Safari-family engine (cannot download object-URLs of generic binary).
    pub is_safari_family: bool,
    /// Blobs can be read into data-URLs.
    pub has_data_url_reader: bool,
}

/// Produces capabilities from a host. Pluggable so tests and embedders can
/// substitute their own classification.
pub trait Prober: Send + Sync {
    fn probe(&self, host: &dyn Host) -> Capabilities;
}

/// Default prober: host feature flags plus user-agent heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProber;

impl Prober for HostProber {
    fn probe(&self, host: &dyn Host) -> Capabilities {
        probe(host)
    }
}

/// Probes `host`. Absent features read as `false`; never fails.
pub fn probe(host: &dyn Host) -> Capabilities {
    let ua = host.user_agent().unwrap_or_default();
    let is_broken_webview = is_broken_webview(&ua);
    Capabilities {
        has_dom_host: host.has_document(),
        has_download_attribute: host.anchor_supports_download() && !is_broken_webview,
        is_broken_webview,
        has_legacy_save_blob_api: host.has_legacy_save_blob(),
        is_chrome_ios: is_chrome_ios(&ua),
        is_safari_family: host.is_safari_family(),
        has_data_url_reader: host.can_read_data_url(),
    }
}

/// WebView embedded in a native macOS app: platform and engine tokens are
/// present but no browser token. Every full browser except Firefox sends
/// `Safari`, and Firefox does not send `AppleWebKit`.
pub fn is_broken_webview(user_agent: &str) -> bool {
    user_agent.contains("Macintosh")
        && user_agent.contains("AppleWebKit")
        && !user_agent.contains("Safari")
}

/// `CriOS/<version>` token.
pub fn is_chrome_ios(user_agent: &str) -> bool {
    user_agent
        .match_indices("CriOS/")
        .any(|(idx, token)| {
            user_agent[idx + token.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        })
}
