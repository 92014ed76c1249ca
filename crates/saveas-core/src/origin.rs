//! Origin comparison and the cross-origin reachability guard.

use url::Url;

use crate::config::OPAQUE_ORIGIN;
use crate::transport::Transport;

/// Resolves `href` against the page origin the way an anchor's `href`
/// property does. Unresolvable input is returned unchanged.
pub fn resolve_href(href: &str, page_origin: &str) -> String {
    match Url::parse(href) {
        Ok(url) => url.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(page_origin)
            .and_then(|base| base.join(href))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string()),
        Err(_) => href.to_string(),
    }
}

/// ASCII serialization of the URL's origin; `"null"` when opaque or unparseable.
pub fn origin_of(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.origin().ascii_serialization())
        .unwrap_or_else(|_| OPAQUE_ORIGIN.to_string())
}

/// Opaque origins never match anything, not even each other.
pub fn is_same_origin(url: &str, page_origin: &str) -> bool {
    let origin = origin_of(url);
    origin != OPAQUE_ORIGIN && origin == page_origin
}

/// Synchronous HEAD against `url`; reachable iff the status is 2xx.
///
/// Must complete before any gesture-gated action (click, popup), so it blocks
/// the calling thread. A probe the transport refuses counts as unreachable.
pub fn is_cross_origin_reachable(transport: &dyn Transport, url: &str) -> bool {
    match transport.head_status(url) {
        Ok(code) => {
            let ok = (200..=299).contains(&code);
            tracing::debug!(url, code, reachable = ok, "cross-origin probe");
            ok
        }
        Err(e) => {
            tracing::debug!(url, error = %e, "cross-origin probe failed; treating as unreachable");
            false
        }
    }
}
