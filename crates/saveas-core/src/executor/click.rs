//! Click simulation with a legacy-event fallback.

use crate::host::{Anchor, Host};

/// Dispatches a click on `anchor`. Hosts that reject the synthetic event get
/// one built through the legacy initializer. Failure is logged, not reported.
pub(crate) fn click(host: &dyn Host, anchor: &Anchor) {
    if let Err(err) = host.dispatch_click(anchor) {
        tracing::debug!(error = %err, "synthetic click rejected; retrying with legacy mouse event");
        if let Err(err) = host.dispatch_legacy_click(anchor) {
            tracing::warn!(href = %anchor.href, error = %err, "click dispatch failed");
        }
    }
}
