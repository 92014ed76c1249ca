//! Download-attribute strategy: detached anchor plus a simulated click.

use std::sync::Arc;

use super::click::click;
use crate::blob::{SaveContent, SaveRequest};
use crate::fetch;
use crate::host::Anchor;
use crate::lease::{self, ObjectUrlLease};
use crate::origin;
use crate::popup::PopupSlot;
use crate::saver::Saver;

pub(crate) fn run(saver: &Saver, request: SaveRequest) {
    let name = request.resolved_name();
    let host = saver.host();
    let mut anchor = Anchor::detached(&name);

    match request.content {
        SaveContent::Url(url) => {
            let page_origin = host.origin();
            anchor.href = origin::resolve_href(&url, &page_origin);
            if origin::is_same_origin(&anchor.href, &page_origin) {
                click(host.as_ref(), &anchor);
            } else if origin::is_cross_origin_reachable(saver.transport().as_ref(), &anchor.href) {
                fetch::fetch_then_save(saver, anchor.href, name, request.options, PopupSlot::Unopened);
            } else {
                // May open instead of download; accepted.
                tracing::warn!(href = %anchor.href, "cross-origin URL not reachable; opening in new context");
                click(host.as_ref(), &anchor.in_new_context());
            }
        }
        SaveContent::Blob(blob) => {
            let lease = ObjectUrlLease::allocate(host, &blob);
            anchor.href = lease.url().to_string();
            let click_host = Arc::clone(host);
            // Next tick, so the anchor is ready before it is clicked.
            saver.tasks().spawn(async move {
                tokio::task::yield_now().await;
                click(click_host.as_ref(), &anchor);
            });
            lease::release_after(saver.tasks(), lease, saver.grace_period());
        }
    }
}
