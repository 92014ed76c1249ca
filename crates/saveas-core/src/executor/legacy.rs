//! Legacy save-or-open strategy.

use std::sync::Arc;

use super::click::click;
use crate::blob::{SaveContent, SaveRequest};
use crate::bom;
use crate::fetch;
use crate::host::Anchor;
use crate::origin;
use crate::popup::PopupSlot;
use crate::saver::Saver;

pub(crate) fn run(saver: &Saver, request: SaveRequest) {
    let name = request.resolved_name();
    let host = saver.host();

    match request.content {
        SaveContent::Url(url) => {
            let page_origin = host.origin();
            let href = origin::resolve_href(&url, &page_origin);
            let fetchable = origin::is_same_origin(&href, &page_origin)
                || origin::is_cross_origin_reachable(saver.transport().as_ref(), &href);
            if fetchable {
                fetch::fetch_then_save(saver, href, name, request.options, PopupSlot::Unopened);
                return;
            }
            tracing::warn!(href = %href, "cross-origin URL not reachable; opening in new context");
            let mut anchor = Anchor::detached(&name).in_new_context();
            anchor.href = href;
            let click_host = Arc::clone(host);
            saver.tasks().spawn(async move {
                tokio::task::yield_now().await;
                click(click_host.as_ref(), &anchor);
            });
        }
        SaveContent::Blob(blob) => {
            let blob = bom::apply(blob, &request.options);
            // Blocks until the host's dialog is dismissed.
            if let Err(err) = host.legacy_save_or_open(&blob, &name) {
                tracing::warn!(name = %name, error = %err, "save-or-open failed");
            }
        }
    }
}
