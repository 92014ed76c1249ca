//! Remote fetch helper: GET a URL into a blob, then save the blob.

use std::sync::Arc;

use crate::blob::{Blob, SaveOptions, SaveRequest};
use crate::popup::PopupSlot;
use crate::saver::Saver;

/// Fetches `url` off the calling thread and re-enters the dispatcher with the
/// body as a blob, keeping `name`, `options` and the popup outcome. Transport failures
/// are logged and the save is abandoned; nothing is retried.
pub fn fetch_then_save(
    saver: &Saver,
    url: String,
    name: String,
    options: SaveOptions,
    popup: PopupSlot,
) {
    let transport = Arc::clone(saver.transport());
    let saver_task = saver.clone();
    tracing::debug!(url = %url, "fetching remote content into memory");

    saver.tasks().spawn(async move {
        let fetched = tokio::task::spawn_blocking({
            let url = url.clone();
            move || transport.get(&url)
        })
        .await;

        match fetched {
            Ok(Ok(body)) => {
                tracing::debug!(url = %url, bytes = body.bytes.len(), "remote content fetched");
                let blob = Blob::new(body.bytes, body.content_type.unwrap_or_default());
                let request = SaveRequest {
                    content: blob.into(),
                    name: Some(name),
                    options,
                };
                saver_task.dispatch(request, popup);
            }
            Ok(Err(e)) => {
                tracing::error!(url = %url, error = %e, "could not download file");
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "could not download file: fetch task failed");
            }
        }
    });
}
