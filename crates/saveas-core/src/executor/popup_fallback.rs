//! Popup fallback: open a context during the gesture, redirect it once the
//! content is ready.
//!
//! The popup is opened synchronously, before any deferred step, so popup
//! blockers still see the user gesture. Navigation consumes the handle. When
//! the popup is blocked every navigation targets the current page instead,
//! including the one after a fetch re-entry.

use std::sync::Arc;

use crate::blob::{Blob, SaveContent, SaveRequest};
use crate::capabilities::Capabilities;
use crate::data_url;
use crate::fetch;
use crate::host::Host;
use crate::lease::ObjectUrlLease;
use crate::origin;
use crate::popup::{self, PopupHandle, PopupSlot, PopupState};
use crate::saver::Saver;

pub(crate) fn run(saver: &Saver, request: SaveRequest, popup: PopupSlot) {
    let host = saver.host();
    let popup = match popup {
        PopupSlot::Unopened => popup::open(host.as_ref()),
        PopupSlot::Open(handle) => Some(handle),
        PopupSlot::Blocked => None,
    };

    let name = request.resolved_name();
    match request.content {
        SaveContent::Url(url) => {
            let page_origin = host.origin();
            let href = origin::resolve_href(&url, &page_origin);
            let fetchable = origin::is_same_origin(&href, &page_origin)
                || origin::is_cross_origin_reachable(saver.transport().as_ref(), &href);
            if fetchable {
                let slot = match popup {
                    Some(handle) => PopupSlot::Open(handle),
                    None => PopupSlot::Blocked,
                };
                fetch::fetch_then_save(saver, href, name, request.options, slot);
            } else {
                tracing::warn!(href = %href, "cross-origin URL not reachable; navigating to it directly");
                navigate_or_warn(host.as_ref(), popup, &href);
            }
        }
        SaveContent::Blob(blob) => {
            let caps = saver.capabilities();
            if needs_data_url(&caps, &blob) {
                let host = Arc::clone(host);
                let chrome_ios = caps.is_chrome_ios;
                saver.tasks().spawn(async move {
                    // The read completes on a later tick.
                    tokio::task::yield_now().await;
                    let mut url = data_url::encode(&blob);
                    if !chrome_ios {
                        url = data_url::force_attachment(&url);
                    }
                    navigate_or_warn(host.as_ref(), popup, &url);
                });
            } else {
                let lease = ObjectUrlLease::allocate(host, &blob);
                let id = popup.as_ref().map(PopupHandle::id);
                navigate_or_warn(host.as_ref(), popup, lease.url());
                let grace = saver.grace_period();
                saver.tasks().spawn_cleanup(async move {
                    tokio::time::sleep(grace).await;
                    drop(lease);
                    popup::transition(id, PopupState::ObjectUrlReleased);
                });
            }
        }
    }
}

/// Hosts that cannot download object-URLs, given a way to read data-URLs.
fn needs_data_url(caps: &Capabilities, blob: &Blob) -> bool {
    let generic_on_safari = blob.mime() == data_url::OCTET_STREAM && caps.is_safari_family;
    (caps.is_chrome_ios || generic_on_safari || caps.is_broken_webview) && caps.has_data_url_reader
}

fn navigate_or_warn(host: &dyn Host, popup: Option<PopupHandle>, url: &str) {
    if let Err(err) = popup::navigate(host, popup, url) {
        tracing::warn!(error = %err, "navigation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::SaveOptions;
    use crate::host::{HostEvent, HostProfile, PopupId, RecordingHost};
    use crate::strategy::Strategy;
    use crate::transport::ScriptedTransport;
    use std::time::Duration;

    fn popup_saver(profile: HostProfile) -> (Arc<RecordingHost>, Saver) {
        let host = Arc::new(RecordingHost::new(profile));
        let saver = Saver::new(host.clone(), Arc::new(ScriptedTransport::new()));
        assert_eq!(saver.strategy(), Strategy::PopupFallback);
        (host, saver)
    }

    #[tokio::test(start_paused = true)]
    async fn object_url_path_navigates_popup_synchronously() {
        let (host, saver) = popup_saver(HostProfile::old_safari());
        saver.save(Blob::new(b"hello".to_vec(), "text/plain"), None, SaveOptions::default());

        let popup = PopupId(1);
        let url = "blob:https://app.example.com/2".to_string();
        assert_eq!(
            host.events(),
            vec![
                HostEvent::OpenPopup { popup },
                HostEvent::PopupPlaceholder { popup, text: "downloading...".to_string() },
                HostEvent::CreateObjectUrl { url: url.clone(), len: 5 },
                HostEvent::NavigatePopup { popup, url: url.clone() },
            ]
        );

        tokio::time::sleep(Duration::from_millis(40_001)).await;
        assert_eq!(host.revoked_object_urls(), vec![url]);
    }

    #[tokio::test(start_paused = true)]
    async fn generic_binary_on_safari_uses_attachment_data_url() {
        let (host, saver) = popup_saver(HostProfile::old_safari());
        saver.save(Blob::new(b"hi".to_vec(), "application/octet-stream"), None, SaveOptions::default());
        assert!(!host
            .events()
            .iter()
            .any(|e| matches!(e, HostEvent::NavigatePopup { .. })));

        saver.settle().await;
        assert!(host.created_object_urls().is_empty());
        assert_eq!(
            host.events().last(),
            Some(&HostEvent::NavigatePopup {
                popup: PopupId(1),
                url: "data:attachment/file;base64,aGk=".to_string()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn chrome_ios_keeps_declared_mime() {
        let (host, saver) = popup_saver(HostProfile::chrome_ios());
        saver.save(Blob::new(b"hi".to_vec(), "text/plain"), None, SaveOptions::default());
        saver.settle().await;
        assert_eq!(
            host.events().last(),
            Some(&HostEvent::NavigatePopup {
                popup: PopupId(1),
                url: "data:text/plain;base64,aGk=".to_string()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn no_data_url_reader_falls_back_to_object_url() {
        let (host, saver) = popup_saver(HostProfile {
            data_url_reader: false,
            ..HostProfile::chrome_ios()
        });
        saver.save(Blob::new(b"hi".to_vec(), "text/plain"), None, SaveOptions::default());
        assert_eq!(host.created_object_urls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn blocked_popup_navigates_current_page() {
        let (host, saver) = popup_saver(HostProfile {
            popup_blocked: true,
            ..HostProfile::old_safari()
        });
        saver.save(Blob::new(b"x".to_vec(), "text/plain"), None, SaveOptions::default());
        let url = host.created_object_urls()[0].clone();
        assert_eq!(host.events().last(), Some(&HostEvent::NavigateCurrent { url }));
    }

    #[tokio::test(start_paused = true)]
    async fn caller_popup_is_reused() {
        let (host, saver) = popup_saver(HostProfile::old_safari());
        let popup = saver.open_popup().unwrap();
        let id = popup.id();
        saver.save_with_popup(Blob::new(b"x".to_vec(), "text/plain"), None, SaveOptions::default(), Some(popup));

        let opened = host
            .events()
            .iter()
            .filter(|e| matches!(e, HostEvent::OpenPopup { .. }))
            .count();
        assert_eq!(opened, 1);
        assert!(matches!(
            host.events().last(),
            Some(HostEvent::NavigatePopup { popup, .. }) if *popup == id
        ));
    }
}
