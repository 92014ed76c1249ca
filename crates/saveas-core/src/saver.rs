//! The save dispatcher.
//!
//! A [`Saver`] binds a host, a transport and a configuration. Capabilities
//! are probed on first use and memoized; the strategy derived from them is
//! fixed for the saver's lifetime. Every call to [`Saver::save`] is
//! fire-and-forget: it returns once the synchronous part of the strategy has
//! run, with any deferred steps tracked as tasks on the current Tokio runtime.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::blob::{OptionsArg, SaveContent, SaveRequest};
use crate::capabilities::{Capabilities, HostProber, Prober};
use crate::config::SaverConfig;
use crate::executor;
use crate::host::Host;
use crate::popup::{self, PopupHandle, PopupSlot};
use crate::strategy::{self, Strategy};
use crate::tasks::PendingTasks;
use crate::transport::Transport;

struct Inner {
    host: Arc<dyn Host>,
    transport: Arc<dyn Transport>,
    config: SaverConfig,
    prober: Box<dyn Prober>,
    capabilities: OnceLock<Capabilities>,
    tasks: PendingTasks,
}

/// Cheap to clone; clones share capabilities and tracked tasks.
#[derive(Clone)]
pub struct Saver {
    inner: Arc<Inner>,
}

pub struct SaverBuilder {
    host: Arc<dyn Host>,
    transport: Arc<dyn Transport>,
    config: SaverConfig,
    prober: Box<dyn Prober>,
    capabilities: Option<Capabilities>,
}

impl SaverBuilder {
    pub fn config(mut self, config: SaverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn prober(mut self, prober: impl Prober + 'static) -> Self {
        self.prober = Box::new(prober);
        self
    }

    /// Skips probing and uses `caps` as-is.
    pub fn capabilities(mut self, caps: Capabilities) -> Self {
        self.capabilities = Some(caps);
        self
    }

    pub fn build(self) -> Saver {
        let capabilities = OnceLock::new();
        if let Some(caps) = self.capabilities {
            let _ = capabilities.set(caps);
        }
        Saver {
            inner: Arc::new(Inner {
                host: self.host,
                transport: self.transport,
                config: self.config,
                prober: self.prober,
                capabilities,
                tasks: PendingTasks::new(),
            }),
        }
    }
}

impl Saver {
    pub fn builder(host: Arc<dyn Host>, transport: Arc<dyn Transport>) -> SaverBuilder {
        SaverBuilder {
            host,
            transport,
            config: SaverConfig::default(),
            prober: Box::new(HostProber),
            capabilities: None,
        }
    }

    pub fn new(host: Arc<dyn Host>, transport: Arc<dyn Transport>) -> Self {
        Self::builder(host, transport).build()
    }

    /// Host capabilities, probed on the first call only.
    pub fn capabilities(&self) -> Capabilities {
        *self.inner.capabilities.get_or_init(|| {
            let caps = self.inner.prober.probe(self.inner.host.as_ref());
            tracing::info!(
                strategy = %strategy::select(&caps),
                ?caps,
                "probed host capabilities"
            );
            caps
        })
    }

    pub fn strategy(&self) -> Strategy {
        strategy::select(&self.capabilities())
    }

    pub fn config(&self) -> &SaverConfig {
        &self.inner.config
    }

    /// Saves `content` under `name` (or the blob's name, or `"download"`).
    pub fn save(
        &self,
        content: impl Into<SaveContent>,
        name: Option<&str>,
        options: impl Into<OptionsArg>,
    ) {
        self.dispatch(SaveRequest::new(content, name, options), PopupSlot::Unopened);
    }

    /// Like [`Saver::save`], reusing a popup the caller opened during the
    /// user gesture. Only the popup strategy uses it; others drop it.
    pub fn save_with_popup(
        &self,
        content: impl Into<SaveContent>,
        name: Option<&str>,
        options: impl Into<OptionsArg>,
        popup: Option<PopupHandle>,
    ) {
        self.dispatch(SaveRequest::new(content, name, options), popup.into());
    }

    /// Opens a popup through the host, for callers that must do so inside
    /// their own gesture handler before deciding what to save.
    pub fn open_popup(&self) -> Option<PopupHandle> {
        popup::open(self.inner.host.as_ref())
    }

    /// Runs `request` through the selected strategy. Re-entered by the
    /// remote fetch helper once a URL has been fetched into memory.
    pub fn dispatch(&self, request: SaveRequest, popup: PopupSlot) {
        let strategy = self.strategy();
        tracing::debug!(%strategy, name = %request.resolved_name(), "dispatching save");
        if popup.is_open() && strategy != Strategy::PopupFallback {
            tracing::debug!(%strategy, "caller popup not used by this strategy");
        }
        match strategy {
            Strategy::NoOp => executor::noop::run(request),
            Strategy::NativeLink => executor::native_link::run(self, request),
            Strategy::LegacyBlobApi => executor::legacy::run(self, request),
            Strategy::PopupFallback => executor::popup_fallback::run(self, request, popup),
        }
    }

    /// Waits for in-flight save steps (deferred clicks, reads, fetches).
    /// Release timers keep running.
    pub async fn settle(&self) {
        self.inner.tasks.settle().await;
    }

    /// Waits for in-flight save steps, then releases every object-URL still
    /// inside its grace period.
    pub async fn shutdown(&self) {
        self.inner.tasks.shutdown().await;
    }

    /// Tracked tasks not yet finished.
    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks.pending()
    }

    /// True when both refer to the same installed saver.
    pub fn ptr_eq(a: &Saver, b: &Saver) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    pub(crate) fn host(&self) -> &Arc<dyn Host> {
        &self.inner.host
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    pub(crate) fn tasks(&self) -> &PendingTasks {
        &self.inner.tasks
    }

    pub(crate) fn grace_period(&self) -> Duration {
        self.inner.config.grace_period()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostProfile, RecordingHost};
    use crate::transport::ScriptedTransport;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProber(Arc<AtomicUsize>);

    impl Prober for CountingProber {
        fn probe(&self, host: &dyn Host) -> Capabilities {
            self.0.fetch_add(1, Ordering::SeqCst);
            crate::capabilities::probe(host)
        }
    }

    #[test]
    fn capabilities_are_probed_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let saver = Saver::builder(
            Arc::new(RecordingHost::new(HostProfile::desktop())),
            Arc::new(ScriptedTransport::new()),
        )
        .prober(CountingProber(Arc::clone(&count)))
        .build();
        assert_eq!(saver.strategy(), Strategy::NativeLink);
        assert_eq!(saver.strategy(), Strategy::NativeLink);
        let _ = saver.clone().capabilities();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn injected_capabilities_skip_probing() {
        let count = Arc::new(AtomicUsize::new(0));
        let saver = Saver::builder(
            Arc::new(RecordingHost::new(HostProfile::desktop())),
            Arc::new(ScriptedTransport::new()),
        )
        .prober(CountingProber(Arc::clone(&count)))
        .capabilities(Capabilities {
            has_dom_host: true,
            has_legacy_save_blob_api: true,
            ..Capabilities::default()
        })
        .build();
        assert_eq!(saver.strategy(), Strategy::LegacyBlobApi);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clones_share_identity() {
        let saver = Saver::new(
            Arc::new(RecordingHost::new(HostProfile::desktop())),
            Arc::new(ScriptedTransport::new()),
        );
        let other = Saver::new(
            Arc::new(RecordingHost::new(HostProfile::desktop())),
            Arc::new(ScriptedTransport::new()),
        );
        assert!(Saver::ptr_eq(&saver, &saver.clone()));
        assert!(!Saver::ptr_eq(&saver, &other));
    }
}
