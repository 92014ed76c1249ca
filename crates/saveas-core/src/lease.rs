//! Object-URL ownership: revoked when the lease is dropped.

use std::sync::Arc;
use std::time::Duration;

use crate::blob::Blob;
use crate::host::Host;
use crate::tasks::PendingTasks;

/// An allocated object-URL. Exactly one revoke per allocation, on drop.
pub struct ObjectUrlLease {
    host: Arc<dyn Host>,
    url: String,
}

impl ObjectUrlLease {
    pub fn allocate(host: &Arc<dyn Host>, blob: &Blob) -> Self {
        let url = host.create_object_url(blob);
        tracing::debug!(url = %url, len = blob.len(), "object URL allocated");
        Self {
            host: Arc::clone(host),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrlLease {
    fn drop(&mut self) {
        self.host.revoke_object_url(&self.url);
        tracing::debug!(url = %self.url, "object URL revoked");
    }
}

/// Keeps `lease` alive for `grace`, then releases it. The timer task owns
/// the lease, so aborting or losing the task still revokes.
pub fn release_after(tasks: &PendingTasks, lease: ObjectUrlLease, grace: Duration) {
    tasks.spawn_cleanup(async move {
        tokio::time::sleep(grace).await;
        drop(lease);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostProfile, RecordingHost};

    #[test]
    fn drop_revokes_once() {
        let recording = Arc::new(RecordingHost::new(HostProfile::desktop()));
        let host: Arc<dyn Host> = recording.clone();
        let lease = ObjectUrlLease::allocate(&host, &Blob::new(b"x".to_vec(), ""));
        let url = lease.url().to_string();
        assert!(recording.is_live(&url));
        drop(lease);
        assert!(!recording.is_live(&url));
        assert_eq!(recording.revoked_object_urls(), vec![url]);
    }

    #[tokio::test(start_paused = true)]
    async fn release_after_waits_for_grace() {
        let recording = Arc::new(RecordingHost::new(HostProfile::desktop()));
        let host: Arc<dyn Host> = recording.clone();
        let tasks = PendingTasks::new();
        let lease = ObjectUrlLease::allocate(&host, &Blob::new(b"x".to_vec(), ""));
        let url = lease.url().to_string();
        release_after(&tasks, lease, Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert!(recording.is_live(&url));
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!recording.is_live(&url));
    }

    #[test]
    fn release_without_runtime_revokes_immediately() {
        let recording = Arc::new(RecordingHost::new(HostProfile::desktop()));
        let host: Arc<dyn Host> = recording.clone();
        let lease = ObjectUrlLease::allocate(&host, &Blob::new(b"x".to_vec(), ""));
        let url = lease.url().to_string();
        release_after(&PendingTasks::new(), lease, Duration::from_secs(40));
        assert!(!recording.is_live(&url));
    }
}
