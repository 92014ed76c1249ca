//! Tracked deferred work for fire-and-forget saves.
//!
//! `save` returns immediately; the deferred click, data-URL read, remote
//! fetch and object-URL release run as Tokio tasks registered here so the
//! owner can wait for them (`settle`) or cut cleanup timers short (`shutdown`).

use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

type Handles = Arc<Mutex<Vec<JoinHandle<()>>>>;

#[derive(Clone, Default)]
pub struct PendingTasks {
    /// Steps that complete a save (clicks, reads, fetches).
    work: Handles,
    /// Grace-period timers that only release resources.
    cleanup: Handles,
}

impl PendingTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a save step. Returns false when there is no runtime to run it.
    pub fn spawn<F>(&self, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        spawn_into(&self.work, fut)
    }

    /// Spawns a release timer. Dropping its future releases what it owns.
    pub fn spawn_cleanup<F>(&self, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        spawn_into(&self.cleanup, fut)
    }

    /// Number of tracked tasks (work and cleanup) not yet finished.
    pub fn pending(&self) -> usize {
        count_unfinished(&self.work) + count_unfinished(&self.cleanup)
    }

    /// Waits until every save step has finished, including steps spawned by
    /// other steps (a fetch re-entering the dispatcher). Cleanup timers keep
    /// running.
    pub async fn settle(&self) {
        loop {
            let batch = std::mem::take(&mut *lock(&self.work));
            if batch.is_empty() {
                break;
            }
            for handle in batch {
                if let Err(e) = handle.await {
                    tracing::warn!("save task failed: {}", e);
                }
            }
        }
    }

    /// Settles, then aborts pending release timers. Aborting drops the
    /// timer's owned resources, so everything is released on return.
    pub async fn shutdown(&self) {
        self.settle().await;
        let batch = std::mem::take(&mut *lock(&self.cleanup));
        for handle in batch {
            handle.abort();
            let _ = handle.await;
        }
    }
}

fn lock(handles: &Handles) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
    handles.lock().unwrap_or_else(|e| e.into_inner())
}

fn spawn_into<F>(handles: &Handles, fut: F) -> bool
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(rt) => {
            let handle = rt.spawn(fut);
            let mut guard = lock(handles);
            guard.retain(|h| !h.is_finished());
            guard.push(handle);
            true
        }
        Err(_) => {
            tracing::error!("no async runtime; deferred save step dropped");
            false
        }
    }
}

fn count_unfinished(handles: &Handles) -> usize {
    lock(handles).iter().filter(|h| !h.is_finished()).count()
}
