//! Transient toast queue.
//!
//! Append-only and tail-ordered: rendering order always matches call order.
//! Every toast gets its own cancellable expiry task keyed by toast id;
//! manual dismissal aborts the task and removes the toast immediately.
//! No depth limit is enforced.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use account_settings_sdk::models::{ToastKind, ToastNotification};

#[derive(Default)]
struct ToastInner {
    queue: Mutex<Vec<ToastNotification>>,
    timers: Mutex<HashMap<Uuid, JoinHandle<()>>>,
}

#[derive(Clone, Default)]
pub struct ToastQueue {
    inner: Arc<ToastInner>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a toast and schedule its removal. Must be called from within
    /// a tokio runtime.
    pub fn push(&self, kind: ToastKind, message: impl Into<String>, duration: Duration) -> Uuid {
        let toast = ToastNotification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            duration,
        };
        let id = toast.id;
        self.inner.queue.lock().push(toast);

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            inner.queue.lock().retain(|t| t.id != id);
            inner.timers.lock().remove(&id);
        });
        self.inner.timers.lock().insert(id, handle);

        tracing::debug!(toast_id = %id, ?kind, "toast enqueued");
        id
    }

    /// Remove a toast immediately, regardless of its timer state.
    pub fn dismiss(&self, id: Uuid) {
        if let Some(handle) = self.inner.timers.lock().remove(&id) {
            handle.abort();
        }
        self.inner.queue.lock().retain(|t| t.id != id);
    }

    #[must_use]
    pub fn visible(&self) -> Vec<ToastNotification> {
        self.inner.queue.lock().clone()
    }

    /// Abort all timers and drop queued toasts. Used when the settings view
    /// is torn down.
    pub fn clear(&self) {
        for (_, handle) in self.inner.timers.lock().drain() {
            handle.abort();
        }
        self.inner.queue.lock().clear();
    }
}
