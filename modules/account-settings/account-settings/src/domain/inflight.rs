//! Per-operation single-flight registry.
//!
//! Each operation key may have at most one invocation in flight per
//! container; a second submission fails fast with `Busy` instead of racing
//! the first. Unrelated keys proceed concurrently.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;

use account_settings_sdk::OperationKey;

#[derive(Debug, Default, Clone)]
pub struct InFlightRegistry {
    active: Arc<Mutex<BTreeSet<OperationKey>>>,
}

impl InFlightRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the key, or report which operation is already running.
    pub fn try_begin(&self, key: OperationKey) -> Result<InFlightGuard, OperationKey> {
        let mut active = self.active.lock();
        if !active.insert(key) {
            return Err(key);
        }
        Ok(InFlightGuard {
            key,
            active: Arc::clone(&self.active),
        })
    }

    #[must_use]
    pub fn is_in_flight(&self, key: OperationKey) -> bool {
        self.active.lock().contains(&key)
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<OperationKey> {
        self.active.lock().iter().copied().collect()
    }
}

/// RAII guard: the key is released when the guard drops, including on early
/// returns and panics inside the operation body.
#[derive(Debug)]
pub struct InFlightGuard {
    key: OperationKey,
    active: Arc<Mutex<BTreeSet<OperationKey>>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.lock().remove(&self.key);
    }
}
