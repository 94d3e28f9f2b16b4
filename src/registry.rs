//! Emitter registry: the set of live emitters a severity change is broadcast to.
//!
//! Emitters register when built and deregister when their last handle is
//! dropped. `apply_level` is the only broadcast mutation. A process-wide
//! default registry is created lazily by `global()`; tests and embedders that
//! need isolation build their own with `EmitterRegistry::new()`.

use crate::logger::LoggerInner;
use crate::types::Severity;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use tracing::debug;

pub struct EmitterRegistry {
    emitters: Mutex<HashMap<u64, Weak<LoggerInner>>>,
    next_id: AtomicU64,
}

impl EmitterRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            emitters: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        })
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn register(&self, id: u64, emitter: &Arc<LoggerInner>) {
        self.emitters.lock().insert(id, Arc::downgrade(emitter));
        debug!(emitter_id = id, "Emitter registered");
    }

    pub(crate) fn deregister(&self, id: u64) {
        if self.emitters.lock().remove(&id).is_some() {
            debug!(emitter_id = id, "Emitter deregistered");
        }
    }

    /// Set the threshold of every live emitter. Returns how many were updated.
    pub fn apply_level(&self, level: Severity) -> usize {
        // Upgrade under the lock, mutate and drop outside it: dropping the
        // last handle deregisters, which takes the lock again.
        let live: Vec<Arc<LoggerInner>> = self
            .emitters
            .lock()
            .values()
            .filter_map(Weak::upgrade)
            .collect();
        for emitter in &live {
            emitter.set_level(level);
        }
        debug!(level = %level, emitters = live.len(), "Severity threshold applied");
        live.len()
    }

    /// Number of emitters currently registered.
    pub fn len(&self) -> usize {
        self.emitters.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every registered emitter. Emitters keep working but no longer
    /// receive broadcasts.
    pub fn clear(&self) {
        self.emitters.lock().clear();
    }
}

impl std::fmt::Debug for EmitterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitterRegistry")
            .field("emitters", &self.len())
            .finish()
    }
}

/// Process-wide default registry.
pub fn global() -> &'static Arc<EmitterRegistry> {
    static GLOBAL: OnceLock<Arc<EmitterRegistry>> = OnceLock::new();
    GLOBAL.get_or_init(EmitterRegistry::new)
}
