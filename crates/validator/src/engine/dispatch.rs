//! Concurrency limiting for rule-chain evaluation.

use std::fmt;
use std::sync::{Arc, LazyLock};

use tokio::sync::{Semaphore, SemaphorePermit};

use crate::config::default_parallelism;

static CPU: LazyLock<Dispatcher> = LazyLock::new(|| Dispatcher::bounded(default_parallelism()));

/// Bounds how many field chains evaluate at once.
///
/// Clones share the same permits, so one dispatcher can throttle many
/// concurrent validation calls. A permit is held only while a field's own
/// chain runs and is released before nested validation starts, so nested
/// work never waits on its ancestors.
#[derive(Clone)]
pub struct Dispatcher {
    permits: Option<Arc<Semaphore>>,
    capacity: Option<usize>,
}

impl Dispatcher {
    /// At most `permits` chains at a time; zero is raised to one.
    #[must_use]
    pub fn bounded(permits: usize) -> Self {
        let permits = permits.max(1);
        Self {
            permits: Some(Arc::new(Semaphore::new(permits))),
            capacity: Some(permits),
        }
    }

    /// No throttling.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            permits: None,
            capacity: None,
        }
    }

    /// The process-wide dispatcher sized to the available parallelism.
    #[must_use]
    pub fn cpu() -> Self {
        CPU.clone()
    }

    /// Total permits, `None` when unbounded.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Permits currently free, `None` when unbounded.
    #[must_use]
    pub fn available(&self) -> Option<usize> {
        self.permits.as_ref().map(|s| s.available_permits())
    }

    /// Waits for a permit; `None` when unbounded.
    pub(crate) async fn acquire(&self) -> Option<SemaphorePermit<'_>> {
        match &self.permits {
            // the semaphore is never closed, so acquisition cannot fail
            Some(semaphore) => semaphore.acquire().await.ok(),
            None => None,
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::cpu()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("capacity", &self.capacity)
            .field("available", &self.available())
            .finish()
    }
}
