//! Single-slot in-flight operation cache
//!
//! At most one operation runs at a time. Callers arriving while it is pending
//! await the same shared future and observe the same output.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;

type Slot<T> = Option<(u64, Shared<BoxFuture<'static, T>>)>;

pub struct SingleFlight<T: Clone> {
    slot: Mutex<Slot<T>>,
    next_id: AtomicU64,
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<T: Clone> std::fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Join the pending operation, or start `make()` if nothing is pending.
    ///
    /// `make` is only invoked by the caller that installs the operation.
    pub async fn run<F, Fut>(&self, make: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (id, shared) = {
            let mut slot = self.slot.lock();
            match slot.as_ref() {
                Some((id, pending)) => (*id, pending.clone()),
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let shared = make().boxed().shared();
                    *slot = Some((id, shared.clone()));
                    (id, shared)
                }
            }
        };

        let output = shared.await;

        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|(current, _)| *current == id) {
            *slot = None;
        }
        output
    }
}
