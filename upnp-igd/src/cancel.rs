//! One-shot cancellation shared by the operations of a gateway handle.
//!
//! Operations register a callback for as long as they are in flight.
//! [`Cancel::stop`] fires once, invoking every registered callback, and
//! any registration attempted afterwards is refused.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use thiserror::Error;
use tokio::sync::oneshot;

type Callback = Box<dyn FnOnce() + Send>;

/// The operation was cancelled before it could complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation aborted")]
pub struct Aborted;

#[derive(Default)]
struct Inner {
    fired: bool,
    next_id: u64,
    callbacks: BTreeMap<u64, Callback>,
}

/// Cooperative stop signal.
///
/// Clones share the same signal.
#[derive(Clone, Default)]
pub struct Cancel {
    inner: Arc<Mutex<Inner>>,
}

/// Keeps a callback registered with a [`Cancel`]; dropping it deregisters
/// the callback.
#[must_use = "dropping a registration removes its callback"]
pub struct Registration {
    inner: Weak<Mutex<Inner>>,
    id: u64,
}

impl Cancel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`stop`](Self::stop) has been called
    pub fn is_cancelled(&self) -> bool {
        self.inner.lock().fired
    }

    /// Register `callback` to run when the signal fires.
    ///
    /// Returns `None` without storing the callback if the signal has
    /// already fired.
    pub fn on_cancel<F>(&self, callback: F) -> Option<Registration>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut inner = self.inner.lock();
        if inner.fired {
            return None;
        }

        let id = inner.next_id;
        inner.next_id += 1;
        inner.callbacks.insert(id, Box::new(callback));

        Some(Registration {
            inner: Arc::downgrade(&self.inner),
            id,
        })
    }

    /// Fire the signal. Only the first call has any effect.
    pub fn stop(&self) {
        let callbacks = {
            let mut inner = self.inner.lock();
            if inner.fired {
                return;
            }
            inner.fired = true;
            std::mem::take(&mut inner.callbacks)
        };

        // Invoked outside the lock so callbacks may inspect the signal
        for (_, callback) in callbacks {
            callback();
        }
    }

    /// Drive `future` unless the signal fires first.
    ///
    /// The signal is checked again once the future completes, so a stop
    /// that races with completion still yields [`Aborted`].
    pub async fn run<F>(&self, future: F) -> Result<F::Output, Aborted>
    where
        F: Future,
    {
        let (tx, rx) = oneshot::channel::<()>();
        let _registration = self
            .on_cancel(move || {
                let _ = tx.send(());
            })
            .ok_or(Aborted)?;

        let output = tokio::select! {
            biased;
            _ = rx => return Err(Aborted),
            output = future => output,
        };

        if self.is_cancelled() {
            return Err(Aborted);
        }

        Ok(output)
    }
}

impl fmt::Debug for Cancel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Cancel")
            .field("fired", &inner.fired)
            .field("registered", &inner.callbacks.len())
            .finish()
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().callbacks.remove(&self.id);
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}
