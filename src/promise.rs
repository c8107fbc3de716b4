use crate::error::TaskError;
use std::fmt;
use std::result;
use std::sync::Arc;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::OnceLock;

type Outcome<T, E> = result::Result<T, TaskError<E>>;

// An empty `outcome` means pending. It is only written while `lock` is held,
// so a waiter that finds it empty under the lock cannot miss the wake-up.
struct Slot<T, E> {
    outcome: OnceLock<Outcome<T, E>>,
    lock: Mutex<()>,
    ready: Condvar,
}

impl<T, E> Slot<T, E> {
    fn set(&self, outcome: Outcome<T, E>) {
        let guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let written = self.outcome.set(outcome).is_ok();
        debug_assert!(written, "result cell written twice");
        drop(guard);
        self.ready.notify_all();
    }

    fn wait(&self) -> &Outcome<T, E> {
        if let Some(outcome) = self.outcome.get() {
            return outcome;
        }
        let mut guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        loop {
            if let Some(outcome) = self.outcome.get() {
                return outcome;
            }
            guard = self
                .ready
                .wait(guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    fn is_set(&self) -> bool {
        self.outcome.get().is_some()
    }
}

/// Creates a pending result cell and returns both of its sides.
pub fn pair<T, E>() -> (Promise<T, E>, Handle<T, E>) {
    let slot = Arc::new(Slot {
        outcome: OnceLock::new(),
        lock: Mutex::new(()),
        ready: Condvar::new(),
    });
    (
        Promise {
            slot: Arc::clone(&slot),
        },
        Handle { slot },
    )
}

/// The writing side of a result cell.
///
/// Every write consumes the promise, so a cell is written at most once. A
/// promise dropped without being written fails its cell with
/// [`TaskError::Abandoned`], so no handle waits on it forever.
pub struct Promise<T, E> {
    slot: Arc<Slot<T, E>>,
}

impl<T, E> Promise<T, E> {
    pub fn fulfil(self, value: T) {
        self.slot.set(Ok(value));
    }

    pub fn fail(self, err: TaskError<E>) {
        self.slot.set(Err(err));
    }

    pub fn complete(self, outcome: Outcome<T, E>) {
        self.slot.set(outcome);
    }
}

impl<T, E> Drop for Promise<T, E> {
    fn drop(&mut self) {
        if !self.slot.is_set() {
            self.slot.set(Err(TaskError::Abandoned));
        }
    }
}

/// The reading side of a result cell.
///
/// Handles are cheap to clone and every clone observes the same outcome.
pub struct Handle<T, E> {
    slot: Arc<Slot<T, E>>,
}

impl<T, E> Handle<T, E> {
    /// Blocks until the outcome is available, then passes a borrow of it to `f`.
    ///
    /// No lock is held while `f` runs.
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(result::Result<&T, &TaskError<E>>) -> R,
    {
        f(self.slot.wait().as_ref())
    }

    pub fn is_ready(&self) -> bool {
        self.slot.is_set()
    }
}

impl<T: Clone, E: Clone> Handle<T, E> {
    /// Blocks until the outcome is available and returns a copy of it.
    ///
    /// May be called any number of times, from any thread.
    pub fn wait(&self) -> Outcome<T, E> {
        self.slot.wait().clone()
    }
}

impl<T, E> Clone for Handle<T, E> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T, E> fmt::Debug for Handle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("ready", &self.is_ready())
            .finish()
    }
}
