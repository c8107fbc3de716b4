use crate::error::Result;
use crate::promise;
use crate::promise::Handle;
use crate::worker::Job;
use crate::worker::WorkItem;
use slog::o;
use slog::Discard;
use slog::Logger;
use std::convert::Infallible;
use std::result;
use std::thread;

/// Runs `work` on a new detached thread and returns a handle to its outcome.
///
/// Failures and panics are captured the same way an [`crate::Executor`]
/// captures them.
pub fn spawn<T, E, F>(work: F) -> Result<Handle<T, E>>
where
    F: FnOnce() -> result::Result<T, E> + Send + 'static,
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    let (promise, handle) = promise::pair();
    let job: Box<dyn Job> = Box::new(WorkItem::new(work, promise));
    let log = Logger::root(Discard, o!());
    thread::Builder::new()
        .name("thread-executor-detached".to_string())
        .spawn(move || job.run(&log))?;
    Ok(handle)
}

pub fn spawn_fn<T, F>(f: F) -> Result<Handle<T, Infallible>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + Sync + 'static,
{
    spawn(move || Ok(f()))
}
