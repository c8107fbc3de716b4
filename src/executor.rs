use crate::error::ExecutorError;
use crate::error::Result;
use crate::promise::Handle;
use crate::worker::Worker;
use slog::debug;
use slog::info;
use slog::o;
use slog::trace;
use slog::Discard;
use slog::Logger;
use std::convert::Infallible;
use std::result;
use std::thread;

pub const DEFAULT_THREADS: usize = 2;

const DEFAULT_NAME: &str = "thread-executor";

/// Configuration for an [`Executor`].
#[derive(Debug, Clone)]
pub struct Builder {
    threads: usize,
    name: Option<String>,
    stack_size: Option<usize>,
    log: Option<Logger>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            name: None,
            stack_size: None,
            log: None,
        }
    }
}

impl Builder {
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Prefix for worker thread names; each thread gets `<name>-<index>`.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub fn logger(mut self, log: Logger) -> Self {
        self.log = Some(log);
        self
    }

    /// Starts every worker thread before returning.
    ///
    /// If one of the threads cannot be spawned, the ones already running are
    /// shut down and joined before the error is returned.
    pub fn build(self) -> Result<Executor> {
        if self.threads == 0 {
            return Err(ExecutorError::ZeroThreads);
        }
        let log = self.log.unwrap_or_else(|| Logger::root(Discard, o!()));
        let name = self.name.as_deref().unwrap_or(DEFAULT_NAME);

        let workers = (0..self.threads)
            .map(|id| {
                let mut builder = thread::Builder::new().name(format!("{}-{}", name, id));
                if let Some(bytes) = self.stack_size {
                    builder = builder.stack_size(bytes);
                }
                Worker::with_thread_builder(id, builder, log.new(o!("worker" => id)))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(log, "executor started"; "threads" => workers.len(), "name" => name);
        Ok(Executor { workers, log })
    }
}

/// A fixed set of workers, each with its own queue.
///
/// New work goes to the worker with the shortest queue at the time of the
/// call. Queue lengths are read without coordination with other submitters,
/// so concurrent submissions may land on a worker that is not the shortest
/// any more.
///
/// ```
/// use thread_executor::Executor;
///
/// let executor = Executor::new(4).unwrap();
/// let handles: Vec<_> = (0..10).map(|i| executor.call(move || i * 2)).collect();
/// let sum: i32 = handles.iter().map(|h| h.wait().unwrap()).sum();
/// executor.finish();
/// assert_eq!(sum, 90);
/// ```
pub struct Executor {
    workers: Vec<Worker>,
    log: Logger,
}

impl Executor {
    pub fn new(threads: usize) -> Result<Self> {
        Self::builder().threads(threads).build()
    }

    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Queues `work` on the least loaded worker and returns a handle to its
    /// outcome. Ties go to the worker created first.
    pub fn submit<T, E, F>(&self, work: F) -> Handle<T, E>
    where
        F: FnOnce() -> result::Result<T, E> + Send + 'static,
        T: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        let mut target = &self.workers[0];
        let mut min_depth = target.queue_depth();
        for worker in &self.workers[1..] {
            let depth = worker.queue_depth();
            if depth < min_depth {
                target = worker;
                min_depth = depth;
            }
        }
        trace!(self.log, "dispatching job"; "worker" => target.id(), "depth" => min_depth);
        target.submit(work)
    }

    /// Like [`Executor::submit`] for work that cannot fail.
    pub fn call<T, F>(&self, f: F) -> Handle<T, Infallible>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + Sync + 'static,
    {
        self.submit(move || Ok(f()))
    }

    /// Sum of every worker's queue depth.
    pub fn size(&self) -> usize {
        self.workers.iter().map(Worker::queue_depth).sum()
    }

    /// Queue depth of each worker, in construction order.
    pub fn queue_depths(&self) -> Vec<usize> {
        self.workers.iter().map(Worker::queue_depth).collect()
    }

    pub fn threads(&self) -> usize {
        self.workers.len()
    }

    /// Runs everything already queued, then stops and joins every thread.
    pub fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        for worker in &self.workers {
            worker.request_shutdown();
        }
        for mut worker in self.workers.drain(..) {
            worker.join();
            debug!(self.log, "worker joined"; "worker" => worker.id());
        }
        info!(self.log, "executor finished");
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            self.shutdown();
        }
    }
}
