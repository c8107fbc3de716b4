use crate::error::Result;
use crate::error::TaskError;
use crate::promise;
use crate::promise::Handle;
use crate::promise::Promise;
use crossbeam::channel;
use crossbeam::channel::Receiver;
use crossbeam::channel::Sender;
use slog::debug;
use slog::error;
use slog::warn;
use slog::Logger;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::result;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;

/// A unit of work with its result cell attached, erased to a single type so
/// that any job can travel through the same queue.
pub(crate) trait Job: Send {
    fn run(self: Box<Self>, log: &Logger);
}

pub(crate) struct WorkItem<F, T, E> {
    work: F,
    promise: Promise<T, E>,
}

impl<F, T, E> WorkItem<F, T, E> {
    pub(crate) fn new(work: F, promise: Promise<T, E>) -> Self {
        Self { work, promise }
    }
}

impl<F, T, E> Job for WorkItem<F, T, E>
where
    F: FnOnce() -> result::Result<T, E> + Send,
    T: Send + Sync,
    E: Send + Sync,
{
    fn run(self: Box<Self>, log: &Logger) {
        let WorkItem { work, promise } = *self;
        match panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(Ok(value)) => promise.fulfil(value),
            Ok(Err(err)) => promise.fail(TaskError::Failed(err)),
            Err(payload) => {
                let err = TaskError::from_panic(payload);
                if let TaskError::Panicked(msg) = &err {
                    warn!(log, "job panicked"; "message" => msg);
                }
                promise.fail(err);
            }
        }
    }
}

enum Message {
    Run(Box<dyn Job>),
    Stop,
}

/// One thread fed by its own FIFO queue.
///
/// Jobs run in the order they were submitted. A job that fails or panics
/// has its outcome stored in its handle and the thread moves on.
pub struct Worker {
    id: usize,
    sender: Sender<Message>,
    stopping: AtomicBool,
    thread: Option<JoinHandle<()>>,
    log: Logger,
}

impl Worker {
    pub fn new(id: usize, log: Logger) -> Result<Self> {
        let builder = thread::Builder::new().name(format!("thread-executor-{}", id));
        Self::with_thread_builder(id, builder, log)
    }

    pub(crate) fn with_thread_builder(
        id: usize,
        builder: thread::Builder,
        log: Logger,
    ) -> Result<Self> {
        let (sender, receiver) = channel::unbounded();
        let thread_log = log.clone();
        let thread = builder.spawn(move || run_loop(receiver, thread_log))?;
        debug!(log, "worker started");
        Ok(Self {
            id,
            sender,
            stopping: AtomicBool::new(false),
            thread: Some(thread),
            log,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Queues `work` behind everything already submitted to this worker.
    ///
    /// # Panics
    ///
    /// Panics if `request_shutdown` has already been called. Work that still
    /// races past a concurrent shutdown request is never run, and its handle
    /// reports [`TaskError::Abandoned`].
    pub fn submit<T, E, F>(&self, work: F) -> Handle<T, E>
    where
        F: FnOnce() -> result::Result<T, E> + Send + 'static,
        T: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        if self.stopping.load(Ordering::Acquire) {
            panic!("worker {} received work after shutdown was requested", self.id);
        }
        let (promise, handle) = promise::pair();
        let job = Box::new(WorkItem::new(work, promise));
        // On a disconnected channel the job comes back inside the error and is
        // dropped here, which abandons its promise.
        let _ = self.sender.send(Message::Run(job));
        handle
    }

    /// Number of queued messages that the thread has not picked up yet.
    pub fn queue_depth(&self) -> usize {
        self.sender.len()
    }

    /// Asks the thread to exit once everything queued so far has run.
    pub fn request_shutdown(&self) {
        self.stopping.store(true, Ordering::Release);
        // Fails only when the thread is already gone.
        let _ = self.sender.send(Message::Stop);
    }

    /// Waits for the thread to exit. Call `request_shutdown` first.
    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!(self.log, "worker thread panicked");
            }
        }
    }

    pub fn finish(mut self) {
        self.request_shutdown();
        self.join();
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.request_shutdown();
            self.join();
        }
    }
}

fn run_loop(receiver: Receiver<Message>, log: Logger) {
    for message in receiver.iter() {
        match message {
            Message::Run(job) => job.run(&log),
            Message::Stop => break,
        }
    }
    debug!(log, "worker stopped");
}
