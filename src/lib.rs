//! A small fixed-size thread pool.
//!
//! Each [`Executor`] owns a set of [`Worker`]s, one thread and one FIFO queue
//! apiece. Submitted work goes to the worker with the fewest queued jobs and
//! the caller gets a [`Handle`] that blocks until the outcome is known.

mod error;
pub use error::ExecutorError;
pub use error::Result;
pub use error::TaskError;

pub mod promise;
pub use promise::Handle;
pub use promise::Promise;

mod worker;
pub use worker::Worker;

mod executor;
pub use executor::Builder;
pub use executor::Executor;
pub use executor::DEFAULT_THREADS;

mod spawn;
pub use spawn::spawn;
pub use spawn::spawn_fn;
