use std::any::Any;
use std::error;
use std::fmt;
use std::io;
use std::result;

/// Errors raised while building an executor or starting its threads.
#[derive(Debug)]
pub enum ExecutorError {
    ZeroThreads,
    Spawn(io::Error),
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroThreads => write!(f, "an executor needs at least one thread"),
            Self::Spawn(err) => write!(f, "Spawn: {}", err),
        }
    }
}

impl error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::ZeroThreads => None,
            Self::Spawn(source) => Some(source),
        }
    }
}

impl From<io::Error> for ExecutorError {
    fn from(e: io::Error) -> Self {
        Self::Spawn(e)
    }
}

pub type Result<T> = result::Result<T, ExecutorError>;

/// The failure of a single unit of work, as seen through its handle.
///
/// `Failed` carries the error returned by the work itself, untouched.
/// `Panicked` carries the panic message when the work unwound instead.
/// `Abandoned` means the work was dropped without ever running, which happens
/// when it reaches a worker whose thread has already stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError<E> {
    Failed(E),
    Panicked(String),
    Abandoned,
}

impl<E> TaskError<E> {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(msg) => *msg,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(msg) => msg.to_string(),
                Err(_) => "Box<dyn Any>".to_string(),
            },
        };
        Self::Panicked(message)
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }

    /// Returns the work's own error, or `None` if the work panicked or never ran.
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Panicked(_) | Self::Abandoned => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for TaskError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(err) => write!(f, "{}", err),
            Self::Panicked(msg) => write!(f, "task panicked: {}", msg),
            Self::Abandoned => write!(f, "task was dropped before it ran"),
        }
    }
}

impl<E: error::Error + 'static> error::Error for TaskError<E> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Failed(source) => Some(source),
            Self::Panicked(_) | Self::Abandoned => None,
        }
    }
}
