//! Run-time error taxonomy.
//!
//! Binding errors abort a run before any task executes. Task errors carry
//! the original error unchanged through the pipeline and through any
//! enclosing invocation, with no wrapping of the message.

use taskforce_core::CoercionError;
use thiserror::Error;

/// A token sequence could not be bound against a group's declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An option token names an option the group never declares.
    #[error("unknown option: --{0}")]
    UnknownOption(String),
    /// A token could not be converted to its declared type.
    #[error("invalid value for \"{subject}\": {source}")]
    Coercion {
        /// The argument or option the token was bound to.
        subject: String,
        #[source]
        source: CoercionError,
    },
    /// A non-boolean option appeared without an inline or following value.
    #[error("option \"{0}\" requires a value")]
    MissingValue(String),
    /// A required argument was left unfilled after the scan.
    #[error("no value provided for required argument \"{0}\"")]
    MissingArgument(String),
    /// A required option never appeared in the token stream.
    #[error("no value provided for required option \"{0}\"")]
    MissingOption(String),
}

/// An error raised by a task body.
///
/// The inner error is surfaced unchanged: `Display` forwards to it and
/// [`inner`](TaskError::inner) exposes it for inspection.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TaskError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl TaskError {
    /// Wraps an existing error.
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self(source.into())
    }

    /// Creates a task error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }

    /// The original error raised by the task body.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl From<RunError> for TaskError {
    fn from(err: RunError) -> Self {
        Self(Box::new(err))
    }
}

/// Any error that terminates a pipeline run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Binding failed; no task was executed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A task body failed; remaining tasks were aborted.
    #[error(transparent)]
    Task(#[from] TaskError),
}
