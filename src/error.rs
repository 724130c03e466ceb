// Error taxonomy shared by the parser, the task model and file I/O.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    /// A mutator received an empty or malformed tag, key, value or priority.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A whole string could not be read as a task, recurrence or render mode.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TodoError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
