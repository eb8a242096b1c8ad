//! Execution outcome of an operation

use crate::LogEntry;

/// What an operation produced
///
/// Mutations come back `Logged` so the processor can audit them, reads come
/// back `Unlogged`. Failures may carry an entry when the attempt itself
/// should be recorded.
#[derive(Debug)]
pub enum ExecutionResult<T, E> {
    Logged { value: T, log_entry: LogEntry },
    Unlogged { value: T },
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Failure without a log entry
    pub fn failed(error: E) -> Self {
        Self::Failed {
            error,
            log_entry: None,
        }
    }

    pub fn into_result(self) -> Result<T, E> {
        self.split().0
    }

    /// Separate the outcome from its log entry
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    pub fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Logged { .. }
                | Self::Failed {
                    log_entry: Some(_),
                    ..
                }
        )
    }
}

impl<T, E> From<Result<T, E>> for ExecutionResult<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Unlogged { value },
            Err(error) => Self::failed(error),
        }
    }
}
