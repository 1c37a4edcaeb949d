//! Errors surfaced by request-level reminder operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReminderError {
    /// Neither an inline task list nor a project id was supplied.
    #[error("provide a project id or a tasks array")]
    InvalidInput,

    /// The task store could not resolve the project. Not retried here.
    #[error("task store lookup failed: {0:#}")]
    UpstreamFailure(#[source] anyhow::Error),
}
