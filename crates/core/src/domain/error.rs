// Domain Error Types

use thiserror::Error;

use super::job::JobStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid job status transition: {from} -> {to}")]
    InvalidStatusTransition { from: JobStatus, to: JobStatus },

    #[error("Job {id} is already driven by execution {existing}")]
    ExecutionAlreadyAttached { id: String, existing: String },

    #[error("Job {id} already finished with status {status}")]
    JobFinished { id: String, status: JobStatus },

    #[error("Unknown job status: {0}")]
    UnknownStatus(String),

    #[error("Unknown job type: {0}")]
    UnknownJobType(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl DomainError {
    /// Errors that reflect the stored record's state rather than bad input
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidStatusTransition { .. }
                | DomainError::ExecutionAlreadyAttached { .. }
                | DomainError::JobFinished { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
