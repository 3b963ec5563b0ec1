// Domain Layer - Job entity and lifecycle rules

pub mod error;
pub mod job;
pub mod response;

// Re-exports
pub use error::DomainError;
pub use job::{Job, JobId, JobStatus, JobType, StatusTransition};
pub use response::JobResponse;
