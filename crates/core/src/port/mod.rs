// Port Layer - Interfaces for external dependencies

pub mod event_publisher;
pub mod expiry;
pub mod id_provider; // For deterministic testing
pub mod job_store;
pub mod time_provider;

// Re-exports
pub use event_publisher::EventPublisher;
pub use expiry::JobExpiry;
pub use id_provider::{is_valid_job_id, IdProvider, UlidProvider};
pub use job_store::{
    BeforeCommit, CommitNow, JobFilter, JobMutation, JobPage, JobStore, PageRequest,
};
pub use time_provider::TimeProvider;
