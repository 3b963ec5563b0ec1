// Unarchive Service - Orchestrates the job lifecycle

pub mod create;
pub mod execution;
pub mod list;
pub mod status;

#[cfg(test)]
mod test_support;

pub use create::CreateJobRequest;
pub use execution::AttachExecutionRequest;
pub use list::ListJobsQuery;
pub use status::{StatusCallback, UpdateStatusRequest};

use crate::application::{PaginatedResponse, ServiceConfig};
use crate::domain::{JobId, JobResponse};
use crate::error::{AppError, Result};
use crate::port::{is_valid_job_id, EventPublisher, IdProvider, JobStore, TimeProvider};
use std::sync::Arc;

/// Unarchive Service
///
/// Request-scoped and stateless: every call runs to completion against the
/// injected store and publisher.
pub struct UnarchiveService {
    store: Arc<dyn JobStore>,
    publisher: Arc<dyn EventPublisher>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    config: ServiceConfig,
}

impl UnarchiveService {
    pub fn new(
        store: Arc<dyn JobStore>,
        publisher: Arc<dyn EventPublisher>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            publisher,
            id_provider,
            time_provider,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Create a new PENDING job
    pub async fn create_job(&self, req: CreateJobRequest) -> Result<JobResponse> {
        create::execute(
            self.store.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            &self.config,
            req,
        )
        .await
    }

    /// Fetch a job by id
    pub async fn get_job(&self, id: &JobId) -> Result<JobResponse> {
        ensure_job_id(id)?;
        let job = self.store.get(id).await?;
        Ok(JobResponse::from(job))
    }

    /// List jobs, optionally filtered by status
    pub async fn list_jobs(&self, query: ListJobsQuery) -> Result<PaginatedResponse<JobResponse>> {
        list::execute(self.store.as_ref(), &self.config, query).await
    }

    /// Apply a status transition and publish it
    pub async fn update_job_status(&self, req: UpdateStatusRequest) -> Result<JobResponse> {
        ensure_job_id(&req.job_id)?;
        status::execute(
            self.store.as_ref(),
            self.publisher.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    /// Handle a progress report from the execution driving a job
    pub async fn handle_callback(&self, callback: StatusCallback) -> Result<JobResponse> {
        self.update_job_status(callback.into_request()?).await
    }

    /// Attach the external execution handle to a job
    pub async fn attach_execution(&self, req: AttachExecutionRequest) -> Result<JobResponse> {
        ensure_job_id(&req.job_id)?;
        execution::execute(self.store.as_ref(), req).await
    }
}

fn ensure_job_id(id: &str) -> Result<()> {
    if is_valid_job_id(id) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Malformed job id: {}", id)))
    }
}
