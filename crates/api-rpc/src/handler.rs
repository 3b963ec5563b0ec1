//! RPC Method Handlers
//!
//! Thin adapters from RPC params to the unarchive service.

use crate::error::to_rpc_error;
use crate::types::{
    AttachExecutionParams, CreateJobParams, GetJobParams, ListJobsParams, UpdateStatusParams,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracing::warn;
use unarchive_core::application::unarchive::StatusCallback;
use unarchive_core::application::{PaginatedResponse, UnarchiveService};
use unarchive_core::domain::JobResponse;
use unarchive_core::error::AppError;

/// RPC Handler with injected service
pub struct RpcHandler {
    service: Arc<UnarchiveService>,
}

impl RpcHandler {
    pub fn new(service: Arc<UnarchiveService>) -> Self {
        Self { service }
    }

    /// jobs.create.v1
    pub async fn create_job(
        &self,
        params: CreateJobParams,
    ) -> Result<JobResponse, ErrorObjectOwned> {
        let req = params.into_request().map_err(reject)?;
        self.service.create_job(req).await.map_err(reject)
    }

    /// jobs.get.v1
    pub async fn get_job(&self, params: GetJobParams) -> Result<JobResponse, ErrorObjectOwned> {
        self.service.get_job(&params.job_id).await.map_err(reject)
    }

    /// jobs.list.v1
    pub async fn list_jobs(
        &self,
        params: ListJobsParams,
    ) -> Result<PaginatedResponse<JobResponse>, ErrorObjectOwned> {
        let query = params.into_query().map_err(reject)?;
        self.service.list_jobs(query).await.map_err(reject)
    }

    /// jobs.update_status.v1
    pub async fn update_status(
        &self,
        params: UpdateStatusParams,
    ) -> Result<JobResponse, ErrorObjectOwned> {
        let req = params.into_request().map_err(reject)?;
        self.service.update_job_status(req).await.map_err(reject)
    }

    /// jobs.attach_execution.v1
    pub async fn attach_execution(
        &self,
        params: AttachExecutionParams,
    ) -> Result<JobResponse, ErrorObjectOwned> {
        self.service
            .attach_execution(params.into())
            .await
            .map_err(reject)
    }

    /// jobs.callback.v1
    pub async fn callback(&self, params: StatusCallback) -> Result<JobResponse, ErrorObjectOwned> {
        self.service.handle_callback(params).await.map_err(reject)
    }
}

/// Domain errors are expected outcomes; only infrastructure failures are
/// worth a warning.
fn reject(err: AppError) -> ErrorObjectOwned {
    if !(err.is_validation() || err.is_not_found() || err.is_conflict()) {
        warn!(error = %err, "Request failed");
    }
    to_rpc_error(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use unarchive_core::application::ServiceConfig;
    use unarchive_core::port::id_provider::UlidProvider;
    use unarchive_core::port::time_provider::SystemTimeProvider;
    use unarchive_infra_events::LocalEventPublisher;
    use unarchive_infra_sqlite::{create_pool, run_migrations, SqliteJobStore};

    async fn handler() -> RpcHandler {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let service = UnarchiveService::new(
            Arc::new(SqliteJobStore::new(pool)),
            Arc::new(LocalEventPublisher),
            Arc::new(UlidProvider::default()),
            Arc::new(SystemTimeProvider),
            ServiceConfig::default(),
        );
        RpcHandler::new(Arc::new(service))
    }

    fn create_params() -> CreateJobParams {
        CreateJobParams {
            fastq_ids: vec!["fqr.ABC".to_string()],
            job_type: "S3_UNARCHIVING".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let handler = handler().await;

        let created = handler.create_job(create_params()).await.unwrap();
        let fetched = handler
            .get_job(GetJobParams {
                job_id: created.id.clone(),
            })
            .await
            .unwrap();

        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_error_codes_reach_caller() {
        let handler = handler().await;
        let created = handler.create_job(create_params()).await.unwrap();

        let err = handler
            .update_status(UpdateStatusParams {
                job_id: created.id.clone(),
                status: "FINISHED".to_string(),
                error_messages: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);

        handler
            .update_status(UpdateStatusParams {
                job_id: created.id.clone(),
                status: "ABORTED".to_string(),
                error_messages: Some("cancelled by operator".to_string()),
            })
            .await
            .unwrap();

        let err = handler
            .callback(StatusCallback {
                job_id: created.id.clone(),
                status: "RUNNING".to_string(),
                has_error: false,
                error_messages: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::CONFLICT);

        let err = handler
            .get_job(GetJobParams {
                job_id: "ufj.01HZY3J5K6M7N8P9Q0R1S2T3V4".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);
    }
}
