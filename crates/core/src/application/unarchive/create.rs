// Create Job Use Case

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::ServiceConfig;
use crate::domain::{Job, JobResponse, JobType};
use crate::error::Result;
use crate::port::{IdProvider, JobStore, TimeProvider};

/// Create request: everything else is system-assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub fastq_ids: Vec<String>,
    pub job_type: JobType,
}

/// Execute create use case
///
/// The job always starts PENDING. Creation is not a state change, so no
/// event is published.
pub async fn execute(
    store: &dyn JobStore,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    config: &ServiceConfig,
    req: CreateJobRequest,
) -> Result<JobResponse> {
    let job = Job::new(
        id_provider.generate_id(),
        req.fastq_ids,
        req.job_type,
        time_provider.now(),
        config.ttl,
    )?;

    store.create(&job).await?;

    info!(
        job_id = %job.id,
        job_type = %job.job_type,
        fastq_count = job.fastq_ids.len(),
        "Unarchive job created"
    );

    Ok(JobResponse::from(job))
}
