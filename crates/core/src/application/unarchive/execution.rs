// Attach Execution Use Case

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Job, JobId, JobResponse};
use crate::error::Result;
use crate::port::JobStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachExecutionRequest {
    pub job_id: JobId,
    pub steps_execution_arn: String,
}

/// Record the execution handle backing a job. Not a status change, so
/// nothing is published.
pub async fn execute(store: &dyn JobStore, req: AttachExecutionRequest) -> Result<JobResponse> {
    let mut attached = false;

    let job = store
        .update(&req.job_id, &mut |job: &mut Job| -> Result<()> {
            attached = job.attach_execution(req.steps_execution_arn.as_str())?;
            Ok(())
        })
        .await?;

    if attached {
        info!(job_id = %job.id, execution_arn = %req.steps_execution_arn, "Execution attached");
    }

    Ok(JobResponse::from(job))
}
