// Update Job Status Use Case

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{Job, JobId, JobResponse, JobStatus, StatusTransition};
use crate::error::{AppError, Result};
use crate::port::{BeforeCommit, EventPublisher, JobStore, TimeProvider};

/// Status update requested through the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub error_messages: Option<String>,
}

/// Progress report sent by the external execution driving a job
///
/// `errorMessages` is only honoured when `hasError` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCallback {
    pub job_id: JobId,
    pub status: String,
    #[serde(default)]
    pub has_error: bool,
    #[serde(default)]
    pub error_messages: Option<String>,
}

impl StatusCallback {
    pub fn into_request(self) -> Result<UpdateStatusRequest> {
        let status = self.status.parse::<JobStatus>()?;
        Ok(UpdateStatusRequest {
            job_id: self.job_id,
            status,
            error_messages: if self.has_error {
                self.error_messages
            } else {
                None
            },
        })
    }
}

/// Publishes the mutated record when its status actually moved
struct PublishOnChange<'a> {
    publisher: &'a dyn EventPublisher,
    transition: &'a Mutex<StatusTransition>,
}

#[async_trait]
impl<'a> BeforeCommit for PublishOnChange<'a> {
    async fn before_commit(&self, job: &Job) -> Result<()> {
        let transition = *self
            .transition
            .lock()
            .map_err(|_| AppError::Internal("transition lock poisoned".to_string()))?;

        match transition {
            StatusTransition::Changed { from, to } => {
                info!(job_id = %job.id, %from, %to, "Job status changed");
                self.publisher
                    .publish_state_change(&JobResponse::from(job))
                    .await
            }
            StatusTransition::Unchanged => {
                debug!(job_id = %job.id, status = %job.status, "Status unchanged, not publishing");
                Ok(())
            }
        }
    }
}

/// Execute status update use case
///
/// 1. Load the job (`NotFound` if absent)
/// 2. Validate the transition against the lifecycle graph
/// 3. Write the updated record
/// 4. Publish the full record if the status changed, then commit
///
/// A failed publish rolls the write back, so retrying the same request
/// repeats the transition and its notification.
pub async fn execute(
    store: &dyn JobStore,
    publisher: &dyn EventPublisher,
    time_provider: &dyn TimeProvider,
    req: UpdateStatusRequest,
) -> Result<JobResponse> {
    let now = time_provider.now();
    let transition = Mutex::new(StatusTransition::Unchanged);
    let hook = PublishOnChange {
        publisher,
        transition: &transition,
    };

    let job = store
        .update_with(
            &req.job_id,
            &mut |job: &mut Job| -> Result<()> {
                let applied = job.apply_status(req.status, req.error_messages.clone(), now)?;
                let mut slot = transition
                    .lock()
                    .map_err(|_| AppError::Internal("transition lock poisoned".to_string()))?;
                *slot = applied;
                Ok(())
            },
            &hook,
        )
        .await?;

    Ok(JobResponse::from(job))
}
