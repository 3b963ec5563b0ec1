// External view of a Job
//
// Shared by API responses and state-change notifications. `ttl` stays
// internal and unset optional fields are omitted rather than sent as null.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::{Job, JobId, JobStatus, JobType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: JobId,
    pub fastq_ids: Vec<String>,
    pub job_type: JobType,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_execution_arn: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_messages: Option<String>,
}

impl From<&Job> for JobResponse {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            fastq_ids: job.fastq_ids.clone(),
            job_type: job.job_type,
            status: job.status,
            steps_execution_arn: job.steps_execution_arn.clone(),
            start_time: job.start_time,
            end_time: job.end_time,
            error_messages: job.error_messages.clone(),
        }
    }
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            fastq_ids: job.fastq_ids,
            job_type: job.job_type,
            status: job.status,
            steps_execution_arn: job.steps_execution_arn,
            start_time: job.start_time,
            end_time: job.end_time,
            error_messages: job.error_messages,
        }
    }
}
