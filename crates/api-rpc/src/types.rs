//! RPC Request Types
//!
//! Method parameters use camelCase. Results are the core's `JobResponse`
//! and `PaginatedResponse`.

use serde::Deserialize;
use unarchive_core::application::unarchive::{
    AttachExecutionRequest, CreateJobRequest, ListJobsQuery, UpdateStatusRequest,
};
use unarchive_core::domain::{JobStatus, JobType};
use unarchive_core::error::Result;

/// jobs.create.v1
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobParams {
    pub fastq_ids: Vec<String>,
    #[serde(default = "default_job_type")]
    pub job_type: String,
}

fn default_job_type() -> String {
    JobType::S3Unarchiving.to_string()
}

impl CreateJobParams {
    pub fn into_request(self) -> Result<CreateJobRequest> {
        Ok(CreateJobRequest {
            fastq_ids: self.fastq_ids,
            job_type: self.job_type.parse::<JobType>()?,
        })
    }
}

/// jobs.get.v1
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetJobParams {
    pub job_id: String,
}

/// jobs.list.v1
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub rows_per_page: Option<u32>,
}

impl ListJobsParams {
    pub fn into_query(self) -> Result<ListJobsQuery> {
        Ok(ListJobsQuery {
            status: self.status.map(|s| s.parse::<JobStatus>()).transpose()?,
            page: self.page,
            rows_per_page: self.rows_per_page,
        })
    }
}

/// jobs.update_status.v1
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusParams {
    pub job_id: String,
    pub status: String,
    #[serde(default)]
    pub error_messages: Option<String>,
}

impl UpdateStatusParams {
    pub fn into_request(self) -> Result<UpdateStatusRequest> {
        Ok(UpdateStatusRequest {
            job_id: self.job_id,
            status: self.status.parse::<JobStatus>()?,
            error_messages: self.error_messages,
        })
    }
}

/// jobs.attach_execution.v1
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachExecutionParams {
    pub job_id: String,
    pub steps_execution_arn: String,
}

impl From<AttachExecutionParams> for AttachExecutionRequest {
    fn from(params: AttachExecutionParams) -> Self {
        Self {
            job_id: params.job_id,
            steps_execution_arn: params.steps_execution_arn,
        }
    }
}
