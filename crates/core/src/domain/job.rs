// Job Domain Model

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::{DomainError, Result};

/// Job ID (`<prefix>.<ULID>`)
pub type JobId = String;

/// Job Status
///
/// `PENDING` is the only initial status. `FAILED`, `ABORTED` and `SUCCEEDED`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Failed,
    Aborted,
    Succeeded,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Failed,
        JobStatus::Aborted,
        JobStatus::Succeeded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Failed => "FAILED",
            JobStatus::Aborted => "ABORTED",
            JobStatus::Succeeded => "SUCCEEDED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Aborted | JobStatus::Succeeded
        )
    }

    /// Statuses that may carry error messages
    pub fn is_failure(&self) -> bool {
        matches!(self, JobStatus::Failed | JobStatus::Aborted)
    }

    /// Edges of the lifecycle graph (excluding same-status no-ops)
    pub fn can_transition_to(&self, to: JobStatus) -> bool {
        match self {
            JobStatus::Pending => to != JobStatus::Pending,
            JobStatus::Running => to.is_terminal(),
            JobStatus::Failed | JobStatus::Aborted | JobStatus::Succeeded => false,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::UnknownStatus(s.to_string()))
    }
}

/// Job Type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "S3_UNARCHIVING")]
    S3Unarchiving,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::S3Unarchiving => "S3_UNARCHIVING",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "S3_UNARCHIVING" => Ok(JobType::S3Unarchiving),
            other => Err(DomainError::UnknownJobType(other.to_string())),
        }
    }
}

/// Timestamps keep millisecond precision so a record reads back exactly as
/// it was returned and published
const MILLIS: u16 = 3;

/// Outcome of applying a status to a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// Status moved along the lifecycle graph; subscribers must be notified
    Changed { from: JobStatus, to: JobStatus },
    /// Same non-terminal status re-applied (e.g. a replayed RUNNING callback)
    Unchanged,
}

impl StatusTransition {
    pub fn is_changed(&self) -> bool {
        matches!(self, StatusTransition::Changed { .. })
    }
}

/// Job Entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub fastq_ids: Vec<String>,
    pub job_type: JobType,
    pub status: JobStatus,
    pub steps_execution_arn: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub error_messages: Option<String>,
    /// Record expiry, epoch seconds. Internal to the store.
    pub ttl: i64,
}

impl Job {
    /// Create a new PENDING job
    ///
    /// # Arguments
    ///
    /// * `id` - Unique job ID (injected, not generated)
    /// * `fastq_ids` - Input objects to unarchive, must be non-empty
    /// * `job_type` - Job type
    /// * `now` - Creation time (injected, not system time)
    /// * `ttl` - How long the store keeps the record after creation
    pub fn new(
        id: impl Into<String>,
        fastq_ids: Vec<String>,
        job_type: JobType,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self> {
        if fastq_ids.is_empty() {
            return Err(DomainError::Validation(
                "fastqIds must not be empty".to_string(),
            ));
        }
        if fastq_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(DomainError::Validation(
                "fastqIds must not contain blank identifiers".to_string(),
            ));
        }

        let now = now.trunc_subsecs(MILLIS);

        Ok(Self {
            id: id.into(),
            fastq_ids,
            job_type,
            status: JobStatus::Pending,
            steps_execution_arn: None,
            start_time: now,
            end_time: None,
            error_messages: None,
            ttl: (now + ttl).timestamp(),
        })
    }

    /// Apply a requested status
    ///
    /// Terminal statuses set `end_time` once. Error messages are kept only for
    /// FAILED/ABORTED; supplying them with any other status is rejected.
    pub fn apply_status(
        &mut self,
        to: JobStatus,
        error_messages: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<StatusTransition> {
        let from = self.status;

        if from.is_terminal() || to == JobStatus::Pending {
            return Err(DomainError::InvalidStatusTransition { from, to });
        }

        let error_messages = error_messages.filter(|msg| !msg.trim().is_empty());
        if error_messages.is_some() && !to.is_failure() {
            return Err(DomainError::Validation(format!(
                "errorMessages can only be set with FAILED or ABORTED, not {}",
                to
            )));
        }

        if from == to {
            return Ok(StatusTransition::Unchanged);
        }

        if !from.can_transition_to(to) {
            return Err(DomainError::InvalidStatusTransition { from, to });
        }

        self.status = to;
        if to.is_terminal() {
            self.end_time = Some(now.trunc_subsecs(MILLIS));
            self.error_messages = error_messages;
        }

        Ok(StatusTransition::Changed { from, to })
    }

    /// Record the external execution driving this job
    ///
    /// Returns `false` when the same handle was already attached.
    pub fn attach_execution(&mut self, execution_arn: impl Into<String>) -> Result<bool> {
        let execution_arn = execution_arn.into();
        if execution_arn.trim().is_empty() {
            return Err(DomainError::Validation(
                "stepsExecutionArn must not be empty".to_string(),
            ));
        }

        match &self.steps_execution_arn {
            Some(existing) if *existing == execution_arn => Ok(false),
            Some(existing) => Err(DomainError::ExecutionAlreadyAttached {
                id: self.id.clone(),
                existing: existing.clone(),
            }),
            None if self.status.is_terminal() => Err(DomainError::JobFinished {
                id: self.id.clone(),
                status: self.status,
            }),
            None => {
                self.steps_execution_arn = Some(execution_arn);
                Ok(true)
            }
        }
    }
}
