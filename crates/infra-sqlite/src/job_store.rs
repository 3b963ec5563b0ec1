// SQLite JobStore Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use unarchive_core::domain::{Job, JobId, JobStatus, JobType};
use unarchive_core::error::{AppError, Result};
use unarchive_core::port::{
    BeforeCommit, JobFilter, JobMutation, JobPage, JobStore, PageRequest,
};

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // SQLite error codes: https://www.sqlite.org/rescode.html
            match db_err.code().as_deref() {
                Some("2067") | Some("1555") => {
                    // UNIQUE / PRIMARY KEY constraint failed
                    AppError::Conflict(format!("Job already exists: {}", db_err.message()))
                }
                Some("5") => {
                    // SQLITE_BUSY - database is locked
                    AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    ))
                }
                Some(code) => AppError::Database(format!(
                    "Database error [{}]: {}",
                    code,
                    db_err.message()
                )),
                None => AppError::Database(format!("Database error: {}", db_err.message())),
            }
        }
        sqlx::Error::PoolTimedOut => {
            AppError::Database("Timed out waiting for a database connection".to_string())
        }
        _ => AppError::Database(err.to_string()),
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Job {} not found", id))
}

pub struct SqliteJobStore {
    pool: SqlitePool,
}

impl SqliteJobStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for SqliteJobStore {
    async fn create(&self, job: &Job) -> Result<()> {
        let row = JobRow::from_job(job)?;

        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, fastq_ids, job_type, status, steps_execution_arn,
                start_time, end_time, error_messages, ttl
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.fastq_ids)
        .bind(&row.job_type)
        .bind(&row.status)
        .bind(&row.steps_execution_arn)
        .bind(row.start_time)
        .bind(row.end_time)
        .bind(&row.error_messages)
        .bind(row.ttl)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, id: &JobId) -> Result<Job> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.ok_or_else(|| not_found(id))?.into_job()
    }

    async fn update_with(
        &self,
        id: &JobId,
        mutate: &mut JobMutation<'_>,
        hook: &dyn BeforeCommit,
    ) -> Result<Job> {
        // Read-modify-write inside one transaction; a failed mutation or hook
        // drops the transaction and leaves the row untouched.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // Take the write lock before reading so concurrent updates of the
        // same job serialize on busy_timeout instead of racing on a snapshot.
        let locked = sqlx::query("UPDATE jobs SET status = status WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        if locked.rows_affected() == 0 {
            return Err(not_found(id));
        }

        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let mut job = row.ok_or_else(|| not_found(id))?.into_job()?;
        mutate(&mut job)?;
        let row = JobRow::from_job(&job)?;

        sqlx::query(
            r#"
            UPDATE jobs
            SET status = ?, steps_execution_arn = ?, end_time = ?, error_messages = ?
            WHERE id = ?
            "#,
        )
        .bind(&row.status)
        .bind(&row.steps_execution_arn)
        .bind(row.end_time)
        .bind(&row.error_messages)
        .bind(&row.id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        hook.before_commit(&job).await?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(job)
    }

    async fn list(&self, filter: &JobFilter, page: PageRequest) -> Result<JobPage> {
        let status = filter.status.map(|s| s.to_string());

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE (? IS NULL OR status = ?)")
                .bind(&status)
                .bind(&status)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        let rows: Vec<JobRow> = sqlx::query_as(
            r#"
            SELECT * FROM jobs
            WHERE (? IS NULL OR status = ?)
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(&status)
        .bind(&status)
        .bind(i64::from(page.rows_per_page))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(JobPage {
            jobs: rows
                .into_iter()
                .map(JobRow::into_job)
                .collect::<Result<Vec<_>>>()?,
            total: total as u64,
        })
    }
}

/// SQLite row representation
///
/// Times are epoch milliseconds; `fastq_ids` is a JSON array.
#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: String,
    fastq_ids: String,
    job_type: String,
    status: String,
    steps_execution_arn: Option<String>,
    start_time: i64,
    end_time: Option<i64>,
    error_messages: Option<String>,
    ttl: i64,
}

impl JobRow {
    fn from_job(job: &Job) -> Result<Self> {
        Ok(Self {
            id: job.id.clone(),
            fastq_ids: serde_json::to_string(&job.fastq_ids)?,
            job_type: job.job_type.to_string(),
            status: job.status.to_string(),
            steps_execution_arn: job.steps_execution_arn.clone(),
            start_time: job.start_time.timestamp_millis(),
            end_time: job.end_time.map(|t| t.timestamp_millis()),
            error_messages: job.error_messages.clone(),
            ttl: job.ttl,
        })
    }

    fn into_job(self) -> Result<Job> {
        // Corrupt rows surface as errors instead of silently defaulting
        let corrupt = |field: &str, detail: String| {
            AppError::Database(format!("Corrupt job row {} ({}): {}", self.id, field, detail))
        };

        let status = self
            .status
            .parse::<JobStatus>()
            .map_err(|e| corrupt("status", e.to_string()))?;
        let job_type = self
            .job_type
            .parse::<JobType>()
            .map_err(|e| corrupt("job_type", e.to_string()))?;
        let fastq_ids: Vec<String> = serde_json::from_str(&self.fastq_ids)
            .map_err(|e| corrupt("fastq_ids", e.to_string()))?;
        let start_time = from_millis(self.start_time)
            .ok_or_else(|| corrupt("start_time", self.start_time.to_string()))?;
        let end_time = match self.end_time {
            Some(ms) => Some(from_millis(ms).ok_or_else(|| corrupt("end_time", ms.to_string()))?),
            None => None,
        };

        Ok(Job {
            id: self.id,
            fastq_ids,
            job_type,
            status,
            steps_execution_arn: self.steps_execution_arn,
            start_time,
            end_time,
            error_messages: self.error_messages,
            ttl: self.ttl,
        })
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}
