// Job Store Port (Interface)

use crate::domain::{Job, JobId, JobStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Default number of rows returned per page
pub const DEFAULT_ROWS_PER_PAGE: u32 = 100;

/// Largest page a caller may request
pub const MAX_ROWS_PER_PAGE: u32 = 1000;

/// Read-modify-write callback applied by [`JobStore::update`]
///
/// Returning an error aborts the update and leaves the record untouched.
pub type JobMutation<'a> = dyn FnMut(&mut Job) -> Result<()> + Send + 'a;

/// Step run after a mutation is written but before it is committed
///
/// An error rolls the write back, so the caller can retry the whole update.
#[async_trait]
pub trait BeforeCommit: Send + Sync {
    async fn before_commit(&self, job: &Job) -> Result<()>;
}

/// Commits unconditionally
pub struct CommitNow;

#[async_trait]
impl BeforeCommit for CommitNow {
    async fn before_commit(&self, _job: &Job) -> Result<()> {
        Ok(())
    }
}

/// List filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub rows_per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, rows_per_page: u32) -> Self {
        Self {
            page,
            rows_per_page,
        }
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.rows_per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_ROWS_PER_PAGE)
    }
}

/// One page of jobs plus the total number of matching jobs
#[derive(Debug, Clone)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub total: u64,
}

/// Store interface for Job persistence
///
/// One record per id. Updates of one record are serialized; callers validate
/// status transitions inside the mutation.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new job. `Conflict` if the id already exists.
    async fn create(&self, job: &Job) -> Result<()>;

    /// Fetch a job. `NotFound` if absent.
    async fn get(&self, id: &JobId) -> Result<Job>;

    /// Load, mutate and persist a job as one write. `NotFound` if absent.
    async fn update(&self, id: &JobId, mutate: &mut JobMutation<'_>) -> Result<Job> {
        self.update_with(id, mutate, &CommitNow).await
    }

    /// Like [`JobStore::update`], running `hook` on the mutated job inside
    /// the write. The record changes only if both the mutation and the hook
    /// succeed.
    async fn update_with(
        &self,
        id: &JobId,
        mutate: &mut JobMutation<'_>,
        hook: &dyn BeforeCommit,
    ) -> Result<Job>;

    /// List jobs ordered by ascending id
    async fn list(&self, filter: &JobFilter, page: PageRequest) -> Result<JobPage>;
}
