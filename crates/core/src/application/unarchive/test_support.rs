// In-memory adapters for service tests

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex;
use ulid::Ulid;

use crate::domain::{Job, JobId, JobResponse};
use crate::error::{AppError, Result};
use crate::port::{
    BeforeCommit, EventPublisher, IdProvider, JobFilter, JobMutation, JobPage, JobStore,
    PageRequest,
    TimeProvider,
};

/// BTreeMap keeps ids ordered like the real store
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<BTreeMap<JobId, Job>>,
}

impl InMemoryJobStore {
    pub fn snapshot(&self, id: &str) -> Option<Job> {
        self.jobs.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        if jobs.contains_key(&job.id) {
            return Err(AppError::Conflict(format!("Job {} already exists", job.id)));
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn get(&self, id: &JobId) -> Result<Job> {
        self.snapshot(id)
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", id)))
    }

    async fn update_with(
        &self,
        id: &JobId,
        mutate: &mut JobMutation<'_>,
        hook: &dyn BeforeCommit,
    ) -> Result<Job> {
        let mut job = self
            .snapshot(id)
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", id)))?;
        mutate(&mut job)?;
        hook.before_commit(&job).await?;
        self.jobs.lock().unwrap().insert(id.clone(), job.clone());
        Ok(job)
    }

    async fn list(&self, filter: &JobFilter, page: PageRequest) -> Result<JobPage> {
        let jobs = self.jobs.lock().unwrap();
        let matching: Vec<&Job> = jobs
            .values()
            .filter(|job| filter.status.map_or(true, |status| job.status == status))
            .collect();

        Ok(JobPage {
            total: matching.len() as u64,
            jobs: matching
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.rows_per_page as usize)
                .cloned()
                .collect(),
        })
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<JobResponse>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<JobResponse> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish_state_change(&self, job: &JobResponse) -> Result<()> {
        self.events.lock().unwrap().push(job.clone());
        Ok(())
    }
}

/// Publisher whose bus is always unreachable
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish_state_change(&self, _job: &JobResponse) -> Result<()> {
        Err(AppError::Publish("bus unreachable".to_string()))
    }
}

/// Publisher whose bus fails the first `n` publishes, then records
pub struct FlakyPublisher {
    failures_left: AtomicU64,
    delivered: RecordingPublisher,
}

impl FlakyPublisher {
    pub fn failing(n: u64) -> Self {
        Self {
            failures_left: AtomicU64::new(n),
            delivered: RecordingPublisher::default(),
        }
    }

    pub fn events(&self) -> Vec<JobResponse> {
        self.delivered.events()
    }
}

#[async_trait]
impl EventPublisher for FlakyPublisher {
    async fn publish_state_change(&self, job: &JobResponse) -> Result<()> {
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(AppError::Publish("transient".to_string()));
        }
        self.delivered.publish_state_change(job).await
    }
}

/// Deterministic, increasing ids
#[derive(Default)]
pub struct SequentialIdProvider {
    counter: AtomicU64,
}

impl IdProvider for SequentialIdProvider {
    fn generate_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("ufj.{}", Ulid::from_parts(n, 0))
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            secs: AtomicI64::new(1_700_000_000),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.secs.fetch_add(by.num_seconds(), Ordering::SeqCst);
    }
}

impl TimeProvider for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.secs.load(Ordering::SeqCst), 0).unwrap()
    }
}
