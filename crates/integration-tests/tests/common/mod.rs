//! Shared fixtures for the integration suites

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use unarchive_core::application::{ServiceConfig, UnarchiveService};
use unarchive_core::domain::JobResponse;
use unarchive_core::error::{AppError, Result};
use unarchive_core::port::id_provider::UlidProvider;
use unarchive_core::port::time_provider::SystemTimeProvider;
use unarchive_core::port::EventPublisher;
use unarchive_infra_sqlite::{create_pool, run_migrations, SqliteJobStore};

/// Captures every published state change
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

/// Fails the first publish, records the rest
#[derive(Default)]
pub struct FailOncePublisher {
    failed: AtomicBool,
    delivered: RecordingPublisher,
}

impl FailOncePublisher {
    pub fn events(&self) -> Vec<JobResponse> {
        self.delivered.events()
    }
}

#[async_trait]
impl EventPublisher for FailOncePublisher {
    async fn publish_state_change(&self, job: &JobResponse) -> Result<()> {
        if !self.failed.swap(true, Ordering::SeqCst) {
            return Err(AppError::Publish("transient".to_string()));
        }
        self.delivered.publish_state_change(job).await
    }
}

/// A SQLite file that is removed when dropped
pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("unarchive_test_{}.db", ulid::Ulid::new()));
        Self { path }
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

pub async fn sqlite_store(url: &str) -> (sqlx::SqlitePool, Arc<SqliteJobStore>) {
    let pool = create_pool(url).await.unwrap();
    run_migrations(&pool).await.unwrap();
    let store = Arc::new(SqliteJobStore::new(pool.clone()));
    (pool, store)
}

pub fn service(store: Arc<SqliteJobStore>, publisher: Arc<dyn EventPublisher>) -> UnarchiveService {
    UnarchiveService::new(
        store,
        publisher,
        Arc::new(UlidProvider::default()),
        Arc::new(SystemTimeProvider),
        ServiceConfig::default(),
    )
}
