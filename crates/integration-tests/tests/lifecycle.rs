//! Job lifecycle over a file-backed SQLite store

mod common;

use common::{service, sqlite_store, FailOncePublisher, RecordingPublisher, TempDb};
use std::sync::Arc;
use unarchive_core::application::unarchive::{
    AttachExecutionRequest, CreateJobRequest, ListJobsQuery, StatusCallback, UpdateStatusRequest,
};
use unarchive_core::application::ExpiryScheduler;
use unarchive_core::domain::{JobStatus, JobType};
use unarchive_core::error::AppError;
use unarchive_core::port::time_provider::SystemTimeProvider;
use unarchive_core::port::{JobExpiry, JobStore};
use unarchive_infra_sqlite::SqliteJobExpiry;

fn create_request(fastq_id: &str) -> CreateJobRequest {
    CreateJobRequest {
        fastq_ids: vec![fastq_id.to_string()],
        job_type: JobType::S3Unarchiving,
    }
}

fn status_request(job_id: &str, status: JobStatus) -> UpdateStatusRequest {
    UpdateStatusRequest {
        job_id: job_id.to_string(),
        status,
        error_messages: None,
    }
}

#[tokio::test]
async fn test_job_runs_to_completion() {
    let db = TempDb::new();
    let (_pool, store) = sqlite_store(&db.url()).await;
    let publisher = Arc::new(RecordingPublisher::default());
    let service = service(store, publisher.clone());

    let job = service.create_job(create_request("fqr.01")).await.unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    assert!(publisher.events().is_empty());

    service
        .attach_execution(AttachExecutionRequest {
            job_id: job.id.clone(),
            steps_execution_arn: "arn:aws:states:ap-southeast-2:000:execution:unarchive:1"
                .to_string(),
        })
        .await
        .unwrap();

    service
        .handle_callback(StatusCallback {
            job_id: job.id.clone(),
            status: "RUNNING".to_string(),
            has_error: false,
            error_messages: None,
        })
        .await
        .unwrap();
    let done = service
        .handle_callback(StatusCallback {
            job_id: job.id.clone(),
            status: "SUCCEEDED".to_string(),
            has_error: false,
            error_messages: None,
        })
        .await
        .unwrap();

    assert_eq!(done.status, JobStatus::Succeeded);
    assert!(done.end_time.is_some());
    assert!(done.steps_execution_arn.is_some());

    let statuses: Vec<JobStatus> = publisher.events().iter().map(|e| e.status).collect();
    assert_eq!(statuses, vec![JobStatus::Running, JobStatus::Succeeded]);
    assert_eq!(publisher.events()[1], done);

    let err = service
        .update_job_status(status_request(&job.id, JobStatus::Failed))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(service.get_job(&job.id).await.unwrap(), done);
}

#[tokio::test]
async fn test_jobs_survive_restart() {
    let db = TempDb::new();

    let created = {
        let (pool, store) = sqlite_store(&db.url()).await;
        let service = service(store, Arc::new(RecordingPublisher::default()));
        let job = service.create_job(create_request("fqr.01")).await.unwrap();
        service
            .update_job_status(UpdateStatusRequest {
                job_id: job.id.clone(),
                status: JobStatus::Failed,
                error_messages: Some("restore rejected".to_string()),
            })
            .await
            .unwrap();
        pool.close().await;
        job
    };

    let (_pool, store) = sqlite_store(&db.url()).await;
    let service = service(store, Arc::new(RecordingPublisher::default()));

    let job = service.get_job(&created.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error_messages.as_deref(), Some("restore rejected"));
    assert_eq!(job.fastq_ids, created.fastq_ids);
    assert_eq!(job.start_time, created.start_time);
}

#[tokio::test]
async fn test_publish_failure_is_retryable() {
    let db = TempDb::new();
    let (_pool, store) = sqlite_store(&db.url()).await;
    let publisher = Arc::new(FailOncePublisher::default());
    let service = service(store, publisher.clone());

    let job = service.create_job(create_request("fqr.01")).await.unwrap();

    let err = service
        .update_job_status(status_request(&job.id, JobStatus::Succeeded))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Publish(_)));
    assert_eq!(service.get_job(&job.id).await.unwrap(), job);

    let done = service
        .update_job_status(status_request(&job.id, JobStatus::Succeeded))
        .await
        .unwrap();
    assert_eq!(publisher.events(), vec![done.clone()]);
    assert_eq!(service.get_job(&job.id).await.unwrap(), done);
}

#[tokio::test]
async fn test_concurrent_terminal_updates_have_one_winner() {
    let db = TempDb::new();
    let (_pool, store) = sqlite_store(&db.url()).await;
    let publisher = Arc::new(RecordingPublisher::default());
    let service = Arc::new(service(store, publisher.clone()));

    let job = service.create_job(create_request("fqr.01")).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..12 {
        let service = service.clone();
        let job_id = job.id.clone();
        let status = [JobStatus::Succeeded, JobStatus::Failed, JobStatus::Aborted][i % 3];
        handles.push(tokio::spawn(async move {
            service
                .update_job_status(status_request(&job_id, status))
                .await
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(job) => winners.push(job),
            Err(e) => assert!(e.is_conflict(), "unexpected error: {}", e),
        }
    }

    assert_eq!(winners.len(), 1);
    let events = publisher.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0], winners[0]);
    assert_eq!(service.get_job(&job.id).await.unwrap(), winners[0]);
}

#[tokio::test]
async fn test_listing_pages_through_jobs_in_creation_order() {
    let db = TempDb::new();
    let (_pool, store) = sqlite_store(&db.url()).await;
    let service = service(store, Arc::new(RecordingPublisher::default()));

    let mut ids = Vec::new();
    for i in 0..7 {
        let job = service
            .create_job(create_request(&format!("fqr.{:02}", i)))
            .await
            .unwrap();
        ids.push(job.id);
    }
    service
        .update_job_status(status_request(&ids[2], JobStatus::Running))
        .await
        .unwrap();

    let mut seen = Vec::new();
    let mut page = 1;
    loop {
        let response = service
            .list_jobs(ListJobsQuery {
                page: Some(page),
                rows_per_page: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(response.pagination.count, 7);
        seen.extend(response.results.into_iter().map(|j| j.id));
        if response.links.next.is_none() {
            break;
        }
        page += 1;
    }
    assert_eq!(page, 3);
    assert_eq!(seen, ids);

    let running = service
        .list_jobs(ListJobsQuery {
            status: Some(JobStatus::Running),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(running.pagination.count, 1);
    assert_eq!(running.results[0].id, ids[2]);
}

#[tokio::test]
async fn test_expired_jobs_are_purged() {
    let db = TempDb::new();
    let (pool, store) = sqlite_store(&db.url()).await;
    let service = service(store.clone(), Arc::new(RecordingPublisher::default()));

    let job = service.create_job(create_request("fqr.01")).await.unwrap();
    let ttl = store.get(&job.id).await.unwrap().ttl;

    let expiry = SqliteJobExpiry::new(pool.clone());
    assert_eq!(expiry.purge_expired(ttl - 1).await.unwrap(), 0);
    assert!(service.get_job(&job.id).await.is_ok());

    // A fresh job is not expired by the real clock
    let scheduler = ExpiryScheduler::new(
        Arc::new(SqliteJobExpiry::new(pool)),
        Arc::new(SystemTimeProvider),
        std::time::Duration::from_secs(3600),
    );
    assert_eq!(scheduler.run_now().await.unwrap(), 0);

    assert_eq!(expiry.purge_expired(ttl).await.unwrap(), 1);
    assert!(service.get_job(&job.id).await.unwrap_err().is_not_found());
}
