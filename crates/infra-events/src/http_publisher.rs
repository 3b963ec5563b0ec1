// HTTP event bus publisher

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use unarchive_core::domain::JobResponse;
use unarchive_core::error::{AppError, Result};
use unarchive_core::port::EventPublisher;

use crate::{EventBusConfig, PutEventsRequest};

/// Publishes state changes as PutEvents requests over HTTP
///
/// No retries: a failed publish is reported to the caller, which owns the
/// retry policy.
pub struct HttpEventPublisher {
    client: reqwest::Client,
    endpoint: String,
    config: EventBusConfig,
}

impl HttpEventPublisher {
    pub fn new(config: EventBusConfig) -> Result<Self> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            AppError::Config(format!(
                "Event bus {} has no endpoint configured",
                config.bus_name
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }
}

#[async_trait]
impl EventPublisher for HttpEventPublisher {
    async fn publish_state_change(&self, job: &JobResponse) -> Result<()> {
        let request = PutEventsRequest::state_change(&self.config, job, Utc::now())?;

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(job_id = %job.id, error = %e, "Event bus unreachable");
                AppError::Publish(format!("Failed to reach event bus: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Publish(format!(
                "Event bus rejected event ({}): {}",
                status, body
            )));
        }

        info!(
            job_id = %job.id,
            status = %job.status,
            bus = %self.config.bus_name,
            "Published job state change"
        );

        Ok(())
    }
}
