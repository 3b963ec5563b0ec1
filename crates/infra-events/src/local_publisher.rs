// Local/offline publisher

use async_trait::async_trait;
use tracing::debug;
use unarchive_core::domain::JobResponse;
use unarchive_core::error::Result;
use unarchive_core::port::EventPublisher;

/// Drops every event. Selected when the bus name is `local`.
pub struct LocalEventPublisher;

#[async_trait]
impl EventPublisher for LocalEventPublisher {
    async fn publish_state_change(&self, job: &JobResponse) -> Result<()> {
        debug!(job_id = %job.id, status = %job.status, "Local event bus, skipping publish");
        Ok(())
    }
}
