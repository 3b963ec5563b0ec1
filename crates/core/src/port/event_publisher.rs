// Event Publisher Port (Interface)

use crate::domain::JobResponse;
use crate::error::Result;
use async_trait::async_trait;

/// Publishes job state changes to an external bus
///
/// Delivery is at-least-once; the payload is the full external view so
/// consumers can replay events without merging partial updates.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_state_change(&self, job: &JobResponse) -> Result<()>;
}
