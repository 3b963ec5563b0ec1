// Fastq Unarchiving Infrastructure - Event Bus Adapters
// Implements: EventPublisher

mod config;
mod envelope;
mod http_publisher;
mod local_publisher;

pub use config::{EventBusConfig, LOCAL_EVENT_BUS};
pub use envelope::{EventEntry, PutEventsRequest};
pub use http_publisher::HttpEventPublisher;
pub use local_publisher::LocalEventPublisher;

use std::sync::Arc;
use unarchive_core::error::{AppError, Result};
use unarchive_core::port::EventPublisher;

/// Pick the publisher for a bus configuration
///
/// The `local` bus degrades to a no-op. Any other bus must have an endpoint.
pub fn build_publisher(config: &EventBusConfig) -> Result<Arc<dyn EventPublisher>> {
    if config.is_local() {
        tracing::warn!("Event bus is 'local', state changes will not be published");
        return Ok(Arc::new(LocalEventPublisher));
    }

    if config.endpoint.is_none() {
        return Err(AppError::Config(format!(
            "Event bus {} has no endpoint configured",
            config.bus_name
        )));
    }

    Ok(Arc::new(HttpEventPublisher::new(config.clone())?))
}
