// Event bus request envelope (PutEvents shape)

use chrono::{DateTime, Utc};
use serde::Serialize;
use unarchive_core::domain::JobResponse;
use unarchive_core::error::Result;

use crate::EventBusConfig;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventEntry {
    pub event_bus_name: String,
    pub source: String,
    pub detail_type: String,
    /// JSON-encoded external view of the job
    pub detail: String,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutEventsRequest {
    pub entries: Vec<EventEntry>,
}

impl PutEventsRequest {
    /// Single state-change entry carrying the full job record
    pub fn state_change(
        config: &EventBusConfig,
        job: &JobResponse,
        time: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            entries: vec![EventEntry {
                event_bus_name: config.bus_name.clone(),
                source: config.source.clone(),
                detail_type: config.detail_type.clone(),
                detail: serde_json::to_string(job)?,
                time,
            }],
        })
    }
}
