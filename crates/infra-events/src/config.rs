// Event Bus Configuration

use serde::Deserialize;
use std::time::Duration;

/// Bus name that disables publishing (local development / tests)
pub const LOCAL_EVENT_BUS: &str = "local";

pub const DEFAULT_EVENT_SOURCE: &str = "orcabus.fastqunarchiving";
pub const DEFAULT_STATE_CHANGE_DETAIL_TYPE: &str = "FastqUnarchivingJobStateChange";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct EventBusConfig {
    /// Target bus; `local` turns publishing into a no-op
    #[serde(rename = "name", default = "default_bus_name")]
    pub bus_name: String,

    /// URL that accepts PutEvents-style requests
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default = "default_detail_type")]
    pub detail_type: String,

    #[serde(default = "default_timeout", deserialize_with = "secs::deserialize")]
    pub timeout: Duration,
}

impl EventBusConfig {
    pub fn is_local(&self) -> bool {
        self.bus_name == LOCAL_EVENT_BUS
    }
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            bus_name: default_bus_name(),
            endpoint: None,
            source: default_source(),
            detail_type: default_detail_type(),
            timeout: default_timeout(),
        }
    }
}

fn default_bus_name() -> String {
    LOCAL_EVENT_BUS.to_string()
}

fn default_source() -> String {
    DEFAULT_EVENT_SOURCE.to_string()
}

fn default_detail_type() -> String {
    DEFAULT_STATE_CHANGE_DETAIL_TYPE.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

/// Timeouts are configured in whole seconds
mod secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
