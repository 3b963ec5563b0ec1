//! Daemon settings
//!
//! Read from `UNARCHIVE_*` environment variables. Nested keys use `__`,
//! e.g. `UNARCHIVE_EVENT_BUS__ENDPOINT`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;
use unarchive_api_rpc::RpcServerConfig;
use unarchive_core::application::config::{DEFAULT_JOBS_ENDPOINT_URL, DEFAULT_JOB_TTL_DAYS};
use unarchive_core::application::ServiceConfig;
use unarchive_core::port::id_provider::UNARCHIVE_JOB_PREFIX;
use unarchive_core::port::job_store::DEFAULT_ROWS_PER_PAGE;
use unarchive_infra_events::EventBusConfig;

const ENV_PREFIX: &str = "UNARCHIVE";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub rpc_host: String,
    pub rpc_port: u16,
    /// `json` or `pretty`
    pub log_format: String,
    pub id_prefix: String,
    pub ttl_days: i64,
    pub rows_per_page: u32,
    pub jobs_endpoint_url: String,
    /// 0 disables the purge loop
    pub purge_interval_secs: u64,
    #[serde(default)]
    pub event_bus: EventBusConfig,
}

impl Settings {
    /// Defaults overlaid with the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
    }

    fn from_source(env: Environment) -> Result<Self, ConfigError> {
        let rpc = RpcServerConfig::default();

        let settings: Settings = Config::builder()
            .set_default("database_url", "sqlite://unarchive.db")?
            .set_default("rpc_host", rpc.host)?
            .set_default("rpc_port", rpc.port as i64)?
            .set_default("log_format", "pretty")?
            .set_default("id_prefix", UNARCHIVE_JOB_PREFIX)?
            .set_default("ttl_days", DEFAULT_JOB_TTL_DAYS)?
            .set_default("rows_per_page", DEFAULT_ROWS_PER_PAGE as i64)?
            .set_default("jobs_endpoint_url", DEFAULT_JOBS_ENDPOINT_URL)?
            .set_default("purge_interval_secs", 3600)?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_days <= 0 {
            return Err(ConfigError::Message("ttl_days must be positive".to_string()));
        }
        let prefix_ok = self.id_prefix.len() == 3
            && self
                .id_prefix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !prefix_ok {
            return Err(ConfigError::Message(format!(
                "id_prefix must be three lowercase alphanumerics, got {:?}",
                self.id_prefix
            )));
        }
        if self.rows_per_page == 0 {
            return Err(ConfigError::Message(
                "rows_per_page must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            ttl: chrono::Duration::days(self.ttl_days),
            rows_per_page: self.rows_per_page,
            jobs_endpoint_url: self.jobs_endpoint_url.clone(),
        }
    }

    pub fn rpc_config(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.rpc_host.clone(),
            port: self.rpc_port,
        }
    }

    pub fn purge_interval(&self) -> Option<Duration> {
        (self.purge_interval_secs > 0).then(|| Duration::from_secs(self.purge_interval_secs))
    }
}
