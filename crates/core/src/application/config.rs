// Service Configuration

use chrono::Duration;

use crate::port::job_store::DEFAULT_ROWS_PER_PAGE;

/// Default record lifetime before the store expires it
pub const DEFAULT_JOB_TTL_DAYS: i64 = 30;

/// Default base for pagination links
pub const DEFAULT_JOBS_ENDPOINT_URL: &str = "/api/v1/jobs";

/// Configuration passed to [`crate::application::UnarchiveService`]
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Lifetime of a job record, measured from creation
    pub ttl: Duration,

    /// Page size used when a list request does not specify one
    pub rows_per_page: u32,

    /// Base URL of the jobs collection, used for next/previous links
    pub jobs_endpoint_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::days(DEFAULT_JOB_TTL_DAYS),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            jobs_endpoint_url: DEFAULT_JOBS_ENDPOINT_URL.to_string(),
        }
    }
}
