// Record Expiry Port

use crate::error::Result;
use async_trait::async_trait;

/// Stores without native TTL support expose an explicit purge
#[async_trait]
pub trait JobExpiry: Send + Sync {
    /// Delete jobs whose `ttl` is at or before `now_epoch_secs`
    ///
    /// # Returns
    /// Number of jobs deleted
    async fn purge_expired(&self, now_epoch_secs: i64) -> Result<u64>;
}
