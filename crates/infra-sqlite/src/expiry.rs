// SQLite Record Expiry
//
// SQLite has no native TTL, so expired rows are purged explicitly.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::info;
use unarchive_core::error::{AppError, Result};
use unarchive_core::port::JobExpiry;

pub struct SqliteJobExpiry {
    pool: SqlitePool,
}

impl SqliteJobExpiry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobExpiry for SqliteJobExpiry {
    async fn purge_expired(&self, now_epoch_secs: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM jobs WHERE ttl <= ?")
            .bind(now_epoch_secs)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Expiry purge failed: {}", e)))?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            info!(deleted_jobs = deleted, cutoff = now_epoch_secs, "Purged expired jobs");
        }

        Ok(deleted)
    }
}
