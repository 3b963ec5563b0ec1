// Expiry Scheduler
// Periodically purges job records whose ttl has passed

use crate::error::Result;
use crate::port::{JobExpiry, TimeProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

/// Expiry scheduler
///
/// Only needed for stores without native record expiry
pub struct ExpiryScheduler {
    expiry: Arc<dyn JobExpiry>,
    time_provider: Arc<dyn TimeProvider>,
    period: Duration,
}

impl ExpiryScheduler {
    /// Create a new expiry scheduler
    ///
    /// # Arguments
    /// * `expiry` - Store-side purge implementation
    /// * `time_provider` - Clock compared against each record's ttl
    /// * `period` - How often to purge
    pub fn new(
        expiry: Arc<dyn JobExpiry>,
        time_provider: Arc<dyn TimeProvider>,
        period: Duration,
    ) -> Self {
        Self {
            expiry,
            time_provider,
            period,
        }
    }

    /// Run purge loop (background task)
    ///
    /// Should be spawned in tokio::spawn
    pub async fn run(self) {
        info!(period_secs = self.period.as_secs(), "Expiry scheduler started");

        let mut tick = interval(self.period);

        loop {
            tick.tick().await;

            if let Err(e) = self.run_now().await {
                error!(error = ?e, "Scheduled expiry purge failed");
            }
        }
    }

    /// Purge expired jobs immediately
    pub async fn run_now(&self) -> Result<u64> {
        let now = self.time_provider.now_epoch_secs();
        let purged = self.expiry.purge_expired(now).await?;

        if purged > 0 {
            info!(purged_jobs = purged, "Expired jobs purged");
        }

        Ok(purged)
    }
}
