use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::traits::{JobResult, SchedulerJob};
use crate::services::import::ImportService;

/// Refreshes every imported post from GitHub and Packagist.
pub struct GithubRefreshJob {
    service: Arc<ImportService>,
    interval: Duration,
}

impl GithubRefreshJob {
    pub fn new(service: Arc<ImportService>, interval: Duration) -> Self {
        Self { service, interval }
    }
}

#[async_trait]
impl SchedulerJob for GithubRefreshJob {
    fn name(&self) -> &'static str {
        "GithubRefresh"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn execute(&self) -> JobResult {
        tracing::info!("Running GitHub refresh job");

        let stats = self.service.refresh_all().await?;
        if stats.failed > 0 {
            tracing::warn!("GitHub refresh finished with failures: {}", stats);
        } else {
            tracing::info!("GitHub refresh completed: {}", stats);
        }

        Ok(())
    }
}
