use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::actor::{JobStatus, SchedulerActor, SchedulerError, SchedulerHandle};
use super::traits::SchedulerJob;

/// Channel capacity of the scheduler actor
const CHANNEL_CAPACITY: usize = 32;

/// Runs registered jobs on their intervals.
///
/// Jobs are registered with the builder methods and nothing runs until
/// [`start`](Self::start) is called.
#[derive(Default)]
pub struct SchedulerService {
    jobs: Vec<Arc<dyn SchedulerJob>>,
    handle: Mutex<Option<SchedulerHandle>>,
}

impl SchedulerService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job<J: SchedulerJob + 'static>(self, job: J) -> Self {
        self.with_arc_job(Arc::new(job))
    }

    /// Register a job that is also kept elsewhere
    pub fn with_arc_job(mut self, job: Arc<dyn SchedulerJob>) -> Self {
        self.jobs.push(job);
        self
    }

    /// Spawn the actor and the job timers. Calling it again is a no-op.
    pub fn start(&self) -> SchedulerHandle {
        let mut slot = self.handle.lock();
        if let Some(handle) = slot.as_ref() {
            return handle.clone();
        }

        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let handle = SchedulerHandle::new(sender);
        let actor = SchedulerActor::new(self.jobs.clone(), receiver, handle.clone());

        actor.spawn_timers();
        tokio::spawn(actor.run());

        for job in &self.jobs {
            tracing::info!(
                "Scheduled job '{}' every {}s",
                job.name(),
                job.interval().as_secs()
            );
        }

        *slot = Some(handle.clone());
        handle
    }

    /// Run a job now
    pub async fn trigger(&self, job_name: &str) -> Result<(), SchedulerError> {
        self.started()?.trigger(job_name).await
    }

    pub async fn list_jobs(&self) -> Result<Vec<JobStatus>, SchedulerError> {
        self.started()?.list_jobs().await
    }

    fn started(&self) -> Result<SchedulerHandle, SchedulerError> {
        self.handle.lock().clone().ok_or(SchedulerError::NotStarted)
    }
}
