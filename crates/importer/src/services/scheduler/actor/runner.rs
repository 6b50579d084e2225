use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::handle::SchedulerHandle;
use super::messages::{JobStatus, SchedulerError, SchedulerMessage};
use crate::services::scheduler::traits::SchedulerJob;

/// Bookkeeping for one registered job
struct JobSlot {
    job: Arc<dyn SchedulerJob>,
    running: bool,
    runs: u64,
    failures: u64,
    last_finished: Option<DateTime<Utc>>,
}

impl JobSlot {
    fn new(job: Arc<dyn SchedulerJob>) -> Self {
        Self {
            job,
            running: false,
            runs: 0,
            failures: 0,
            last_finished: None,
        }
    }

    fn finish(&mut self, success: bool) {
        self.running = false;
        self.runs += 1;
        if !success {
            self.failures += 1;
        }
        self.last_finished = Some(Utc::now());
    }

    fn status(&self, name: &'static str) -> JobStatus {
        JobStatus {
            name,
            interval_secs: self.job.interval().as_secs(),
            is_running: self.running,
            runs: self.runs,
            failures: self.failures,
            last_finished: self.last_finished,
        }
    }
}

/// Scheduler Actor
///
/// Owns the state of every job. Executions happen on spawned tasks that
/// report back with `JobCompleted`; a tick or trigger that arrives while
/// the job is still running is dropped.
pub struct SchedulerActor {
    slots: BTreeMap<&'static str, JobSlot>,
    receiver: mpsc::Receiver<SchedulerMessage>,
    handle: SchedulerHandle,
}

impl SchedulerActor {
    pub fn new(
        jobs: Vec<Arc<dyn SchedulerJob>>,
        receiver: mpsc::Receiver<SchedulerMessage>,
        handle: SchedulerHandle,
    ) -> Self {
        let slots = jobs
            .into_iter()
            .map(|job| (job.name(), JobSlot::new(job)))
            .collect();

        Self {
            slots,
            receiver,
            handle,
        }
    }

    /// One interval timer per job. A timer ends when the actor is gone.
    pub fn spawn_timers(&self) {
        for (&name, slot) in &self.slots {
            let handle = self.handle.clone();
            let period = slot.job.interval();

            tokio::spawn(async move {
                let mut timer = tokio::time::interval(period);
                timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

                loop {
                    timer.tick().await;
                    if !handle.send_timer_tick(name).await {
                        tracing::debug!("Timer for '{}' stopped", name);
                        break;
                    }
                }
            });
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Scheduler running {} job(s)", self.slots.len());

        while let Some(message) = self.receiver.recv().await {
            match message {
                SchedulerMessage::TriggerJob { job_name, reply } => {
                    let _ = reply.send(self.trigger(&job_name));
                }
                SchedulerMessage::ListJobs { reply } => {
                    let statuses = self
                        .slots
                        .iter()
                        .map(|(&name, slot)| slot.status(name))
                        .collect();
                    let _ = reply.send(statuses);
                }
                SchedulerMessage::TimerTick { job_name } => {
                    if !self.launch(job_name) {
                        tracing::debug!("Skipping tick of '{}', previous run still going", job_name);
                    }
                }
                SchedulerMessage::JobCompleted { job_name, success } => {
                    self.complete(job_name, success);
                }
            }
        }

        tracing::info!("Scheduler stopped");
    }

    fn trigger(&mut self, job_name: &str) -> Result<(), SchedulerError> {
        let name = self
            .slots
            .keys()
            .copied()
            .find(|name| *name == job_name)
            .ok_or_else(|| SchedulerError::JobNotFound(job_name.to_string()))?;

        if self.launch(name) {
            tracing::info!("Job '{}' triggered manually", name);
            Ok(())
        } else {
            Err(SchedulerError::JobAlreadyRunning(job_name.to_string()))
        }
    }

    /// Spawn an execution of `name`. Returns false if it is already running.
    fn launch(&mut self, name: &'static str) -> bool {
        let Some(slot) = self.slots.get_mut(name) else {
            return false;
        };
        if slot.running {
            return false;
        }
        slot.running = true;

        let job = Arc::clone(&slot.job);
        let handle = self.handle.clone();
        tokio::spawn(async move {
            let success = match job.execute().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("Job '{}' failed: {}", name, e);
                    false
                }
            };
            handle.send_job_completed(name, success).await;
        });
        true
    }

    fn complete(&mut self, name: &'static str, success: bool) {
        if let Some(slot) = self.slots.get_mut(name) {
            slot.finish(success);
            tracing::debug!(
                "Job '{}' finished (run {}, {} failed)",
                name,
                slot.runs,
                slot.failures
            );
        }
    }
}
