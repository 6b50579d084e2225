use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Job not found: {0}")]
    JobNotFound(String),
    #[error("Job already running: {0}")]
    JobAlreadyRunning(String),
    #[error("Scheduler is not started")]
    NotStarted,
    #[error("Scheduler actor is gone")]
    ActorGone,
}

/// Runtime status of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub name: &'static str,
    pub interval_secs: u64,
    pub is_running: bool,
    /// Completed runs, failed ones included
    pub runs: u64,
    pub failures: u64,
    pub last_finished: Option<DateTime<Utc>>,
}

/// Scheduler actor messages
pub enum SchedulerMessage {
    /// Run a job now
    TriggerJob {
        job_name: String,
        reply: oneshot::Sender<Result<(), SchedulerError>>,
    },
    ListJobs {
        reply: oneshot::Sender<Vec<JobStatus>>,
    },
    /// A job's interval elapsed
    TimerTick { job_name: &'static str },
    JobCompleted {
        job_name: &'static str,
        success: bool,
    },
}
