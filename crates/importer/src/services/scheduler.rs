//! Periodic jobs.

mod actor;
mod github_refresh_job;
mod service;
mod traits;

pub use actor::{JobStatus, SchedulerError, SchedulerHandle};
pub use github_refresh_job::GithubRefreshJob;
pub use service::SchedulerService;
pub use traits::{JobResult, SchedulerJob};
