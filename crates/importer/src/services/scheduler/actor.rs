mod handle;
mod messages;
mod runner;

pub use handle::SchedulerHandle;
pub use messages::{JobStatus, SchedulerError};
pub(super) use messages::SchedulerMessage;
pub(super) use runner::SchedulerActor;
