mod event;
mod identifier;
mod import;
mod media;
mod queue;
mod remote;
mod scheduler;
mod settings;

pub use event::{ActorRegistry, EventPublisher, EventService};
pub use identifier::extract_repo_identifier;
pub use import::{
    derive_meta, map_github_data, slug_from_full_name, ImportError, ImportRequest, ImportService,
    Provenance, RefreshStats, RemoteData,
};
pub use media::{MediaError, MediaService, MediaStore};
pub use queue::{
    process_import, process_refresh_all, spawn_import_actor, ImportActor, ImportHandle,
    ImportMessage, ImportTask,
};
pub use remote::{FetchError, HttpRemoteSource, RemoteSource};
pub use scheduler::{
    GithubRefreshJob, JobResult, JobStatus, SchedulerError, SchedulerHandle, SchedulerJob,
    SchedulerService,
};
pub use settings::{SettingsError, SettingsService};
