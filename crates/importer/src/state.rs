use github::GithubClient;
use packagist::PackagistClient;
use reqwest::Client;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::models::Settings;
use crate::repositories::{SqliteMediaRepository, SqlitePostRepository};
use crate::services::{
    spawn_import_actor, ActorRegistry, EventService, GithubRefreshJob, HttpRemoteSource,
    ImportHandle, ImportService, MediaService, SchedulerService,
};

/// Wired-up importer: clients, repositories, services and the task queue.
///
/// The scheduler is built but not started.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub settings: Arc<Settings>,
    pub http_client: Client,
    pub github: Arc<GithubClient>,
    pub packagist: Arc<PackagistClient>,
    pub events: Arc<EventService>,
    pub media: Arc<MediaService>,
    pub import: Arc<ImportService>,
    pub queue: ImportHandle,
    pub scheduler: Arc<SchedulerService>,
}

impl AppState {
    /// Must be called within a tokio runtime, the import actor is spawned here.
    pub fn new(db: SqlitePool, config: Config, settings: Settings) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.http.timeout_secs))
            .user_agent(settings.http.user_agent.clone())
            .build()?;

        let github = Arc::new(
            GithubClient::with_client(http_client.clone())
                .with_base_urls(&settings.http.github_api_url, &settings.http.github_raw_url)
                .with_user_agent(&settings.http.user_agent),
        );
        let packagist = Arc::new(
            PackagistClient::with_client(http_client.clone())
                .with_base_url(&settings.http.packagist_url)
                .with_user_agent(&settings.http.user_agent),
        );

        let posts = Arc::new(SqlitePostRepository::new(db.clone()));
        let media_repository = Arc::new(SqliteMediaRepository::new(db.clone()));

        let events = Arc::new(EventService::new(ActorRegistry::new()));
        let media = Arc::new(MediaService::new(
            http_client.clone(),
            config.media_path(),
            media_repository,
        ));
        let source = Arc::new(HttpRemoteSource::new(
            Arc::clone(&github),
            Arc::clone(&packagist),
        ));

        let import = Arc::new(
            ImportService::new(posts, source, media.clone(), events.clone())
                .with_settings(&settings.import),
        );

        let queue = spawn_import_actor(
            Arc::clone(&import),
            events.clone(),
            settings.admin.clone(),
        );

        let scheduler = SchedulerService::new().with_job(GithubRefreshJob::new(
            Arc::clone(&import),
            Duration::from_secs(settings.import.refresh_interval_secs),
        ));

        Ok(Self {
            db,
            config: Arc::new(config),
            settings: Arc::new(settings),
            http_client,
            github,
            packagist,
            events,
            media,
            import,
            queue,
            scheduler: Arc::new(scheduler),
        })
    }
}
