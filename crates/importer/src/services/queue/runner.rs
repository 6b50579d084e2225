use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::handle::ImportHandle;
use super::messages::{ImportMessage, ImportTask};
use crate::models::{AdminSettings, Notification};
use crate::services::event::EventPublisher;
use crate::services::identifier::extract_repo_identifier;
use crate::services::import::ImportService;

/// Channel capacity of the import queue
const QUEUE_CAPACITY: usize = 64;

/// Import Actor
///
/// Runs every message on its own tokio task so a slow import never holds
/// up the queue. Once all handles are dropped the actor drains the tasks
/// still in flight and stops.
pub struct ImportActor {
    receiver: mpsc::Receiver<ImportMessage>,
    service: Arc<ImportService>,
    events: Arc<dyn EventPublisher>,
    admin: AdminSettings,
}

impl ImportActor {
    pub fn new(
        receiver: mpsc::Receiver<ImportMessage>,
        service: Arc<ImportService>,
        events: Arc<dyn EventPublisher>,
        admin: AdminSettings,
    ) -> Self {
        Self {
            receiver,
            service,
            events,
            admin,
        }
    }

    /// Run the actor main loop
    pub async fn run(mut self) {
        tracing::info!("Import actor started");
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                message = self.receiver.recv() => match message {
                    Some(message) => {
                        in_flight.spawn(Self::handle_message(
                            message,
                            Arc::clone(&self.service),
                            Arc::clone(&self.events),
                            self.admin.clone(),
                        ));
                    }
                    None => break,
                },
                Some(result) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = result {
                        tracing::error!("Import task panicked: {}", e);
                    }
                }
            }
        }

        while let Some(result) = in_flight.join_next().await {
            if let Err(e) = result {
                tracing::error!("Import task panicked: {}", e);
            }
        }

        tracing::info!("Import actor stopped");
    }

    async fn handle_message(
        message: ImportMessage,
        service: Arc<ImportService>,
        events: Arc<dyn EventPublisher>,
        admin: AdminSettings,
    ) {
        match message {
            ImportMessage::Import(task) => {
                process_import(&service, events.as_ref(), &admin, &task).await;
            }
            ImportMessage::RefreshAll => {
                process_refresh_all(&service).await;
            }
        }
    }
}

/// Create the import actor, spawn it, and return its handle
pub fn spawn_import_actor(
    service: Arc<ImportService>,
    events: Arc<dyn EventPublisher>,
    admin: AdminSettings,
) -> ImportHandle {
    let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
    let actor = ImportActor::new(receiver, service, events, admin);
    tokio::spawn(actor.run());
    ImportHandle::new(sender)
}

/// Run one import and report its outcome.
///
/// Success publishes the created post and notifies the submitter with a
/// link to it; missing remote data sends a failure notification. Unexpected
/// errors are logged and swallowed.
pub async fn process_import(
    service: &ImportService,
    events: &dyn EventPublisher,
    admin: &AdminSettings,
    task: &ImportTask,
) {
    let identifier = extract_repo_identifier(&task.url);
    tracing::debug!(
        "Processing import of {} (panel: {})",
        identifier,
        task.panel.as_deref().unwrap_or("-")
    );

    match service.import_repository(task.to_request()).await {
        Ok(Some(post)) => {
            events.post_created(&post).await;

            let name = post
                .raw_meta
                .get("full_name")
                .and_then(|v| v.as_str())
                .unwrap_or(&identifier);
            events
                .notify(Notification::import_succeeded(
                    task.author.clone(),
                    name,
                    admin.post_url(post.id),
                    task.redirect.clone(),
                ))
                .await;
        }
        Ok(None) => {
            events
                .notify(Notification::import_failed(task.author.clone(), &identifier))
                .await;
        }
        Err(e) => {
            tracing::error!("Import of {} failed: {}", task.url, e);
        }
    }
}

/// Run a bulk refresh, logging the outcome
pub async fn process_refresh_all(service: &ImportService) {
    match service.refresh_all().await {
        Ok(stats) => tracing::info!("Bulk refresh done: {}", stats),
        Err(e) => tracing::error!("Bulk refresh failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationStatus;
    use crate::services::import::mocks::*;
    use domain::AuthorRef;
    use serde_json::json;

    struct Fixture {
        source: MockRemoteSource,
        events: RecordingPublisher,
        service: Arc<ImportService>,
    }

    fn fixture() -> Fixture {
        let source = MockRemoteSource::new();
        let events = RecordingPublisher::new();
        let service = ImportService::new(
            Arc::new(MockPostRepository::new()),
            Arc::new(source.clone()),
            Arc::new(MockMediaStore::new()),
            Arc::new(events.clone()),
        );
        Fixture {
            source,
            events,
            service: Arc::new(service),
        }
    }

    fn admin() -> AdminSettings {
        AdminSettings {
            url: "http://cms.test/admin".to_string(),
        }
    }

    fn widget_task() -> ImportTask {
        ImportTask::new("https://github.com/acme/widget")
            .with_redirect(Some("/admin/posts".to_string()))
            .with_author(Some(AuthorRef::new("admin", 1).unwrap()))
            .with_panel("admin")
    }

    #[tokio::test]
    async fn test_successful_import_publishes_and_notifies() {
        let f = fixture();
        f.source.set_repository(
            "acme/widget",
            json!({"id": 1, "name": "widget", "full_name": "acme/widget"}),
        );
        f.source.set_readme("acme/widget", "main", "# Widget");

        process_import(&f.service, &f.events, &admin(), &widget_task()).await;

        let created = f.events.created();
        assert_eq!(created.len(), 1);

        let notifications = f.events.notifications();
        assert_eq!(notifications.len(), 1);
        let n = &notifications[0];
        assert_eq!(n.status, NotificationStatus::Success);
        assert_eq!(n.title, "Post Imported");
        assert!(n.body.contains("acme/widget"));
        assert_eq!(n.recipient.as_ref().map(|r| r.id), Some(1));
        assert_eq!(n.redirect.as_deref(), Some("/admin/posts"));
        assert_eq!(
            n.action.as_ref().map(|a| a.url.as_str()),
            Some(format!("http://cms.test/admin/posts/{}/edit", created[0].id).as_str())
        );
    }

    #[tokio::test]
    async fn test_missing_repository_sends_failure() {
        let f = fixture();

        process_import(&f.service, &f.events, &admin(), &widget_task()).await;

        assert!(f.events.created().is_empty());
        let notifications = f.events.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].status, NotificationStatus::Danger);
        assert_eq!(notifications[0].title, "Post Import Failed");
        assert!(notifications[0].body.contains("acme/widget"));
    }

    #[tokio::test]
    async fn test_unexpected_error_is_suppressed() {
        let f = fixture();
        f.source.fail_repositories();

        process_import(&f.service, &f.events, &admin(), &widget_task()).await;

        assert!(f.events.created().is_empty());
        assert!(f.events.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_actor_drains_queue_on_shutdown() {
        let f = fixture();
        f.source.set_repository(
            "acme/widget",
            json!({"id": 1, "name": "widget", "full_name": "acme/widget"}),
        );
        f.source.set_readme("acme/widget", "main", "# Widget");

        let (sender, receiver) = mpsc::channel(8);
        let actor = ImportActor::new(
            receiver,
            Arc::clone(&f.service),
            Arc::new(f.events.clone()),
            admin(),
        );
        let handle = ImportHandle::new(sender);

        handle
            .enqueue_imports(vec![
                widget_task(),
                ImportTask::new("https://github.com/acme/missing"),
            ])
            .await;
        handle.enqueue_refresh_all().await;
        drop(handle);

        tokio::time::timeout(std::time::Duration::from_secs(5), actor.run())
            .await
            .unwrap();

        assert_eq!(f.events.notifications().len(), 2);
        assert_eq!(f.events.created().len(), 1);
    }
}
