use tokio::sync::mpsc;

use super::messages::{ImportMessage, ImportTask};

/// Public interface of the import actor.
///
/// Enqueueing waits only for room in the channel, never for the work
/// itself. Messages reach the actor in the order they were enqueued.
#[derive(Clone)]
pub struct ImportHandle {
    sender: mpsc::Sender<ImportMessage>,
}

impl ImportHandle {
    pub fn new(sender: mpsc::Sender<ImportMessage>) -> Self {
        Self { sender }
    }

    /// Submit one repository import
    pub async fn enqueue_import(&self, task: ImportTask) {
        self.send(ImportMessage::Import(task)).await;
    }

    /// Submit a batch of imports, one task per URL
    pub async fn enqueue_imports(&self, tasks: Vec<ImportTask>) {
        for task in tasks {
            self.enqueue_import(task).await;
        }
    }

    /// Submit a refresh of every imported post
    pub async fn enqueue_refresh_all(&self) {
        self.send(ImportMessage::RefreshAll).await;
    }

    async fn send(&self, message: ImportMessage) {
        if self.sender.send(message).await.is_err() {
            tracing::warn!("Import actor is gone, dropping message");
        }
    }
}
