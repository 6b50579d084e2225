use async_trait::async_trait;
use domain::{AuthorRef, Post};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::models::{ImporterEvent, Notification};

/// Buffer capacity for recent events
const BUFFER_CAPACITY: usize = 100;
/// Broadcast channel capacity
const BROADCAST_CAPACITY: usize = 256;

/// Outbound port for import results.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// A post was created (or re-imported) from a repository.
    async fn post_created(&self, post: &Post);

    /// A post was refreshed from its source.
    async fn post_updated(&self, post: &Post);

    /// Deliver a notification to the actor that requested an import.
    async fn notify(&self, notification: Notification);
}

/// Display labels for actor kinds.
///
/// Author references only carry a kind string; this is where a kind is
/// resolved to something readable. Unknown kinds fall back to the raw kind.
#[derive(Debug, Clone, Default)]
pub struct ActorRegistry {
    labels: HashMap<String, String>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(kind.into(), label.into());
        self
    }

    pub fn label<'a>(&'a self, kind: &'a str) -> &'a str {
        self.labels.get(kind).map(String::as_str).unwrap_or(kind)
    }

    pub fn describe(&self, author: &AuthorRef) -> String {
        format!("{}#{}", self.label(&author.kind), author.id)
    }
}

/// Event service broadcasting importer events to subscribers
pub struct EventService {
    buffer: Arc<RwLock<EventBuffer>>,
    broadcaster: broadcast::Sender<ImporterEvent>,
    actors: ActorRegistry,
}

impl EventService {
    pub fn new(actors: ActorRegistry) -> Self {
        let (broadcaster, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            buffer: Arc::new(RwLock::new(EventBuffer::new(BUFFER_CAPACITY))),
            broadcaster,
            actors,
        }
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<ImporterEvent> {
        self.broadcaster.subscribe()
    }

    /// Get recent events from in-memory buffer, newest first
    pub async fn recent(&self, limit: usize) -> Vec<ImporterEvent> {
        self.buffer.read().await.get_recent(limit)
    }

    async fn publish(&self, event: ImporterEvent) {
        self.buffer.write().await.push(event.clone());

        // No subscribers is fine
        let _ = self.broadcaster.send(event);
    }
}

impl Default for EventService {
    fn default() -> Self {
        Self::new(ActorRegistry::default())
    }
}

#[async_trait]
impl EventPublisher for EventService {
    async fn post_created(&self, post: &Post) {
        tracing::info!(
            "Post {} created from {}",
            post.id,
            post.source_url().unwrap_or("-")
        );
        self.publish(ImporterEvent::PostCreated {
            post: Box::new(post.clone()),
        })
        .await;
    }

    async fn post_updated(&self, post: &Post) {
        tracing::debug!("Post {} updated", post.id);
        self.publish(ImporterEvent::PostUpdated {
            post: Box::new(post.clone()),
        })
        .await;
    }

    async fn notify(&self, notification: Notification) {
        let recipient = notification
            .recipient
            .as_ref()
            .map(|r| self.actors.describe(r))
            .unwrap_or_else(|| "nobody".to_string());
        tracing::info!(
            "Notify {}: {} ({})",
            recipient,
            notification.title,
            notification.body
        );
        self.publish(ImporterEvent::Notification { notification }).await;
    }
}

/// In-memory ring buffer for recent events
struct EventBuffer {
    events: VecDeque<ImporterEvent>,
    capacity: usize,
}

impl EventBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, event: ImporterEvent) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn get_recent(&self, limit: usize) -> Vec<ImporterEvent> {
        self.events.iter().rev().take(limit).cloned().collect()
    }
}
