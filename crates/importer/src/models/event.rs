use chrono::{DateTime, Utc};
use domain::{AuthorRef, Post};
use serde::{Deserialize, Serialize};

const IMPORTED_TITLE: &str = "Post Imported";
const IMPORTED_BODY: &str = "Post Imported Successfully";
const IMPORT_FAILED_TITLE: &str = "Post Import Failed";
const IMPORT_FAILED_BODY: &str = "Post Import Failed";
const VIEW_LABEL: &str = "View";

/// Event published to collaborators of the importer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImporterEvent {
    PostCreated { post: Box<Post> },
    PostUpdated { post: Box<Post> },
    Notification { notification: Notification },
}

impl ImporterEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ImporterEvent::PostCreated { .. } => "post_created",
            ImporterEvent::PostUpdated { .. } => "post_updated",
            ImporterEvent::Notification { .. } => "notification",
        }
    }
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Success,
    Danger,
}

/// Link attached to a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    pub url: String,
}

/// Notification addressed to the actor that submitted an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// `None` when the import was not submitted by an actor
    pub recipient: Option<AuthorRef>,
    pub title: String,
    pub body: String,
    pub status: NotificationStatus,
    pub action: Option<NotificationAction>,
    /// Where the admin UI should go next, as supplied with the import
    pub redirect: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Successful import of `name`, linking to the post's edit page
    pub fn import_succeeded(
        recipient: Option<AuthorRef>,
        name: &str,
        view_url: String,
        redirect: Option<String>,
    ) -> Self {
        Self {
            recipient,
            title: IMPORTED_TITLE.to_string(),
            body: format!("{}: {}", IMPORTED_BODY, name),
            status: NotificationStatus::Success,
            action: Some(NotificationAction {
                label: VIEW_LABEL.to_string(),
                url: view_url,
            }),
            redirect,
            created_at: Utc::now(),
        }
    }

    /// Failed import of the repository `name`
    pub fn import_failed(recipient: Option<AuthorRef>, name: &str) -> Self {
        Self {
            recipient,
            title: IMPORT_FAILED_TITLE.to_string(),
            body: format!("{}: {}", IMPORT_FAILED_BODY, name),
            status: NotificationStatus::Danger,
            action: None,
            redirect: None,
            created_at: Utc::now(),
        }
    }
}
