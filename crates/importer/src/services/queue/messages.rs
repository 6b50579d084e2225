use domain::AuthorRef;

use crate::services::import::ImportRequest;

/// One submitted repository import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTask {
    pub url: String,
    /// Where the admin UI should go once the import is done
    pub redirect: Option<String>,
    /// Actor that submitted the import, notified of the outcome
    pub author: Option<AuthorRef>,
    /// Admin panel the import was submitted from
    pub panel: Option<String>,
}

impl ImportTask {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            redirect: None,
            author: None,
            panel: None,
        }
    }

    pub fn with_redirect(mut self, redirect: Option<String>) -> Self {
        self.redirect = redirect;
        self
    }

    pub fn with_author(mut self, author: Option<AuthorRef>) -> Self {
        self.author = author;
        self
    }

    pub fn with_panel(mut self, panel: impl Into<String>) -> Self {
        self.panel = Some(panel.into());
        self
    }

    pub fn to_request(&self) -> ImportRequest {
        ImportRequest {
            url: self.url.clone(),
            redirect: self.redirect.clone(),
            author: self.author.clone(),
        }
    }
}

/// Actor message type
#[derive(Debug, Clone)]
pub enum ImportMessage {
    /// Import a single repository (fire-and-forget)
    Import(ImportTask),
    /// Refresh every imported post (fire-and-forget)
    RefreshAll,
}
