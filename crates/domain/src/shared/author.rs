//! Actor reference value object.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Tagged reference to the actor that authored a record.
///
/// `kind` names the actor model (an admin user, an API client, ...) and is
/// resolved by whoever owns that model; the domain only carries it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorRef {
    pub kind: String,
    pub id: i64,
}

impl AuthorRef {
    pub fn new(kind: impl Into<String>, id: i64) -> DomainResult<Self> {
        let kind = kind.into();
        if kind.trim().is_empty() {
            return Err(DomainError::Validation("author kind must not be empty".into()));
        }
        Ok(Self { kind, id })
    }

    /// Build a reference only when both parts are supplied.
    pub fn from_parts(kind: Option<&str>, id: Option<i64>) -> Option<Self> {
        match (kind, id) {
            (Some(kind), Some(id)) => Self::new(kind, id).ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuthorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}
