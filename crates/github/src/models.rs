use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Repository payload as returned by `GET /repos/{owner}/{name}`.
///
/// The decoded document is kept verbatim so it can be stored as-is;
/// accessors read the handful of fields the importer cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Repository(Value);

impl Repository {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Whether the payload carries a non-null `id`
    pub fn has_id(&self) -> bool {
        self.0.get("id").is_some_and(|id| !id.is_null())
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    /// `owner/name`
    pub fn full_name(&self) -> Option<&str> {
        self.str_field("full_name")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    pub fn default_branch(&self) -> Option<&str> {
        self.str_field("default_branch")
    }

    pub fn homepage(&self) -> Option<&str> {
        self.str_field("homepage")
    }

    pub fn language(&self) -> Option<&str> {
        self.str_field("language")
    }

    pub fn stargazers_count(&self) -> Option<i64> {
        self.int_field("stargazers_count")
    }

    pub fn watchers_count(&self) -> Option<i64> {
        self.int_field("watchers_count")
    }

    pub fn forks_count(&self) -> Option<i64> {
        self.int_field("forks_count")
    }

    pub fn open_issues_count(&self) -> Option<i64> {
        self.int_field("open_issues_count")
    }

    pub fn owner_avatar_url(&self) -> Option<&str> {
        self.0
            .get("owner")
            .and_then(|owner| owner.get("avatar_url"))
            .and_then(Value::as_str)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn int_field(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }
}

impl From<Value> for Repository {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}
