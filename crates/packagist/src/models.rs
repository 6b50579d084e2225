use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Package document from `/packages/{vendor}/{name}.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Package(Value);

/// Download counters, `0` when Packagist omits one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Downloads {
    pub total: i64,
    pub monthly: i64,
    pub daily: i64,
}

impl Package {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn downloads(&self) -> Downloads {
        let downloads = self.0.pointer("/package/downloads");
        let count = |key: &str| {
            downloads
                .and_then(|d| d.get(key))
                .and_then(Value::as_i64)
                .unwrap_or(0)
        };

        Downloads {
            total: count("total"),
            monthly: count("monthly"),
            daily: count("daily"),
        }
    }

    /// Keywords of the first entry in `package.versions`.
    ///
    /// "First" is the registry's own ordering of the versions object, not
    /// the highest semantic version.
    pub fn keywords(&self) -> Vec<String> {
        let first_version = self
            .0
            .pointer("/package/versions")
            .and_then(Value::as_object)
            .and_then(|versions| versions.values().next());

        first_version
            .and_then(|version| version.get("keywords"))
            .and_then(Value::as_array)
            .map(|keywords| {
                keywords
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
