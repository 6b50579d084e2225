//! Localized text value object.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A text field keyed by language code (`en`, `ar`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same value for every locale.
    pub fn uniform<S: AsRef<str>>(locales: &[S], value: &str) -> Self {
        Self(
            locales
                .iter()
                .map(|locale| (locale.as_ref().to_string(), value.to_string()))
                .collect(),
        )
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    pub fn set(&mut self, locale: impl Into<String>, value: impl Into<String>) {
        self.0.insert(locale.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
