//! Deserialization of the object-store JSON responses.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One object resource as the store reports it. Sizes come over the wire
/// as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Item {
    pub name: String,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    updated: Option<String>,
}

impl Item {
    pub fn size(&self) -> u64 {
        self.size
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.updated
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now)
    }
}

/// A listing page: objects under the prefix plus the delimited
/// sub-prefixes.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Listing {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub prefixes: Vec<String>,
}
