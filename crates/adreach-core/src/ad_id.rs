use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque ad identifier as issued by the ad library.
///
/// The API emits ids either as JSON strings or as integers; both forms are
/// normalized to their string representation so ids from search results and
/// detail payloads compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdId(String);

impl AdId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Reads an id from a JSON value. Empty strings, `null`, and
    /// non-scalar values yield `None`.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_owned())),
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// JSON form used in request bodies: all-digit ids go out as numbers,
    /// anything else as a string.
    #[must_use]
    pub fn to_request_value(&self) -> serde_json::Value {
        self.0
            .parse::<u64>()
            .ok()
            .filter(|n| n.to_string() == self.0)
            .map_or_else(|| serde_json::Value::String(self.0.clone()), Into::into)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
