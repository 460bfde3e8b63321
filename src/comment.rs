use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Annotation attached to an RRSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub content: String,
    #[serde(default)]
    pub account: String,
    /// Unix timestamp of the last modification.
    #[serde(default)]
    pub modified_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Comment {
    /// Builds a comment stamped with the current time.
    pub fn new(content: impl Into<String>, account: impl Into<String>) -> Self {
        Self::with_timestamp(content, account, chrono::Utc::now().timestamp())
    }

    pub fn with_timestamp(
        content: impl Into<String>,
        account: impl Into<String>,
        modified_at: i64,
    ) -> Self {
        Self {
            content: content.into(),
            account: account.into(),
            modified_at,
            extra: Map::new(),
        }
    }
}
