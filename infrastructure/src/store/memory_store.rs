//! Process-local submission store

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use verdict_application::{StoreError, SubmissionStore};

/// Keeps every submission in memory under a fresh UUID.
#[derive(Default)]
pub struct InMemorySubmissionStore {
    submissions: Mutex<HashMap<String, Value>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored record: `{ id, created_at, data }`
    pub fn get(&self, id: &str) -> Option<Value> {
        self.submissions
            .lock()
            .ok()
            .and_then(|map| map.get(id).cloned())
    }

    pub fn len(&self) -> usize {
        self.submissions.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn create(&self, data: &Value) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let record = json!({
            "id": id,
            "created_at": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "data": data,
        });

        let mut submissions = self
            .submissions
            .lock()
            .map_err(|_| StoreError::Unavailable("submission store lock poisoned".to_string()))?;
        submissions.insert(id.clone(), record);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let store = InMemorySubmissionStore::new();
        let a = store.create(&json!({ "message": "one" })).await.unwrap();
        let b = store.create(&json!({ "message": "two" })).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        let record = store.get(&a).unwrap();
        assert_eq!(record["id"], a.as_str());
        assert_eq!(record["data"]["message"], "one");
        assert!(record["created_at"].is_string());
    }

    #[test]
    fn test_missing_submission() {
        let store = InMemorySubmissionStore::new();
        assert!(store.get("nope").is_none());
        assert!(store.is_empty());
    }
}
