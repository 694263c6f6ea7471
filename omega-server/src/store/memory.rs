//! In-process document store
//!
//! Backing implementation for offline/demo use and the default test double.
//! `DashMap` entry locking makes `mutate` an atomic read-modify-write: the
//! shard write lock is held for the whole updater call, so two operations
//! landing on the same document never interleave.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use shared::{AppError, AppResult};

use super::{DocumentStore, MutateFn};

#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, DashMap<String, Value>>,
    /// Test hook: when set, every operation fails as a backend outage
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a backend outage (used by tests and the demo console)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::storage_unavailable("memory store offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        self.check_available()?;
        Ok(self
            .collections
            .get(collection)
            .and_then(|c| c.get(id).map(|v| v.clone())))
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<Value>> {
        self.check_available()?;
        Ok(self
            .collections
            .get(collection)
            .map(|c| c.iter().map(|e| e.value().clone()).collect())
            .unwrap_or_default())
    }

    async fn put(&self, collection: &str, id: &str, value: Value) -> AppResult<()> {
        self.check_available()?;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), value);
        Ok(())
    }

    async fn mutate(&self, collection: &str, id: &str, f: &MutateFn<'_>) -> AppResult<Value> {
        self.check_available()?;
        let coll = self
            .collections
            .entry(collection.to_string())
            .or_default();
        let mut entry = coll
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("{collection}/{id}")))?;

        // Apply on a copy so an aborted updater leaves the entry untouched
        let mut draft = entry.value().clone();
        f(&mut draft)?;
        *entry.value_mut() = draft.clone();
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_list() {
        let store = MemoryStore::new();
        store
            .put("members", "u1", json!({"id": "u1", "wallet": 10.0}))
            .await
            .unwrap();
        store
            .put("members", "u2", json!({"id": "u2", "wallet": 20.0}))
            .await
            .unwrap();

        let got = store.get("members", "u1").await.unwrap().unwrap();
        assert_eq!(got["wallet"], 10.0);

        assert_eq!(store.list("members").await.unwrap().len(), 2);
        assert!(store.list("orders").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutate_missing_document() {
        let store = MemoryStore::new();
        let err = store
            .mutate("members", "ghost", &|_v| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_mutates_do_not_lose_updates() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("members", "u1", json!({"id": "u1", "points": 0}))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..100 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .mutate("members", "u1", &|v| {
                        let n = v["points"].as_i64().unwrap();
                        v["points"] = (n + 1).into();
                        Ok(())
                    })
                    .await
                    .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let got = store.get("members", "u1").await.unwrap().unwrap();
        assert_eq!(got["points"], 100);
    }

    #[tokio::test]
    async fn test_outage_surfaces_as_storage_unavailable() {
        let store = MemoryStore::new();
        store.put("members", "u1", json!({"id": "u1"})).await.unwrap();

        store.set_unavailable(true);
        let err = store.get("members", "u1").await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnavailable { .. }));

        store.set_unavailable(false);
        assert!(store.get("members", "u1").await.unwrap().is_some());
    }
}
