//! SurrealDB document store
//!
//! Durable backend for live use. Each record wraps the caller's document in
//! `{ doc, version }`; `mutate` uses the version field for optimistic
//! concurrency (read version, compute new value, conditional write, retry on
//! conflict), which gives per-document read-modify-write atomicity on an
//! engine without native increments.

use serde::Deserialize;
use serde_json::Value;
use shared::{AppError, AppResult};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use super::{DocumentStore, MutateFn};
use async_trait::async_trait;

/// Conflict retries before giving up and reporting a transient failure
const MAX_MUTATE_RETRIES: usize = 5;

/// Record shape as stored: caller document plus the concurrency version
#[derive(Debug, Deserialize)]
struct VersionedRecord {
    doc: Value,
    version: i64,
}

#[derive(Clone)]
pub struct SurrealStore {
    db: Surreal<Db>,
}

impl SurrealStore {
    /// Open a durable store at `path` (embedded RocksDB engine)
    pub async fn open(path: &str) -> AppResult<Self> {
        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(storage_err)?;
        Self::init(db).await
    }

    /// Open a throwaway in-memory instance (tests, demo console)
    pub async fn open_in_memory() -> AppResult<Self> {
        let db = Surreal::new::<Mem>(()).await.map_err(storage_err)?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> AppResult<Self> {
        db.use_ns("omega")
            .use_db("ledger")
            .await
            .map_err(storage_err)?;
        Ok(Self { db })
    }
}

fn storage_err(err: surrealdb::Error) -> AppError {
    AppError::storage_unavailable(err.to_string())
}

#[async_trait]
impl DocumentStore for SurrealStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let mut res = self
            .db
            .query("SELECT VALUE doc FROM type::thing($tb, $id)")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .await
            .map_err(storage_err)?;
        let rows: Vec<Value> = res.take(0).map_err(storage_err)?;
        Ok(rows.into_iter().next())
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<Value>> {
        let mut res = self
            .db
            .query("SELECT VALUE doc FROM type::table($tb)")
            .bind(("tb", collection.to_string()))
            .await
            .map_err(storage_err)?;
        res.take(0).map_err(storage_err)
    }

    async fn put(&self, collection: &str, id: &str, value: Value) -> AppResult<()> {
        self.db
            .query("UPSERT type::thing($tb, $id) SET doc = $doc, version = (version ?? 0) + 1")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .bind(("doc", value))
            .await
            .map_err(storage_err)?
            .check()
            .map_err(storage_err)?;
        Ok(())
    }

    async fn mutate(&self, collection: &str, id: &str, f: &MutateFn<'_>) -> AppResult<Value> {
        for attempt in 0..MAX_MUTATE_RETRIES {
            let mut res = self
                .db
                .query("SELECT doc, version FROM type::thing($tb, $id)")
                .bind(("tb", collection.to_string()))
                .bind(("id", id.to_string()))
                .await
                .map_err(storage_err)?;
            let rows: Vec<VersionedRecord> = res.take(0).map_err(storage_err)?;
            let Some(record) = rows.into_iter().next() else {
                return Err(AppError::not_found(format!("{collection}/{id}")));
            };

            let mut draft = record.doc;
            // Updater abort propagates unchanged; the stored record is untouched
            f(&mut draft)?;

            let mut res = self
                .db
                .query(
                    "UPDATE type::thing($tb, $id) \
                     SET doc = $doc, version = version + 1 \
                     WHERE version = $version \
                     RETURN VALUE doc",
                )
                .bind(("tb", collection.to_string()))
                .bind(("id", id.to_string()))
                .bind(("doc", draft))
                .bind(("version", record.version))
                .await
                .map_err(storage_err)?;
            let updated: Vec<Value> = res.take(0).map_err(storage_err)?;
            if let Some(value) = updated.into_iter().next() {
                return Ok(value);
            }

            tracing::debug!(collection, id, attempt, "mutate version conflict, retrying");
        }

        Err(AppError::storage_unavailable(format!(
            "write conflict on {collection}/{id} after {MAX_MUTATE_RETRIES} attempts"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let store = SurrealStore::open_in_memory().await.unwrap();
        store
            .put("members", "u1", json!({"id": "u1", "wallet": 45000.0}))
            .await
            .unwrap();

        let got = store.get("members", "u1").await.unwrap().unwrap();
        assert_eq!(got["wallet"], 45000.0);
        assert!(store.get("members", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = SurrealStore::open_in_memory().await.unwrap();
        store
            .put("settings", "global", json!({"maintenance_mode": false}))
            .await
            .unwrap();
        store
            .put("settings", "global", json!({"maintenance_mode": true}))
            .await
            .unwrap();

        let got = store.get("settings", "global").await.unwrap().unwrap();
        assert_eq!(got["maintenance_mode"], true);
        assert_eq!(store.list("settings").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_collection() {
        let store = SurrealStore::open_in_memory().await.unwrap();
        for i in 0..3 {
            store
                .put("orders", &format!("o{i}"), json!({"id": format!("o{i}")}))
                .await
                .unwrap();
        }
        assert_eq!(store.list("orders").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_mutate_missing_document() {
        let store = SurrealStore::open_in_memory().await.unwrap();
        let err = store
            .mutate("members", "ghost", &|_v| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_mutate_abort_leaves_record_untouched() {
        let store = SurrealStore::open_in_memory().await.unwrap();
        store
            .put("members", "u1", json!({"id": "u1", "wallet": 100.0}))
            .await
            .unwrap();

        let err = store
            .mutate("members", "u1", &|v| {
                v["wallet"] = json!(-1.0);
                Err(AppError::business_rule("refused"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule { .. }));

        let got = store.get("members", "u1").await.unwrap().unwrap();
        assert_eq!(got["wallet"], 100.0);
    }

    #[tokio::test]
    async fn test_concurrent_mutates_all_apply() {
        let store = Arc::new(SurrealStore::open_in_memory().await.unwrap());
        store
            .put("members", "u1", json!({"id": "u1", "points": 0}))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .mutate("members", "u1", &|v| {
                        let n = v["points"].as_i64().unwrap();
                        v["points"] = (n + 1).into();
                        Ok(())
                    })
                    .await
            }));
        }

        let mut applied = 0;
        for h in handles {
            if h.await.unwrap().is_ok() {
                applied += 1;
            }
        }

        let got = store.get("members", "u1").await.unwrap().unwrap();
        // Every successful mutate is reflected; none is lost
        assert_eq!(got["points"], applied);
        assert!(applied > 0);
    }

    #[tokio::test]
    async fn test_open_durable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let store = SurrealStore::open(path.to_str().unwrap()).await.unwrap();
        store
            .put("products", "p1", json!({"id": "p1", "sku": "TV-55"}))
            .await
            .unwrap();
        let got = store.get("products", "p1").await.unwrap().unwrap();
        assert_eq!(got["sku"], "TV-55");
    }
}
