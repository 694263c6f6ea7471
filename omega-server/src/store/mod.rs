//! Ledger store: the single source of truth for members, orders, the audit
//! log, coupons, products and settings
//!
//! The Core depends only on the [`DocumentStore`] trait; which concrete
//! backend is bound happens once at startup. The only transactional
//! guarantee the Core assumes is that [`DocumentStore::mutate`] is atomic
//! per single document.

mod memory;
mod surreal;

pub use memory::MemoryStore;
pub use surreal::SurrealStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{AuditEntry, Coupon, GlobalSettings, Order, Product, TeamMember};
use shared::{AppError, AppResult};

/// Collection names
pub mod collections {
    pub const MEMBERS: &str = "members";
    pub const ORDERS: &str = "orders";
    pub const AUDIT_LOG: &str = "audit_log";
    pub const COUPONS: &str = "coupons";
    pub const PRODUCTS: &str = "products";
    pub const SETTINGS: &str = "settings";
}

/// Updater applied inside [`DocumentStore::mutate`].
///
/// May run more than once when a backend resolves write conflicts by
/// optimistic retry, so it must compute its result from the document it is
/// given and nothing else. Returning an error aborts the mutation: the
/// stored document is left untouched and the error propagates to the caller
/// unchanged (this is how debit preconditions surface).
pub type MutateFn<'a> = dyn Fn(&mut Value) -> AppResult<()> + Send + Sync + 'a;

/// Transactional key-addressed storage over named collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    async fn list(&self, collection: &str) -> AppResult<Vec<Value>>;

    async fn put(&self, collection: &str, id: &str, value: Value) -> AppResult<()>;

    /// Atomic read-modify-write of a single document.
    ///
    /// Returns the document state after the update. Fails with `NotFound`
    /// when the document does not exist.
    async fn mutate(&self, collection: &str, id: &str, f: &MutateFn<'_>) -> AppResult<Value>;
}

/// Binds a model type to its collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

impl Document for TeamMember {
    const COLLECTION: &'static str = collections::MEMBERS;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Order {
    const COLLECTION: &'static str = collections::ORDERS;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for AuditEntry {
    const COLLECTION: &'static str = collections::AUDIT_LOG;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Coupon {
    const COLLECTION: &'static str = collections::COUPONS;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Product {
    const COLLECTION: &'static str = collections::PRODUCTS;

    fn id(&self) -> &str {
        &self.id
    }
}

/// The settings singleton lives under a fixed key
pub const SETTINGS_ID: &str = "global";

impl Document for GlobalSettings {
    const COLLECTION: &'static str = collections::SETTINGS;

    fn id(&self) -> &str {
        SETTINGS_ID
    }
}

/// Typed facade over a [`DocumentStore`]
///
/// Serde round-trips happen here, never in the engines. Cheap to clone.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn DocumentStore>,
}

impl Ledger {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn get<D: Document>(&self, id: &str) -> AppResult<Option<D>> {
        match self.store.get(D::COLLECTION, id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn list<D: Document>(&self) -> AppResult<Vec<D>> {
        let values = self.store.list(D::COLLECTION).await?;
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(AppError::from))
            .collect()
    }

    pub async fn put<D: Document>(&self, doc: &D) -> AppResult<()> {
        let value = serde_json::to_value(doc)?;
        self.store.put(D::COLLECTION, doc.id(), value).await
    }

    /// Atomic read-modify-write of one typed document
    pub async fn mutate<D, F>(&self, id: &str, f: F) -> AppResult<D>
    where
        D: Document,
        F: Fn(&mut D) -> AppResult<()> + Send + Sync,
    {
        let wrapped = |value: &mut Value| -> AppResult<()> {
            let mut doc: D = serde_json::from_value(value.clone())?;
            f(&mut doc)?;
            *value = serde_json::to_value(&doc)?;
            Ok(())
        };
        let updated = self.store.mutate(D::COLLECTION, id, &wrapped).await?;
        Ok(serde_json::from_value(updated)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{MemberStatus, Role};
    use shared::util::now_millis;

    fn member(id: &str, wallet: f64) -> TeamMember {
        TeamMember {
            id: id.to_string(),
            name: "Test".to_string(),
            role: Role::Reseller,
            status: MemberStatus::Active,
            wallet,
            points: 0,
            sales_this_month: 0.0,
            level: 1,
            email: None,
            phone: None,
            cbu: None,
            alias: None,
            leader_id: None,
            custom_commission_rate: None,
            activation_proof_url: None,
            join_date: now_millis(),
            updated_at: now_millis(),
        }
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let ledger = Ledger::new(Arc::new(MemoryStore::new()));
        ledger.put(&member("u1", 500.0)).await.unwrap();

        let loaded: TeamMember = ledger.get("u1").await.unwrap().unwrap();
        assert_eq!(loaded.wallet, 500.0);

        let missing: Option<TeamMember> = ledger.get("nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_mutate_applies_and_returns_updated() {
        let ledger = Ledger::new(Arc::new(MemoryStore::new()));
        ledger.put(&member("u1", 100.0)).await.unwrap();

        let updated: TeamMember = ledger
            .mutate("u1", |m: &mut TeamMember| {
                m.wallet += 50.0;
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(updated.wallet, 150.0);
    }

    #[tokio::test]
    async fn test_mutate_abort_leaves_document_untouched() {
        let ledger = Ledger::new(Arc::new(MemoryStore::new()));
        ledger.put(&member("u1", 100.0)).await.unwrap();

        let result: AppResult<TeamMember> = ledger
            .mutate("u1", |m: &mut TeamMember| {
                m.wallet = -1.0;
                Err(AppError::business_rule("refused"))
            })
            .await;
        assert!(result.is_err());

        let loaded: TeamMember = ledger.get("u1").await.unwrap().unwrap();
        assert_eq!(loaded.wallet, 100.0);
    }
}
