//! Audit trail
//!
//! Append-only: the service exposes `append` and `list`, nothing else. Every
//! mutation that moves money or points writes exactly one entry, and callers
//! order the append *after* the balance mutation it records, so a surviving
//! entry always describes an applied change.

use shared::models::{AuditAction, AuditEntry, Environment};
use shared::util::{new_id, now_millis};
use shared::AppResult;

use crate::store::Ledger;

#[derive(Clone)]
pub struct AuditTrail {
    ledger: Ledger,
    environment: Environment,
}

impl AuditTrail {
    pub fn new(ledger: Ledger, environment: Environment) -> Self {
        Self {
            ledger,
            environment,
        }
    }

    /// Append one immutable entry and return it
    pub async fn append(
        &self,
        actor_id: &str,
        action: AuditAction,
        details: impl Into<String>,
        proof_url: Option<String>,
    ) -> AppResult<AuditEntry> {
        let entry = AuditEntry {
            id: new_id(),
            actor_id: actor_id.to_string(),
            action,
            details: details.into(),
            timestamp: now_millis(),
            environment: self.environment,
            proof_url,
        };
        self.ledger.put(&entry).await?;
        tracing::info!(
            action = %entry.action,
            actor = %entry.actor_id,
            "audit entry appended"
        );
        Ok(entry)
    }

    /// List entries, newest first, optionally filtered by action
    pub async fn list(&self, action: Option<AuditAction>) -> AppResult<Vec<AuditEntry>> {
        let mut entries: Vec<AuditEntry> = self.ledger.list().await?;
        if let Some(action) = action {
            entries.retain(|e| e.action == action);
        }
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }
}
