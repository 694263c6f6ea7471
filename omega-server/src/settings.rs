//! Global settings service
//!
//! The settings document is a singleton; reads fall back to defaults until
//! the first write. Every update is audited as `SETTINGS_UPDATE`.

use shared::models::{AuditAction, GlobalSettings, SettingsUpdate};
use shared::AppResult;

use crate::audit::AuditTrail;
use crate::store::{Ledger, SETTINGS_ID};

#[derive(Clone)]
pub struct SettingsService {
    ledger: Ledger,
    audit: AuditTrail,
}

impl SettingsService {
    pub fn new(ledger: Ledger, audit: AuditTrail) -> Self {
        Self { ledger, audit }
    }

    pub async fn get(&self) -> AppResult<GlobalSettings> {
        Ok(self
            .ledger
            .get::<GlobalSettings>(SETTINGS_ID)
            .await?
            .unwrap_or_default())
    }

    /// Apply a partial update and audit which fields changed
    pub async fn update(
        &self,
        actor_id: &str,
        patch: SettingsUpdate,
    ) -> AppResult<GlobalSettings> {
        let mut settings = self.get().await?;
        let mut changed: Vec<&str> = Vec::new();

        if let Some(v) = patch.markup_percentage {
            settings.markup_percentage = v;
            changed.push("markup_percentage");
        }
        if let Some(v) = patch.default_commission_rate {
            settings.default_commission_rate = v;
            changed.push("default_commission_rate");
        }
        if let Some(v) = patch.leader_commission {
            settings.leader_commission = v;
            changed.push("leader_commission");
        }
        if let Some(v) = patch.withdrawals_paused {
            settings.withdrawals_paused = v;
            changed.push("withdrawals_paused");
        }
        if let Some(v) = patch.maintenance_mode {
            settings.maintenance_mode = v;
            changed.push("maintenance_mode");
        }
        if let Some(v) = patch.platform_name {
            settings.platform_name = v;
            changed.push("platform_name");
        }
        if let Some(v) = patch.support_phone {
            settings.support_phone = v;
            changed.push("support_phone");
        }
        if let Some(v) = patch.templates {
            settings.templates = v;
            changed.push("templates");
        }

        if changed.is_empty() {
            return Ok(settings);
        }

        self.ledger.put(&settings).await?;
        self.audit
            .append(
                actor_id,
                AuditAction::SettingsUpdate,
                format!("Updated settings: {}", changed.join(", ")),
                None,
            )
            .await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{audit_trail, mem_ledger};

    #[tokio::test]
    async fn test_defaults_before_first_write() {
        let ledger = mem_ledger();
        let service = SettingsService::new(ledger.clone(), audit_trail(&ledger));

        let settings = service.get().await.unwrap();
        assert_eq!(settings.default_commission_rate, 5.0);
        assert!(!settings.withdrawals_paused);
    }

    #[tokio::test]
    async fn test_update_persists_and_audits() {
        let ledger = mem_ledger();
        let audit = audit_trail(&ledger);
        let service = SettingsService::new(ledger.clone(), audit.clone());

        let updated = service
            .update(
                "admin",
                SettingsUpdate {
                    withdrawals_paused: Some(true),
                    markup_percentage: Some(20.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.withdrawals_paused);
        assert_eq!(updated.markup_percentage, 20.0);

        let reread = service.get().await.unwrap();
        assert!(reread.withdrawals_paused);

        let entries = audit
            .list(Some(AuditAction::SettingsUpdate))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].details.contains("withdrawals_paused"));
    }

    #[tokio::test]
    async fn test_empty_patch_writes_nothing() {
        let ledger = mem_ledger();
        let audit = audit_trail(&ledger);
        let service = SettingsService::new(ledger.clone(), audit.clone());

        service
            .update("admin", SettingsUpdate::default())
            .await
            .unwrap();
        assert!(audit.list(None).await.unwrap().is_empty());
    }
}
