//! Payout processor
//!
//! Debits a member's accumulated wallet balance and records the payout
//! proof. The overdraft check runs inside the atomic mutate, so a refused
//! payout leaves the wallet byte-for-byte unchanged.

use shared::models::{AuditAction, TeamMember};
use shared::util::now_millis;
use shared::{AppError, AppResult};

use crate::audit::AuditTrail;
use crate::money;
use crate::services::{MessageKind, Notifier};
use crate::settings::SettingsService;
use crate::store::Ledger;

#[derive(Clone)]
pub struct PayoutProcessor {
    ledger: Ledger,
    audit: AuditTrail,
    settings: SettingsService,
    notifier: Notifier,
}

impl PayoutProcessor {
    pub fn new(
        ledger: Ledger,
        audit: AuditTrail,
        settings: SettingsService,
        notifier: Notifier,
    ) -> Self {
        Self {
            ledger,
            audit,
            settings,
            notifier,
        }
    }

    /// Pay out `amount` from the target member's wallet.
    ///
    /// Preconditions: `amount > 0`, `amount <= wallet`, withdrawals not
    /// paused. Returns the member state after the debit.
    pub async fn process_payout(
        &self,
        actor_id: &str,
        target_member_id: &str,
        amount: f64,
        proof_url: &str,
    ) -> AppResult<TeamMember> {
        money::require_finite(amount, "payout amount")?;
        if amount <= 0.0 {
            return Err(AppError::validation(format!(
                "payout amount must be positive, got {amount}"
            )));
        }

        let settings = self.settings.get().await?;
        if settings.withdrawals_paused {
            return Err(AppError::business_rule("withdrawals are currently paused"));
        }

        let updated = self
            .ledger
            .mutate::<TeamMember, _>(target_member_id, |m| {
                if m.wallet < amount {
                    return Err(AppError::InsufficientBalance {
                        requested: amount,
                        available: m.wallet,
                    });
                }
                m.wallet = money::sub(m.wallet, amount);
                m.updated_at = now_millis();
                Ok(())
            })
            .await
            .map_err(|e| match e {
                AppError::NotFound { .. } => AppError::unknown_member(target_member_id),
                e => e,
            })?;

        self.audit
            .append(
                actor_id,
                AuditAction::PayoutProcessed,
                format!("Payout to {} for ${amount}", updated.name),
                Some(proof_url.to_string()),
            )
            .await?;

        tracing::info!(
            actor = actor_id,
            target = target_member_id,
            amount,
            remaining = updated.wallet,
            "payout processed"
        );

        self.notifier
            .dispatch(&updated, MessageKind::PayoutSent, Some(amount));

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{payout_processor, seed_member, test_member};
    use shared::models::SettingsUpdate;

    #[tokio::test]
    async fn test_full_payout_then_overdraft() {
        let (ledger, audit, _settings, payouts) = payout_processor();
        seed_member(&ledger, test_member("u2", 150_000.0, 0)).await;

        let member = payouts
            .process_payout("admin", "u2", 150_000.0, "https://proofs/p1.png")
            .await
            .unwrap();
        assert_eq!(member.wallet, 0.0);

        // A second debit of even $1 must now fail and change nothing
        let err = payouts
            .process_payout("admin", "u2", 1.0, "https://proofs/p2.png")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientBalance { .. }));

        let member: TeamMember = ledger.get("u2").await.unwrap().unwrap();
        assert_eq!(member.wallet, 0.0);

        // Exactly one audit entry, for the successful payout
        let entries = audit
            .list(Some(AuditAction::PayoutProcessed))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].proof_url.as_deref(),
            Some("https://proofs/p1.png")
        );
    }

    #[tokio::test]
    async fn test_overdraft_leaves_wallet_unchanged() {
        let (ledger, _audit, _settings, payouts) = payout_processor();
        seed_member(&ledger, test_member("u2", 500.0, 0)).await;

        let err = payouts
            .process_payout("admin", "u2", 500.01, "https://proofs/p.png")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientBalance {
                available, ..
            } if available == 500.0
        ));

        let member: TeamMember = ledger.get("u2").await.unwrap().unwrap();
        assert_eq!(member.wallet, 500.0);
    }

    #[tokio::test]
    async fn test_unknown_member_is_a_hard_failure() {
        let (_ledger, audit, _settings, payouts) = payout_processor();

        let err = payouts
            .process_payout("admin", "ghost", 100.0, "https://proofs/p.png")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownMember { .. }));
        assert!(audit.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let (ledger, _audit, _settings, payouts) = payout_processor();
        seed_member(&ledger, test_member("u2", 100.0, 0)).await;

        assert!(
            payouts
                .process_payout("admin", "u2", 0.0, "url")
                .await
                .is_err()
        );
        assert!(
            payouts
                .process_payout("admin", "u2", -5.0, "url")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_paused_withdrawals_refuse_payouts() {
        let (ledger, _audit, settings, payouts) = payout_processor();
        seed_member(&ledger, test_member("u2", 100.0, 0)).await;

        settings
            .update(
                "admin",
                SettingsUpdate {
                    withdrawals_paused: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = payouts
            .process_payout("admin", "u2", 50.0, "url")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule { .. }));

        let member: TeamMember = ledger.get("u2").await.unwrap().unwrap();
        assert_eq!(member.wallet, 100.0);
    }
}
