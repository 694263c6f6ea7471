//! Sale recorder
//!
//! Applies a computed commission to a member's ledger row and appends the
//! audit entry. The member mutate is atomic; the audit entry is written only
//! after it succeeds, so a `SALE_REFERRAL` entry always describes credited
//! money.

use shared::models::{AuditAction, OrderItem, Product, TeamMember};
use shared::util::now_millis;
use shared::{AppError, AppResult};

use crate::audit::AuditTrail;
use crate::commission::{CommissionPolicy, compute_commission};
use crate::money;
use crate::services::{MessageKind, Notifier};
use crate::store::Ledger;

/// What was sold, reduced to the fields the ledger and audit need
#[derive(Debug, Clone)]
pub struct SaleInput {
    pub product_id: String,
    pub product_name: String,
    pub sku: Option<String>,
}

impl From<&Product> for SaleInput {
    fn from(p: &Product) -> Self {
        Self {
            product_id: p.id.clone(),
            product_name: p.name.clone(),
            sku: Some(p.sku.clone()),
        }
    }
}

impl From<&OrderItem> for SaleInput {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            sku: None,
        }
    }
}

/// Outcome of a recorded sale
#[derive(Debug, Clone)]
pub struct SaleReceipt {
    pub commission: f64,
    pub points_earned: i64,
    pub audit_id: String,
}

#[derive(Clone)]
pub struct SaleRecorder {
    ledger: Ledger,
    audit: AuditTrail,
    policy: CommissionPolicy,
    notifier: Notifier,
}

impl SaleRecorder {
    pub fn new(
        ledger: Ledger,
        audit: AuditTrail,
        policy: CommissionPolicy,
        notifier: Notifier,
    ) -> Self {
        Self {
            ledger,
            audit,
            policy,
            notifier,
        }
    }

    /// Credit one attributed sale to a reseller.
    ///
    /// Fails with `UnknownMember` when the reseller does not resolve; a
    /// sale is never silently dropped.
    pub async fn record_sale(
        &self,
        reseller_id: &str,
        product: &SaleInput,
        sale_price: f64,
        commission_rate: f64,
    ) -> AppResult<SaleReceipt> {
        // Fail fast on malformed input; nothing is mutated
        let breakdown = compute_commission(sale_price, commission_rate, &self.policy)?;

        let updated = self
            .ledger
            .mutate::<TeamMember, _>(reseller_id, |m| {
                m.wallet = money::add(m.wallet, breakdown.commission);
                m.points += breakdown.points_earned;
                m.sales_this_month = money::add(m.sales_this_month, sale_price);
                m.updated_at = now_millis();
                Ok(())
            })
            .await
            .map_err(|e| match e {
                AppError::NotFound { .. } => AppError::unknown_member(reseller_id),
                e => e,
            })?;

        let entry = self
            .audit
            .append(
                reseller_id,
                AuditAction::SaleReferral,
                format!(
                    "Referred sale: {} (SKU: {}). Commission: ${}",
                    product.product_name,
                    product.sku.as_deref().unwrap_or("-"),
                    breakdown.commission
                ),
                None,
            )
            .await?;

        tracing::info!(
            reseller = reseller_id,
            product = %product.product_id,
            sale_price,
            commission = breakdown.commission,
            points = breakdown.points_earned,
            "sale recorded"
        );

        self.notifier
            .dispatch(&updated, MessageKind::SaleRecorded, Some(sale_price));

        Ok(SaleReceipt {
            commission: breakdown.commission,
            points_earned: breakdown.points_earned,
            audit_id: entry.id,
        })
    }
}
