//! OrderManager: checkout persistence, fan-out, status transitions
//!
//! # Fan-out idempotency
//!
//! The draft id doubles as the idempotency key. Commission crediting is
//! guarded twice:
//!
//! - `commissions_processed` on the order short-circuits a full replay;
//! - per-item markers in `credited_items` make an interrupted fan-out
//!   resumable without re-crediting finished items.
//!
//! Markers are claimed *before* the credit (claim-then-credit): a crash
//! between the claim and the credit can leave one item uncredited, but no
//! retry path can ever credit an item twice.

use shared::models::{AuditAction, Order, OrderDraft, OrderStatus, TeamMember};
use shared::util::{new_id, now_millis, tracking_id};
use shared::{AppError, AppResult};

use crate::audit::AuditTrail;
use crate::money;
use crate::sales::{SaleInput, SaleRecorder};
use crate::settings::SettingsService;
use crate::store::Ledger;

#[derive(Clone)]
pub struct OrderManager {
    ledger: Ledger,
    recorder: SaleRecorder,
    settings: SettingsService,
    audit: AuditTrail,
}

impl OrderManager {
    pub fn new(
        ledger: Ledger,
        recorder: SaleRecorder,
        settings: SettingsService,
        audit: AuditTrail,
    ) -> Self {
        Self {
            ledger,
            recorder,
            settings,
            audit,
        }
    }

    /// Persist an order from approved checkout data and run the commission
    /// fan-out when the order carries a referral attribution.
    ///
    /// Retrying with the same draft id never double-credits: a processed
    /// order is returned as-is, an interrupted fan-out is resumed.
    pub async fn create_order(&self, draft: OrderDraft) -> AppResult<Order> {
        Self::validate_draft(&draft)?;
        let id = draft.id.clone().unwrap_or_else(new_id);

        if let Some(existing) = self.ledger.get::<Order>(&id).await? {
            if existing.commissions_processed {
                tracing::debug!(order = %id, "create_order replay, already processed");
                return Ok(existing);
            }
            return self.run_fanout(existing).await;
        }

        let now = now_millis();
        let order = Order {
            id,
            tracking_id: tracking_id(),
            status: OrderStatus::Pending,
            total: Self::order_total(&draft),
            customer: draft.customer,
            items: draft.items,
            reseller_id: draft.reseller_id,
            shipping_provider: draft.shipping_provider,
            commissions_processed: false,
            credited_items: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.ledger.put(&order).await?;
        tracing::info!(order = %order.id, total = order.total, "order created");

        self.run_fanout(order).await
    }

    pub(crate) fn validate_draft(draft: &OrderDraft) -> AppResult<()> {
        if draft.items.is_empty() {
            return Err(AppError::validation("order must contain at least one item"));
        }
        for item in &draft.items {
            money::require_finite(item.price, "item price")?;
            if !(0.0..=money::MAX_AMOUNT).contains(&item.price) {
                return Err(AppError::validation(format!(
                    "item price out of range, got {}",
                    item.price
                )));
            }
            if item.quantity <= 0 {
                return Err(AppError::validation(format!(
                    "item quantity must be positive, got {}",
                    item.quantity
                )));
            }
        }
        money::require_finite(draft.shipping_cost, "shipping cost")?;
        if !(0.0..=money::MAX_AMOUNT).contains(&draft.shipping_cost) {
            return Err(AppError::validation("shipping cost out of range"));
        }
        Ok(())
    }

    fn order_total(draft: &OrderDraft) -> f64 {
        let items = draft.items.iter().fold(0.0, |acc, item| {
            money::add(acc, money::line_total(item.price, item.quantity))
        });
        money::add(items, draft.shipping_cost)
    }

    /// Run (or resume) the commission fan-out for an order
    async fn run_fanout(&self, order: Order) -> AppResult<Order> {
        let Some(reseller_id) = order.reseller_id.clone() else {
            return self.mark_processed(&order.id).await;
        };

        // Commission rate: the member override, or the platform default
        let member: TeamMember = self
            .ledger
            .get(&reseller_id)
            .await?
            .ok_or_else(|| AppError::unknown_member(&reseller_id))?;
        let rate = match member.custom_commission_rate {
            Some(rate) => rate,
            None => self.settings.get().await?.default_commission_rate,
        };

        for (index, item) in order.items.iter().enumerate() {
            // Markers are keyed by line position so duplicate products stay distinct
            let marker = format!("{}:{}", index, item.product_id);
            if !self.claim_item(&order.id, &marker).await? {
                tracing::debug!(order = %order.id, %marker, "item already credited, skipping");
                continue;
            }
            let sale_price = money::line_total(item.price, item.quantity);
            self.recorder
                .record_sale(&reseller_id, &SaleInput::from(item), sale_price, rate)
                .await?;
        }

        self.mark_processed(&order.id).await
    }

    /// Atomically claim one line item's fan-out marker.
    ///
    /// Returns false when the marker is already present: that item was
    /// credited (or claimed) by an earlier attempt and must be skipped.
    async fn claim_item(&self, order_id: &str, marker: &str) -> AppResult<bool> {
        let result = self
            .ledger
            .mutate::<Order, _>(order_id, |o| {
                if o.credited_items.iter().any(|m| m == marker) {
                    return Err(AppError::conflict(format!("fanout marker {marker}")));
                }
                o.credited_items.push(marker.to_string());
                o.updated_at = now_millis();
                Ok(())
            })
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(AppError::Conflict { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn mark_processed(&self, order_id: &str) -> AppResult<Order> {
        self.ledger
            .mutate::<Order, _>(order_id, |o| {
                o.commissions_processed = true;
                o.updated_at = now_millis();
                Ok(())
            })
            .await
    }

    /// Move an order through its state machine.
    ///
    /// Illegal moves fail with `InvalidTransition` and leave the order
    /// unchanged; legal moves are audited as `ORDER_STATUS_CHANGED`.
    pub async fn update_order_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
        actor_id: &str,
    ) -> AppResult<Order> {
        let updated = self
            .ledger
            .mutate::<Order, _>(order_id, |o| {
                if !o.status.can_transition(new_status) {
                    return Err(AppError::invalid_transition(format!(
                        "order {}: {} -> {}",
                        o.id, o.status, new_status
                    )));
                }
                o.status = new_status;
                o.updated_at = now_millis();
                Ok(())
            })
            .await
            .map_err(|e| match e {
                AppError::NotFound { .. } => AppError::not_found(format!("Order {order_id}")),
                e => e,
            })?;

        self.audit
            .append(
                actor_id,
                AuditAction::OrderStatusChanged,
                format!("Order {} moved to {}", updated.tracking_id, new_status),
                None,
            )
            .await?;

        tracing::info!(order = order_id, status = %new_status, "order status changed");
        Ok(updated)
    }

    pub async fn get_order(&self, id: &str) -> AppResult<Order> {
        self.ledger
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {id}")))
    }

    /// All orders, newest first. Visibility filtering is the API layer's
    /// read-side concern, not storage's.
    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.ledger.list().await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{order_manager, seed_member, test_member};
    use shared::models::{CustomerInfo, OrderItem};

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Mariana López".to_string(),
            address: "Av. Libertador 2200".to_string(),
            city: "CABA".to_string(),
            phone: "+54 9 11 3322-1144".to_string(),
            email: "mariana@example.com".to_string(),
            zip_code: "1425".to_string(),
        }
    }

    fn item(product_id: &str, price: f64, quantity: i32) -> OrderItem {
        OrderItem {
            product_id: product_id.to_string(),
            product_name: format!("Product {product_id}"),
            quantity,
            price,
            image: None,
        }
    }

    fn draft(id: &str, reseller: Option<&str>, items: Vec<OrderItem>) -> OrderDraft {
        OrderDraft {
            id: Some(id.to_string()),
            customer: customer(),
            items,
            reseller_id: reseller.map(str::to_string),
            shipping_cost: 5000.0,
            shipping_provider: "Correo Argentino".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_order_persists_and_credits() {
        let (ledger, audit, manager) = order_manager();
        seed_member(&ledger, test_member("u2", 0.0, 0)).await;

        let order = manager
            .create_order(draft(
                "o1",
                Some("u2"),
                vec![item("p1", 100_000.0, 2), item("p2", 50_000.0, 1)],
            ))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.tracking_id.starts_with("TRK-"));
        assert_eq!(order.total, 255_000.0); // 200k + 50k + 5k shipping
        assert!(order.commissions_processed);
        assert_eq!(order.credited_items.len(), 2);

        // Default rate 5%: (200k + 50k) * 5% = 12.5k
        let member: TeamMember = ledger.get("u2").await.unwrap().unwrap();
        assert_eq!(member.wallet, 12_500.0);
        assert_eq!(member.sales_this_month, 250_000.0);
        // One point per $1000 of each line item
        assert_eq!(member.points, 250);

        // One SALE_REFERRAL entry per line item
        let entries = audit
            .list(Some(AuditAction::SaleReferral))
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_create_order_is_idempotent_per_id() {
        let (ledger, _audit, manager) = order_manager();
        seed_member(&ledger, test_member("u2", 0.0, 0)).await;

        let d = draft(
            "o1",
            Some("u2"),
            vec![item("p1", 100_000.0, 1), item("p2", 50_000.0, 1)],
        );
        manager.create_order(d.clone()).await.unwrap();
        manager.create_order(d).await.unwrap();

        // Credited exactly once despite the retry
        let member: TeamMember = ledger.get("u2").await.unwrap().unwrap();
        assert_eq!(member.sales_this_month, 150_000.0);
        assert_eq!(member.wallet, 7_500.0);
    }

    #[tokio::test]
    async fn test_unattributed_order_credits_nobody() {
        let (ledger, audit, manager) = order_manager();
        seed_member(&ledger, test_member("u2", 0.0, 0)).await;

        let order = manager
            .create_order(draft("o1", None, vec![item("p1", 10_000.0, 1)]))
            .await
            .unwrap();
        assert!(order.commissions_processed);

        let member: TeamMember = ledger.get("u2").await.unwrap().unwrap();
        assert_eq!(member.wallet, 0.0);
        assert!(
            audit
                .list(Some(AuditAction::SaleReferral))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_custom_commission_rate_override() {
        let (ledger, _audit, manager) = order_manager();
        let mut member = test_member("u2", 0.0, 0);
        member.custom_commission_rate = Some(10.0);
        seed_member(&ledger, member).await;

        manager
            .create_order(draft("o1", Some("u2"), vec![item("p1", 100_000.0, 1)]))
            .await
            .unwrap();

        let member: TeamMember = ledger.get("u2").await.unwrap().unwrap();
        assert_eq!(member.wallet, 10_000.0);
    }

    #[tokio::test]
    async fn test_unknown_reseller_fails_hard() {
        let (_ledger, _audit, manager) = order_manager();
        let err = manager
            .create_order(draft("o1", Some("ghost"), vec![item("p1", 1000.0, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownMember { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_products_credit_per_line() {
        let (ledger, audit, manager) = order_manager();
        seed_member(&ledger, test_member("u2", 0.0, 0)).await;

        manager
            .create_order(draft(
                "o1",
                Some("u2"),
                vec![item("p1", 10_000.0, 1), item("p1", 10_000.0, 1)],
            ))
            .await
            .unwrap();

        let entries = audit
            .list(Some(AuditAction::SaleReferral))
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);

        let member: TeamMember = ledger.get("u2").await.unwrap().unwrap();
        assert_eq!(member.wallet, 1_000.0);
    }

    #[tokio::test]
    async fn test_interrupted_fanout_resumes_without_recrediting() {
        let (ledger, _audit, manager) = order_manager();
        seed_member(&ledger, test_member("u2", 0.0, 0)).await;

        // An earlier attempt credited line 0 and then died: the marker is
        // present, the order is not yet processed.
        let now = now_millis();
        let order = Order {
            id: "o1".to_string(),
            tracking_id: tracking_id(),
            status: OrderStatus::Pending,
            total: 35_000.0,
            customer: customer(),
            items: vec![item("p1", 10_000.0, 1), item("p2", 20_000.0, 1)],
            reseller_id: Some("u2".to_string()),
            shipping_provider: "Correo Argentino".to_string(),
            commissions_processed: false,
            credited_items: vec!["0:p1".to_string()],
            created_at: now,
            updated_at: now,
        };
        ledger.put(&order).await.unwrap();

        let resumed = manager
            .create_order(draft(
                "o1",
                Some("u2"),
                vec![item("p1", 10_000.0, 1), item("p2", 20_000.0, 1)],
            ))
            .await
            .unwrap();
        assert!(resumed.commissions_processed);

        // Only line 1 was credited by the resume
        let member: TeamMember = ledger.get("u2").await.unwrap().unwrap();
        assert_eq!(member.wallet, 1_000.0); // 5% of 20k
        assert_eq!(member.sales_this_month, 20_000.0);
    }

    #[tokio::test]
    async fn test_validation_rejects_bad_drafts() {
        let (_ledger, _audit, manager) = order_manager();

        assert!(
            manager
                .create_order(draft("o1", None, vec![]))
                .await
                .is_err()
        );
        assert!(
            manager
                .create_order(draft("o2", None, vec![item("p1", -1.0, 1)]))
                .await
                .is_err()
        );
        assert!(
            manager
                .create_order(draft("o3", None, vec![item("p1", 10.0, 0)]))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_status_happy_path_with_audit() {
        let (_ledger, audit, manager) = order_manager();
        let order = manager
            .create_order(draft("o1", None, vec![item("p1", 1000.0, 1)]))
            .await
            .unwrap();

        for status in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            let updated = manager
                .update_order_status(&order.id, status, "admin")
                .await
                .unwrap();
            assert_eq!(updated.status, status);
        }

        let entries = audit
            .list(Some(AuditAction::OrderStatusChanged))
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn test_terminal_states_reject_transitions() {
        let (_ledger, _audit, manager) = order_manager();
        let order = manager
            .create_order(draft("o1", None, vec![item("p1", 1000.0, 1)]))
            .await
            .unwrap();

        for status in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            manager
                .update_order_status(&order.id, status, "admin")
                .await
                .unwrap();
        }

        // DELIVERED is terminal: every move out fails and state sticks
        let err = manager
            .update_order_status(&order.id, OrderStatus::Shipped, "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));

        let order = manager.get_order(&order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_cancel_from_processing() {
        let (_ledger, _audit, manager) = order_manager();
        let order = manager
            .create_order(draft("o1", None, vec![item("p1", 1000.0, 1)]))
            .await
            .unwrap();

        manager
            .update_order_status(&order.id, OrderStatus::Processing, "admin")
            .await
            .unwrap();
        let cancelled = manager
            .update_order_status(&order.id, OrderStatus::Cancelled, "admin")
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        // Cancelled is terminal too
        assert!(
            manager
                .update_order_status(&order.id, OrderStatus::Pending, "admin")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let (_ledger, _audit, manager) = order_manager();
        let err = manager
            .update_order_status("ghost", OrderStatus::Processing, "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
