//! End-to-end ledger flow over the in-memory backend
//!
//! Drives a reseller through the whole lifecycle: registration, activation,
//! an attributed order with commission fan-out, a full payout, and a points
//! redemption — then checks the audit trail accounts for every step.

use std::sync::Arc;

use omega_server::{Config, MemoryStore, ServerState};
use shared::models::{
    AuditAction, CustomerInfo, MemberRegister, MemberStatus, OrderDraft, OrderItem, OrderStatus,
    Reward, RewardKind,
};

async fn boot() -> ServerState {
    ServerState::with_store(Config::default(), Arc::new(MemoryStore::new()))
        .await
        .unwrap()
}

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

#[tokio::test]
async fn full_reseller_lifecycle() {
    let state = boot().await;

    // Registration starts PENDING; proof upload keeps it PENDING
    let member = state
        .team
        .register(
            MemberRegister {
                name: "Caro".to_string(),
                email: Some("caro@example.com".to_string()),
                phone: None,
                role: None,
                leader_id: None,
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(member.status, MemberStatus::Pending);

    state
        .team
        .submit_activation_proof(&member.id, "https://proofs/caro.png")
        .await
        .unwrap();
    let member = state.team.approve(&member.id, true, "admin").await.unwrap();
    assert_eq!(member.status, MemberStatus::Active);

    // Attributed checkout; the retry with the same id must be a no-op
    let draft = OrderDraft {
        id: Some("o1".to_string()),
        customer: customer(),
        items: vec![OrderItem {
            product_id: "p1".to_string(),
            product_name: "Smart TV 55\"".to_string(),
            quantity: 1,
            price: 850_000.0,
            image: None,
        }],
        reseller_id: Some(member.id.clone()),
        shipping_cost: 5_000.0,
        shipping_provider: "Correo Argentino".to_string(),
    };
    let order = state.orders.create_order(draft.clone()).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, 855_000.0);
    assert!(order.commissions_processed);

    state.orders.create_order(draft).await.unwrap();

    // 5% of 850k, shipping excluded from the commissionable amount
    let m = state.team.get_member(&member.id).await.unwrap();
    assert_eq!(m.wallet, 42_500.0);
    assert_eq!(m.points, 850);
    assert_eq!(m.sales_this_month, 850_000.0);

    // Fulfilment lifecycle
    for status in [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        state
            .orders
            .update_order_status(&order.id, status, "admin")
            .await
            .unwrap();
    }

    // Settle the whole wallet
    let m = state
        .payouts
        .process_payout("admin", &member.id, 42_500.0, "https://proofs/pay.png")
        .await
        .unwrap();
    assert_eq!(m.wallet, 0.0);

    // Burn all earned points on a reward
    let reward = Reward {
        id: "rw".to_string(),
        title: "Gift card".to_string(),
        cost: 850,
        kind: RewardKind::Digital,
        image: None,
        description: None,
    };
    let redemption = state.rewards.redeem(&member.id, &reward).await.unwrap();
    assert_eq!(redemption.remaining_points, 0);

    // Audit trail accounts for every step (plus the seeded admin account)
    let entries = state.audit.list(None).await.unwrap();
    let count = |action: AuditAction| entries.iter().filter(|e| e.action == action).count();
    assert_eq!(count(AuditAction::MemberAdded), 2);
    assert_eq!(count(AuditAction::MemberApproved), 1);
    assert_eq!(count(AuditAction::SaleReferral), 1);
    assert_eq!(count(AuditAction::OrderStatusChanged), 3);
    assert_eq!(count(AuditAction::PayoutProcessed), 1);
    assert_eq!(count(AuditAction::RewardRedeemed), 1);
}

#[tokio::test]
async fn rejected_member_cannot_be_revived() {
    let state = boot().await;

    let member = state
        .team
        .register(
            MemberRegister {
                name: "Marta".to_string(),
                email: None,
                phone: None,
                role: None,
                leader_id: None,
            },
            Some("admin"),
        )
        .await
        .unwrap();

    state.team.approve(&member.id, false, "admin").await.unwrap();

    // Tombstoned: no second decision, no proof upload
    assert!(state.team.approve(&member.id, true, "admin").await.is_err());
    assert!(
        state
            .team
            .submit_activation_proof(&member.id, "https://late.png")
            .await
            .is_err()
    );

    let stored = state.team.get_member(&member.id).await.unwrap();
    assert_eq!(stored.status, MemberStatus::Rejected);
}
