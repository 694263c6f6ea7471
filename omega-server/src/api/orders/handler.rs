//! Order API handlers
//!
//! Checkout quotes shipping and takes payment before anything is persisted;
//! only approved charges reach the order manager. Read-side visibility:
//! ADMIN sees all orders, everyone else only orders attributed to them.

use axum::extract::{Extension, Path, State};
use axum::Json;

use shared::models::{CustomerInfo, Order, OrderDraft, OrderItem, OrderStatus};
use shared::{AppError, AppResult};

use crate::api::auth::{CurrentUser, require_admin};
use crate::core::ServerState;
use crate::money;
use crate::services::{ChargeOutcome, ChargeRequest};

#[derive(serde::Deserialize)]
pub struct CheckoutRequest {
    /// Client-generated idempotency key; retries reuse it
    pub id: Option<String>,
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub reseller_id: Option<String>,
    pub payment_method: String,
    #[serde(default)]
    pub payment_details: serde_json::Value,
}

/// POST /api/orders - checkout
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<Order>> {
    // Retry of an already-charged checkout: never re-charge, just let the
    // manager replay/resume under the stored order's data. Only a definite
    // NotFound may fall through to a fresh charge.
    let existing = match &payload.id {
        Some(id) => match state.orders.get_order(id).await {
            Ok(order) => Some(order),
            Err(AppError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        },
        None => None,
    };
    if let Some(existing) = existing {
        let order = state
            .orders
            .create_order(OrderDraft {
                id: payload.id.clone(),
                customer: payload.customer,
                items: payload.items,
                reseller_id: existing.reseller_id.clone(),
                shipping_cost: 0.0,
                shipping_provider: existing.shipping_provider.clone(),
            })
            .await?;
        return Ok(Json(order));
    }

    let cart_total = payload.items.iter().fold(0.0, |acc, item| {
        money::add(acc, money::line_total(item.price, item.quantity))
    });
    let quote = state
        .shipping
        .quote(&payload.customer.zip_code, cart_total)
        .await?;

    // Attribution defaults to the selling member
    let reseller_id = payload
        .reseller_id
        .or_else(|| (!user.role.is_admin()).then(|| user.id.clone()));

    let draft = OrderDraft {
        id: payload.id,
        customer: payload.customer,
        items: payload.items,
        reseller_id,
        shipping_cost: quote.cost,
        shipping_provider: quote.provider,
    };
    // Reject malformed drafts before any money moves
    crate::orders::manager::OrderManager::validate_draft(&draft)?;

    let total = money::add(cart_total, quote.cost);
    match state
        .gateway
        .charge(&ChargeRequest {
            amount: total,
            method: payload.payment_method,
            details: payload.payment_details,
        })
        .await?
    {
        ChargeOutcome::Approved { payment_id } => {
            tracing::info!(%payment_id, total, "charge approved");
        }
        ChargeOutcome::Rejected { reason } => {
            return Err(AppError::business_rule(format!(
                "payment rejected: {reason}"
            )));
        }
        ChargeOutcome::Pending => {
            return Err(AppError::business_rule("payment is pending confirmation"));
        }
    }

    let order = state.orders.create_order(draft).await?;
    Ok(Json(order))
}

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_orders().await?;
    Ok(Json(filter_visible(orders, &user)))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.get_order(&id).await?;
    if !user.role.is_admin() && order.reseller_id.as_deref() != Some(user.id.as_str()) {
        return Err(AppError::forbidden("not allowed for this order"));
    }
    Ok(Json(order))
}

#[derive(serde::Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// PUT /api/orders/{id}/status - admin moves an order through its lifecycle
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<Order>> {
    require_admin(&user)?;
    let order = state
        .orders
        .update_order_status(&id, payload.status, &user.id)
        .await?;
    Ok(Json(order))
}

fn filter_visible(orders: Vec<Order>, user: &CurrentUser) -> Vec<Order> {
    if user.role.is_admin() {
        return orders;
    }
    orders
        .into_iter()
        .filter(|o| o.reseller_id.as_deref() == Some(user.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;
    use shared::util::now_millis;

    fn order(id: &str, reseller: Option<&str>) -> Order {
        let now = now_millis();
        Order {
            id: id.to_string(),
            tracking_id: format!("TRK-{id}"),
            status: OrderStatus::Pending,
            total: 1000.0,
            customer: CustomerInfo {
                name: "C".to_string(),
                address: "A".to_string(),
                city: "CABA".to_string(),
                phone: "1".to_string(),
                email: "c@example.com".to_string(),
                zip_code: "1000".to_string(),
            },
            items: vec![],
            reseller_id: reseller.map(str::to_string),
            shipping_provider: "Correo".to_string(),
            commissions_processed: true,
            credited_items: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn user(id: &str, role: Role) -> CurrentUser {
        CurrentUser {
            id: id.to_string(),
            name: id.to_string(),
            role,
        }
    }

    #[test]
    fn test_admin_sees_all_orders() {
        let orders = vec![order("o1", Some("u2")), order("o2", None)];
        let visible = filter_visible(orders, &user("admin", Role::Admin));
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn test_reseller_sees_only_attributed_orders() {
        let orders = vec![
            order("o1", Some("u2")),
            order("o2", Some("u3")),
            order("o3", None),
        ];
        let visible = filter_visible(orders, &user("u2", Role::Reseller));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "o1");
    }

    #[test]
    fn test_leader_filtering_matches_own_attribution() {
        let orders = vec![order("o1", Some("u2")), order("o2", Some("lead1"))];
        let visible = filter_visible(orders, &user("lead1", Role::Leader));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "o2");
    }
}
