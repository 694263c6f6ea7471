//! Order model

use serde::{Deserialize, Serialize};

/// Order status state machine
///
/// ```text
/// PENDING → PROCESSING → SHIPPED → DELIVERED
///     └────────┴────────────┴──→ CANCELLED
/// ```
///
/// `DELIVERED` and `CANCELLED` are terminal; an order in a terminal state is
/// immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `self → to` is a legal move in the state machine
    pub fn can_transition(&self, to: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self, to) {
            (_, OrderStatus::Cancelled) => true,
            (OrderStatus::Pending, OrderStatus::Processing) => true,
            (OrderStatus::Processing, OrderStatus::Shipped) => true,
            (OrderStatus::Shipped, OrderStatus::Delivered) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// Shipping customer snapshot, frozen at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub email: String,
    pub zip_code: String,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price in currency units
    pub price: f64,
    pub image: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Customer-facing tracking reference
    pub tracking_id: String,
    pub status: OrderStatus,
    /// Final amount in currency units (line totals + shipping)
    pub total: f64,
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    /// Referral attribution; at most one reseller per order
    pub reseller_id: Option<String>,
    pub shipping_provider: String,
    /// Idempotency guard: true once commission fan-out finished for this order
    pub commissions_processed: bool,
    /// Per-item fan-out markers (product ids already credited)
    #[serde(default)]
    pub credited_items: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Checkout payload accepted by the order manager
///
/// `id` doubles as the idempotency key: a client retrying checkout sends the
/// same draft id and never double-credits commissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub id: Option<String>,
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub reseller_id: Option<String>,
    /// Quoted shipping cost, an opaque price input computed before checkout
    pub shipping_cost: f64,
    pub shipping_provider: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition(OrderStatus::Delivered));
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Cancelled));
        assert!(OrderStatus::Processing.can_transition(OrderStatus::Cancelled));
        assert!(OrderStatus::Shipped.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states_frozen() {
        for to in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Delivered.can_transition(to));
            assert!(!OrderStatus::Cancelled.can_transition(to));
        }
    }

    #[test]
    fn test_no_skipping_stages() {
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Shipped));
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Delivered));
        assert!(!OrderStatus::Shipped.can_transition(OrderStatus::Processing));
    }
}
