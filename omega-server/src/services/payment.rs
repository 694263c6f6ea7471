//! Payment gateway collaborator
//!
//! Consumed by the checkout flow *before* an order is persisted; only
//! approved charges ever reach the order manager.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::util::new_id;
use shared::{AppError, AppResult};

/// Opaque charge request forwarded to the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub amount: f64,
    /// Gateway-specific method label (e.g. "card", "transfer")
    pub method: String,
    /// Gateway-specific payload, passed through untouched
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Outcome of a charge attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChargeOutcome {
    Approved { payment_id: String },
    Rejected { reason: String },
    Pending,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: &ChargeRequest) -> AppResult<ChargeOutcome>;
}

/// Offline/demo gateway: approves any positive amount instantly
pub struct SimulatedGateway;

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, request: &ChargeRequest) -> AppResult<ChargeOutcome> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(AppError::validation(format!(
                "charge amount must be positive, got {}",
                request.amount
            )));
        }
        Ok(ChargeOutcome::Approved {
            payment_id: format!("sim-{}", new_id()),
        })
    }
}
