//! Shipping-rate quoter collaborator
//!
//! The Core treats the quoted cost as an opaque price input folded into the
//! order total before checkout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult};

/// Quote returned by a carrier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingQuote {
    pub cost: f64,
    /// Human ETA, e.g. "3-5 business days"
    pub eta: String,
    pub provider: String,
}

#[async_trait]
pub trait ShippingQuoter: Send + Sync {
    async fn quote(&self, zip_code: &str, cart_total: f64) -> AppResult<ShippingQuote>;
}

/// Fixed-price fallback used when no carrier API is configured
pub struct FlatRateQuoter {
    pub cost: f64,
    pub provider: String,
}

impl Default for FlatRateQuoter {
    fn default() -> Self {
        Self {
            cost: 8500.0,
            provider: "Correo Argentino".to_string(),
        }
    }
}

#[async_trait]
impl ShippingQuoter for FlatRateQuoter {
    async fn quote(&self, _zip_code: &str, _cart_total: f64) -> AppResult<ShippingQuote> {
        Ok(ShippingQuote {
            cost: self.cost,
            eta: "3-5 business days".to_string(),
            provider: self.provider.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RateResponse {
    cost: f64,
    eta: String,
    provider: String,
}

/// Thin HTTP client against the corporate carrier rate endpoint
pub struct CorreoQuoter {
    client: reqwest::Client,
    base_url: String,
}

impl CorreoQuoter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ShippingQuoter for CorreoQuoter {
    async fn quote(&self, zip_code: &str, cart_total: f64) -> AppResult<ShippingQuote> {
        let response = self
            .client
            .post(format!("{}/rates", self.base_url))
            .json(&serde_json::json!({
                "zip_code": zip_code,
                "cart_total": cart_total,
            }))
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("shipping quote failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::upstream(format!("shipping quote failed: {e}")))?;

        let rate: RateResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("malformed shipping quote: {e}")))?;

        Ok(ShippingQuote {
            cost: rate.cost,
            eta: rate.eta,
            provider: rate.provider,
        })
    }
}
