//! Markup advisor collaborator
//!
//! Looks up current inflation and suggests a corrective catalog markup. A
//! pure request/response integration with no internal state machine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult};

/// Suggestion returned by the advisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupSuggestion {
    /// Latest detected monthly inflation percentage
    pub inflation_rate: f64,
    /// Suggested new total markup percentage
    pub recommended_markup: f64,
    /// One-line justification citing the source
    pub reasoning: String,
}

#[async_trait]
pub trait MarkupAdvisor: Send + Sync {
    async fn suggest(&self, current_markup: f64) -> AppResult<MarkupSuggestion>;
}

/// Canned suggestion used when no advisor endpoint is configured
pub struct SimulatedAdvisor;

#[async_trait]
impl MarkupAdvisor for SimulatedAdvisor {
    async fn suggest(&self, current_markup: f64) -> AppResult<MarkupSuggestion> {
        Ok(MarkupSuggestion {
            inflation_rate: 4.2,
            recommended_markup: current_markup + 2.0,
            reasoning: "[SIMULATION] Based on estimated CPI. Last month's inflation suggests a corrective adjustment to protect operating margins.".to_string(),
        })
    }
}

/// Thin HTTP client against a hosted advisor endpoint
pub struct HttpMarkupAdvisor {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMarkupAdvisor {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl MarkupAdvisor for HttpMarkupAdvisor {
    async fn suggest(&self, current_markup: f64) -> AppResult<MarkupSuggestion> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "current_markup": current_markup }))
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("markup advisor failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::upstream(format!("markup advisor failed: {e}")))?;

        response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("malformed advisor response: {e}")))
    }
}
