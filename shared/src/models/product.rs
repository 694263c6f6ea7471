//! Product catalog model

use serde::{Deserialize, Serialize};

/// Catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: String,
    /// Public list price in currency units
    pub price_list: f64,
    /// Price the reseller buys at
    pub price_reseller: f64,
    pub stock: i32,
    pub category: String,
    pub image: Option<String>,
    #[serde(default)]
    pub is_promo: bool,
}
