use shared::models::Environment;

use crate::commission::CommissionPolicy;
use crate::rewards::RedemptionPolicy;

/// Which ledger store backend to bind at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// In-process cache (offline/demo use)
    #[default]
    Memory,
    /// Embedded SurrealDB under `WORK_DIR`
    Surreal,
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Notes |
/// |----------|---------|-------|
/// | WORK_DIR | /var/lib/omega | Data directory (durable store, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | STORE_BACKEND | memory | `memory` or `surreal` |
/// | ENVIRONMENT | simulation | `simulation` or `production` (audit tag) |
/// | UNITS_PER_POINT | 1000 | Currency units per gamification point |
/// | COUPON_PREFIX | OMEGA | First segment of coupon codes |
/// | COUPON_EXPIRY_DAYS | 30 | Coupon lifetime |
/// | CASH_VALUE_DIVISOR | 2 | CASH coupon value = cost / divisor |
/// | SHIPPING_API_URL | (unset) | Carrier rate endpoint; flat rate if unset |
/// | MARKUP_API_URL | (unset) | Markup advisor endpoint; simulated if unset |
/// | CLOUDINARY_CLOUD_NAME | (unset) | Image host credentials |
/// | CLOUDINARY_UPLOAD_PRESET | (unset) | |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/omega STORE_BACKEND=surreal cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub store_backend: StoreBackend,
    /// Stamped on every audit entry
    pub environment: Environment,
    pub units_per_point: f64,
    pub coupon_prefix: String,
    pub coupon_expiry_days: i64,
    pub cash_value_divisor: i64,
    pub shipping_api_url: Option<String>,
    pub markup_api_url: Option<String>,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_upload_preset: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/omega".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            store_backend: match std::env::var("STORE_BACKEND").as_deref() {
                Ok("surreal") => StoreBackend::Surreal,
                _ => StoreBackend::Memory,
            },
            environment: match std::env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Simulation,
            },
            units_per_point: std::env::var("UNITS_PER_POINT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &f64| *v > 0.0)
                .unwrap_or(1000.0),
            coupon_prefix: std::env::var("COUPON_PREFIX").unwrap_or_else(|_| "OMEGA".into()),
            coupon_expiry_days: std::env::var("COUPON_EXPIRY_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &i64| *v > 0)
                .unwrap_or(30),
            cash_value_divisor: std::env::var("CASH_VALUE_DIVISOR")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &i64| *v > 0)
                .unwrap_or(2),
            shipping_api_url: std::env::var("SHIPPING_API_URL").ok(),
            markup_api_url: std::env::var("MARKUP_API_URL").ok(),
            cloudinary_cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME").ok(),
            cloudinary_upload_preset: std::env::var("CLOUDINARY_UPLOAD_PRESET").ok(),
        }
    }

    pub fn commission_policy(&self) -> CommissionPolicy {
        CommissionPolicy {
            units_per_point: self.units_per_point,
        }
    }

    pub fn redemption_policy(&self) -> RedemptionPolicy {
        RedemptionPolicy {
            coupon_prefix: self.coupon_prefix.clone(),
            expiry_days: self.coupon_expiry_days,
            cash_divisor: self.cash_value_divisor,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: "/var/lib/omega".into(),
            http_port: 3000,
            store_backend: StoreBackend::Memory,
            environment: Environment::Simulation,
            units_per_point: 1000.0,
            coupon_prefix: "OMEGA".into(),
            coupon_expiry_days: 30,
            cash_value_divisor: 2,
            shipping_api_url: None,
            markup_api_url: None,
            cloudinary_cloud_name: None,
            cloudinary_upload_preset: None,
        }
    }
}
