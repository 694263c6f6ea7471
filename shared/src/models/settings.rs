//! Global platform settings
//!
//! Stored as a singleton document; every change is audited as
//! `SETTINGS_UPDATE`.

use serde::{Deserialize, Serialize};

/// Message templates used by the notification channel.
///
/// Placeholders: `{{name}}`, `{{platform}}`, `{{amount}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplates {
    pub welcome: String,
    pub sale: String,
    pub payout: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            welcome: "Hi {{name}}! Welcome to the {{platform}} team. Your account is active and the catalog is open for you.".to_string(),
            sale: "Congratulations {{name}}! Your sale of ${{amount}} is confirmed. Your commission is on its way.".to_string(),
            payout: "Hi {{name}}, your payout of ${{amount}} has been transferred to your account.".to_string(),
        }
    }
}

/// Platform-wide settings singleton
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Catalog markup percentage applied over reseller prices
    pub markup_percentage: f64,
    /// Commission percentage used when a member has no override
    pub default_commission_rate: f64,
    /// Extra percentage credited to the supervising leader
    pub leader_commission: f64,
    /// When set, payout processing is refused platform-wide
    pub withdrawals_paused: bool,
    pub maintenance_mode: bool,
    pub platform_name: String,
    pub support_phone: String,
    pub templates: MessageTemplates,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            markup_percentage: 0.0,
            default_commission_rate: 5.0,
            leader_commission: 5.0,
            withdrawals_paused: false,
            maintenance_mode: false,
            platform_name: "Electro Hogar Digital".to_string(),
            support_phone: "5491155550000".to_string(),
            templates: MessageTemplates::default(),
        }
    }
}

/// Settings update payload (None = leave unchanged)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub markup_percentage: Option<f64>,
    pub default_commission_rate: Option<f64>,
    pub leader_commission: Option<f64>,
    pub withdrawals_paused: Option<bool>,
    pub maintenance_mode: Option<bool>,
    pub platform_name: Option<String>,
    pub support_phone: Option<String>,
    pub templates: Option<MessageTemplates>,
}
