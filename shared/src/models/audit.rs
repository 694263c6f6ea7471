//! Audit log model
//!
//! Entries are immutable and append-only: every mutation that moves money or
//! points writes exactly one entry, and nothing ever updates or deletes one.

use serde::{Deserialize, Serialize};

/// Audited operation kind (enum, not free text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Commission credited for an attributed sale
    SaleReferral,
    /// Wallet debit paid out to a member
    PayoutProcessed,
    /// Member registered into the team
    MemberAdded,
    /// Pending member approved into active selling
    MemberApproved,
    /// Pending member denied
    MemberRejected,
    /// Order moved through its state machine
    OrderStatusChanged,
    /// Global settings changed
    SettingsUpdate,
    /// Points redeemed for a coupon
    RewardRedeemed,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Deployment environment tag stamped on every entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Environment {
    #[default]
    Simulation,
    Production,
}

/// Immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    /// Member who performed the operation
    pub actor_id: String,
    pub action: AuditAction,
    /// Human-readable detail line
    pub details: String,
    /// Unix milliseconds
    pub timestamp: i64,
    pub environment: Environment,
    /// Link to the supporting receipt/screenshot, when one exists
    pub proof_url: Option<String>,
}
