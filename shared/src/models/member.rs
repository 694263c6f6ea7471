//! Team member model

use serde::{Deserialize, Serialize};

/// Role in the reseller hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Leader,
    Reseller,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Member lifecycle status
///
/// `PENDING → ACTIVE` and `PENDING → REJECTED` are the only approval
/// transitions; neither terminal state ever returns to `PENDING`.
/// `INACTIVE` marks dormant accounts and is not part of the approval flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    #[default]
    Pending,
    Active,
    Inactive,
    Rejected,
}

/// Team participant with a wallet and point balance
///
/// Never hard-deleted; a rejected member is tombstoned via status.
/// `leader_id` is a back-reference to the supervising leader, never an
/// ownership edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub status: MemberStatus,
    /// Accumulated unpaid commission, in currency units. Never negative.
    pub wallet: f64,
    /// Gamification currency. Never negative.
    pub points: i64,
    /// Cumulative attributed sale volume for the current month
    pub sales_this_month: f64,
    pub level: i32,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Bank account for payouts
    pub cbu: Option<String>,
    pub alias: Option<String>,
    pub leader_id: Option<String>,
    /// Override of the global commission percentage
    pub custom_commission_rate: Option<f64>,
    /// Screenshot the member uploaded to prove account activation
    pub activation_proof_url: Option<String>,
    pub join_date: i64,
    pub updated_at: i64,
}

/// Registration payload; members always start `PENDING`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRegister {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    pub leader_id: Option<String>,
}

/// Profile update payload (None = leave unchanged)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cbu: Option<String>,
    pub alias: Option<String>,
    pub leader_id: Option<String>,
    pub custom_commission_rate: Option<f64>,
}
