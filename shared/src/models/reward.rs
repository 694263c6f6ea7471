//! Gamification reward and coupon models

use serde::{Deserialize, Serialize};

/// What kind of prize a reward is; drives the minted coupon's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardKind {
    Digital,
    Physical,
    Cash,
}

/// Redeemable reward in the points catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub title: String,
    /// Point cost to redeem
    pub cost: i64,
    pub kind: RewardKind,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Coupon lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouponStatus {
    #[default]
    Active,
    Used,
    Expired,
}

/// Coupon minted by a reward redemption
///
/// Mutated only by redemption-at-point-of-sale or the expiry sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    /// Unique generated code, `PREFIX-CATEGORY-NNNN`
    pub code: String,
    pub reward_title: String,
    /// Value descriptor, e.g. `"$1000"` or the reward title
    pub value: String,
    pub status: CouponStatus,
    /// Unix milliseconds
    pub expiry_date: i64,
    pub created_at: i64,
    /// Member the coupon belongs to
    pub member_id: String,
}
