//! Reward redemption engine
//!
//! Debits points and mints a coupon. The points precondition runs inside the
//! atomic member mutate; the coupon and audit entry are written only after
//! the debit succeeds.

use rand::Rng;
use shared::models::{AuditAction, Coupon, CouponStatus, Reward, RewardKind, TeamMember};
use shared::util::{new_id, now_millis};
use shared::{AppError, AppResult};

use crate::audit::AuditTrail;
use crate::store::Ledger;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Redemption tunables, injected at construction time.
///
/// The coupon value mapping is a business rule, not a technical necessity,
/// hence configuration rather than constants in the engine.
#[derive(Debug, Clone)]
pub struct RedemptionPolicy {
    /// First segment of generated coupon codes
    pub coupon_prefix: String,
    /// Coupon lifetime from mint to expiry
    pub expiry_days: i64,
    /// A CASH reward mints a monetary value of `cost / cash_divisor`
    pub cash_divisor: i64,
}

impl Default for RedemptionPolicy {
    fn default() -> Self {
        Self {
            coupon_prefix: "OMEGA".to_string(),
            expiry_days: 30,
            cash_divisor: 2,
        }
    }
}

/// Outcome of a redemption
#[derive(Debug, Clone)]
pub struct Redemption {
    pub coupon: Coupon,
    pub remaining_points: i64,
}

#[derive(Clone)]
pub struct RedemptionEngine {
    ledger: Ledger,
    audit: AuditTrail,
    policy: RedemptionPolicy,
}

impl RedemptionEngine {
    pub fn new(ledger: Ledger, audit: AuditTrail, policy: RedemptionPolicy) -> Self {
        Self {
            ledger,
            audit,
            policy,
        }
    }

    /// Redeem a reward for a member, minting an `ACTIVE` coupon
    pub async fn redeem(&self, member_id: &str, reward: &Reward) -> AppResult<Redemption> {
        if reward.cost <= 0 {
            return Err(AppError::validation(format!(
                "reward cost must be positive, got {}",
                reward.cost
            )));
        }

        let updated = self
            .ledger
            .mutate::<TeamMember, _>(member_id, |m| {
                if m.points < reward.cost {
                    return Err(AppError::InsufficientPoints {
                        requested: reward.cost,
                        available: m.points,
                    });
                }
                m.points -= reward.cost;
                m.updated_at = now_millis();
                Ok(())
            })
            .await
            .map_err(|e| match e {
                AppError::NotFound { .. } => AppError::unknown_member(member_id),
                e => e,
            })?;

        let coupon = self.mint_coupon(member_id, reward);
        self.ledger.put(&coupon).await?;

        self.audit
            .append(
                member_id,
                AuditAction::RewardRedeemed,
                format!("Redeemed reward: {} (-{} pts)", reward.title, reward.cost),
                None,
            )
            .await?;

        tracing::info!(
            member = member_id,
            reward = %reward.id,
            cost = reward.cost,
            coupon = %coupon.code,
            "reward redeemed"
        );

        Ok(Redemption {
            coupon,
            remaining_points: updated.points,
        })
    }

    fn mint_coupon(&self, member_id: &str, reward: &Reward) -> Coupon {
        let category = match reward.kind {
            RewardKind::Cash => "CASH",
            _ => "PROMO",
        };
        let code = format!(
            "{}-{}-{}",
            self.policy.coupon_prefix,
            category,
            rand::thread_rng().gen_range(1000..10000)
        );
        let value = match reward.kind {
            RewardKind::Cash => format!("${}", reward.cost / self.policy.cash_divisor),
            _ => reward.title.clone(),
        };
        let now = now_millis();
        Coupon {
            id: new_id(),
            code,
            reward_title: reward.title.clone(),
            value,
            status: CouponStatus::Active,
            expiry_date: now + self.policy.expiry_days * MILLIS_PER_DAY,
            created_at: now,
            member_id: member_id.to_string(),
        }
    }

    /// Expiry sweep: mark `ACTIVE` coupons past their expiry as `EXPIRED`.
    /// Returns how many were expired.
    pub async fn expire_coupons(&self) -> AppResult<usize> {
        let now = now_millis();
        let coupons: Vec<Coupon> = self.ledger.list().await?;
        let mut expired = 0;
        for coupon in coupons {
            if coupon.status != CouponStatus::Active || coupon.expiry_date > now {
                continue;
            }
            let updated = self
                .ledger
                .mutate::<Coupon, _>(&coupon.id, |c| {
                    if c.status == CouponStatus::Active && c.expiry_date <= now {
                        c.status = CouponStatus::Expired;
                    }
                    Ok(())
                })
                .await?;
            if updated.status == CouponStatus::Expired {
                expired += 1;
            }
        }
        if expired > 0 {
            tracing::info!(expired, "coupon expiry sweep finished");
        }
        Ok(expired)
    }
}

/// Built-in reward catalog (the storefront UI owns presentation; the engine
/// only enforces point arithmetic)
pub fn default_catalog() -> Vec<Reward> {
    vec![
        Reward {
            id: "rw1".to_string(),
            title: "Gift card $10.000".to_string(),
            cost: 2000,
            kind: RewardKind::Digital,
            image: None,
            description: Some("Digital gift card for the catalog".to_string()),
        },
        Reward {
            id: "rw2".to_string(),
            title: "Cash credit".to_string(),
            cost: 5000,
            kind: RewardKind::Cash,
            image: None,
            description: Some("Credited against your next payout".to_string()),
        },
        Reward {
            id: "rw3".to_string(),
            title: "Bluetooth speaker".to_string(),
            cost: 7500,
            kind: RewardKind::Physical,
            image: None,
            description: None,
        },
        Reward {
            id: "rw4".to_string(),
            title: "Free shipping month".to_string(),
            cost: 1200,
            kind: RewardKind::Digital,
            image: None,
            description: None,
        },
    ]
}
