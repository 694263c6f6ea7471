//! Commission engine
//!
//! Pure computation: given a sale price and a commission percentage, returns
//! the commission amount and the points earned. No side effects, trivially
//! unit-testable; everything that touches storage lives elsewhere.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shared::{AppError, AppResult};

use crate::money::{to_decimal, to_f64};

/// Commission tunables, injected at construction time
#[derive(Debug, Clone)]
pub struct CommissionPolicy {
    /// Currency units per gamification point (one point per this many units)
    pub units_per_point: f64,
}

impl Default for CommissionPolicy {
    fn default() -> Self {
        Self {
            units_per_point: 1000.0,
        }
    }
}

/// Result of a commission computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionBreakdown {
    /// Commission amount, rounded to the currency minor unit (half-up)
    pub commission: f64,
    /// Points earned: floor(sale_price / units_per_point)
    pub points_earned: i64,
}

/// Compute commission and points for one attributed sale.
///
/// Constraints: `sale_price >= 0`, `0 <= rate <= 100`; violations fail with
/// `InvalidSaleInput` and nothing is recorded anywhere.
pub fn compute_commission(
    sale_price: f64,
    rate: f64,
    policy: &CommissionPolicy,
) -> AppResult<CommissionBreakdown> {
    if !sale_price.is_finite() || sale_price < 0.0 {
        return Err(AppError::invalid_sale_input(format!(
            "sale price must be a non-negative finite number, got {sale_price}"
        )));
    }
    if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
        return Err(AppError::invalid_sale_input(format!(
            "commission rate must be between 0 and 100, got {rate}"
        )));
    }
    if policy.units_per_point <= 0.0 {
        return Err(AppError::internal(
            "commission policy units_per_point must be positive",
        ));
    }

    let price = to_decimal(sale_price);
    let commission = to_f64(price * to_decimal(rate) / Decimal::ONE_HUNDRED);
    let points_earned = (price / to_decimal(policy.units_per_point))
        .floor()
        .to_i64()
        .unwrap_or(0);

    Ok(CommissionBreakdown {
        commission,
        points_earned,
    })
}
