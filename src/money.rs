//! Monetary rounding helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places carried by every monetary output
pub const MONEY_DP: u32 = 2;

/// Round an amount to cents, half away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp to zero from below
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}
