//! Growth percentages and display rounding.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round to two decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a money amount to two decimal places, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Unrounded percentage change from `previous` to `current`.
///
/// When `previous` is zero the result is 100 if anything was recorded in
/// the current period and 0 otherwise.
pub fn growth_raw(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

/// Percentage change rounded to two decimal places.
pub fn growth(current: f64, previous: f64) -> f64 {
    round2(growth_raw(current, previous))
}

/// Percentage change between two money amounts.
///
/// Computed in decimal arithmetic so cents never drift before rounding.
pub fn growth_decimal(current: Decimal, previous: Decimal) -> f64 {
    if previous.is_zero() {
        return if current > Decimal::ZERO { 100.0 } else { 0.0 };
    }
    let change = (current - previous) / previous * Decimal::ONE_HUNDRED;
    round2(change.to_f64().unwrap_or(0.0))
}

/// Percentage change between two counts.
pub fn growth_count(current: u64, previous: u64) -> f64 {
    growth(current as f64, previous as f64)
}

/// Share of `part` in `total`, as a percentage rounded to two places.
pub fn percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    round2(part / total * 100.0)
}

/// Share of a money amount in a money total.
pub fn percentage_decimal(part: Decimal, total: Decimal) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    round2((part / total * Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0))
}
