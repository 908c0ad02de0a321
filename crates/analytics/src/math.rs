//! Overflow-checked arithmetic for the metric calculations.
//!
//! `Decimal` operators panic once a result leaves the 96-bit range, which valid input
//! can reach (capital passing close to zero, very large positions). Every metric is
//! computed through these helpers so such input fails with `AnalyticsError::Calculation`.

use crate::error::AnalyticsError;
use rust_decimal::Decimal;

pub(crate) fn out_of_range(what: &str) -> AnalyticsError {
    AnalyticsError::Calculation(format!("{} is out of the decimal range", what))
}

/// `(value - base) / base * 100`. `None` on overflow or a zero base.
pub(crate) fn pct_change(base: Decimal, value: Decimal) -> Option<Decimal> {
    value
        .checked_sub(base)?
        .checked_div(base)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

pub(crate) fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}
