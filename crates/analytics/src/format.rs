//! Two-decimal display strings for report metrics.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds half away from zero to two decimals, so `1.005` shows as `1.01`.
/// Anything that rounds to zero shows as `0.00`, never `-0.00`.
#[must_use]
pub fn format_fixed(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}
