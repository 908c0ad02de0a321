use crate::error::AnalyticsError;
use crate::math::{out_of_range, pct_change};
use rust_decimal::Decimal;

/// Worst retracement of capital from its running peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Drawdown {
    /// Most negative `(capital - peak) / peak * 100`. Always `<= 0`.
    pub max_drawdown_pct: Decimal,
    /// Largest `peak - capital` in currency units. Always `>= 0`.
    pub max_drawdown_abs: Decimal,
}

/// Single pass over the capital sequence with a running peak seeded from the first value.
pub fn track_drawdown(capital: &[Decimal]) -> Result<Drawdown, AnalyticsError> {
    let mut result = Drawdown::default();
    let mut peak = capital.first().copied().unwrap_or(Decimal::ZERO);

    for &equity in capital {
        peak = peak.max(equity);

        if !peak.is_zero() {
            let drawdown = pct_change(peak, equity).ok_or_else(|| out_of_range("drawdown"))?;
            result.max_drawdown_pct = result.max_drawdown_pct.min(drawdown);
        }
        let retracement = peak
            .checked_sub(equity)
            .ok_or_else(|| out_of_range("drawdown"))?;
        result.max_drawdown_abs = result.max_drawdown_abs.max(retracement);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn finds_deepest_trough_after_highest_peak() {
        // 100 -> 110 -> 105 -> 108 -> 95 -> 100
        let capital = [dec!(100), dec!(110), dec!(105), dec!(108), dec!(95), dec!(100)];
        let dd = track_drawdown(&capital).unwrap();

        assert_eq!(dd.max_drawdown_abs, dec!(15));
        assert_eq!(dd.max_drawdown_pct, (dec!(95) - dec!(110)) / dec!(110) * dec!(100));
    }

    #[test]
    fn rising_capital_has_no_drawdown() {
        let dd = track_drawdown(&[dec!(100), dec!(101), dec!(102)]).unwrap();
        assert_eq!(dd, Drawdown::default());
    }

    #[test]
    fn empty_sequence_is_zero() {
        assert_eq!(track_drawdown(&[]).unwrap(), Drawdown::default());
    }

    #[test]
    fn zero_peak_skips_percentage_but_not_absolute() {
        let dd = track_drawdown(&[dec!(0), dec!(-5)]).unwrap();
        assert_eq!(dd.max_drawdown_pct, Decimal::ZERO);
        assert_eq!(dd.max_drawdown_abs, dec!(5));
    }

    #[test]
    fn collapse_from_a_tiny_peak_is_an_error() {
        // (-1e10 - 1e-20) / 1e-20 * 100 does not fit.
        let capital = [dec!(0.00000000000000000001), dec!(-10000000000)];
        assert!(matches!(track_drawdown(&capital), Err(AnalyticsError::Calculation(_))));
    }
}
