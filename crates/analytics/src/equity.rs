use crate::error::AnalyticsError;
use crate::filter::{market_day, TradeIndex};
use crate::math::{out_of_range, pct_change};
use core_types::{CurvePoint, MarketDataPoint};
use rust_decimal::Decimal;

/// The result of walking the market series with a running capital balance.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityCurve {
    /// Percent return against initial capital, one point per market day.
    pub points: Vec<CurvePoint>,
    /// Absolute capital at the close of each market day, parallel to `points`.
    pub capital: Vec<Decimal>,
    pub final_capital: Decimal,
}

/// Walks `market` once, booking the P&L of every trade that closed that day.
///
/// Capital only moves on a day that exactly matches a trade's exit day. A trade
/// whose exit day falls inside the span but on a day missing from the series
/// (a weekend, a data gap) never touches capital.
pub fn build_equity_curve(
    market: &[MarketDataPoint],
    index: &TradeIndex<'_>,
    initial_capital: Decimal,
) -> Result<EquityCurve, AnalyticsError> {
    if initial_capital <= Decimal::ZERO {
        return Err(AnalyticsError::InvalidCapital(initial_capital));
    }

    let mut capital = initial_capital;
    let mut points = Vec::with_capacity(market.len());
    let mut capital_by_day = Vec::with_capacity(market.len());

    for point in market {
        let day = market_day(point)?;
        for trade in index.exiting_on(day) {
            capital = trade
                .pnl()
                .and_then(|pnl| capital.checked_add(pnl))
                .ok_or_else(|| out_of_range(&format!("capital on {}", day)))?;
        }

        points.push(CurvePoint {
            time: point.time.clone(),
            value: return_pct(capital, initial_capital)?,
        });
        capital_by_day.push(capital);
    }

    Ok(EquityCurve {
        points,
        capital: capital_by_day,
        final_capital: capital,
    })
}

/// Percent change of `capital` over `initial_capital`, which must be non-zero.
pub(crate) fn return_pct(capital: Decimal, initial_capital: Decimal) -> Result<Decimal, AnalyticsError> {
    pct_change(initial_capital, capital).ok_or_else(|| out_of_range("return on capital"))
}
