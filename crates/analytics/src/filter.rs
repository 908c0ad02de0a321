use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::{MarketDataPoint, Trade};
use std::collections::HashMap;

/// The inclusive calendar span covered by a market series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Span from the first to the last point of the series. `None` for an empty series.
    pub fn of_market(market: &[MarketDataPoint]) -> Result<Option<Self>, AnalyticsError> {
        let (Some(first), Some(last)) = (market.first(), market.last()) else {
            return Ok(None);
        };
        Ok(Some(Self {
            start: market_day(first)?,
            end: market_day(last)?,
        }))
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// The trades that closed inside the market span, grouped by the day they closed.
///
/// Building the index once keeps the equity walk linear in `days + trades`.
#[derive(Debug, Default)]
pub struct TradeIndex<'a> {
    filtered: Vec<&'a Trade>,
    by_exit_day: HashMap<NaiveDate, Vec<&'a Trade>>,
}

impl<'a> TradeIndex<'a> {
    /// Filters `trades` to the span of `market` and indexes the survivors.
    ///
    /// An empty market series has no span, so every trade is excluded.
    /// Every exit date is normalized, in or out of range, so a bad date fails the call.
    pub fn build(trades: &'a [Trade], market: &[MarketDataPoint]) -> Result<Self, AnalyticsError> {
        let span = DateSpan::of_market(market)?;
        let mut index = Self::default();

        for (i, trade) in trades.iter().enumerate() {
            let exit_day = trade
                .exit_time
                .normalize()
                .map_err(|e| AnalyticsError::InvalidDate(format!("exit time of trade #{}", i), e))?;

            if span.is_some_and(|s| s.contains(exit_day)) {
                index.filtered.push(trade);
                index.by_exit_day.entry(exit_day).or_default().push(trade);
            }
        }

        Ok(index)
    }

    /// All trades inside the span, in input order.
    pub fn trades(&self) -> &[&'a Trade] {
        &self.filtered
    }

    /// Trades that closed on `day`, in input order.
    pub fn exiting_on(&self, day: NaiveDate) -> &[&'a Trade] {
        self.by_exit_day.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}

/// The normalized calendar day of a market point.
pub(crate) fn market_day(point: &MarketDataPoint) -> Result<NaiveDate, AnalyticsError> {
    point
        .time
        .normalize()
        .map_err(|e| AnalyticsError::InvalidDate(format!("market day '{}'", point.time), e))
}
