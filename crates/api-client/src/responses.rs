use crate::error::ApiError;
use chrono::DateTime;
use core_types::MarketDataPoint;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;

// The chart endpoint wraps everything in `{"chart": {"result": [...], "error": ...}}`.

/// The body of a `GET /v8/finance/chart/{symbol}` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartErrorResponse>,
}

/// Represents an error response from the chart API, e.g. an unknown symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartErrorResponse {
    pub code: String,
    pub description: String,
}

/// One symbol's series. `timestamp` and the quote columns are parallel arrays.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    // Absent when the range holds no trading day.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartMeta {
    pub symbol: String,
    /// Offset of the exchange's timezone from UTC, in seconds.
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteColumns>,
}

/// Daily OHLC columns. Days the exchange reports without a price hold `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteColumns {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResult {
    /// Converts the columnar series into daily points, skipping days without a full price.
    ///
    /// Each bar is dated by the exchange's local calendar day. `benchmark_pct` is left
    /// at zero; see [`crate::attach_benchmark`].
    pub fn into_points(self) -> Result<Vec<MarketDataPoint>, ApiError> {
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let offset = self.meta.gmtoffset;
        let mut points = Vec::with_capacity(self.timestamp.len());

        for (i, ts) in self.timestamp.iter().enumerate() {
            let column = |values: &[Option<f64>]| values.get(i).copied().flatten();
            let (Some(open), Some(high), Some(low), Some(close)) = (
                column(&quote.open),
                column(&quote.high),
                column(&quote.low),
                column(&quote.close),
            ) else {
                tracing::trace!(symbol = %self.meta.symbol, timestamp = ts, "Skipping bar without prices.");
                continue;
            };

            let day = DateTime::from_timestamp(ts + offset, 0)
                .ok_or_else(|| ApiError::InvalidData(format!("Invalid timestamp: {}", ts)))?
                .date_naive();

            points.push(MarketDataPoint {
                time: day.into(),
                open: to_decimal(open)?,
                high: to_decimal(high)?,
                low: to_decimal(low)?,
                close: to_decimal(close)?,
                benchmark_pct: Decimal::ZERO,
            });
        }

        Ok(points)
    }
}

fn to_decimal(value: f64) -> Result<Decimal, ApiError> {
    Decimal::from_f64(value).ok_or_else(|| ApiError::InvalidData(format!("Invalid price: {}", value)))
}
