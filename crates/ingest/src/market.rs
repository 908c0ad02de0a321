use crate::error::IngestError;
use core_types::MarketDataPoint;
use serde_json::Value;

/// Parses a market data file: a JSON list of daily points, ascending by time.
///
/// Every `time` must read as a calendar day. Points are kept in file order;
/// a series that goes backwards in time is logged, not reordered.
pub fn parse_market_data(content: &str) -> Result<Vec<MarketDataPoint>, IngestError> {
    let value: Value = serde_json::from_str(content)?;
    parse_market_value(value)
}

/// Same as [`parse_market_data`] for a document that is already parsed.
pub fn parse_market_value(value: Value) -> Result<Vec<MarketDataPoint>, IngestError> {
    let Value::Array(records) = value else {
        return Err(IngestError::MalformedMarketRecord {
            index: 0,
            reason: "expected a list of market data points".to_string(),
        });
    };

    let mut points = Vec::with_capacity(records.len());
    let mut previous_day = None;

    for (index, record) in records.into_iter().enumerate() {
        let point: MarketDataPoint = serde_json::from_value(record)
            .map_err(|e| IngestError::MalformedMarketRecord { index, reason: e.to_string() })?;
        let day = point
            .time
            .normalize()
            .map_err(|source| IngestError::InvalidDateFormat { index, source })?;

        if previous_day.is_some_and(|prev| day < prev) {
            tracing::warn!(index, %day, "Market data is not in ascending order.");
        }
        previous_day = Some(day);
        points.push(point);
    }

    tracing::debug!(count = points.len(), "Parsed market data.");
    Ok(points)
}
