use crate::date::DateValue;
use rust_decimal::Decimal;
use rust_decimal::serde::float;
use serde::{Deserialize, Deserializer, Serialize};

/// One trading day of market data, as delivered by the market data source.
///
/// `benchmark_pct` is the cumulative buy-and-hold return of the instrument up to
/// this day, precomputed by the source. Prices go out as JSON numbers for the
/// charting layer and are read from either numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDataPoint {
    pub time: DateValue,
    #[serde(serialize_with = "float::serialize")]
    pub open: Decimal,
    #[serde(serialize_with = "float::serialize")]
    pub high: Decimal,
    #[serde(serialize_with = "float::serialize")]
    pub low: Decimal,
    #[serde(serialize_with = "float::serialize")]
    pub close: Decimal,
    #[serde(default, serialize_with = "float::serialize")]
    pub benchmark_pct: Decimal,
}

/// A single closed trade taken from the trader's trade file.
///
/// Prices and shares go out as JSON numbers, like market prices, for the chart markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_time: Option<DateValue>,
    pub exit_time: DateValue,
    #[serde(serialize_with = "float::serialize")]
    pub entry_price: Decimal,
    #[serde(serialize_with = "float::serialize")]
    pub exit_price: Decimal,
    /// Missing or `null` in the source means one share. An explicit zero stays zero.
    #[serde(
        default = "default_shares",
        deserialize_with = "shares_or_default",
        serialize_with = "float::serialize"
    )]
    pub shares: Decimal,
}

fn default_shares() -> Decimal {
    Decimal::ONE
}

fn shares_or_default<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or(Decimal::ONE))
}

impl Trade {
    /// Realized profit or loss of the trade in currency units.
    /// `None` when the result does not fit in a `Decimal`.
    pub fn pnl(&self) -> Option<Decimal> {
        self.exit_price
            .checked_sub(self.entry_price)?
            .checked_mul(self.shares)
    }

    /// A trade wins only when it exits strictly above its entry price.
    pub fn is_winner(&self) -> bool {
        self.exit_price > self.entry_price
    }
}

/// A `{ time, value }` pair of a chart line series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub time: DateValue,
    #[serde(serialize_with = "float::serialize")]
    pub value: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn shares_default_to_one_when_missing_or_null() {
        let missing: Trade = serde_json::from_str(
            r#"{"exitTime":"2024-01-02","entryPrice":100,"exitPrice":110}"#,
        )
        .unwrap();
        assert_eq!(missing.shares, Decimal::ONE);

        let null: Trade = serde_json::from_str(
            r#"{"exitTime":"2024-01-02","entryPrice":100,"exitPrice":110,"shares":null}"#,
        )
        .unwrap();
        assert_eq!(null.shares, Decimal::ONE);
    }

    #[test]
    fn explicit_zero_shares_are_kept() {
        let trade: Trade = serde_json::from_str(
            r#"{"exitTime":"2024-01-02","entryPrice":100,"exitPrice":110,"shares":0}"#,
        )
        .unwrap();
        assert_eq!(trade.shares, Decimal::ZERO);
        assert_eq!(trade.pnl(), Some(Decimal::ZERO));
        assert!(trade.is_winner());
    }

    #[test]
    fn pnl_scales_with_shares() {
        let trade = Trade {
            entry_time: None,
            exit_time: "2024-01-02".into(),
            entry_price: dec!(50.5),
            exit_price: dec!(48),
            shares: dec!(4),
        };
        assert_eq!(trade.pnl(), Some(dec!(-10.0)));
        assert!(!trade.is_winner());
    }

    #[test]
    fn benchmark_defaults_to_zero() {
        let point: MarketDataPoint = serde_json::from_str(
            r#"{"time":"2024-01-02","open":1,"high":2,"low":0.5,"close":1.5}"#,
        )
        .unwrap();
        assert_eq!(point.benchmark_pct, Decimal::ZERO);
        assert_eq!(point.close, dec!(1.5));
    }

    #[test]
    fn market_points_serialize_prices_as_numbers() {
        let point = MarketDataPoint {
            time: "2024-01-02".into(),
            open: dec!(1),
            high: dec!(2.5),
            low: dec!(0.5),
            close: dec!(1.5),
            benchmark_pct: dec!(-3.25),
        };
        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(value["high"], serde_json::json!(2.5));
        assert_eq!(value["benchmark_pct"], serde_json::json!(-3.25));
    }

    #[test]
    fn curve_values_serialize_as_numbers() {
        let point = CurvePoint { time: "2024-01-02".into(), value: dec!(12.5) };
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"time":"2024-01-02","value":12.5}"#);
    }

    #[test]
    fn pnl_beyond_decimal_range_is_none() {
        let trade = Trade {
            entry_time: None,
            exit_time: "2024-01-02".into(),
            entry_price: Decimal::ZERO,
            exit_price: Decimal::MAX,
            shares: dec!(2),
        };
        assert_eq!(trade.pnl(), None);
    }

    #[test]
    fn trade_prices_serialize_as_numbers() {
        let trade = Trade {
            entry_time: Some("2024-01-02".into()),
            exit_time: "2024-01-05".into(),
            entry_price: dec!(100.25),
            exit_price: dec!(104.5),
            shares: dec!(3),
        };
        let value = serde_json::to_value(&trade).unwrap();
        assert_eq!(value["entryPrice"], serde_json::json!(100.25));
        assert_eq!(value["exitPrice"], serde_json::json!(104.5));
        assert_eq!(value["shares"], serde_json::json!(3.0));

        let back: Trade = serde_json::from_value(value).unwrap();
        assert_eq!(back, trade);
    }
}
