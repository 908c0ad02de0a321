use crate::error::IngestError;
use core_types::Trade;
use serde_json::{Map, Value};

/// Parses the contents of an uploaded trade file.
///
/// The top level is either a bare list of trades or an object carrying them in
/// `trades`. Every record is validated before it is returned, so nothing
/// downstream ever sees a trade without numeric prices or a readable exit date.
pub fn parse_trade_file(content: &str) -> Result<Vec<Trade>, IngestError> {
    let value: Value = serde_json::from_str(content)?;
    parse_trade_value(value)
}

/// Same as [`parse_trade_file`] for a document that is already parsed, e.g. an HTTP body.
pub fn parse_trade_value(value: Value) -> Result<Vec<Trade>, IngestError> {
    let records = match value {
        Value::Array(records) => records,
        Value::Object(mut fields) => match fields.remove("trades") {
            Some(Value::Array(records)) => records,
            _ => return Err(IngestError::MissingTradesField),
        },
        _ => return Err(IngestError::MissingTradesField),
    };

    let trades = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| parse_trade_record(index, record))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(count = trades.len(), "Parsed trade file.");
    Ok(trades)
}

fn parse_trade_record(index: usize, record: Value) -> Result<Trade, IngestError> {
    let malformed = |reason: String| IngestError::MalformedTradeRecord { index, reason };

    let Value::Object(fields) = &record else {
        return Err(malformed("expected an object".to_string()));
    };
    require_number(fields, "entryPrice").map_err(malformed)?;
    require_number(fields, "exitPrice").map_err(malformed)?;
    match fields.get("exitTime") {
        None | Some(Value::Null) => return Err(malformed("missing 'exitTime'".to_string())),
        _ => {}
    }
    match fields.get("shares") {
        None | Some(Value::Null) | Some(Value::Number(_)) => {}
        Some(other) => return Err(malformed(format!("'shares' must be a number, got {}", other))),
    }

    let trade: Trade = serde_json::from_value(record).map_err(|e| malformed(e.to_string()))?;

    trade
        .exit_time
        .normalize()
        .map_err(|source| IngestError::InvalidDateFormat { index, source })?;
    if let Some(entry_time) = &trade.entry_time {
        entry_time
            .normalize()
            .map_err(|source| IngestError::InvalidDateFormat { index, source })?;
    }

    Ok(trade)
}

fn require_number(fields: &Map<String, Value>, name: &str) -> Result<(), String> {
    match fields.get(name) {
        Some(Value::Number(_)) => Ok(()),
        None | Some(Value::Null) => Err(format!("missing '{}'", name)),
        Some(other) => Err(format!("'{}' must be a number, got {}", name, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_bare_list_and_wrapped_object() {
        let bare = r#"[{"entryTime":"2024-01-02","exitTime":"2024-01-05","entryPrice":100,"exitPrice":104.5,"shares":3}]"#;
        let wrapped = r#"{"strategy":"breakout","trades":[{"exitTime":"2024-01-05","entryPrice":100,"exitPrice":104.5}]}"#;

        let from_bare = parse_trade_file(bare).unwrap();
        let from_wrapped = parse_trade_file(wrapped).unwrap();

        assert_eq!(from_bare.len(), 1);
        assert_eq!(from_bare[0].shares, dec!(3));
        assert_eq!(from_bare[0].exit_price, dec!(104.5));
        assert_eq!(from_wrapped.len(), 1);
        assert_eq!(from_wrapped[0].shares, Decimal::ONE);
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(parse_trade_file("entry,exit\n1,2"), Err(IngestError::InvalidJson(_))));
    }

    #[test]
    fn rejects_objects_without_trade_list() {
        assert!(matches!(
            parse_trade_file(r#"{"orders":[]}"#),
            Err(IngestError::MissingTradesField)
        ));
        assert!(matches!(
            parse_trade_file(r#"{"trades":"none"}"#),
            Err(IngestError::MissingTradesField)
        ));
        assert!(matches!(parse_trade_file("42"), Err(IngestError::MissingTradesField)));
    }

    #[test]
    fn reports_which_record_is_malformed() {
        let content = r#"[
            {"exitTime":"2024-01-05","entryPrice":100,"exitPrice":101},
            {"exitTime":"2024-01-06","entryPrice":"abc","exitPrice":101}
        ]"#;
        match parse_trade_file(content) {
            Err(IngestError::MalformedTradeRecord { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("entryPrice"));
            }
            other => panic!("expected a malformed record, got {:?}", other),
        }
    }

    #[test]
    fn missing_required_fields_are_malformed() {
        for content in [
            r#"[{"entryPrice":100,"exitPrice":101}]"#,
            r#"[{"exitTime":"2024-01-05","exitPrice":101}]"#,
            r#"[{"exitTime":"2024-01-05","entryPrice":100,"exitPrice":null}]"#,
            r#"[{"exitTime":"2024-01-05","entryPrice":100,"exitPrice":101,"shares":"ten"}]"#,
            r#"["2024-01-05"]"#,
        ] {
            assert!(
                matches!(parse_trade_file(content), Err(IngestError::MalformedTradeRecord { index: 0, .. })),
                "accepted {}",
                content
            );
        }
    }

    #[test]
    fn unreadable_dates_fail_at_ingestion() {
        let content = r#"[{"exitTime":"last friday","entryPrice":100,"exitPrice":101}]"#;
        assert!(matches!(
            parse_trade_file(content),
            Err(IngestError::InvalidDateFormat { index: 0, .. })
        ));
    }
}
