use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("File format is invalid, expected JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Expected a list of trades or an object with a 'trades' list")]
    MissingTradesField,

    #[error("Trade #{index} is malformed: {reason}")]
    MalformedTradeRecord { index: usize, reason: String },

    #[error("Market data point #{index} is malformed: {reason}")]
    MalformedMarketRecord { index: usize, reason: String },

    #[error("Record #{index}: {source}")]
    InvalidDateFormat {
        index: usize,
        #[source]
        source: CoreError,
    },
}
