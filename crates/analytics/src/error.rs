use core_types::CoreError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Initial capital must be positive, got {0}")]
    InvalidCapital(Decimal),

    #[error("Invalid date in {0}: {1}")]
    InvalidDate(String, #[source] CoreError),

    #[error("Calculation error: {0}")]
    Calculation(String),
}
