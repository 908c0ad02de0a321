use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid date format: '{0}' cannot be read as a calendar day")]
    InvalidDateFormat(String),
}
