use analytics::AnalyticsError;
use api_client::error::ApiError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::DbError;
use ingest::IngestError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid input file: {0}")]
    Ingest(#[from] IngestError),
    #[error("Analysis failed: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Market data error: {0}")]
    MarketData(#[from] ApiError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Ingest(ingest_err) => (StatusCode::BAD_REQUEST, ingest_err.to_string()),
            AppError::Analytics(AnalyticsError::Calculation(message)) => {
                tracing::error!(%message, "Calculation error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during analysis".to_string(),
                )
            }
            AppError::Analytics(analytics_err) => {
                (StatusCode::BAD_REQUEST, analytics_err.to_string())
            }
            AppError::MarketData(api_err @ ApiError::NoData { .. }) => {
                (StatusCode::NOT_FOUND, api_err.to_string())
            }
            AppError::MarketData(api_err) => {
                tracing::warn!(error = %api_err, "Market data request failed.");
                (StatusCode::BAD_GATEWAY, api_err.to_string())
            }
            AppError::Database(DbError::NotFound) => (
                StatusCode::NOT_FOUND,
                "The requested analysis was not found".to_string(),
            ),
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
