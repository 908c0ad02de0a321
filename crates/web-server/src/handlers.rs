use crate::{AppState, error::AppError};
use analytics::StatisticsReport;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use core_types::{MarketDataPoint, Trade};
use database::HistoryEntry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataRequest {
    pub symbol: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub symbol: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub capital: Option<Decimal>,
    /// The uploaded trade file as-is: a list of trades or `{ "trades": [...] }`.
    pub trades: Value,
    /// Market data the client already holds. Fetched from the provider when absent.
    #[serde(default)]
    pub market_data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub id: Uuid,
    pub report: StatisticsReport,
}

#[derive(Debug, Serialize)]
pub struct HistoryDetails {
    pub entry: HistoryEntry,
    pub trades: Vec<Trade>,
}

/// # GET /api/health
pub async fn health() -> &'static str {
    "OK"
}

/// # POST /api/data
/// Fetches daily market data with its buy-and-hold benchmark.
pub async fn get_market_data(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MarketDataRequest>,
) -> Result<Json<Vec<MarketDataPoint>>, AppError> {
    check_range(request.start_date, request.end_date)?;
    let symbol = request.symbol.unwrap_or_else(|| state.analysis.default_symbol.clone());

    let points = state
        .market_data
        .fetch_daily(&symbol, request.start_date, request.end_date)
        .await?;
    Ok(Json(points))
}

/// # POST /api/analyze
/// Runs the statistics engine over an uploaded trade list and saves the result to history.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    check_range(request.start_date, request.end_date)?;
    let symbol = request.symbol.unwrap_or_else(|| state.analysis.default_symbol.clone());
    let capital = request.capital.unwrap_or(state.analysis.default_capital);

    let trades = ingest::parse_trade_value(request.trades)?;
    let market = match request.market_data {
        Some(value) => ingest::parse_market_value(value)?,
        None => {
            state
                .market_data
                .fetch_daily(&symbol, request.start_date, request.end_date)
                .await?
        }
    };

    let report = state.engine.calculate(&market, &trades, capital)?;

    let entry = HistoryEntry::from_report(&symbol, request.start_date, request.end_date, capital, &report);
    state.history.save_analysis(&entry, &trades).await?;

    Ok(Json(AnalyzeResponse { id: entry.id, report }))
}

/// # GET /api/history
/// Lists saved analyses, newest first.
pub async fn list_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let entries = state.history.list_analyses().await?;
    Ok(Json(entries))
}

/// # GET /api/history/:id
pub async fn get_history(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoryDetails>, AppError> {
    let entry = state.history.get_analysis(id).await?;
    let trades = state.history.get_trades(id).await?;
    Ok(Json(HistoryDetails { entry, trades }))
}

/// # POST /api/history/:id/replay
/// Re-fetches market data for a saved analysis and recomputes its report from the stored trades.
pub async fn replay_history(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let entry = state.history.get_analysis(id).await?;
    let trades = state.history.get_trades(id).await?;

    let market = state
        .market_data
        .fetch_daily(&entry.symbol, entry.start_date, entry.end_date)
        .await?;
    let report = state.engine.calculate(&market, &trades, entry.capital)?;

    tracing::info!(%id, symbol = %entry.symbol, "Replayed analysis from history.");
    Ok(Json(AnalyzeResponse { id, report }))
}

/// # DELETE /api/history/:id
pub async fn delete_history(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    state.history.delete_analysis(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if start > end {
        return Err(AppError::BadRequest(format!(
            "startDate {} is after endDate {}",
            start, end
        )));
    }
    Ok(())
}
